//! Client-side schemas for every entity the library API accepts.
//!
//! # Overview
//! A schema turns an untyped field map (`serde_json::Value`, as collected
//! from form controls) into a normalized, fully typed payload, or into a
//! [`ValidationErrors`] map keyed by dotted field path.
//!
//! # Design
//! - Each field is described by a declarative rule constant (see `rules.rs`)
//!   and checked independently; the first failing rule per field wins.
//! - Cross-field invariants run only when every field they read is valid.
//! - Validation is all-or-nothing: a payload type is only constructed when
//!   the error map is empty, so an invalid submission never reaches
//!   `LibraryClient`.
//! - Patch schemas reuse the same rules but skip absent fields.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

mod book;
mod login;
mod rental;
mod rules;
mod user;

use rules::Rule;

/// Validate an untyped field map into `Self`.
pub trait Schema: Sized {
    fn validate(raw: &Value) -> Result<Self, ValidationErrors>;
}

/// Field path to message, e.g. `address.area` -> `Area is required`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `path` unless an earlier rule already failed there.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{path}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Walks one raw record and accumulates per-field errors.
pub(crate) struct Validator<'a> {
    raw: &'a Value,
    errors: ValidationErrors,
}

impl<'a> Validator<'a> {
    pub(crate) fn new(raw: &'a Value) -> Self {
        Self {
            raw,
            errors: ValidationErrors::new(),
        }
    }

    /// Required field: a missing value fails with the rule's required message.
    pub(crate) fn field<R: Rule>(&mut self, path: &str, rule: &R) -> Option<R::Output> {
        self.record(path, rule.apply(lookup(self.raw, path)))
    }

    /// Patch field: absent or `null` means "leave unchanged".
    pub(crate) fn present<R: Rule>(&mut self, path: &str, rule: &R) -> Option<R::Output> {
        match lookup(self.raw, path) {
            None | Some(Value::Null) => None,
            value => self.record(path, rule.apply(value)),
        }
    }

    /// Whether the field exists in the raw input at all.
    pub(crate) fn has(&self, path: &str) -> bool {
        !matches!(lookup(self.raw, path), None | Some(Value::Null))
    }

    pub(crate) fn reject(&mut self, path: &str, message: &'static str) {
        self.errors.add(path, message);
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    fn record<T>(&mut self, path: &str, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.add(path, message);
                None
            }
        }
    }
}

/// Resolve a dotted path such as `phone.number` against a JSON object.
fn lookup<'v>(raw: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(raw, |value, key| value.get(key))
}
