//! Declarative per-field rules.
//!
//! Every rule is a `const` value built with chained `const fn`s, e.g.
//! `Text::required("Title is required").max(50, "...").folded()`. Rules are
//! evaluated in declaration order: required, then bounds, then format.

use serde_json::Value;
use validator::{ValidateEmail, ValidateLength};

use crate::dates::parse_date;
use chrono::NaiveDate;

pub(crate) trait Rule {
    type Output;

    fn apply(&self, value: Option<&Value>) -> Result<Self::Output, &'static str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Normalize {
    /// Keep the value byte for byte (passwords).
    Verbatim,
    Trim,
    /// Trim and lower-case (textual keys the backend matches on).
    Fold,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Text {
    required: &'static str,
    max: Option<(u64, &'static str)>,
    email: Option<&'static str>,
    normalize: Normalize,
}

impl Text {
    pub(crate) const fn required(message: &'static str) -> Self {
        Self {
            required: message,
            max: None,
            email: None,
            normalize: Normalize::Trim,
        }
    }

    pub(crate) const fn max(self, limit: u64, message: &'static str) -> Self {
        Self {
            max: Some((limit, message)),
            ..self
        }
    }

    pub(crate) const fn email(self, message: &'static str) -> Self {
        Self {
            email: Some(message),
            ..self
        }
    }

    pub(crate) const fn folded(self) -> Self {
        Self {
            normalize: Normalize::Fold,
            ..self
        }
    }

    pub(crate) const fn verbatim(self) -> Self {
        Self {
            normalize: Normalize::Verbatim,
            ..self
        }
    }
}

impl Rule for Text {
    type Output = String;

    fn apply(&self, value: Option<&Value>) -> Result<String, &'static str> {
        let raw = match value {
            Some(Value::String(s)) => s.as_str(),
            Some(Value::Number(n)) => return self.check(n.to_string()),
            _ => return Err(self.required),
        };
        // Bounds apply to what was typed; folding can change the char count.
        match self.normalize {
            Normalize::Verbatim => self.check(raw.to_string()),
            Normalize::Trim => self.check(raw.trim().to_string()),
            Normalize::Fold => self.check(raw.trim().to_string()).map(|t| t.to_lowercase()),
        }
    }
}

impl Text {
    fn check(&self, text: String) -> Result<String, &'static str> {
        if text.is_empty() {
            return Err(self.required);
        }
        if let Some((limit, message)) = self.max {
            if !text.validate_length(None, Some(limit), None) {
                return Err(message);
            }
        }
        if let Some(message) = self.email {
            if !text.validate_email() {
                return Err(message);
            }
        }
        Ok(text)
    }
}

/// Non-negative whole number. Accepts JSON numbers and numeric strings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Count {
    required: &'static str,
    not_a_number: &'static str,
    negative: &'static str,
    fractional: &'static str,
}

impl Count {
    pub(crate) const fn required(message: &'static str) -> Self {
        Self {
            required: message,
            not_a_number: message,
            negative: message,
            fractional: message,
        }
    }

    pub(crate) const fn number(self, message: &'static str) -> Self {
        Self {
            not_a_number: message,
            ..self
        }
    }

    pub(crate) const fn non_negative(self, message: &'static str) -> Self {
        Self {
            negative: message,
            ..self
        }
    }

    pub(crate) const fn integer(self, message: &'static str) -> Self {
        Self {
            fractional: message,
            ..self
        }
    }
}

impl Rule for Count {
    type Output = u32;

    fn apply(&self, value: Option<&Value>) -> Result<u32, &'static str> {
        let number = match value {
            Some(Value::Number(n)) => n.as_f64().ok_or(self.not_a_number)?,
            Some(Value::String(s)) if s.trim().is_empty() => return Err(self.required),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| self.not_a_number)?,
            None | Some(Value::Null) => return Err(self.required),
            Some(_) => return Err(self.not_a_number),
        };
        if !number.is_finite() {
            return Err(self.not_a_number);
        }
        if number < 0.0 {
            return Err(self.negative);
        }
        if number.fract() != 0.0 || number > f64::from(u32::MAX) {
            return Err(self.fractional);
        }
        Ok(number as u32)
    }
}

/// Calendar date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Date {
    required: &'static str,
    invalid: &'static str,
    max: Option<(u64, &'static str)>,
}

impl Date {
    pub(crate) const fn required(message: &'static str) -> Self {
        Self {
            required: message,
            invalid: message,
            max: None,
        }
    }

    pub(crate) const fn invalid(self, message: &'static str) -> Self {
        Self {
            invalid: message,
            ..self
        }
    }

    pub(crate) const fn max(self, limit: u64, message: &'static str) -> Self {
        Self {
            max: Some((limit, message)),
            ..self
        }
    }
}

impl Rule for Date {
    type Output = NaiveDate;

    fn apply(&self, value: Option<&Value>) -> Result<NaiveDate, &'static str> {
        let raw = match value {
            Some(Value::String(s)) => s.trim(),
            None | Some(Value::Null) => return Err(self.required),
            Some(_) => return Err(self.invalid),
        };
        if raw.is_empty() {
            return Err(self.required);
        }
        if let Some((limit, message)) = self.max {
            if !raw.validate_length(None, Some(limit), None) {
                return Err(message);
            }
        }
        parse_date(raw).ok_or(self.invalid)
    }
}
