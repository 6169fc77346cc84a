//! Stateless HTTP request builder and response parser for the library API.
//!
//! # Design
//! `LibraryClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the round-trip (see
//! [`crate::Library`] for the async driver) and attaches the bearer token.
//!
//! Non-2xx responses become [`ApiError::Request`] carrying the body's
//! `detail` string when there is one, or the operation's fixed fallback
//! message otherwise.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

mod auth;
mod books;
mod rentals;
mod users;

/// Synchronous, stateless client for the library API.
#[derive(Debug, Clone)]
pub struct LibraryClient {
    base_url: String,
}

impl LibraryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{path}", self.base_url))
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> ApiResult<HttpRequest> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(method, path).with_body(body))
    }
}

/// Percent-encode one path segment (ids, titles).
fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, fallback: &str) -> ApiResult<T> {
    check_status(&response, fallback)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map a non-success status to `ApiError::Request` with the best message available.
fn check_status(response: &HttpResponse, fallback: &str) -> ApiResult<()> {
    if response.is_success() {
        return Ok(());
    }
    let message = error_detail(&response.body).unwrap_or_else(|| fallback.to_string());
    tracing::debug!(status = response.status, %message, "request rejected");
    Err(ApiError::Request {
        status: response.status,
        message,
    })
}

fn error_detail(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(e) => {
            tracing::warn!(error = %e, "error response body is not JSON");
            None
        }
    }
}
