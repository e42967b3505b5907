//! Wire-level DTOs shared by the transport and the API adapters.
//!
//! DESIGN
//! ======
//! Remote endpoints wrap payloads in `ApiEnvelope`; static fallback files
//! hold the bare payload. Both paths hand callers the bare payload.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Response envelope returned by every remote endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Per-request settings, the equivalent of a fetch `RequestInit`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Upper bound for the whole exchange; `None` defers to the platform default.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self { method: Method::Delete, ..Self::default() }
    }

    /// POST with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized.
    pub fn post_json<T: Serialize>(body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self { method: Method::Post, body: Some(serde_json::to_string(body)?), ..Self::default() })
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Header value for `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// Add `Content-Type: application/json` unless the caller set one.
    #[must_use]
    pub fn with_json_content_type(mut self) -> Self {
        if self.header("content-type").is_none() {
            self.headers.insert(0, ("Content-Type".to_owned(), "application/json".to_owned()));
        }
        self
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
