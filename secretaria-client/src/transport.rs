//! Transport seam between resources and the HTTP backend.
//!
//! Resources speak JSON values over [`Backend`]; the reqwest implementation lives
//! in [`crate::rest`] and tests substitute a scripted mock.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(value)
    }
}

/// Failure below the resource layer, before any user-facing mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never completed (connection refused, timeout, TLS).
    #[error("{0}")]
    Network(String),
    /// A 2xx answer whose body was not JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// A JSON-over-HTTP backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Perform one request. Success bodies that are empty come back as `Value::Null`.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError>;
}
