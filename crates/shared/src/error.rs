use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by an upstream dashboard API call.
///
/// `status` is the HTTP status of the response, or `0` when no response was
/// received at all (connection refused, DNS, timeout).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("http {status}: {body}")]
pub struct HttpError {
    pub status: u16,
    pub body: String,
}

impl HttpError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }

    pub fn is_transport(&self) -> bool {
        self.status == 0
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}
