//! Service error types.

use thiserror::Error;

/// Errors that can occur when talking to the student-record service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("service error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not what the service contract promises.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Returns `true` for failures where the request may never have arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Timeout(_) | ServiceError::Network(_))
    }
}
