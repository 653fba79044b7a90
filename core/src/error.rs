//! Error types for the count API client.
//!
//! # Design
//! Every failure, whatever its origin, leaves the SDK as a single
//! [`SdkError`] shape: a human-readable `message`, the HTTP `status` when a
//! response was received, and the raw `cause` when one exists. The UI layer
//! only ever reads `message`. [`ErrorKind`] is kept alongside so code that
//! cares can still tell a dropped connection from a server-side rejection.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed low-level error kept as the cause of an [`SdkError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Message used for every failure where no response came back.
pub const NO_RESPONSE_MESSAGE: &str = "No response received from server";

/// Where a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be built or sent, such as a malformed URL.
    Request,
    /// No response was received: connection failure or timeout.
    Transport,
    /// The server answered with a status outside 2xx.
    HttpStatus,
    /// A 2xx response whose envelope reports `success: false`.
    Application,
    /// A successful envelope missing the payload the operation requires.
    ContractViolation,
    /// A 2xx response whose body is not a valid envelope.
    Decode,
    /// The request payload could not be serialized.
    Encode,
}

/// Normalized error returned by every [`crate::CountSdk`] operation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SdkError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    #[source]
    pub cause: Option<BoxError>,
}

impl SdkError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            cause: None,
        }
    }

    /// No response was received; `status` stays absent.
    pub fn transport(cause: BoxError) -> Self {
        Self::new(ErrorKind::Transport, NO_RESPONSE_MESSAGE, None).with_cause(cause)
    }

    /// The request never left the client. Carries the cause's message, or
    /// `fallback` when the cause has none.
    pub fn request(cause: BoxError, fallback: String) -> Self {
        let message = cause.to_string();
        let message = if message.trim().is_empty() { fallback } else { message };
        Self::new(ErrorKind::Request, message, None).with_cause(cause)
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Failure reported by a [`crate::Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request was rejected before anything was sent.
    #[error("request could not be sent: {0}")]
    Request(BoxError),
    /// The request may have gone out, but no response came back.
    #[error("no response: {0}")]
    NoResponse(BoxError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid timeout {value:?}: {source}")]
    InvalidTimeout {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("base URL must not be empty")]
    EmptyBaseUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = SdkError::new(ErrorKind::HttpStatus, "Failed to get counts", Some(500));
        assert_eq!(err.to_string(), "Failed to get counts");
        assert_eq!(err.status, Some(500));
    }

    #[test]
    fn transport_error_keeps_cause_and_drops_status() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SdkError::transport(Box::new(io));
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.message, NO_RESPONSE_MESSAGE);
        assert!(err.status.is_none());
        assert_eq!(err.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn request_error_uses_cause_message() {
        let err = SdkError::request("invalid uri character".into(), "Failed to get counts".to_string());
        assert_eq!(err.kind, ErrorKind::Request);
        assert_eq!(err.message, "invalid uri character");
        assert!(err.status.is_none());
        assert!(err.cause.is_some());
    }

    #[test]
    fn request_error_without_message_uses_fallback() {
        let err = SdkError::request("".into(), "Failed to get counts".to_string());
        assert_eq!(err.message, "Failed to get counts");
        assert_eq!(err.source().unwrap().to_string(), "");
    }

    #[test]
    fn not_found_is_status_based() {
        let err = SdkError::new(ErrorKind::ContractViolation, "Count with id 3 not found", Some(404));
        assert!(err.is_not_found());
        assert!(!SdkError::new(ErrorKind::Transport, NO_RESPONSE_MESSAGE, None).is_not_found());
    }
}
