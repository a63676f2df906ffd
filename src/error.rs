//! Error types for the OTP gateway
//!
//! Provides unified error handling using thiserror. Domain errors convert
//! straight into HTTP responses at the handler boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors raised by the embedded TTL cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key or value rejected before storage
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache is at capacity even after sweeping expired entries
    #[error("Cache full: {0}")]
    CacheFull(String),
}

// == Store Error Enum ==
/// Failures talking to the verification store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The embedded cache refused the write
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The remote store could not be reached or answered garbage
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote store answered with a non-success status
    #[error("store returned unexpected status {0}")]
    Status(u16),

    /// The configured remote store URL cannot be used as a base
    #[error("invalid store url: {0}")]
    InvalidUrl(String),

    /// A stored record could not be decoded
    #[error("corrupt record under key '{key}'")]
    Corrupt { key: String, value: String },
}

// == Delivery Error Enum ==
/// Reasons an OTP email could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("could not build message: {0}")]
    Message(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}

// == OTP Error Enum ==
/// Outcome of a failed issuance or verification.
#[derive(Error, Debug)]
pub enum OtpError {
    /// A required request field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A request field was present but cannot be used as given
    #[error("Invalid value for field: {0}")]
    InvalidField(&'static str),

    /// Requested code length was zero
    #[error("OTP length must be greater than zero")]
    InvalidLength,

    /// No pending code for the recipient
    #[error("No OTP found for this email")]
    NotFound,

    /// The pending code is past its expiry
    #[error("OTP has expired")]
    Expired,

    /// Submitted code does not match the pending one
    #[error("Invalid OTP")]
    InvalidCode,

    #[error("Failed to send OTP email: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Verification store error: {0}")]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for OtpError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            OtpError::MissingField(_)
            | OtpError::InvalidField(_)
            | OtpError::Expired
            | OtpError::InvalidCode => (StatusCode::BAD_REQUEST, self.to_string()),
            OtpError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            OtpError::Delivery(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send OTP email".to_string(),
            ),
            OtpError::InvalidLength | OtpError::Store(_) => {
                error!(error = %self, "request failed on server side");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for OTP operations.
pub type Result<T> = std::result::Result<T, OtpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            OtpError::MissingField("email").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OtpError::InvalidField("email").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OtpError::Expired.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OtpError::InvalidCode.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OtpError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_server_errors_map_to_500() {
        let delivery = OtpError::from(DeliveryError::Transport("connection refused".into()));
        assert_eq!(
            delivery.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let store = OtpError::from(StoreError::Status(503));
        assert_eq!(
            store.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_field_message_names_field() {
        assert_eq!(
            OtpError::MissingField("otp").to_string(),
            "Missing required field: otp"
        );
    }
}
