//! Error types for the management gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Main error type for the gateway.
///
/// Every variant is `Clone` so that one broker-name resolution outcome can be
/// handed to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// A template still contains a placeholder after substitution
    #[error("Unresolved placeholder '{placeholder}' in management pattern")]
    UnresolvedPlaceholder { placeholder: &'static str },

    /// The resource kind has no template for the requested purpose
    #[error("No {purpose} pattern for resource kind '{kind}'")]
    TemplateNotFound {
        kind: &'static str,
        purpose: &'static str,
    },

    /// Broker-name discovery did not match exactly one broker
    #[error("Broker identity for '{endpoint}' is ambiguous: search matched {matches} objects")]
    BrokerIdentityAmbiguous { endpoint: String, matches: usize },

    /// The management endpoint answered but rejected the operation
    #[error("Remote operation failed with status {status}: {error}")]
    RemoteOperationFailed { status: u16, error: String },

    /// The management endpoint could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Target endpoint could not be parsed or is not supported
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Malformed inbound request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(Arc<io::Error>),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(Arc<serde_json::Error>),
}

/// Type alias for Results using GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;

impl From<io::Error> for GatewayError {
    fn from(error: io::Error) -> Self {
        Self::Io(Arc::new(error))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(Arc::new(error))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        // Keep the URL out of the message; it may carry userinfo.
        Self::Transport(error.without_url().to_string())
    }
}

impl GatewayError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a remote failure from a reply status and optional error text
    pub fn remote(status: u16, error: Option<String>) -> Self {
        Self::RemoteOperationFailed {
            status,
            error: error.unwrap_or_else(|| "no error detail".to_string()),
        }
    }

    /// Whether the caller (rather than the broker or the gateway) is at fault
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedPlaceholder { .. }
                | Self::TemplateNotFound { .. }
                | Self::InvalidEndpoint(_)
                | Self::InvalidRequest(_)
        )
    }

    /// Whether the failure originated at the management endpoint
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::BrokerIdentityAmbiguous { .. }
                | Self::RemoteOperationFailed { .. }
                | Self::Transport(_)
        )
    }
}

/// Convert GatewayError into an HTTP reply for the REST layer
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = if self.is_caller_error() {
            StatusCode::BAD_REQUEST
        } else if self.is_upstream_error() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = serde_json::json!({
            "status": "failed",
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(GatewayError::UnresolvedPlaceholder { placeholder: "QUEUE_NAME" }.is_caller_error());
        assert!(GatewayError::invalid_endpoint("nope").is_caller_error());
        assert!(!GatewayError::Transport("refused".into()).is_caller_error());

        assert!(GatewayError::remote(404, None).is_upstream_error());
        assert!(GatewayError::BrokerIdentityAmbiguous {
            endpoint: "https://b:8161".into(),
            matches: 2
        }
        .is_upstream_error());
        assert!(!GatewayError::config("bad").is_upstream_error());
    }

    #[test]
    fn test_remote_error_message() {
        let error = GatewayError::remote(404, Some("InstanceNotFoundException".into()));
        assert_eq!(
            error.to_string(),
            "Remote operation failed with status 404: InstanceNotFoundException"
        );

        let error = GatewayError::remote(500, None);
        assert!(error.to_string().contains("no error detail"));
    }

    #[test]
    fn test_http_status_mapping() {
        let cases = [
            (GatewayError::UnresolvedPlaceholder { placeholder: "QUEUE_NAME" }, StatusCode::BAD_REQUEST),
            (GatewayError::invalid_request("missing name"), StatusCode::BAD_REQUEST),
            (GatewayError::remote(404, None), StatusCode::BAD_GATEWAY),
            (GatewayError::Transport("refused".into()), StatusCode::BAD_GATEWAY),
            (GatewayError::config("broken"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_io_error_is_cloneable() {
        let error: GatewayError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        let copy = error.clone();
        assert_eq!(error.to_string(), copy.to_string());
    }
}
