//! Error types for the class editor engine

use crate::store::Phase;
use crate::template::WidgetKind;
use thiserror::Error;

/// Failures reported by a [`ResourceClient`](crate::client::ResourceClient)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No response before the client timeout elapsed
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Connection refused, DNS failure, aborted request...
    #[error("Request failed: {0}")]
    Network(String),

    /// The API answered with a non-2xx status
    #[error("API error: {status}")]
    Status { status: u16 },
}

/// Payload bytes that do not match the expected shape
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected payload shape: {0}")]
    Shape(String),
}

/// Errors raised by the lifecycle controller
#[derive(Debug, Error)]
pub enum EditorError {
    /// A read failed in transport
    #[error("Fetch of {endpoint} failed: {source}")]
    Fetch {
        endpoint: String,
        #[source]
        source: TransportError,
    },

    /// A read succeeded but its payload could not be decoded
    #[error("Decoding response of {endpoint} failed: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: DecodeError,
    },

    /// A save or delete failed in transport
    #[error("Submission to {endpoint} failed: {source}")]
    Submit {
        endpoint: String,
        #[source]
        source: TransportError,
    },

    #[error("Unknown class type: {0}")]
    UnknownClassType(String),

    #[error("Field '{0}' is not part of this class type")]
    UnknownField(String),

    #[error("Field '{key}' expects a {expected} value")]
    InvalidValue { key: String, expected: WidgetKind },

    /// The action is not permitted in the current phase
    #[error("Cannot {action} while {phase}")]
    Rejected { action: &'static str, phase: Phase },

    #[error("This class cannot be deleted")]
    DeleteUnsupported,

    /// The editor was torn down
    #[error("Editor is no longer mounted")]
    Unmounted,
}

impl EditorError {
    /// Alert text shown to the user for endpoint failures
    pub fn status_message(&self) -> String {
        match self {
            EditorError::Fetch { endpoint, .. }
            | EditorError::Decode { endpoint, .. }
            | EditorError::Submit { endpoint, .. } => {
                format!("Error while querying endpoint: {}", endpoint)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_errors_share_alert_text() {
        let endpoint = "http://localhost:8081/api/classes/images/options".to_string();
        let fetch = EditorError::Fetch {
            endpoint: endpoint.clone(),
            source: TransportError::Timeout(3),
        };
        let decode = EditorError::Decode {
            endpoint: endpoint.clone(),
            source: DecodeError::Shape("missing classOptions".to_string()),
        };

        let expected = format!("Error while querying endpoint: {}", endpoint);
        assert_eq!(fetch.status_message(), expected);
        assert_eq!(decode.status_message(), expected);
    }

    #[test]
    fn test_rejection_message() {
        let err = EditorError::Rejected {
            action: "save",
            phase: Phase::Saving,
        };
        assert_eq!(err.status_message(), "Cannot save while Saving");
    }
}
