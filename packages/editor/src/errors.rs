//! Error types for the editor

use crate::workflow::ViewState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Style configuration text is non-empty but is not a JSON object
    #[error("Malformed style configuration: {0}")]
    MalformedConfig(#[source] serde_json::Error),

    #[error("Action requires the {expected} view, page is on {actual}")]
    WrongView {
        expected: ViewState,
        actual: ViewState,
    },

    #[error("A compile request is already in flight")]
    SubmissionInFlight,

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// Failure reported by a remote collaborator before it produced a response
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}
