use http::{Method, StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Standard error type for the Etude framework.
#[derive(Debug, Error)]
pub enum EtudeError {
    /// No registered pattern matches the method and path.
    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// A pipeline stage panicked and was caught by the recovery stage.
    #[error("Handler panicked: {0}")]
    HandlerPanic(String),

    /// The request body exceeded the app's size limit.
    #[error("Request body larger than {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),
}

impl EtudeError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            EtudeError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            EtudeError::HandlerPanic(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EtudeError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            EtudeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EtudeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EtudeError::Http(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            EtudeError::RouteNotFound { .. } => "NOT_FOUND",
            EtudeError::HandlerPanic(_) => "INTERNAL_ERROR",
            EtudeError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            EtudeError::Config(_) => "CONFIG_ERROR",
            EtudeError::Io(_) => "IO_ERROR",
            EtudeError::Http(_) => "HTTP_ERROR",
        }
    }
}

/// Body written by [`Context::fail`](crate::Context::fail).
///
/// ```json
/// { "message": "Internal Server Error" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            message: message.into(),
        }
    }
}

pub type EtudeResult<T> = Result<T, EtudeError>;
