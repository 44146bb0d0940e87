// src/error.rs
// Defines the shared error taxonomy for the enhancement pipeline and its
// conversion into HTTP responses. All three front ends (API, CLI, web UI)
// map from this one set of error kinds.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json; // For creating JSON error bodies
use std::path::PathBuf;

use crate::config::METHOD_NAMES;

#[derive(Debug)]
pub enum EnhanceError {
    // Configuration errors: always the caller's fault, never retried.
    InvalidMethod(String),
    InvalidUpscale(String),
    InvalidFlag(String),

    // Input errors: the supplied image could not be read.
    InputNotFound(PathBuf),
    UnreadableImage(String),
    InvalidEncoding(String),

    // Output I/O failure (saving or encoding the result).
    WriteError(String),

    // Failure inside the restoration engine. May be transient or permanent;
    // the pipeline does not distinguish and never retries.
    EngineError(String),
}

impl std::fmt::Display for EnhanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnhanceError::InvalidMethod(value) => write!(
                f,
                "Invalid method '{}'. Must be one of: {}",
                value,
                METHOD_NAMES.join(", ")
            ),
            EnhanceError::InvalidUpscale(value) => {
                write!(f, "Invalid upscale '{}'. Must be either 2 or 4", value)
            }
            EnhanceError::InvalidFlag(value) => write!(
                f,
                "Invalid boolean flag '{}'. Expected true, false, 1 or 0",
                value
            ),
            EnhanceError::InputNotFound(path) => {
                write!(f, "Input file not found: {}", path.display())
            }
            EnhanceError::UnreadableImage(details) => {
                write!(f, "Invalid image data: {}", details)
            }
            EnhanceError::InvalidEncoding(details) => {
                write!(f, "Invalid base64 image data: {}", details)
            }
            EnhanceError::WriteError(details) => {
                write!(f, "Failed to write output image: {}", details)
            }
            EnhanceError::EngineError(details) => {
                write!(f, "Error processing image: {}", details)
            }
        }
    }
}

impl std::error::Error for EnhanceError {}

impl EnhanceError {
    // Stable machine-readable code for each error kind, used in JSON bodies.
    pub fn code(&self) -> &'static str {
        match self {
            EnhanceError::InvalidMethod(_) => "INVALID_METHOD",
            EnhanceError::InvalidUpscale(_) => "INVALID_UPSCALE",
            EnhanceError::InvalidFlag(_) => "INVALID_FLAG",
            EnhanceError::InputNotFound(_) => "INPUT_NOT_FOUND",
            EnhanceError::UnreadableImage(_) => "UNREADABLE_IMAGE",
            EnhanceError::InvalidEncoding(_) => "INVALID_ENCODING",
            EnhanceError::WriteError(_) => "WRITE_ERROR",
            EnhanceError::EngineError(_) => "ENGINE_ERROR",
        }
    }

    // Configuration and input errors are the caller's fault; everything else
    // is a processing failure on the server side.
    pub fn status_code(&self) -> StatusCode {
        match self {
            EnhanceError::InvalidMethod(_)
            | EnhanceError::InvalidUpscale(_)
            | EnhanceError::InvalidFlag(_)
            | EnhanceError::InputNotFound(_)
            | EnhanceError::UnreadableImage(_)
            | EnhanceError::InvalidEncoding(_) => StatusCode::BAD_REQUEST,
            EnhanceError::WriteError(_) | EnhanceError::EngineError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for EnhanceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_client_errors() {
        assert_eq!(
            EnhanceError::InvalidMethod("bogus".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EnhanceError::InvalidUpscale("3".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EnhanceError::InvalidEncoding("bad padding".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_processing_errors_are_server_errors() {
        assert_eq!(
            EnhanceError::EngineError("inference failed".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            EnhanceError::WriteError("disk full".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_method_message_names_allowed_set() {
        let message = EnhanceError::InvalidMethod("bogus".into()).to_string();
        assert!(message.contains("bogus"));
        assert!(message.contains("gfpgan"));
        assert!(message.contains("RestoreFormer"));
        assert!(message.contains("codeformer"));
    }
}
