use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    RetrievalFailure,
    MissingRenderTarget,
}

/// What the board shows inline in place of the buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorNotice {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("failed to load shipment data from {source_name}: {message}")]
    Retrieval {
        source_name: String,
        message: String,
    },
    #[error("render target '{target}' is missing")]
    MissingRenderTarget { target: String },
}

impl BoardError {
    pub fn retrieval(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Retrieval {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BoardError::Retrieval { .. } => ErrorCode::RetrievalFailure,
            BoardError::MissingRenderTarget { .. } => ErrorCode::MissingRenderTarget,
        }
    }
}

impl From<&BoardError> for ErrorNotice {
    fn from(value: &BoardError) -> Self {
        let message = match value {
            BoardError::Retrieval { .. } => "Shipment data could not be loaded.".to_string(),
            BoardError::MissingRenderTarget { .. } => value.to_string(),
        };
        Self {
            code: value.code(),
            message,
        }
    }
}
