use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when a successful response normalizes to zero items.
pub const EMPTY_RESULT_MESSAGE: &str = "API returned no items — showing example data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Non-success status, transport failure, timeout or unreadable body.
    NetworkFailure,
    /// Valid response without a single usable item.
    EmptyResult,
    /// Rejected before any request was issued.
    InvalidInput,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network error {status} — {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {message}")]
    Transport { message: String },

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("unreadable response: {message}")]
    Decode { message: String },

    #[error("{}", EMPTY_RESULT_MESSAGE)]
    EmptyResult,
}

impl ApiError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::EmptyResult => ErrorKind::EmptyResult,
            Self::InvalidUrl { .. }
            | Self::Status { .. }
            | Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::Decode { .. } => ErrorKind::NetworkFailure,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
