use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::validator::MAX_IMAGE_BYTES;

/// Rejections raised before an image is staged. Never reaches the network.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationError {
    #[error("selected file is not an image")]
    NotAnImage,
    #[error("image exceeds the {} byte limit", MAX_IMAGE_BYTES)]
    TooLarge,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("camera device unavailable")]
    DeviceUnavailable,
    #[error("camera session is not open")]
    NotOpen,
}

/// Failures talking to either remote endpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Connection failure, non-success status without a readable payload, or timeout.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered `success: false`; carries its error text when it sent one.
    #[error("service rejected the request: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
    /// A payload that does not match the documented response shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Server-provided text when the payload carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ServiceError::Rejected(Some(message)) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Malformed(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("another request is already in progress")]
    Busy,
    #[error("invalid image data: {0}")]
    InvalidData(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
