//! Error types shared by the HTTP client, the fetch cache and the print driver

use std::collections::BTreeMap;
use thiserror::Error;

/// Failure of a single API request.
///
/// Cloneable because one in-flight request is shared by every caller
/// waiting on the same resource key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("{message}")]
    Status { status: u16, message: String },

    /// 400/422 with per-field messages, shown inline by forms
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to serialize request: {0}")]
    Encode(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Text for the notification surface
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Messages for one form field, empty when the error is not a validation error
    pub fn field_messages(&self, field: &str) -> &[String] {
        match self {
            Self::Validation { fields, .. } => fields.get(field).map(Vec::as_slice).unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Client configuration could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid client configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid client configuration: {0}")]
    Invalid(String),
}
