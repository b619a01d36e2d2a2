use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub detail: Option<String>,

    /// Per-field validation messages
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiErrorEnvelope {
    /// Parse an error body; `None` when the body is not an error envelope
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body).ok()
    }

    /// Human-readable message: `message`, then `detail`
    pub fn user_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    pub fn has_field_errors(&self) -> bool {
        self.errors.values().any(|messages| !messages.is_empty())
    }
}
