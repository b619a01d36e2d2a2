//! Transient user notifications
//!
//! Request failures never reach the rendering layer; they end up here as a
//! message. `NoticeBoard` is the signal-backed implementation mounted by
//! `NoticeHost`.

mod board;

pub use board::{NoticeBoard, NoticeHost};

use crate::shared::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Message display side effect
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Fill the `{name}` placeholder of a success template
pub fn success_message(template: &str, name: &str) -> String {
    template.replace("{name}", name)
}

/// Report the outcome of a create/update call and pass the result through.
///
/// Success shows the templated message; request errors show their message.
/// Validation errors are left to the form, which renders them per field.
pub fn notify_outcome<T>(
    notifier: &dyn Notifier,
    result: Result<T, ApiError>,
    success_template: &str,
    name: &str,
) -> Result<T, ApiError> {
    match &result {
        Ok(_) => notifier.notify(Notice::success(success_message(success_template, name))),
        Err(ApiError::Validation { .. }) => {}
        Err(error) => notifier.notify(Notice::error(error.user_message())),
    }
    result
}
