//! Turning action results into the toasts the client shows.

use serde::Serialize;
use tracing::{error, warn};

use bucketly_database::{BackendErrorKind, classify_error};

use crate::error::ActionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Classify an action error: typed action failures first, then the database chain.
pub fn error_kind(err: &anyhow::Error) -> BackendErrorKind {
    match err.downcast_ref::<ActionError>() {
        Some(action_err) => action_err.kind(),
        None => classify_error(err),
    }
}

/// Duplicate-key failures on idempotent writes (awarding, following) are no-ops.
pub fn is_benign_duplicate(err: &anyhow::Error) -> bool {
    error_kind(err) == BackendErrorKind::Conflict
}

/// Log an error and build the toast for it. Validation failures show their own message.
pub fn toast_for_error(err: &anyhow::Error) -> Toast {
    if let Some(ActionError::Invalid(invalid)) = err.downcast_ref::<ActionError>() {
        return Toast::error(invalid.message.clone());
    }

    let kind = error_kind(err);
    match kind {
        BackendErrorKind::Unknown | BackendErrorKind::Unavailable => {
            error!(?err, ?kind, "action failed")
        }
        _ => warn!(?err, ?kind, "action rejected"),
    }

    Toast::error(kind.user_message())
}
