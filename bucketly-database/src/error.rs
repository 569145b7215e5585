//! Backend error taxonomy.
//!
//! Provider codes (Postgres SQLSTATE values and the PostgREST/auth codes the
//! hosted gateway emits) collapse into a handful of kinds the UI knows how to
//! talk about.

use serde::Serialize;

/// SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendErrorKind {
    NotFound,
    Conflict,
    Forbidden,
    SessionExpired,
    BadInput,
    Unavailable,
    Unknown,
}

const CODE_TABLE: &[(&str, BackendErrorKind)] = &[
    // no rows for a single-row read
    ("PGRST116", BackendErrorKind::NotFound),
    ("P0002", BackendErrorKind::NotFound),
    (UNIQUE_VIOLATION, BackendErrorKind::Conflict),
    ("23P01", BackendErrorKind::Conflict),
    // row-level security and grants
    ("42501", BackendErrorKind::Forbidden),
    ("PGRST300", BackendErrorKind::Forbidden),
    // expired or invalid JWT
    ("PGRST301", BackendErrorKind::SessionExpired),
    ("PGRST302", BackendErrorKind::SessionExpired),
    ("28000", BackendErrorKind::SessionExpired),
    ("22P02", BackendErrorKind::BadInput),
    ("22001", BackendErrorKind::BadInput),
    ("22003", BackendErrorKind::BadInput),
    ("23502", BackendErrorKind::BadInput),
    ("23503", BackendErrorKind::BadInput),
    ("23514", BackendErrorKind::BadInput),
    ("PGRST100", BackendErrorKind::BadInput),
    ("PGRST204", BackendErrorKind::BadInput),
    ("53300", BackendErrorKind::Unavailable),
    ("57P01", BackendErrorKind::Unavailable),
    ("57P03", BackendErrorKind::Unavailable),
];

impl BackendErrorKind {
    /// Message shown to the user in a toast.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::NotFound => "We couldn't find what you were looking for.",
            Self::Conflict => "That already exists.",
            Self::Forbidden => "You don't have permission to do that.",
            Self::SessionExpired => "Your session has expired. Please sign in again.",
            Self::BadInput => "Some of the information you entered isn't valid.",
            Self::Unavailable => "We're having trouble connecting. Please try again in a moment.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

/// Map a provider error code to its kind. Unlisted connection-class codes
/// (`08xxx`) count as unavailable, everything else is unknown.
pub fn kind_for_code(code: &str) -> BackendErrorKind {
    if let Some((_, kind)) = CODE_TABLE.iter().find(|(known, _)| *known == code) {
        return *kind;
    }

    if code.starts_with("08") {
        return BackendErrorKind::Unavailable;
    }

    BackendErrorKind::Unknown
}

pub fn classify_sqlx(err: &sqlx::Error) -> BackendErrorKind {
    match err {
        sqlx::Error::RowNotFound => BackendErrorKind::NotFound,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map_or(BackendErrorKind::Unknown, |code| kind_for_code(&code)),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => BackendErrorKind::Unavailable,
        _ => BackendErrorKind::Unknown,
    }
}

/// Classify an error by the first database error found in its chain.
pub fn classify_error(err: &anyhow::Error) -> BackendErrorKind {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .map_or(BackendErrorKind::Unknown, classify_sqlx)
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
}
