use bucketly_database::BackendErrorKind;
use bucketly_utils::validation::ValidationError;

/// Failures an action detects itself, before or instead of the database.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("not allowed: {0}")]
    Forbidden(&'static str),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ActionError {
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            Self::NotFound(_) => BackendErrorKind::NotFound,
            Self::Forbidden(_) => BackendErrorKind::Forbidden,
            Self::Invalid(_) => BackendErrorKind::BadInput,
        }
    }
}
