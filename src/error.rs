use thiserror::Error;

/// Contract violations of the quiz session state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("no eligible words for this mode and source")]
    EmptyPool,
    #[error("quiz session has not been started")]
    NotStarted,
    #[error("quiz session is already completed")]
    AlreadyCompleted,
    #[error("quiz session is not completed yet")]
    NotCompleted,
    #[error("question {index} is out of range (session has {total} questions)")]
    QuestionOutOfRange { index: usize, total: usize },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode or decode stored data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),
    #[error("seed file '{0}' is not bundled")]
    MissingSeed(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Top level error for the binary and anything spanning several layers
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
