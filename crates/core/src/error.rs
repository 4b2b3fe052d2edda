#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("patient registry lock was poisoned")]
    LockPoisoned,
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
