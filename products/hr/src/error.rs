use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failure reported by a repository. Unique-key collisions are split out so
/// callers can tell them apart from everything else storage can do wrong.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StorageError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::UniqueViolation(detail),
            _ => Self::Db(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("employee already exists with email {email}")]
    DuplicateResource { email: String },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EmployeeError {
    pub fn duplicate(email: impl Into<String>) -> Self {
        Self::DuplicateResource {
            email: email.into(),
        }
    }
}

pub type EmployeeResult<T> = Result<T, EmployeeError>;
