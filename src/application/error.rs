use thiserror::Error;

use crate::storage::StoreError;

/// User-correctable input errors, reported back to the caller immediately
/// and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Invalid kind: {0} (expected 'income' or 'expense')")]
    InvalidKind(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// True if the failure is something the user can fix by correcting
    /// their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Store(StoreError::NotFound(_))
        )
    }
}
