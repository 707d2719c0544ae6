//! Error taxonomy of the registry domain.

use crate::domain::models::student::StudentValidationError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Local rule violated; no write reached the store
    #[error(transparent)]
    Validation(#[from] StudentValidationError),

    /// Any failure reported by the student store or the auth provider
    #[error("Remote operation failed: {0}")]
    Remote(anyhow::Error),

    #[error("Student {0} is not in the loaded page")]
    RecordNotLoaded(String),

    #[error("No student is staged for deletion")]
    NothingStaged,

    #[error("Page size {0} is not allowed")]
    InvalidPageSize(u32),

    #[error("Export is restricted to the administrator account")]
    ExportForbidden,

    #[error("Not signed in")]
    NotSignedIn,
}

impl RegistryError {
    pub fn remote(error: anyhow::Error) -> Self {
        RegistryError::Remote(error)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RegistryError::Validation(_))
    }
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
