//! Create/update of a student from the form.

use log::{info, warn};
use shared::{Student, StudentForm};
use std::sync::Arc;

use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::models::student::{StudentPayload, StudentValidationError};
use crate::domain::uniqueness::UniquenessValidator;
use crate::storage::StudentStore;

/// Which write reached the store
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Created(Student),
    Updated(Student),
}

impl WriteOutcome {
    pub fn student(&self) -> &Student {
        match self {
            WriteOutcome::Created(student) | WriteOutcome::Updated(student) => student,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            WriteOutcome::Created(_) => "Student created successfully.",
            WriteOutcome::Updated(_) => "Student updated successfully.",
        }
    }
}

#[derive(Clone)]
pub struct RecordWriter {
    store: Arc<dyn StudentStore>,
    uniqueness: UniquenessValidator,
}

impl RecordWriter {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        let uniqueness = UniquenessValidator::new(store.clone());
        Self { store, uniqueness }
    }

    /// Validate `form` and write it: an update of `editing_id` when set,
    /// otherwise an insert. Validation failures never touch the store.
    pub async fn save(&self, form: &StudentForm, editing_id: Option<&str>) -> RegistryResult<WriteOutcome> {
        let payload = StudentPayload::from_form(form);
        if payload.name.is_empty() {
            warn!("Rejected save: missing name");
            return Err(StudentValidationError::MissingName.into());
        }

        if let Some(case_number) = payload.case_number.as_deref() {
            let taken = self
                .uniqueness
                .exists(case_number, editing_id)
                .await
                .map_err(RegistryError::remote)?;
            if taken {
                warn!("Rejected save: case number {} already in use", case_number);
                return Err(StudentValidationError::DuplicateCaseNumber.into());
            }
        }

        match editing_id {
            Some(id) => {
                let student = self.store.update(id, &payload).await.map_err(RegistryError::remote)?;
                info!("Updated student {}", student.id);
                Ok(WriteOutcome::Updated(student))
            }
            None => {
                let student = self.store.insert(&payload).await.map_err(RegistryError::remote)?;
                info!("Created student {}", student.id);
                Ok(WriteOutcome::Created(student))
            }
        }
    }
}
