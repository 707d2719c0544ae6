//! Two-step guard around deleting a student: stage a candidate, then confirm
//! or cancel.

use log::info;
use shared::Student;

use crate::domain::errors::{RegistryError, RegistryResult};
use crate::storage::StudentStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DeletionFlow {
    #[default]
    Idle,
    Staged(Student),
}

impl DeletionFlow {
    /// Stage `student`; a previously staged candidate is replaced
    pub fn stage(self, student: Student) -> Self {
        info!("Staged student {} for deletion", student.id);
        DeletionFlow::Staged(student)
    }

    pub fn cancel(self) -> Self {
        if let DeletionFlow::Staged(student) = &self {
            info!("Cancelled deletion of student {}", student.id);
        }
        DeletionFlow::Idle
    }

    pub fn staged(&self) -> Option<&Student> {
        match self {
            DeletionFlow::Idle => None,
            DeletionFlow::Staged(student) => Some(student),
        }
    }

    /// Delete the staged student. The flow itself is left untouched so the
    /// caller can return to `Idle` only once the delete succeeded.
    pub async fn confirm(&self, store: &dyn StudentStore) -> RegistryResult<Student> {
        let student = self.staged().ok_or(RegistryError::NothingStaged)?;
        store
            .delete_by_id(&student.id)
            .await
            .map_err(RegistryError::remote)?;
        info!("Deleted student {}", student.id);
        Ok(student.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{student, CallCounts, ProbeStore};

    #[tokio::test]
    async fn test_stage_then_confirm_deletes() {
        let store = ProbeStore::new(vec![student("s01", "Ana", None, None, 1)]);
        let flow = DeletionFlow::default().stage(student("s01", "Ana", None, None, 1));
        assert_eq!(flow.staged().map(|s| s.id.as_str()), Some("s01"));

        let deleted = flow.confirm(&store).await.unwrap();
        assert_eq!(deleted.id, "s01");
        assert!(store.inner.is_empty().await);
    }

    #[tokio::test]
    async fn test_confirm_from_idle_is_rejected() {
        let store = ProbeStore::new(Vec::new());
        let err = DeletionFlow::Idle.confirm(&store).await.unwrap_err();
        assert!(matches!(err, RegistryError::NothingStaged));
        assert_eq!(CallCounts::get(&store.calls.delete), 0);
    }

    #[tokio::test]
    async fn test_cancel_has_no_remote_effect() {
        let store = ProbeStore::new(vec![student("s01", "Ana", None, None, 1)]);
        let flow = DeletionFlow::default()
            .stage(student("s01", "Ana", None, None, 1))
            .cancel();
        assert_eq!(flow, DeletionFlow::Idle);
        assert_eq!(store.calls.total(), 0);
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_candidate() {
        let store = ProbeStore::new(vec![student("s01", "Ana", None, None, 1)]);
        store.set_failing(true);
        let flow = DeletionFlow::default().stage(student("s01", "Ana", None, None, 1));

        assert!(matches!(flow.confirm(&store).await, Err(RegistryError::Remote(_))));
        assert!(flow.staged().is_some());
    }
}
