//! Case-number uniqueness check.
//!
//! The check is advisory: it reads the store and reports what it saw. Two
//! writers interleaving between the check and their writes can still commit
//! the same case number.

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::storage::StudentStore;

#[derive(Clone)]
pub struct UniquenessValidator {
    store: Arc<dyn StudentStore>,
}

impl UniquenessValidator {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// True iff some student other than `exclude_id` already holds
    /// `case_number`
    pub async fn exists(&self, case_number: &str, exclude_id: Option<&str>) -> Result<bool> {
        let matches = self.store.find_by_case_number(case_number, exclude_id).await?;
        debug!(
            "Case number {} has {} other holder(s) (excluding {:?})",
            case_number,
            matches.len(),
            exclude_id
        );
        Ok(!matches.is_empty())
    }
}
