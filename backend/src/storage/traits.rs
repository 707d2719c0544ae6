//! # Storage Traits
//!
//! Collaborator interfaces consumed by the domain layer. The student store and
//! the authentication provider are external services; the domain only relies
//! on the operations below, so any backend (SQLite, in-memory, a hosted
//! tabular service) can be plugged in.

use anyhow::Result;
use async_trait::async_trait;
use shared::{AuthUser, Student};

use crate::domain::models::student::StudentPayload;
use crate::domain::query_spec::QuerySpec;

/// One page of matching students plus the size of the full matching set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPage {
    pub records: Vec<Student>,
    pub total_count: u64,
}

/// Trait defining the interface for student storage operations
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// List students matching the query's filter, in the query's order,
    /// restricted to its range when one is given
    async fn list(&self, query: &QuerySpec) -> Result<StudentPage>;

    /// Find students whose case number equals `case_number` exactly,
    /// skipping the student identified by `exclude_id`
    async fn find_by_case_number(&self, case_number: &str, exclude_id: Option<&str>) -> Result<Vec<Student>>;

    /// Insert a new student; the store assigns `id` and `created_at`
    async fn insert(&self, payload: &StudentPayload) -> Result<Student>;

    /// Overwrite the editable fields of an existing student
    async fn update(&self, id: &str, payload: &StudentPayload) -> Result<Student>;

    /// Delete a student by ID
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// Trait defining the interface for the authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Start a session; fails on unknown email or wrong password
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// The user of the current session, if any
    async fn current_user(&self) -> Result<Option<AuthUser>>;

    /// End the current session
    async fn sign_out(&self) -> Result<()>;
}
