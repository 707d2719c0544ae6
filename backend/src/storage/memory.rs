//! # In-Memory Storage
//!
//! Process-local implementations of the collaborator traits. The student store
//! honours the full query descriptor (filter, order, range) so it behaves like
//! the hosted service for development and tests. The auth provider checks
//! credentials against a fixed account list and keeps a single session.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use shared::{AuthUser, SortColumn, Student};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{AuthProvider, StudentPage, StudentStore};
use crate::domain::models::student::StudentPayload;
use crate::domain::query_spec::{OrderBy, QuerySpec};

#[derive(Clone, Default)]
pub struct InMemoryStudentStore {
    students: Arc<RwLock<Vec<Student>>>,
}

fn column_value(student: &Student, column: SortColumn) -> Option<String> {
    match column {
        SortColumn::Name => Some(student.name.clone()),
        SortColumn::MotherName => student.mother_name.clone(),
        SortColumn::BirthDate => student.birth_date.clone(),
        SortColumn::CaseNumber => student.case_number.clone(),
        SortColumn::CreatedAt => Some(student.created_at.to_rfc3339()),
    }
}

/// Absent values sort first ascending, last descending; ties fall back to id.
fn compare(a: &Student, b: &Student, order: &OrderBy) -> Ordering {
    let primary = match order.column {
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        column => column_value(a, column).cmp(&column_value(b, column)),
    };
    let primary = if order.ascending { primary } else { primary.reverse() };
    primary.then_with(|| a.id.cmp(&b.id))
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with existing records
    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students: Arc::new(RwLock::new(students)),
        }
    }

    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.students.read().await.is_empty()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn list(&self, query: &QuerySpec) -> Result<StudentPage> {
        let students = self.students.read().await;

        let mut matching: Vec<Student> = students
            .iter()
            .filter(|student| match &query.filter {
                Some(filter) => filter.matches(
                    filter
                        .columns()
                        .iter()
                        .map(|column| match column {
                            SortColumn::Name => Some(student.name.as_str()),
                            SortColumn::MotherName => student.mother_name.as_deref(),
                            SortColumn::CaseNumber => student.case_number.as_deref(),
                            SortColumn::BirthDate => student.birth_date.as_deref(),
                            SortColumn::CreatedAt => None,
                        }),
                ),
                None => true,
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| compare(a, b, &query.order));
        let total_count = matching.len() as u64;

        let records = match query.range {
            Some(range) => matching
                .into_iter()
                .skip(range.offset as usize)
                .take(range.limit as usize)
                .collect(),
            None => matching,
        };

        debug!("In-memory list returned {} of {} students", records.len(), total_count);
        Ok(StudentPage { records, total_count })
    }

    async fn find_by_case_number(&self, case_number: &str, exclude_id: Option<&str>) -> Result<Vec<Student>> {
        let students = self.students.read().await;
        Ok(students
            .iter()
            .filter(|s| s.case_number.as_deref() == Some(case_number))
            .filter(|s| exclude_id != Some(s.id.as_str()))
            .cloned()
            .collect())
    }

    async fn insert(&self, payload: &StudentPayload) -> Result<Student> {
        let student = Student {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name.clone(),
            mother_name: payload.mother_name.clone(),
            birth_date: payload.birth_date.clone(),
            case_number: payload.case_number.clone(),
            notes: payload.notes.clone(),
            created_at: Utc::now(),
        };
        self.students.write().await.push(student.clone());
        Ok(student)
    }

    async fn update(&self, id: &str, payload: &StudentPayload) -> Result<Student> {
        let mut students = self.students.write().await;
        let student = students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow!("Student not found: {}", id))?;

        student.name = payload.name.clone();
        student.mother_name = payload.mother_name.clone();
        student.birth_date = payload.birth_date.clone();
        student.case_number = payload.case_number.clone();
        student.notes = payload.notes.clone();
        Ok(student.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let mut students = self.students.write().await;
        let before = students.len();
        students.retain(|s| s.id != id);
        if students.len() == before {
            warn!("Delete requested for unknown student: {}", id);
        }
        Ok(())
    }
}

/// A sign-in account known to [`InMemoryAuthProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Default)]
pub struct InMemoryAuthProvider {
    accounts: Arc<Vec<Account>>,
    session: Arc<RwLock<Option<AuthUser>>>,
}

impl InMemoryAuthProvider {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(accounts),
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Provider with an already open session (for tests and local tooling)
    pub fn signed_in(email: &str) -> Self {
        Self {
            accounts: Arc::new(Vec::new()),
            session: Arc::new(RwLock::new(Some(AuthUser {
                email: email.to_string(),
            }))),
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let email = email.trim();
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
            .ok_or_else(|| anyhow!("Invalid email or password."))?;

        let user = AuthUser {
            email: account.email.clone(),
        };
        *self.session.write().await = Some(user.clone());
        info!("Signed in: {}", user.email);
        Ok(user)
    }

    async fn current_user(&self) -> Result<Option<AuthUser>> {
        Ok(self.session.read().await.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(user) = self.session.write().await.take() {
            info!("Signed out: {}", user.email);
        }
        Ok(())
    }
}
