//! Test utilities shared by the domain, storage and REST test modules.
//!
//! `ProbeStore` wraps any student store, counts the calls that reach it and
//! can be switched into a failing mode to simulate an unreachable service.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use shared::Student;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::models::student::StudentPayload;
use crate::domain::query_spec::QuerySpec;
use crate::storage::{InMemoryStudentStore, StudentPage, StudentStore};

/// Build a student whose `created_at` is `minutes` after a fixed base time
pub fn student(
    id: &str,
    name: &str,
    mother_name: Option<&str>,
    case_number: Option<&str>,
    minutes: i64,
) -> Student {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    Student {
        id: id.to_string(),
        name: name.to_string(),
        mother_name: mother_name.map(str::to_string),
        birth_date: None,
        case_number: case_number.map(str::to_string),
        notes: None,
        created_at: base + Duration::minutes(minutes),
    }
}

/// `count` students named "Student 01".. with ids "s01".., oldest first
pub fn numbered_students(count: usize) -> Vec<Student> {
    (1..=count)
        .map(|n| student(&format!("s{:02}", n), &format!("Student {:02}", n), None, None, n as i64))
        .collect()
}

#[derive(Default)]
pub struct CallCounts {
    pub list: AtomicUsize,
    pub find: AtomicUsize,
    pub insert: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.list.load(Ordering::SeqCst)
            + self.find.load(Ordering::SeqCst)
            + self.insert.load(Ordering::SeqCst)
            + self.update.load(Ordering::SeqCst)
            + self.delete.load(Ordering::SeqCst)
    }

    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct ProbeStore {
    pub inner: InMemoryStudentStore,
    pub calls: Arc<CallCounts>,
    failing: Arc<AtomicBool>,
}

impl ProbeStore {
    pub fn new(students: Vec<Student>) -> Self {
        Self {
            inner: InMemoryStudentStore::with_students(students),
            calls: Arc::new(CallCounts::default()),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(anyhow!("store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StudentStore for ProbeStore {
    async fn list(&self, query: &QuerySpec) -> Result<StudentPage> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.list(query).await
    }

    async fn find_by_case_number(&self, case_number: &str, exclude_id: Option<&str>) -> Result<Vec<Student>> {
        self.calls.find.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.find_by_case_number(case_number, exclude_id).await
    }

    async fn insert(&self, payload: &StudentPayload) -> Result<Student> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.insert(payload).await
    }

    async fn update(&self, id: &str, payload: &StudentPayload) -> Result<Student> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.update(id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.delete_by_id(id).await
    }
}
