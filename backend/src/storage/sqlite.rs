//! # SQLite Student Store
//!
//! Durable [`StudentStore`] backed by a single `students` table. Query
//! descriptors are translated with `sqlx::QueryBuilder`; every value coming
//! from the user is bound, never interpolated.
//!
//! `LIKE` in SQLite is case-insensitive for ASCII only, so accented letters in
//! a search must match case exactly.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use shared::Student;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, QueryBuilder, Row, Sqlite, SqlitePool};
use std::sync::Arc;

use super::traits::{StudentPage, StudentStore};
use crate::domain::models::student::StudentPayload;
use crate::domain::query_spec::{QuerySpec, SearchFilter};

const COLUMNS: &str = "id, name, mother_name, birth_date, case_number, notes, created_at";

/// SqliteStudentStore manages database operations for students
#[derive(Clone)]
pub struct SqliteStudentStore {
    pool: Arc<SqlitePool>,
}

/// Fixed-width UTC timestamp so that text order equals time order
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: Option<&SearchFilter>) {
    let Some(filter) = filter else {
        return;
    };

    let pattern = format!("%{}%", escape_like(&filter.needle));
    builder.push(" WHERE (");
    for (index, column) in filter.columns().iter().enumerate() {
        if index > 0 {
            builder.push(" OR ");
        }
        builder
            .push(column.as_str())
            .push(" LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\'");
    }
    builder.push(")");
}

fn row_to_student(row: &SqliteRow) -> Result<Student> {
    let created_at: String = row.try_get("created_at")?;
    Ok(Student {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        mother_name: row.try_get("mother_name")?,
        birth_date: row.try_get("birth_date")?,
        case_number: row.try_get("case_number")?,
        notes: row.try_get("notes")?,
        created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
    })
}

impl SqliteStudentStore {
    /// Open (creating if needed) the database at `url`
    pub async fn new(url: &str) -> Result<Self> {
        if url.contains(":memory:") {
            return Self::in_memory().await;
        }

        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Private in-memory database on a single connection
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                mother_name TEXT,
                birth_date TEXT,
                case_number TEXT,
                notes TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_students_created_at
            ON students(created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn get_student(&self, id: &str) -> Result<Option<Student>> {
        let row = sqlx::query(&format!("SELECT {} FROM students WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        row.as_ref().map(row_to_student).transpose()
    }
}

#[async_trait]
impl StudentStore for SqliteStudentStore {
    async fn list(&self, query: &QuerySpec) -> Result<StudentPage> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM students");
        push_filter(&mut count_query, query.filter.as_ref());
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&*self.pool)
            .await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM students", COLUMNS));
        push_filter(&mut select, query.filter.as_ref());
        select
            .push(" ORDER BY ")
            .push(query.order.column.as_str())
            .push(if query.order.ascending { " ASC" } else { " DESC" })
            .push(", id ASC");
        if let Some(range) = query.range {
            select
                .push(" LIMIT ")
                .push_bind(range.limit as i64)
                .push(" OFFSET ")
                .push_bind(range.offset as i64);
        }

        let rows = select.build().fetch_all(&*self.pool).await?;
        let records = rows.iter().map(row_to_student).collect::<Result<Vec<_>>>()?;

        debug!("SQLite list returned {} of {} students", records.len(), total);
        Ok(StudentPage {
            records,
            total_count: total.max(0) as u64,
        })
    }

    async fn find_by_case_number(&self, case_number: &str, exclude_id: Option<&str>) -> Result<Vec<Student>> {
        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM students WHERE case_number = ",
            COLUMNS
        ));
        select.push_bind(case_number.to_string());
        if let Some(id) = exclude_id {
            select.push(" AND id <> ").push_bind(id.to_string());
        }

        let rows = select.build().fetch_all(&*self.pool).await?;
        rows.iter().map(row_to_student).collect()
    }

    async fn insert(&self, payload: &StudentPayload) -> Result<Student> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO students (id, name, mother_name, birth_date, case_number, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&payload.name)
        .bind(&payload.mother_name)
        .bind(&payload.birth_date)
        .bind(&payload.case_number)
        .bind(&payload.notes)
        .bind(format_timestamp(&Utc::now()))
        .execute(&*self.pool)
        .await?;

        self.get_student(&id)
            .await?
            .ok_or_else(|| anyhow!("Student vanished after insert: {}", id))
    }

    async fn update(&self, id: &str, payload: &StudentPayload) -> Result<Student> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET name = ?, mother_name = ?, birth_date = ?, case_number = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.mother_name)
        .bind(&payload.birth_date)
        .bind(&payload.case_number)
        .bind(&payload.notes)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Student not found: {}", id));
        }

        self.get_student(id)
            .await?
            .ok_or_else(|| anyhow!("Student not found: {}", id))
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}
