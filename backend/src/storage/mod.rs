//! # Storage Module
//!
//! Collaborators behind the domain: the student store and the authentication
//! provider.
//!
//! ## Current Implementation
//!
//! - **sqlite**: Durable student store on SQLite via SQLx
//! - **memory**: Process-local store and auth provider for development and tests

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::{Account, InMemoryAuthProvider, InMemoryStudentStore};
pub use sqlite::SqliteStudentStore;
pub use traits::{AuthProvider, StudentPage, StudentStore};
