//! # Domain Module
//!
//! Business logic of the student registry screen. Nothing here knows about
//! HTTP or SQL; the store and the auth service are reached through the traits
//! in `storage`.
//!
//! ## Module Organization
//!
//! - **field_mask**: Date and case-number input masks, display/storage date conversion
//! - **query_spec**: Search/sort/page settings to store query descriptors
//! - **view_state**: The screen state value and its transitions
//! - **uniqueness**: Advisory case-number existence check
//! - **record_writer**: Form validation and create/update
//! - **deletion_flow**: Stage, confirm or cancel a deletion
//! - **export_service**: CSV document of the filtered, ordered list
//! - **access_service**: Session handling and the export privilege
//! - **list_controller**: Orchestrates all of the above
//!
//! ## Business Rules
//!
//! - A student must have a non-blank name
//! - A case number, when given, should not be held by another student at write time
//! - Changing search, sort or page size returns the table to page 1
//! - Writes never edit the loaded page; it is always re-queried

pub mod access_service;
pub mod deletion_flow;
pub mod errors;
pub mod export_service;
pub mod field_mask;
pub mod list_controller;
pub mod models;
pub mod query_spec;
pub mod record_writer;
pub mod uniqueness;
pub mod view_state;

pub use access_service::AccessService;
pub use deletion_flow::DeletionFlow;
pub use errors::{RegistryError, RegistryResult};
pub use export_service::{CsvExport, ExportService};
pub use list_controller::{ListController, ReloadTicket};
pub use record_writer::{RecordWriter, WriteOutcome};
pub use uniqueness::UniquenessValidator;
pub use view_state::ViewState;
