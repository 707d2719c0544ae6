//! # List Controller
//!
//! Orchestrates the registry screen. It owns the [`ViewState`], turns user
//! intent into store queries and reconciles the responses.
//!
//! A transition that needs fresh data commits only once its fetch succeeds;
//! on failure the previous state is kept and the remote error is returned.
//!
//! Reloads carry a [`ReloadTicket`]. Callers that fetch outside the
//! controller (so several fetches can be in flight) use
//! [`ListController::begin_reload`] and [`ListController::apply_reload`]:
//! only the most recently issued ticket is applied, older responses are
//! dropped.

use log::{info, warn};
use shared::{FormInputRequest, Message, SortColumn, ViewSnapshot};
use std::sync::Arc;

use crate::domain::access_service::AccessService;
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::export_service::{CsvExport, ExportService, DEFAULT_EXPORT_FILENAME};
use crate::domain::query_spec::QuerySpec;
use crate::domain::record_writer::RecordWriter;
use crate::domain::view_state::{is_allowed_page_size, ViewState};
use crate::storage::{StudentPage, StudentStore};

/// Identity of one reload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadTicket {
    pub seq: u64,
    pub query: QuerySpec,
}

pub struct ListController {
    state: ViewState,
    store: Arc<dyn StudentStore>,
    writer: RecordWriter,
    exporter: ExportService,
    access: AccessService,
    last_issued: u64,
}

impl ListController {
    pub fn new(store: Arc<dyn StudentStore>, access: AccessService) -> Self {
        Self {
            state: ViewState::default(),
            writer: RecordWriter::new(store.clone()),
            exporter: ExportService::new(store.clone(), DEFAULT_EXPORT_FILENAME),
            store,
            access,
            last_issued: 0,
        }
    }

    /// Start with a page size other than the default
    pub fn with_page_size(mut self, page_size: u32) -> RegistryResult<Self> {
        if !is_allowed_page_size(page_size) {
            return Err(RegistryError::InvalidPageSize(page_size));
        }
        self.state = ViewState::with_initial_page_size(page_size);
        Ok(self)
    }

    pub fn with_export_filename(mut self, filename: &str) -> Self {
        self.exporter = ExportService::new(self.store.clone(), filename);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> Arc<dyn StudentStore> {
        self.store.clone()
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.state.snapshot(self.access.can_export().await)
    }

    // Reload

    /// Issue a ticket for the current query; it supersedes every earlier one
    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.last_issued += 1;
        ReloadTicket {
            seq: self.last_issued,
            query: self.state.query(),
        }
    }

    /// Apply a fetched page if `ticket` is still the latest. Returns whether
    /// the page was applied.
    pub fn apply_reload(&mut self, ticket: &ReloadTicket, page: StudentPage) -> bool {
        if ticket.seq != self.last_issued {
            warn!(
                "Discarding stale reload #{} (latest is #{})",
                ticket.seq, self.last_issued
            );
            return false;
        }
        self.state = self.state.with_results(page);
        true
    }

    /// Fetch the current page and total count and replace the loaded records
    pub async fn reload(&mut self) -> RegistryResult<()> {
        let ticket = self.begin_reload();
        let page = self
            .store
            .list(&ticket.query)
            .await
            .map_err(|err| {
                warn!("Reload #{} failed: {}", ticket.seq, err);
                RegistryError::remote(err)
            })?;
        info!(
            "Reload #{}: {} of {} students",
            ticket.seq,
            page.records.len(),
            page.total_count
        );
        self.apply_reload(&ticket, page);
        Ok(())
    }

    /// Move to `next` and reload; on failure the previous state is restored
    async fn commit(&mut self, next: ViewState) -> RegistryResult<()> {
        let previous = std::mem::replace(&mut self.state, next);
        if let Err(err) = self.reload().await {
            self.state = previous;
            return Err(err);
        }
        Ok(())
    }

    // Table navigation

    pub async fn set_search(&mut self, text: &str) -> RegistryResult<()> {
        let next = self.state.with_search(text);
        self.commit(next).await
    }

    pub async fn set_sort(&mut self, column: SortColumn) -> RegistryResult<()> {
        let next = self.state.with_sort(column);
        self.commit(next).await
    }

    /// Page 0 reads as page 1
    pub async fn set_page(&mut self, page: u32) -> RegistryResult<()> {
        let next = self.state.with_page(page);
        self.commit(next).await
    }

    pub async fn set_page_size(&mut self, page_size: u32) -> RegistryResult<()> {
        if !is_allowed_page_size(page_size) {
            warn!("Rejected page size {}", page_size);
            return Err(RegistryError::InvalidPageSize(page_size));
        }
        let next = self.state.with_page_size(page_size);
        self.commit(next).await
    }

    // Form

    pub fn update_form(&mut self, input: &FormInputRequest) {
        self.state = self.state.with_form_input(input);
    }

    pub fn set_birth_date_input(&mut self, raw: &str) {
        self.update_form(&FormInputRequest {
            birth_date: Some(raw.to_string()),
            ..FormInputRequest::default()
        });
    }

    pub fn set_case_number_input(&mut self, raw: &str) {
        self.update_form(&FormInputRequest {
            case_number: Some(raw.to_string()),
            ..FormInputRequest::default()
        });
    }

    /// Fill the form from a record of the loaded page
    pub fn edit(&mut self, id: &str) -> RegistryResult<()> {
        let student = self
            .state
            .find_loaded(id)
            .ok_or_else(|| RegistryError::RecordNotLoaded(id.to_string()))?;
        info!("Editing student {}", student.id);
        self.state = self.state.editing(student);
        Ok(())
    }

    pub fn clear_form(&mut self) {
        self.state = self.state.with_cleared_form();
    }

    /// Create or update from the form, then reload.
    ///
    /// Validation failures set an error message. Store failures leave the
    /// form as it was and set no message.
    pub async fn save(&mut self) -> RegistryResult<()> {
        let result = self
            .writer
            .save(&self.state.form, self.state.editing_id.as_deref())
            .await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(RegistryError::Validation(err)) => {
                self.state = self.state.with_message(Some(Message::error(err.to_string())));
                return Err(err.into());
            }
            Err(err) => return Err(err),
        };

        self.state = self
            .state
            .with_cleared_form()
            .with_message(Some(Message::success(outcome.success_message())));
        self.reload().await
    }

    // Deletion

    pub fn stage(&mut self, id: &str) -> RegistryResult<()> {
        let student = self
            .state
            .find_loaded(id)
            .cloned()
            .ok_or_else(|| RegistryError::RecordNotLoaded(id.to_string()))?;
        let deletion = self.state.deletion.clone().stage(student);
        self.state = self.state.with_deletion(deletion);
        Ok(())
    }

    pub fn cancel_deletion(&mut self) {
        let deletion = self.state.deletion.clone().cancel();
        self.state = self.state.with_deletion(deletion);
    }

    /// Delete the staged record, then reload
    pub async fn confirm_deletion(&mut self) -> RegistryResult<()> {
        let deleted = self.state.deletion.confirm(&*self.store).await?;

        let mut next = self
            .state
            .with_deletion(self.state.deletion.clone().cancel())
            .with_message(Some(Message::success("Student deleted successfully.")));
        if next.editing_id.as_deref() == Some(deleted.id.as_str()) {
            next = next.with_cleared_form();
        }
        self.state = next;
        self.reload().await
    }

    pub fn dismiss_message(&mut self) {
        self.state = self.state.with_message(None);
    }

    // Export

    /// CSV of every record matching the current search, in the current order.
    /// `None` when nothing matches.
    pub async fn export_csv(&self) -> RegistryResult<Option<CsvExport>> {
        let user = self.access.require_export().await?;
        info!("📄 EXPORT: Requested by {}", user.email);
        self.exporter
            .export_all(
                &self.state.search,
                self.state.sort_column,
                self.state.sort_direction,
            )
            .await
    }
}
