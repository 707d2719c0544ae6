//! # View State
//!
//! The registry screen's state as one immutable value. Every transition
//! returns a new `ViewState`, so dependent fields (the page reset that goes
//! with a new search, sort or page size) always change together.
//!
//! The loaded records are whatever the store last returned; transitions never
//! edit them in place.

use shared::{
    ColumnSort, FormInputRequest, Message, SortColumn, SortDirection, SortIndicator, Student,
    StudentForm, ViewSnapshot,
};

use crate::domain::deletion_flow::DeletionFlow;
use crate::domain::field_mask::{apply_case_mask, apply_date_mask};
use crate::domain::models::student::{form_from_student, row_from_student};
use crate::domain::query_spec::{build_page_query, QuerySpec};
use crate::storage::StudentPage;

pub const PAGE_SIZES: [u32; 5] = [5, 10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub fn is_allowed_page_size(page_size: u32) -> bool {
    PAGE_SIZES.contains(&page_size)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    pub search: String,
    pub records: Vec<Student>,
    /// Size of the full matching set, not of `records`
    pub total: u64,
    pub editing_id: Option<String>,
    pub form: StudentForm,
    pub deletion: DeletionFlow,
    pub message: Option<Message>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_column: SortColumn::CreatedAt,
            sort_direction: SortDirection::Desc,
            search: String::new(),
            records: Vec::new(),
            total: 0,
            editing_id: None,
            form: StudentForm::default(),
            deletion: DeletionFlow::Idle,
            message: None,
        }
    }
}

impl ViewState {
    /// Initial state with a non-default page size; callers validate it first
    pub fn with_initial_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn with_search(&self, text: &str) -> Self {
        Self {
            search: text.to_string(),
            page: 1,
            ..self.clone()
        }
    }

    /// Same column flips the direction; a new column starts ascending
    pub fn with_sort(&self, column: SortColumn) -> Self {
        let sort_direction = if column == self.sort_column {
            self.sort_direction.flipped()
        } else {
            SortDirection::Asc
        };
        Self {
            sort_column: column,
            sort_direction,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Callers check [`is_allowed_page_size`] first
    pub fn with_page_size(&self, page_size: u32) -> Self {
        Self {
            page_size,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_results(&self, page: StudentPage) -> Self {
        Self {
            records: page.records,
            total: page.total_count,
            ..self.clone()
        }
    }

    pub fn with_form_input(&self, input: &FormInputRequest) -> Self {
        let mut form = self.form.clone();
        if let Some(name) = &input.name {
            form.name = name.clone();
        }
        if let Some(mother_name) = &input.mother_name {
            form.mother_name = mother_name.clone();
        }
        if let Some(raw) = &input.birth_date {
            form.birth_date = apply_date_mask(raw);
        }
        if let Some(raw) = &input.case_number {
            form.case_number = apply_case_mask(raw);
        }
        if let Some(notes) = &input.notes {
            form.notes = notes.clone();
        }
        Self { form, ..self.clone() }
    }

    /// Start editing a loaded record
    pub fn editing(&self, student: &Student) -> Self {
        Self {
            editing_id: Some(student.id.clone()),
            form: form_from_student(student),
            ..self.clone()
        }
    }

    pub fn with_cleared_form(&self) -> Self {
        Self {
            editing_id: None,
            form: StudentForm::default(),
            ..self.clone()
        }
    }

    pub fn with_message(&self, message: Option<Message>) -> Self {
        Self {
            message,
            ..self.clone()
        }
    }

    pub fn with_deletion(&self, deletion: DeletionFlow) -> Self {
        Self {
            deletion,
            ..self.clone()
        }
    }

    pub fn find_loaded(&self, id: &str) -> Option<&Student> {
        self.records.iter().find(|student| student.id == id)
    }

    /// Store query for the current page
    pub fn query(&self) -> QuerySpec {
        build_page_query(
            &self.search,
            self.sort_column,
            self.sort_direction,
            self.page,
            self.page_size,
        )
    }

    /// `ceil(total / page_size)`; zero when nothing matches
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn sort_indicator(&self, column: SortColumn) -> SortIndicator {
        if column != self.sort_column {
            SortIndicator::Unsorted
        } else if self.sort_direction.is_ascending() {
            SortIndicator::Ascending
        } else {
            SortIndicator::Descending
        }
    }

    pub fn snapshot(&self, can_export: bool) -> ViewSnapshot {
        ViewSnapshot {
            records: self.records.iter().map(row_from_student).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages(),
            page_sizes: PAGE_SIZES.to_vec(),
            sort_column: self.sort_column,
            sort_direction: self.sort_direction,
            sort_indicators: SortColumn::ALL
                .iter()
                .map(|&column| {
                    let indicator = self.sort_indicator(column);
                    ColumnSort {
                        column,
                        indicator,
                        symbol: indicator.symbol().to_string(),
                    }
                })
                .collect(),
            search: self.search.clone(),
            editing_id: self.editing_id.clone(),
            form: self.form.clone(),
            staged: self.deletion.staged().map(row_from_student),
            message: self.message.clone(),
            can_export,
        }
    }
}
