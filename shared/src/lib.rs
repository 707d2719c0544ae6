use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A student record as held by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Opaque identifier assigned by the store
    pub id: String,
    pub name: String,
    pub mother_name: Option<String>,
    /// Storage form `YYYY-MM-DD`
    pub birth_date: Option<String>,
    /// Display mask `NNNN/NN`
    pub case_number: Option<String>,
    pub notes: Option<String>,
    /// Server-assigned creation timestamp, default sort key
    pub created_at: DateTime<Utc>,
}

/// Editable form state for creating or updating a student.
///
/// Every field holds the text exactly as shown in the form, so the birth date
/// is in display form (`DD/MM/YYYY`) here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    pub name: String,
    pub mother_name: String,
    pub birth_date: String,
    pub case_number: String,
    pub notes: String,
}

impl StudentForm {
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.mother_name.is_empty()
            && self.birth_date.is_empty()
            && self.case_number.is_empty()
            && self.notes.is_empty()
    }
}

/// Columns the student table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Name,
    MotherName,
    BirthDate,
    CaseNumber,
    CreatedAt,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Name,
        SortColumn::MotherName,
        SortColumn::BirthDate,
        SortColumn::CaseNumber,
        SortColumn::CreatedAt,
    ];

    /// Column name used by the store
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::MotherName => "mother_name",
            SortColumn::BirthDate => "birth_date",
            SortColumn::CaseNumber => "case_number",
            SortColumn::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Header marker shown next to each sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortIndicator {
    Ascending,
    Descending,
    Unsorted,
}

impl SortIndicator {
    pub fn symbol(&self) -> &'static str {
        match self {
            SortIndicator::Ascending => "↑",
            SortIndicator::Descending => "↓",
            SortIndicator::Unsorted => "↕",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Error,
}

/// Transient feedback shown above the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// A student formatted for table display (birth date as `DD/MM/YYYY`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub mother_name: String,
    pub birth_date: String,
    pub case_number: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub column: SortColumn,
    pub indicator: SortIndicator,
    /// Header glyph for `indicator`
    pub symbol: String,
}

/// Everything a presentation layer needs to render the registry screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub records: Vec<StudentRow>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    /// Zero when nothing matches, in which case no pager is shown
    pub total_pages: u32,
    pub page_sizes: Vec<u32>,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    pub sort_indicators: Vec<ColumnSort>,
    pub search: String,
    pub editing_id: Option<String>,
    pub form: StudentForm,
    pub staged: Option<StudentRow>,
    pub message: Option<Message>,
    pub can_export: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub column: SortColumn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizeRequest {
    pub page_size: u32,
}

/// Partial form edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInputRequest {
    pub name: Option<String>,
    pub mother_name: Option<String>,
    /// Raw keystrokes, the date mask is applied server side
    pub birth_date: Option<String>,
    /// Raw keystrokes, the case-number mask is applied server side
    pub case_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_flip() {
        assert_eq!(SortDirection::Asc.flipped(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.flipped(), SortDirection::Asc);
        assert!(SortDirection::Asc.is_ascending());
    }

    #[test]
    fn test_sort_column_serializes_as_store_name() {
        for column in SortColumn::ALL {
            let json = serde_json::to_string(&column).unwrap();
            assert_eq!(json, format!("\"{}\"", column.as_str()));
        }
    }

    #[test]
    fn test_blank_form() {
        let mut form = StudentForm::default();
        assert!(form.is_blank());
        form.notes = "x".to_string();
        assert!(!form.is_blank());
    }
}
