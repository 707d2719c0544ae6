//! CSV export of the filtered, ordered student list.
//!
//! The export reuses the table's search and sort but has no page window. An
//! empty result produces no document at all.

use anyhow::{anyhow, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use shared::{SortColumn, SortDirection, Student};
use std::sync::Arc;

use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::field_mask::to_display_date;
use crate::domain::query_spec::build_export_query;
use crate::storage::StudentStore;

pub const CSV_HEADER: [&str; 5] = ["Name", "Mother", "BirthDate", "CaseNumber", "Notes"];
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const DEFAULT_EXPORT_FILENAME: &str = "alunos.csv";

const UTF8_BOM: &str = "\u{FEFF}";

/// A finished CSV document ready to be offered as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// UTF-8 bytes, BOM first
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
    pub record_count: usize,
}

/// Export service that builds the student CSV document
#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn StudentStore>,
    filename: String,
}

impl ExportService {
    pub fn new(store: Arc<dyn StudentStore>, filename: impl Into<String>) -> Self {
        Self {
            store,
            filename: filename.into(),
        }
    }

    /// Fetch every matching student and serialize them, or `None` when nothing
    /// matches.
    pub async fn export_all(
        &self,
        search_text: &str,
        column: SortColumn,
        direction: SortDirection,
    ) -> RegistryResult<Option<CsvExport>> {
        info!("📄 EXPORT: Exporting students (search: {:?}, sort: {} {:?})", search_text, column, direction);

        let query = build_export_query(search_text, column, direction);
        let page = self.store.list(&query).await.map_err(RegistryError::remote)?;
        if page.records.is_empty() {
            info!("📄 EXPORT: Nothing matches, no file produced");
            return Ok(None);
        }

        let bytes = students_to_csv(&page.records).map_err(RegistryError::remote)?;
        info!("✅ EXPORT: {} students, {} bytes", page.records.len(), bytes.len());

        Ok(Some(CsvExport {
            bytes,
            filename: self.filename.clone(),
            content_type: CSV_CONTENT_TYPE,
            record_count: page.records.len(),
        }))
    }
}

/// Serialize students as an always-quoted CSV document with a UTF-8 BOM.
/// Each row, the last included, ends with `\n`.
pub fn students_to_csv(students: &[Student]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.as_bytes().to_vec());

    writer.write_record(CSV_HEADER)?;
    for student in students {
        let birth_date = to_display_date(student.birth_date.as_deref());
        writer.write_record([
            student.name.as_str(),
            student.mother_name.as_deref().unwrap_or(""),
            birth_date.as_str(),
            student.case_number.as_deref().unwrap_or(""),
            student.notes.as_deref().unwrap_or(""),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to finish CSV document: {}", err.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{student, ProbeStore};

    fn export_text(bytes: &[u8]) -> &str {
        std::str::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_quotes_are_doubled_and_fields_quoted() {
        let mut first = student("s01", "A\"B", None, None, 1);
        first.birth_date = Some("2015-06-15".to_string());
        let second = student("s02", "C,D", Some("Maria"), Some("1234/56"), 2);

        let bytes = students_to_csv(&[first, second]).unwrap();
        let text = export_text(&bytes);
        assert!(text.starts_with(UTF8_BOM));

        let lines: Vec<&str> = text.trim_start_matches(UTF8_BOM).lines().collect();
        assert_eq!(lines[0], r#""Name","Mother","BirthDate","CaseNumber","Notes""#);
        assert_eq!(lines[1], r#""A""B","","15/06/2015","","""#);
        assert_eq!(lines[2], r#""C,D","Maria","","1234/56","""#);
        assert_eq!(lines.len(), 3);
        // Every row, the last included, ends with one line break
        assert!(text.ends_with("\"\"\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_export_uses_search_and_order_without_range() {
        let students: Vec<_> = (1..=25)
            .map(|n| student(&format!("s{:02}", n), &format!("Ana {:02}", n), None, None, n))
            .chain(std::iter::once(student("x", "Bruno", None, None, 30)))
            .collect();
        let store = ProbeStore::new(students);
        let service = ExportService::new(Arc::new(store), DEFAULT_EXPORT_FILENAME);

        let export = service
            .export_all("ana", SortColumn::Name, SortDirection::Desc)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(export.record_count, 25);
        assert_eq!(export.filename, "alunos.csv");
        assert_eq!(export.content_type, "text/csv; charset=utf-8");

        let text = export_text(&export.bytes);
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with("\"Ana 25\""));
    }

    #[tokio::test]
    async fn test_empty_export_is_none() {
        let store = ProbeStore::new(vec![student("s01", "Ana", None, None, 1)]);
        let service = ExportService::new(Arc::new(store), DEFAULT_EXPORT_FILENAME);
        let export = service
            .export_all("nobody", SortColumn::CreatedAt, SortDirection::Desc)
            .await
            .unwrap();
        assert!(export.is_none());
    }

    #[tokio::test]
    async fn test_store_failure_is_remote_error() {
        let store = ProbeStore::new(Vec::new());
        store.set_failing(true);
        let service = ExportService::new(Arc::new(store), DEFAULT_EXPORT_FILENAME);
        let result = service
            .export_all("", SortColumn::CreatedAt, SortDirection::Desc)
            .await;
        assert!(matches!(result, Err(RegistryError::Remote(_))));
    }
}
