//! Query descriptors sent to the student store.
//!
//! The builder turns the table's search/sort/page settings into a
//! [`QuerySpec`]. Stores translate the descriptor into their own query
//! language; the domain never filters or sorts records itself.

use shared::{SortColumn, SortDirection};

/// Columns matched by the free-text search
pub const SEARCH_COLUMNS: [SortColumn; 3] = [
    SortColumn::Name,
    SortColumn::MotherName,
    SortColumn::CaseNumber,
];

/// Case-insensitive substring match of `needle` against any of
/// [`SEARCH_COLUMNS`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub needle: String,
}

impl SearchFilter {
    pub fn columns(&self) -> &'static [SortColumn] {
        &SEARCH_COLUMNS
    }

    /// Evaluate the filter against a set of column values, for stores that
    /// filter in process.
    pub fn matches<'a>(&self, values: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        let needle = self.needle.to_lowercase();
        values
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: SortColumn,
    pub ascending: bool,
}

/// Window into the ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: u64,
    pub limit: u64,
}

impl Range {
    /// Last row index of the closed range `[offset, offset + limit - 1]`
    pub fn end_inclusive(&self) -> u64 {
        (self.offset + self.limit).saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// `None` matches every record
    pub filter: Option<SearchFilter>,
    pub order: OrderBy,
    /// `None` requests the full matching set
    pub range: Option<Range>,
}

fn filter_for(search_text: &str) -> Option<SearchFilter> {
    if search_text.is_empty() {
        None
    } else {
        Some(SearchFilter {
            needle: search_text.to_string(),
        })
    }
}

fn order_for(column: SortColumn, direction: SortDirection) -> OrderBy {
    OrderBy {
        column,
        ascending: direction.is_ascending(),
    }
}

/// Build the descriptor for one page of the table.
///
/// `page` is 1-based; a page of 0 is read as the first page.
pub fn build_page_query(
    search_text: &str,
    column: SortColumn,
    direction: SortDirection,
    page: u32,
    page_size: u32,
) -> QuerySpec {
    let page = u64::from(page.max(1));
    let page_size = u64::from(page_size);

    QuerySpec {
        filter: filter_for(search_text),
        order: order_for(column, direction),
        range: Some(Range {
            offset: (page - 1) * page_size,
            limit: page_size,
        }),
    }
}

/// Build the descriptor used by the CSV export: same filter and order as the
/// table, no offset or limit.
pub fn build_export_query(search_text: &str, column: SortColumn, direction: SortDirection) -> QuerySpec {
    QuerySpec {
        filter: filter_for(search_text),
        order: order_for(column, direction),
        range: None,
    }
}
