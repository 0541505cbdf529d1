use crate::CsvWarning;
use std::collections::HashMap;

/// One CSV data row: header name -> raw cell value.
///
/// Cells are stored exactly as read. Every record of a dataset has the same key set
/// as the dataset's headers; a missing trailing cell is stored as `""`.
pub type Record = HashMap<String, String>;

/// The value returned by one successful ingestion.
///
/// Ownership transfers to the caller; nothing in this crate keeps a copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionResult {
    /// Header names in column order. Duplicates are kept as they appear in the file.
    pub headers: Vec<String>,
    /// Data rows in file order, blank lines removed.
    pub records: Vec<Record>,
    /// Every header occurrence that repeats an earlier header, in file order.
    pub duplicate_headers: Option<Vec<String>>,
    /// Set to `CsvWarning::Performance` when the row count exceeds the performance cap.
    pub performance_warning: Option<CsvWarning>,
}

impl IngestionResult {
    /// The result of ingesting a file without data rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.records.is_empty()
    }

    /// Every warning attached to this result, duplicate headers first.
    pub fn warnings(&self) -> Vec<CsvWarning> {
        let duplicates = self
            .duplicate_headers
            .as_ref()
            .map(|headers| CsvWarning::DuplicateHeaders(headers.clone()));

        duplicates
            .into_iter()
            .chain(self.performance_warning.clone())
            .collect()
    }

    /// The single warning a UI shows at a time: duplicate headers take precedence
    /// over the performance warning.
    pub fn primary_warning(&self) -> Option<CsvWarning> {
        self.warnings().into_iter().next()
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
