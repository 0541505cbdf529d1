//! Non-fatal conditions attached to a successful ingestion.
//!
//! A `CsvWarning` never prevents the dataset from being used; it is returned
//! next to the data in `IngestionResult` or `ChartSeries`, never through `Err`.

use crate::ThousandsSeparator;
use std::fmt;

/// A warning produced while ingesting a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvWarning {
    /// Header occurrences that repeat an earlier header, in file order.
    DuplicateHeaders(Vec<String>),
    /// The file has more data rows than the performance cap.
    Performance {
        row_count: usize,
        performance_cap: usize,
    },
    /// Some chart rows had an empty X or Y cell, charted as `0`.
    MissingValues,
}

impl fmt::Display for CsvWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvWarning::DuplicateHeaders(headers) => {
                write!(f, "Duplicate headers found: {}", headers.join(", "))
            }
            CsvWarning::Performance {
                row_count,
                performance_cap,
            } => write!(
                f,
                "This file contains {} rows. Files with more than {} rows may affect performance. \
                 Consider filtering your data for better chart rendering speed.",
                row_count.with_thousands_separator(),
                performance_cap.with_thousands_separator()
            ),
            CsvWarning::MissingValues => f.write_str("Warning: Some rows contain missing values"),
        }
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
