use crate::ThousandsSeparator;
use std::io;
use thiserror::Error;
use tokio::task::JoinError;

/**
Result type to simplify function signatures.

This is a custom result type that uses our custom `CsvChartError` for the error type.

Functions can return `CsvChartResult<T>` and then use `?` to automatically propagate errors.
*/
pub type CsvChartResult<T> = Result<T, CsvChartError>;

/**
Custom error type for CSV Chart.

This enum defines the fatal errors that abort an ingestion, a filter-apply call or
the extraction of a chart series from an invalid pair of axes.
Non-fatal conditions (duplicate headers, large files) are `CsvWarning` values and never travel through `Err`.

We use the `thiserror` crate to derive the `Error` trait and automatically
implement `Display` using the `#[error(...)]` attribute.
*/
#[derive(Error, Debug)]
pub enum CsvChartError {
    // The file is not a `.csv` file, or the CSV reader rejected its contents
    // (malformed quoting, invalid UTF-8). The reader's own diagnostic is only logged.
    #[error("Failed to parse CSV file")]
    InvalidFile,

    // The file has more data rows than the configured cap.
    #[error(
        "This file contains more than {} rows. For performance reasons, please use a smaller dataset or filter your data before uploading.",
        .row_cap.with_thousands_separator()
    )]
    CsvTooBig { row_cap: usize },

    // The filter expression could not be parsed.
    #[error("{0}")]
    FilterParse(String),

    // Both chart axes name the same column.
    #[error("X and Y axes must be different columns")]
    SameAxisColumns,

    // A chart axis names a column that is not numeric.
    #[error("Selected columns must be numeric")]
    NonNumericAxis,

    // Wrapper for standard IO errors.
    // The #[from] attribute automatically converts io::Error to CsvChartError::Io.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // Wrapper for Tokio JoinErrors, occurring when the blocking tokenizer task fails.
    #[error("Tokio JoinError: {0}")]
    TokioJoin(#[from] JoinError),

    #[error("Invalid value for command-line argument '{arg_name}': {reason}")]
    InvalidArgument {
        arg_name: String, // Context about *which* argument failed
        reason: String,   // The specific error reason
    },
}

/// Plain classification of a `CsvChartError`, for callers that only need to pick a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidFile,
    FileTooLarge,
    FilterParseFailure,
    InvalidAxes,
    Io,
    Internal,
}

impl CsvChartError {
    /// Returns the kind of this error without its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsvChartError::InvalidFile => ErrorKind::InvalidFile,
            CsvChartError::CsvTooBig { .. } => ErrorKind::FileTooLarge,
            CsvChartError::FilterParse(_) => ErrorKind::FilterParseFailure,
            CsvChartError::SameAxisColumns | CsvChartError::NonNumericAxis => {
                ErrorKind::InvalidAxes
            }
            CsvChartError::Io(_) => ErrorKind::Io,
            CsvChartError::TokioJoin(_) | CsvChartError::InvalidArgument { .. } => {
                ErrorKind::Internal
            }
        }
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// cargo test -- --show-output tests_error
#[cfg(test)]
mod tests_error {
    use super::*;

    #[test]
    fn invalid_file_has_fixed_message() {
        assert_eq!(CsvChartError::InvalidFile.to_string(), "Failed to parse CSV file");
        assert_eq!(CsvChartError::InvalidFile.kind(), ErrorKind::InvalidFile);
    }

    #[test]
    fn too_big_message_formats_the_cap() {
        let error = CsvChartError::CsvTooBig { row_cap: 50_000 };
        let message = error.to_string();

        assert!(message.contains("This file contains more than 50,000 rows"));
        assert!(message.contains("For performance reasons"));
        assert_eq!(error.kind(), ErrorKind::FileTooLarge);
    }

    #[test]
    fn axis_errors_have_fixed_messages() {
        assert_eq!(
            CsvChartError::SameAxisColumns.to_string(),
            "X and Y axes must be different columns"
        );
        assert_eq!(
            CsvChartError::NonNumericAxis.to_string(),
            "Selected columns must be numeric"
        );
        assert_eq!(CsvChartError::NonNumericAxis.kind(), ErrorKind::InvalidAxes);
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn open_missing() -> CsvChartResult<()> {
            std::fs::read("/definitely/not/here.csv")?;
            Ok(())
        }

        let error = open_missing().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Io);
    }
}
