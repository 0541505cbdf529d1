use crate::{
    CsvChartError, CsvChartResult, CsvWarning, DuplicateElements, FileExtension, IngestionResult,
    Record,
};
use csv::{ReaderBuilder, StringRecord};
use tokio::task::spawn_blocking;

use std::{fmt::Debug, path::Path};

// --- Constants ---

/// Hard limit on data rows. Exceeding it aborts ingestion with `CsvChartError::CsvTooBig`.
pub const DEFAULT_ROW_CAP: usize = 50_000;

/// Soft limit on data rows. Exceeding it only attaches `CsvWarning::Performance`.
pub const DEFAULT_PERFORMANCE_CAP: usize = 10_000;

// --- IngestOptions Struct ---

/// Row limits applied by `ingest`.
///
/// `performance_cap` is expected to be lower than `row_cap`; this is policy and is
/// only logged, not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Maximum number of data rows (header excluded).
    pub row_cap: usize,
    /// Data row count above which a performance warning is attached.
    pub performance_cap: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            row_cap: DEFAULT_ROW_CAP,
            performance_cap: DEFAULT_PERFORMANCE_CAP,
        }
    }
}

impl IngestOptions {
    pub fn with_row_cap(mut self, row_cap: usize) -> Self {
        self.row_cap = row_cap;
        self
    }

    pub fn with_performance_cap(mut self, performance_cap: usize) -> Self {
        self.performance_cap = performance_cap;
        self
    }
}

// --- CsvFile Struct ---

/// A file offered for ingestion: the name (for the `.csv` guard) and its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    /// File name as reported by the picker, e.g. `sales.csv`.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl CsvFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        CsvFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk. The file name (last path component) is kept for the `.csv` guard.
    pub async fn from_path(path: &Path) -> CsvChartResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

        Ok(CsvFile { name, bytes })
    }
}

// --- Ingestion ---

/// Ingests a CSV file into an `IngestionResult` without blocking the async runtime.
///
/// Tokenization and record construction run on a Tokio blocking thread via
/// `execute_blocking`. Independent calls do not share state; if a caller issues a second
/// ingestion before the first completes, it is the caller's job to keep only the result
/// of the most recently initiated one (see `DatasetState`).
///
/// ### Arguments
/// * `file`: The file name and raw bytes.
/// * `options`: Row cap and performance cap.
///
/// ### Returns
/// The ingestion result, or `CsvChartError::InvalidFile` / `CsvChartError::CsvTooBig`.
pub async fn ingest(file: CsvFile, options: IngestOptions) -> CsvChartResult<IngestionResult> {
    tracing::info!("Parsing {} ({} bytes)", file.name, file.bytes.len());

    execute_blocking(move || parse_csv_bytes(&file.name, &file.bytes, options)).await
}

/// Synchronous core of `ingest`.
///
/// ### Logic
/// 1. Reject names that do not end in `.csv` (no tokenization attempted).
/// 2. Tokenize into raw rows, skipping empty lines. Reader failures become `InvalidFile`.
/// 3. No rows at all: return an empty result.
/// 4. Reject files with more than `row_cap` data rows, before any record is built.
/// 5. Take the first row as headers, duplicates kept.
/// 6. Report headers that repeat an earlier header.
/// 7. Zip every data row against the headers; missing trailing cells become `""`.
/// 8. Attach a performance warning above `performance_cap` data rows.
pub fn parse_csv_bytes(
    name: &str,
    bytes: &[u8],
    options: IngestOptions,
) -> CsvChartResult<IngestionResult> {
    if options.performance_cap >= options.row_cap {
        tracing::warn!(
            "performance_cap ({}) is not below row_cap ({}); warnings may contradict the cap",
            options.performance_cap,
            options.row_cap
        );
    }

    // 1. File-name guard.
    if !FileExtension::from_name(name).is_csv() {
        tracing::warn!("Rejected file without a .csv extension: {name}");
        return Err(CsvChartError::InvalidFile);
    }

    // 2. Tokenize.
    let rows = read_raw_rows(bytes)?;

    // 3. Empty file is a success.
    let Some((header_row, data_rows)) = rows.split_first() else {
        tracing::debug!("{name}: no rows, returning an empty dataset");
        return Ok(IngestionResult::empty());
    };

    // 4. Row cap, checked before building records.
    let row_count = data_rows.len();
    if row_count > options.row_cap {
        tracing::error!(
            "{name}: {row_count} data rows exceed the row cap of {}",
            options.row_cap
        );
        return Err(CsvChartError::CsvTooBig {
            row_cap: options.row_cap,
        });
    }

    // 5. Headers.
    let headers: Vec<String> = header_row.iter().map(str::to_owned).collect();

    // 6. Duplicate headers (non-fatal).
    let duplicates = headers.duplicates();
    let duplicate_headers = if duplicates.is_empty() {
        None
    } else {
        tracing::warn!("{name}: duplicate headers {duplicates:?}");
        Some(duplicates)
    };

    // 7. Records.
    let records: Vec<Record> = data_rows
        .iter()
        .map(|row| build_record(&headers, row))
        .collect();

    // 8. Performance warning (non-fatal).
    let performance_warning = (row_count > options.performance_cap).then(|| {
        tracing::warn!(
            "{name}: {row_count} data rows exceed the performance cap of {}",
            options.performance_cap
        );
        CsvWarning::Performance {
            row_count,
            performance_cap: options.performance_cap,
        }
    });

    tracing::debug!(
        "{name}: parsed {} columns and {} records",
        headers.len(),
        records.len()
    );

    Ok(IngestionResult {
        headers,
        records,
        duplicate_headers,
        performance_warning,
    })
}

/// Splits raw bytes into rows of string fields.
///
/// The reader runs without header handling (the first row is returned like any other) and
/// in flexible mode, so rows may have any number of fields. Lines with no content are skipped.
fn read_raw_rows(bytes: &[u8]) -> CsvChartResult<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|error| {
            tracing::debug!("CSV reader failed: {error}");
            CsvChartError::InvalidFile
        })?;

        if is_blank(&row) {
            continue;
        }
        rows.push(row);
    }

    tracing::debug!("Tokenized {} rows (header included)", rows.len());
    Ok(rows)
}

/// A row with a single empty field, e.g. a line holding only `""`.
fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row.get(0).is_some_and(str::is_empty)
}

/// Maps a raw row onto the headers by position.
///
/// Cells beyond the header count are ignored. When a header repeats, the later column wins.
fn build_record(headers: &[String], row: &StringRecord) -> Record {
    if row.len() > headers.len() {
        tracing::trace!(
            "Ignoring {} cells beyond the header count",
            row.len() - headers.len()
        );
    }

    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let cell = row.get(index).unwrap_or_default();
            (header.clone(), cell.to_owned())
        })
        .collect()
}

/// Executes a potentially blocking operation on a separate Tokio blocking thread.
///
/// Wraps the closure `op` which is expected to return a `CsvChartResult<T>`,
/// runs it with `spawn_blocking`, awaits the result, and maps the `JoinError`
/// to `CsvChartError::TokioJoin`.
///
/// ### Arguments
/// * `op`: A closure that performs the blocking work. It must be `Send` and `'static`,
///   meaning it must take ownership of the data it uses.
async fn execute_blocking<T, F>(op: F) -> CsvChartResult<T>
where
    F: FnOnce() -> CsvChartResult<T> + Send + 'static,
    T: Debug + Send + 'static,
{
    // Result<CsvChartResult<T>, JoinError>
    let result_from_task = spawn_blocking(op).await;

    result_from_task.map_err(CsvChartError::from)?
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
