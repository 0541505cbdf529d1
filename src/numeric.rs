//! Numeric interpretation of raw cell values.
//!
//! Records keep every cell as a string. This module decides, at consumption time,
//! which columns can feed a chart axis and which cells coerce to numbers.

use crate::{CsvChartError, CsvChartResult, CsvWarning, Record};

/// Parses a cell as a finite number.
///
/// Surrounding whitespace is ignored. Empty strings, partial parses (`"12abc"`),
/// `NaN` and infinities all yield `None`.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Returns the headers whose column is fully numeric, in header order.
///
/// A header qualifies when every record holds either `""` or a value accepted by
/// `parse_number` under it, and at least one record holds a non-empty value.
/// The whole dataset is scanned, not a prefix sample.
///
/// ### Arguments
/// * `records`: The dataset rows.
/// * `headers`: The dataset headers. A header repeated in the list is reported once per occurrence.
pub fn detect_numeric(records: &[Record], headers: &[String]) -> Vec<String> {
    let numeric: Vec<String> = headers
        .iter()
        .filter(|header| is_numeric_column(records, header))
        .cloned()
        .collect();

    tracing::debug!(
        "Numeric columns: {numeric:?} ({} of {} headers)",
        numeric.len(),
        headers.len()
    );

    numeric
}

/// Checks a single column. Empty cells neither qualify nor disqualify it.
fn is_numeric_column(records: &[Record], header: &str) -> bool {
    let mut has_value = false;

    for record in records {
        match record.get(header).map(String::as_str) {
            None | Some("") => continue,
            Some(value) if parse_number(value).is_some() => has_value = true,
            Some(_) => return false,
        }
    }

    has_value
}

/// The initial X and Y axis columns for the chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartKeys {
    pub x_key: Option<String>,
    pub y_key: Option<String>,
}

/// Picks the first two numeric headers as X and Y.
///
/// With a single numeric column only `x_key` is set.
pub fn suggest_axes(numeric_headers: &[String]) -> ChartKeys {
    let mut iter = numeric_headers.iter().cloned();
    ChartKeys {
        x_key: iter.next(),
        y_key: iter.next(),
    }
}

/// Checks that a pair of axes can be charted.
///
/// Nothing is checked until both axes are selected. Then the columns must differ
/// (`SameAxisColumns`, checked first) and both must be in `numeric_headers` (`NonNumericAxis`).
pub fn validate_axes(keys: &ChartKeys, numeric_headers: &[String]) -> CsvChartResult<()> {
    let (Some(x_key), Some(y_key)) = (&keys.x_key, &keys.y_key) else {
        return Ok(());
    };

    if x_key == y_key {
        return Err(CsvChartError::SameAxisColumns);
    }

    if !numeric_headers.contains(x_key) || !numeric_headers.contains(y_key) {
        return Err(CsvChartError::NonNumericAxis);
    }

    Ok(())
}

/// One bar of the chart: the category label and its numeric height.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// The series handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    /// Points built from a record with an empty X or Y cell.
    pub missing_values: usize,
}

impl ChartSeries {
    /// `CsvWarning::MissingValues` when any point was built from an empty cell.
    pub fn warning(&self) -> Option<CsvWarning> {
        (self.missing_values > 0).then_some(CsvWarning::MissingValues)
    }
}

/// Extracts the chart series, one point per record in input order.
///
/// The label is the raw `x_key` cell. An empty X or Y cell (or an absent column)
/// is charted as `0` and counted in `missing_values`. Records whose `y_key` cell is
/// non-empty but not a number are left out.
pub fn chart_points(records: &[Record], x_key: &str, y_key: &str) -> ChartSeries {
    let mut series = ChartSeries::default();

    for record in records {
        let x_cell = record.get(x_key).map(String::as_str).unwrap_or_default();
        let y_cell = record.get(y_key).map(String::as_str).unwrap_or_default();

        let value = if y_cell.is_empty() {
            0.0
        } else {
            match parse_number(y_cell) {
                Some(value) => value,
                None => continue,
            }
        };

        if x_cell.is_empty() || y_cell.is_empty() {
            series.missing_values += 1;
        }

        let label = if x_cell.is_empty() { "0" } else { x_cell };
        series.points.push(ChartPoint {
            label: label.to_string(),
            value,
        });
    }

    if series.missing_values > 0 {
        tracing::warn!(
            "{} of {} chart rows contain missing values",
            series.missing_values,
            series.points.len()
        );
    }

    series
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
