//! Application state for one loaded dataset, updated by a pure reducer.
//!
//! The engines (`ingest`, `detect_numeric`, `apply_filter`) stay stateless. This module
//! holds what the UI shows between calls and decides which ingestion result is current:
//! every load is tagged with a generation number and only the most recently initiated
//! load may update the state.

use crate::{
    ChartKeys, ChartSeries, CsvChartError, CsvChartResult, IngestionResult, Record, apply_filter,
    chart_points, detect_numeric, parse_filter, suggest_axes, validate_axes,
};

/// Identifies one `SetFile` request. Increases monotonically, also across `Reset`.
pub type LoadGeneration = u64;

/// Everything the UI needs to render the current dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetState {
    /// Name of the file being loaded or last loaded.
    pub file_name: Option<String>,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// Headers eligible for a chart axis, in header order.
    pub numeric_headers: Vec<String>,
    pub x_key: Option<String>,
    pub y_key: Option<String>,
    /// Message of the axis check failing for the selected pair, if any.
    pub axis_error: Option<String>,
    /// Chart-level warning (missing values), kept apart from the ingestion `warning`.
    pub chart_warning: Option<String>,
    /// Active filter expression; empty means no filter.
    pub filter: String,
    /// Message of the last rejected filter expression.
    pub filter_error: Option<String>,
    pub loading: bool,
    /// Message of the last fatal ingestion error.
    pub error: Option<String>,
    /// Message of the warning currently shown.
    pub warning: Option<String>,
    generation: LoadGeneration,
}

/// State transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetAction {
    /// A file was picked; a new load generation starts.
    SetFile { name: String },
    /// A load finished successfully.
    SetData {
        generation: LoadGeneration,
        result: IngestionResult,
    },
    SetKeys(ChartKeys),
    SetLoading(bool),
    /// A load failed.
    SetError {
        generation: LoadGeneration,
        message: String,
    },
    SetWarning(Option<String>),
    /// The user submitted a filter expression.
    SetFilter(String),
    Reset,
}

impl DatasetState {
    /// Generation of the most recently initiated load.
    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    pub fn chart_keys(&self) -> ChartKeys {
        ChartKeys {
            x_key: self.x_key.clone(),
            y_key: self.y_key.clone(),
        }
    }

    /// Records that pass the active filter. Recomputed on every call.
    pub fn filtered_records(&self) -> CsvChartResult<Vec<Record>> {
        apply_filter(&self.records, &self.filter)
    }

    /// Chart series for the selected axes over the filtered records.
    ///
    /// Empty while either axis is unselected. An invalid pair of axes is an error
    /// (`SameAxisColumns` or `NonNumericAxis`).
    pub fn chart_points(&self) -> CsvChartResult<ChartSeries> {
        validate_axes(&self.chart_keys(), &self.numeric_headers)?;

        let (Some(x_key), Some(y_key)) = (&self.x_key, &self.y_key) else {
            return Ok(ChartSeries::default());
        };
        Ok(chart_points(&self.filtered_records()?, x_key, y_key))
    }

    /// Recomputes `axis_error` and `chart_warning` for the current axes and filter.
    fn with_chart_checks(self) -> Self {
        let (axis_error, chart_warning) = match self.chart_points() {
            Ok(series) => (None, series.warning().map(|warning| warning.to_string())),
            Err(error @ (CsvChartError::SameAxisColumns | CsvChartError::NonNumericAxis)) => {
                tracing::warn!("Chart axes rejected: {error}");
                (Some(error.to_string()), None)
            }
            Err(error) => {
                tracing::debug!("Chart checks skipped: {error}");
                (None, None)
            }
        };

        DatasetState {
            axis_error,
            chart_warning,
            ..self
        }
    }

    fn is_current(&self, generation: LoadGeneration) -> bool {
        generation == self.generation
    }
}

/// Applies one action to the state and returns the next state.
pub fn reduce(state: DatasetState, action: DatasetAction) -> DatasetState {
    match action {
        DatasetAction::SetFile { name } => {
            tracing::info!("File selected for parsing: {name}");
            DatasetState {
                file_name: Some(name),
                loading: true,
                error: None,
                generation: state.generation + 1,
                ..state
            }
        }
        DatasetAction::SetData { generation, result } => {
            if !state.is_current(generation) {
                tracing::debug!(
                    "Discarding stale data from load {generation} (current {})",
                    state.generation
                );
                return state;
            }

            let numeric_headers = detect_numeric(&result.records, &result.headers);
            let ChartKeys { x_key, y_key } = suggest_axes(&numeric_headers);
            let warning = result.primary_warning().map(|warning| warning.to_string());

            tracing::info!(
                "Dataset loaded: {} columns, {} records",
                result.headers.len(),
                result.records.len()
            );

            DatasetState {
                headers: result.headers,
                records: result.records,
                numeric_headers,
                x_key,
                y_key,
                filter: String::new(),
                filter_error: None,
                loading: false,
                error: None,
                warning,
                ..state
            }
            .with_chart_checks()
        }
        DatasetAction::SetKeys(ChartKeys { x_key, y_key }) => {
            tracing::info!("Chart keys updated: x={x_key:?}, y={y_key:?}");
            DatasetState {
                x_key,
                y_key,
                ..state
            }
            .with_chart_checks()
        }
        DatasetAction::SetLoading(loading) => DatasetState { loading, ..state },
        DatasetAction::SetError {
            generation,
            message,
        } => {
            if !state.is_current(generation) {
                tracing::debug!("Discarding stale error from load {generation}: {message}");
                return state;
            }

            tracing::error!("CSV parsing failed: {message}");
            DatasetState {
                error: Some(message),
                loading: false,
                ..state
            }
        }
        DatasetAction::SetWarning(warning) => {
            tracing::info!("Warning set: {warning:?}");
            DatasetState { warning, ..state }
        }
        DatasetAction::SetFilter(filter) => {
            // An invalid expression leaves the active filter in place.
            if !filter.trim().is_empty()
                && let Err(error) = parse_filter(&filter)
            {
                tracing::warn!("Filter rejected: {error}");
                return DatasetState {
                    filter_error: Some(error.to_string()),
                    ..state
                };
            }

            tracing::info!("Filter set: {filter:?}");
            DatasetState {
                filter,
                filter_error: None,
                ..state
            }
            .with_chart_checks()
        }
        DatasetAction::Reset => {
            tracing::info!("Dataset state reset");
            DatasetState {
                generation: state.generation,
                ..DatasetState::default()
            }
        }
    }
}

/// Owns a `DatasetState` and drives loads through the reducer.
///
/// ```ignore
/// let generation = store.begin_load(&file.name);
/// let outcome = ingest(file, options).await;
/// store.finish_load(generation, outcome);
/// ```
#[derive(Debug, Default)]
pub struct DatasetStore {
    state: DatasetState,
}

impl DatasetStore {
    pub fn new(state: DatasetState) -> Self {
        DatasetStore { state }
    }

    pub fn state(&self) -> &DatasetState {
        &self.state
    }

    pub fn dispatch(&mut self, action: DatasetAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Starts a load and returns its generation, to be passed back to `finish_load`.
    pub fn begin_load(&mut self, name: &str) -> LoadGeneration {
        self.dispatch(DatasetAction::SetFile {
            name: name.to_string(),
        });
        self.state.generation()
    }

    /// Records the outcome of a load. Outcomes of superseded loads are ignored.
    pub fn finish_load(
        &mut self,
        generation: LoadGeneration,
        outcome: Result<IngestionResult, CsvChartError>,
    ) {
        let action = match outcome {
            Ok(result) => DatasetAction::SetData { generation, result },
            Err(error) => DatasetAction::SetError {
                generation,
                message: error.to_string(),
            },
        };
        self.dispatch(action);
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// cargo test -- --show-output tests_state
#[cfg(test)]
mod tests_state {
    use super::*;
    use crate::{ChartPoint, CsvFile, CsvWarning, IngestOptions, ingest, parse_csv_bytes};

    fn parsed(content: &str) -> IngestionResult {
        parse_csv_bytes("test.csv", content.as_bytes(), IngestOptions::default())
            .expect("test CSV should parse")
    }

    #[test]
    fn set_file_starts_loading() {
        let state = DatasetState {
            error: Some("old".into()),
            ..Default::default()
        };
        let state = reduce(state, DatasetAction::SetFile { name: "a.csv".into() });

        assert!(state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.file_name.as_deref(), Some("a.csv"));
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn set_data_selects_numeric_axes() {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("sales.csv");
        store.finish_load(
            generation,
            Ok(parsed("city,units,price\nLisbon,3,9.5\nPorto,5,7")),
        );

        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.headers, vec!["city", "units", "price"]);
        assert_eq!(state.numeric_headers, vec!["units", "price"]);
        assert_eq!(state.x_key.as_deref(), Some("units"));
        assert_eq!(state.y_key.as_deref(), Some("price"));
        assert_eq!(state.warning, None);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut store = DatasetStore::default();
        let first = store.begin_load("first.csv");
        let second = store.begin_load("second.csv");

        store.finish_load(second, Ok(parsed("b\n2")));
        store.finish_load(first, Ok(parsed("a\n1")));
        store.finish_load(first, Err(CsvChartError::InvalidFile));

        let state = store.state();
        assert_eq!(state.headers, vec!["b"]);
        assert_eq!(state.error, None);
        assert_eq!(state.file_name.as_deref(), Some("second.csv"));
    }

    #[test]
    fn errors_stop_loading() {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("huge.csv");
        store.finish_load(generation, Err(CsvChartError::CsvTooBig { row_cap: 50_000 }));

        let state = store.state();
        assert!(!state.loading);
        assert!(
            state
                .error
                .as_deref()
                .is_some_and(|message| message.contains("50,000"))
        );
    }

    #[test]
    fn duplicate_header_warning_is_shown_first() {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("dup.csv");
        let mut result = parsed("Name,Age,Name\nJohn,25,Doe");
        result.performance_warning = Some(CsvWarning::Performance {
            row_count: 1,
            performance_cap: 0,
        });
        store.finish_load(generation, Ok(result));

        assert_eq!(
            store.state().warning.as_deref(),
            Some("Duplicate headers found: Name")
        );
        store.dispatch(DatasetAction::SetWarning(None));
        assert_eq!(store.state().warning, None);
    }

    #[test]
    fn filter_drives_chart_points() -> CsvChartResult<()> {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("scores.csv");
        store.finish_load(generation, Ok(parsed("id,score\n1,10\n2,20\n3,30")));

        assert_eq!(store.state().chart_points()?.points.len(), 3);

        store.dispatch(DatasetAction::SetFilter("score >= 20".into()));
        let points = store.state().chart_points()?.points;
        assert_eq!(
            points,
            vec![
                ChartPoint {
                    label: "2".into(),
                    value: 20.0
                },
                ChartPoint {
                    label: "3".into(),
                    value: 30.0
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn invalid_filter_keeps_previous_filter() -> CsvChartResult<()> {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("scores.csv");
        store.finish_load(generation, Ok(parsed("id,score\n1,10\n2,20")));

        store.dispatch(DatasetAction::SetFilter("score > 15".into()));
        store.dispatch(DatasetAction::SetFilter("score ~ 15".into()));

        let state = store.state();
        assert_eq!(state.filter, "score > 15");
        assert_eq!(
            state.filter_error.as_deref(),
            Some("Invalid filter expression: score ~ 15")
        );
        assert_eq!(state.filtered_records()?.len(), 1);

        store.dispatch(DatasetAction::SetFilter(String::new()));
        assert_eq!(store.state().filter_error, None);
        assert_eq!(store.state().filtered_records()?.len(), 2);
        Ok(())
    }

    #[test]
    fn set_keys_and_missing_axis() -> CsvChartResult<()> {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("one.csv");
        store.finish_load(generation, Ok(parsed("id,v\n1,1")));

        store.dispatch(DatasetAction::SetKeys(ChartKeys {
            x_key: Some("id".into()),
            y_key: None,
        }));
        assert_eq!(store.state().y_key, None);
        assert_eq!(store.state().axis_error, None);
        assert!(store.state().chart_points()?.points.is_empty());

        store.dispatch(DatasetAction::SetKeys(ChartKeys {
            x_key: Some("id".into()),
            y_key: Some("v".into()),
        }));
        assert_eq!(store.state().chart_keys().x_key.as_deref(), Some("id"));
        assert_eq!(store.state().chart_points()?.points.len(), 1);
        Ok(())
    }

    #[test]
    fn same_column_axes_are_rejected() {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("scores.csv");
        store.finish_load(generation, Ok(parsed("id,score\n1,10\n2,20")));
        assert_eq!(store.state().axis_error, None);

        store.dispatch(DatasetAction::SetKeys(ChartKeys {
            x_key: Some("score".into()),
            y_key: Some("score".into()),
        }));

        let state = store.state();
        assert_eq!(
            state.axis_error.as_deref(),
            Some("X and Y axes must be different columns")
        );
        assert!(matches!(
            state.chart_points(),
            Err(CsvChartError::SameAxisColumns)
        ));
    }

    #[test]
    fn non_numeric_axes_are_rejected() {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("people.csv");
        store.finish_load(generation, Ok(parsed("name,age,score\nAnn,30,9\nBob,22,7")));

        store.dispatch(DatasetAction::SetKeys(ChartKeys {
            x_key: Some("name".into()),
            y_key: Some("score".into()),
        }));
        assert_eq!(
            store.state().axis_error.as_deref(),
            Some("Selected columns must be numeric")
        );
        assert!(matches!(
            store.state().chart_points(),
            Err(CsvChartError::NonNumericAxis)
        ));

        // A valid pair clears the error.
        store.dispatch(DatasetAction::SetKeys(ChartKeys {
            x_key: Some("age".into()),
            y_key: Some("score".into()),
        }));
        assert_eq!(store.state().axis_error, None);
    }

    #[test]
    fn missing_values_set_a_chart_warning() -> CsvChartResult<()> {
        let mut store = DatasetStore::default();
        let generation = store.begin_load("gaps.csv");
        store.finish_load(generation, Ok(parsed("x,y\n1,10\n2,\n,30")));

        let state = store.state();
        assert_eq!(
            state.chart_warning.as_deref(),
            Some("Warning: Some rows contain missing values")
        );
        assert_eq!(state.warning, None);

        let values: Vec<f64> = state.chart_points()?.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 0.0, 30.0]);

        // Filtering out the incomplete rows clears the warning.
        store.dispatch(DatasetAction::SetFilter("y == 10".into()));
        assert_eq!(store.state().chart_warning, None);
        Ok(())
    }

    #[test]
    fn reset_keeps_generation_monotonic() {
        let mut store = DatasetStore::default();
        let stale = store.begin_load("a.csv");
        store.dispatch(DatasetAction::Reset);

        assert_eq!(store.state().generation(), stale);
        assert!(store.state().headers.is_empty());

        let fresh = store.begin_load("b.csv");
        assert!(fresh > stale);

        store.finish_load(stale, Ok(parsed("x\n1")));
        assert!(store.state().headers.is_empty());
    }

    #[test]
    fn set_loading_toggles() {
        let state = reduce(DatasetState::default(), DatasetAction::SetLoading(true));
        assert!(state.loading);
        let state = reduce(state, DatasetAction::SetLoading(false));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn store_with_async_ingest() {
        let mut store = DatasetStore::default();
        let file = CsvFile::new("async.csv", "k,v\na,1\nb,2");

        let generation = store.begin_load(&file.name);
        let outcome = ingest(file, IngestOptions::default()).await;
        store.finish_load(generation, outcome);

        assert_eq!(store.state().records.len(), 2);
        assert_eq!(store.state().numeric_headers, vec!["v"]);
    }
}
