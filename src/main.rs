#![warn(clippy::all)]

use csv_chart::{
    Arguments, ChartKeys, ChartPoint, CsvChartResult, CsvFile, DatasetAction, DatasetStore,
    IngestOptions, ingest,
};
use std::process::ExitCode;
use tracing::error;

/*
cargo fmt
cargo test -- --nocapture
cargo test -- --show-output tests_apply_filter
cargo run -- --help
cargo run -- data.csv -f "age >= 25"
RUST_LOG=debug cargo run -- data.csv
cargo b -r && cargo install --path=.
*/

/// Width, in characters, of the longest bar.
const BAR_WIDTH: usize = 40;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the tracing subscriber for logging.
    // Use RUST_LOG environment variable to set logging level.  eg `export RUST_LOG=info`
    tracing_subscriber::fmt::init();

    // Parse command-line arguments.
    let args = Arguments::build();

    match run(&args).await {
        Ok(code) => code,
        Err(err) => {
            error!("csv-chart failed: {err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the file through the dataset store, applies the axis and filter choices
/// from the command line, and prints the resulting bar chart series.
async fn run(args: &Arguments) -> CsvChartResult<ExitCode> {
    let options = IngestOptions::default()
        .with_row_cap(args.row_cap)
        .with_performance_cap(args.performance_cap);

    let file = CsvFile::from_path(&args.path).await?;

    let mut store = DatasetStore::default();
    let generation = store.begin_load(&file.name);
    let outcome = ingest(file, options).await;
    store.finish_load(generation, outcome);

    if let Some(message) = &store.state().error {
        eprintln!("Error: {message}");
        return Ok(ExitCode::FAILURE);
    }

    if let Some(warning) = &store.state().warning {
        eprintln!("Warning: {warning}");
    }

    // Command-line axes override the automatic selection.
    if args.x_key.is_some() || args.y_key.is_some() {
        let keys = store.state().chart_keys();
        let selected = ChartKeys {
            x_key: args.x_key.clone().or(keys.x_key),
            y_key: args.y_key.clone().or(keys.y_key),
        };

        for key in [&selected.x_key, &selected.y_key].into_iter().flatten() {
            if !store.state().headers.contains(key) {
                eprintln!("Error: column `{key}` not found");
                return Ok(ExitCode::FAILURE);
            }
        }
        store.dispatch(DatasetAction::SetKeys(selected));

        if let Some(message) = &store.state().axis_error {
            eprintln!("Error: {message}");
            return Ok(ExitCode::FAILURE);
        }
    }

    if let Some(filter) = &args.filter {
        store.dispatch(DatasetAction::SetFilter(filter.clone()));
    }

    let state = store.state();
    println!("Columns: {}", state.headers.join(", "));
    println!("Numeric columns: {}", state.numeric_headers.join(", "));

    let (Some(x_key), Some(y_key)) = (&state.x_key, &state.y_key) else {
        eprintln!("Error: two columns are needed for a chart (select them with -x and -y)");
        return Ok(ExitCode::FAILURE);
    };

    let series = state.chart_points()?;
    if let Some(warning) = &state.chart_warning {
        eprintln!("{warning}");
    }

    println!(
        "Rows: {} of {} ({} charted)\n",
        state.filtered_records()?.len(),
        state.records.len(),
        series.points.len()
    );

    print_chart(x_key, y_key, &series.points, args.limit);

    Ok(ExitCode::SUCCESS)
}

/// Prints one line per bar: label, value and a bar scaled to the largest absolute value.
fn print_chart(x_key: &str, y_key: &str, points: &[ChartPoint], limit: usize) {
    let shown = &points[..points.len().min(limit)];
    let label_width = shown
        .iter()
        .map(|point| point.label.chars().count())
        .chain([x_key.chars().count()])
        .max()
        .unwrap_or_default();
    let max_value = shown
        .iter()
        .map(|point| point.value.abs())
        .fold(0.0_f64, f64::max);

    println!("{x_key:<label_width$} | {y_key}");
    for point in shown {
        let width = if max_value > 0.0 {
            (point.value.abs() / max_value * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        println!(
            "{:<label_width$} | {} {}",
            point.label,
            "#".repeat(width),
            point.value
        );
    }

    if points.len() > shown.len() {
        println!("... {} more", points.len() - shown.len());
    }
}
