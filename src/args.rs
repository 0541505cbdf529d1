use crate::{
    CsvChartError, CsvChartResult, DEFAULT_PERFORMANCE_CAP, DEFAULT_ROW_CAP, parse_filter,
};

use clap::Parser;
use std::path::PathBuf;

// https://stackoverflow.com/questions/74068168/clap-rs-not-printing-colors-during-help
fn get_styles() -> clap::builder::Styles {
    let cyan = anstyle::Color::Ansi(anstyle::AnsiColor::Cyan);
    let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
    let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);

    clap::builder::Styles::styled()
        .placeholder(anstyle::Style::new().fg_color(Some(yellow)))
        .usage(anstyle::Style::new().fg_color(Some(cyan)).bold())
        .header(
            anstyle::Style::new()
                .fg_color(Some(cyan))
                .bold()
                .underline(),
        )
        .literal(anstyle::Style::new().fg_color(Some(green)))
}

// https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template
const APPLET_TEMPLATE: &str = "\
{before-help}
{about-with-newline}
{usage-heading} {usage}

{all-args}
{after-help}";

const EX1: &str = r#" csv-chart data.csv"#;
const EX2: &str = r#" csv-chart data.csv -f "age >= 25""#;
const EX3: &str = r#" csv-chart data.csv -f "status == 'active'" -x name -y score"#;
const EX4: &str = r#" csv-chart data.csv -r 100000 -p 20000 -l 50"#;

/// Command-line arguments for the CSV Chart application.
#[derive(Parser, Debug, Clone)]
#[command(
    // Read from `Cargo.toml`.
    author, version, about,
    long_about = None,
    next_line_help = true,
    help_template = APPLET_TEMPLATE,
    styles=get_styles(),
    after_help = format!("EXAMPLES:\n{EX1}\n{EX2}\n{EX3}\n{EX4}")
)]
pub struct Arguments {
    /// Filter expression applied before charting.
    #[arg(
        short = 'f',
        long,
        value_name = "EXPRESSION",
        help = "Row filter: `column operator value` (operators: > < >= <= == !=)",
        long_help = "\
Keeps only the rows matching a single condition.

Operators:
- `>`, `<`, `>=`, `<=` compare numbers; rows whose cell is not a number are dropped.
- `==`, `!=` compare text exactly (case-sensitive).

Quote text values with \" or ' to keep them as text: name == \"007\".
Examples: \"age >= 25\", \"status == active\", \"city != 'New York'\"
",
        value_parser = validate_filter_argument
    )]
    pub filter: Option<String>,

    /// Number of chart rows to print.
    #[arg(
        short = 'l',
        long,
        value_name = "ROWS",
        default_value_t = 20,
        help = "Number of chart rows to print [Default: 20]"
    )]
    pub limit: usize,

    /// Path to the CSV file.
    #[arg(
        value_name = "FILE_PATH",
        help = "Path to the CSV file",
        long_help = "Path to the input CSV file. The name must end in `.csv`."
    )]
    pub path: PathBuf,

    /// Maximum rows before the data is considered slow to chart.
    #[arg(
        short = 'p',
        long,
        value_name = "ROWS",
        default_value_t = DEFAULT_PERFORMANCE_CAP,
        help = "Data rows above which a performance warning is printed [Default: 10000]"
    )]
    pub performance_cap: usize,

    /// Maximum rows accepted.
    #[arg(
        short = 'r',
        long,
        value_name = "ROWS",
        default_value_t = DEFAULT_ROW_CAP,
        help = "Data rows above which the file is rejected [Default: 50000]"
    )]
    pub row_cap: usize,

    /// Column used for the X axis (bar labels).
    #[arg(
        short = 'x',
        long,
        value_name = "COLUMN",
        help = "X axis column [Default: first numeric column]"
    )]
    pub x_key: Option<String>,

    /// Column used for the Y axis (bar heights).
    #[arg(
        short = 'y',
        long,
        value_name = "COLUMN",
        help = "Y axis column [Default: second numeric column]"
    )]
    pub y_key: Option<String>,
}

impl Arguments {
    /// Build `Arguments` struct.
    pub fn build() -> Arguments {
        Arguments::parse()
    }
}

/// clap validator for the '--filter' argument: the expression must parse.
fn validate_filter_argument(s: &str) -> CsvChartResult<String> {
    match parse_filter(s) {
        Ok(_) => Ok(s.to_string()),
        Err(e) => Err(CsvChartError::InvalidArgument {
            arg_name: "--filter".to_string(),
            reason: e.to_string(),
        }),
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// cargo test -- --show-output tests_args`
#[cfg(test)]
mod tests_args {
    use super::*;

    // clap doesn't need the file to exist for basic parsing tests.
    fn test_path(name: &str) -> PathBuf {
        PathBuf::from(name)
    }

    #[test]
    fn test_args_basic_path_only() {
        let path_str = "data.csv";
        let args = Arguments::parse_from(["csv-chart", path_str]);

        assert_eq!(args.path, test_path(path_str));
        // Check defaults
        assert_eq!(args.filter, None);
        assert_eq!(args.row_cap, DEFAULT_ROW_CAP);
        assert_eq!(args.performance_cap, DEFAULT_PERFORMANCE_CAP);
        assert_eq!(args.limit, 20);
        assert_eq!(args.x_key, None);
        assert_eq!(args.y_key, None);
    }

    #[test]
    fn test_args_all_options_short() {
        let args = Arguments::parse_from([
            "csv-chart",
            "-f",
            "age >= 25",
            "-r",
            "1000",
            "-p",
            "100",
            "-x",
            "name",
            "-y",
            "age",
            "-l",
            "5",
            "people.csv",
        ]);

        assert_eq!(args.path, test_path("people.csv"));
        assert_eq!(args.filter.as_deref(), Some("age >= 25"));
        assert_eq!(args.row_cap, 1000);
        assert_eq!(args.performance_cap, 100);
        assert_eq!(args.x_key.as_deref(), Some("name"));
        assert_eq!(args.y_key.as_deref(), Some("age"));
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn test_args_all_options_long() {
        let args = Arguments::parse_from([
            "csv-chart",
            "--filter",
            "status == 'active'",
            "--row-cap",
            "10",
            "--performance-cap",
            "5",
            "--x-key",
            "a",
            "--y-key",
            "b",
            "--limit",
            "1",
            "log.csv",
        ]);

        assert_eq!(args.filter.as_deref(), Some("status == 'active'"));
        assert_eq!(args.row_cap, 10);
        assert_eq!(args.performance_cap, 5);
        assert_eq!(args.x_key.as_deref(), Some("a"));
        assert_eq!(args.y_key.as_deref(), Some("b"));
        assert_eq!(args.limit, 1);
    }

    #[test]
    fn test_args_invalid_filter_is_rejected() {
        let result = Arguments::try_parse_from(["csv-chart", "-f", "age ~ 25", "data.csv"]);
        let error = result.unwrap_err();

        assert_eq!(error.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(error.to_string().contains("Invalid filter expression: age ~ 25"));
    }

    #[test]
    fn test_args_path_is_required() {
        assert!(Arguments::try_parse_from(["csv-chart"]).is_err());
    }
}
