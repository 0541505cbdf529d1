//! Row filtering with a single-condition expression language.
//!
//! An expression has the form `column operator value`, for example `age >= 25`,
//! `name == "John"` or `status != active`. Supported operators: `>`, `<`, `>=`, `<=`, `==`, `!=`.

use crate::{CanonicalNumber, CsvChartError, CsvChartResult, Record, parse_number};
use regex::Regex;

use std::{fmt, sync::LazyLock};

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    NotEqual,
}

impl FilterOperator {
    /// Order in which operators are tried against an expression.
    ///
    /// Two-character operators come before their one-character prefixes, so that
    /// `age >= 25` never reads as `>` followed by the value `=25`.
    pub const MATCH_ORDER: [FilterOperator; 6] = [
        FilterOperator::GreaterOrEqual,
        FilterOperator::LessOrEqual,
        FilterOperator::NotEqual,
        FilterOperator::Equal,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::GreaterThan => ">",
            FilterOperator::LessThan => "<",
            FilterOperator::GreaterOrEqual => ">=",
            FilterOperator::LessOrEqual => "<=",
            FilterOperator::Equal => "==",
            FilterOperator::NotEqual => "!=",
        }
    }

    /// `true` for the ordering operators, which compare numbers.
    /// `==` and `!=` compare strings.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FilterOperator::Equal | FilterOperator::NotEqual)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A quoted literal, or a bare token that is not a number.
    Text(String),
    /// A bare token that parses as a finite number.
    Number(f64),
}

impl FilterValue {
    /// Types a raw value token.
    ///
    /// ### Logic
    /// 1. Starts and ends with `"` or `'`: strip the quotes, keep as text (no escape processing).
    ///    A lone quote character is the empty text.
    /// 2. Parses as a finite number: keep as a number.
    /// 3. Otherwise: keep the token as text, so `status == active` works without quotes.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();

        let is_quoted = (token.starts_with('"') && token.ends_with('"'))
            || (token.starts_with('\'') && token.ends_with('\''));

        if is_quoted {
            let inner = token.get(1..token.len() - 1).unwrap_or_default();
            return FilterValue::Text(inner.to_string());
        }

        match parse_number(token) {
            Some(number) => FilterValue::Number(number),
            None => FilterValue::Text(token.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(number) => Some(*number),
            FilterValue::Text(text) => parse_number(text),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(text) => f.write_str(text),
            FilterValue::Number(number) => f.write_str(&number.to_canonical_string()),
        }
    }
}

/// A parsed filter expression. Built fresh for every filter-apply call.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterCondition {
    /// Evaluates the condition against one record.
    ///
    /// - Column absent from the record: the record fails.
    /// - `==` / `!=`: exact, case-sensitive comparison with the value rendered as a string.
    ///   Numbers render through `CanonicalNumber`: `-0` is `"0"`, `1e-7` stays `"1e-7"`.
    /// - `>`, `<`, `>=`, `<=`: both sides coerced to numbers; if either coercion fails
    ///   (including an empty cell) the record fails. Coercion only accepts finite numbers,
    ///   so `Infinity`, `inf` and `NaN` are text: `v < Infinity` matches no record.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(cell) = record.get(&self.column) else {
            return false;
        };

        if !self.operator.is_numeric() {
            let equal = *cell == self.value.to_string();
            return match self.operator {
                FilterOperator::NotEqual => !equal,
                _ => equal,
            };
        }

        let (Some(left), Some(right)) = (parse_number(cell), self.value.as_number()) else {
            return false;
        };

        match self.operator {
            FilterOperator::GreaterThan => left > right,
            FilterOperator::LessThan => left < right,
            FilterOperator::GreaterOrEqual => left >= right,
            FilterOperator::LessOrEqual => left <= right,
            FilterOperator::Equal | FilterOperator::NotEqual => false,
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            FilterValue::Text(text) => write!(f, "{} {} \"{text}\"", self.column, self.operator),
            FilterValue::Number(number) => write!(
                f,
                "{} {} {}",
                self.column,
                self.operator,
                number.to_canonical_string()
            ),
        }
    }
}

/// One anchored pattern per operator, in `FilterOperator::MATCH_ORDER`.
///
/// Captures: 1 = column (ASCII letters, digits, underscore), 2 = operator, 3 = value (rest of input).
static CONDITION_PATTERNS: LazyLock<Vec<(FilterOperator, Regex)>> = LazyLock::new(|| {
    FilterOperator::MATCH_ORDER
        .iter()
        .map(|&operator| {
            let pattern = format!(
                r"^([A-Za-z0-9_]+)\s*({})\s*(.+)$",
                regex::escape(operator.as_str())
            );
            let regex = Regex::new(&pattern).expect("filter condition pattern must compile");
            (operator, regex)
        })
        .collect()
});

/// Parses a filter expression into a `FilterCondition`.
///
/// ### Returns
/// `CsvChartError::FilterParse` when the expression is empty or whitespace-only, or when
/// it matches none of the operator patterns (the message quotes the input).
pub fn parse_filter(dsl: &str) -> CsvChartResult<FilterCondition> {
    let trimmed = dsl.trim();
    if trimmed.is_empty() {
        return Err(CsvChartError::FilterParse(
            "Filter expression cannot be empty".to_string(),
        ));
    }

    for (operator, pattern) in CONDITION_PATTERNS.iter() {
        let Some(captures) = pattern.captures(trimmed) else {
            continue;
        };

        let condition = FilterCondition {
            column: captures[1].to_string(),
            operator: *operator,
            value: FilterValue::from_token(&captures[3]),
        };

        tracing::debug!("Parsed filter {dsl:?} as {condition:?}");
        return Ok(condition);
    }

    tracing::debug!("No filter pattern matched {dsl:?}");
    Err(CsvChartError::FilterParse(format!(
        "Invalid filter expression: {dsl}"
    )))
}

/// Filters records with a filter expression, keeping input order.
///
/// An empty or whitespace-only expression means "no filter": every record is returned.
/// Parse errors propagate to the caller. Records are never modified.
pub fn apply_filter(records: &[Record], dsl: &str) -> CsvChartResult<Vec<Record>> {
    if dsl.trim().is_empty() {
        return Ok(records.to_vec());
    }

    let condition = parse_filter(dsl)?;
    let filtered: Vec<Record> = records
        .iter()
        .filter(|record| condition.matches(record))
        .cloned()
        .collect();

    tracing::debug!(
        "Filter `{condition}` kept {} of {} records",
        filtered.len(),
        records.len()
    );

    Ok(filtered)
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
