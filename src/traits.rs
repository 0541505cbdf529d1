//! Small extension traits over standard types.
//!
//! This module centralizes extensions to existing types (`std::path::Path`, slices, `usize`)
//! used by `file_extension.rs` (file-type guard), `ingest.rs` (duplicate headers)
//! and the error/warning messages (thousands separators).

use std::{collections::HashSet, ffi::OsStr, hash::Hash, path::Path};

/// Trait to extend `Path` with a convenient method for getting the lowercase file extension.
/// Used by `file_extension.rs`.
pub trait PathExtension {
    /// Returns the file extension as a lowercase `String`, or `None`.
    fn extension_as_lowercase(&self) -> Option<String>;
}

impl PathExtension for Path {
    /// Implementation for `Path`. Gets extension, converts to &str (lossy), then lowercases.
    ///
    /// ### Logic
    /// 1. Call `self.extension()` -> `Option<&OsStr>`.
    /// 2. Convert `OsStr` to `&str` via `to_str` -> `Option<&str>`.
    /// 3. Map `&str` to lowercase `String` -> `Option<String>`.
    fn extension_as_lowercase(&self) -> Option<String> {
        self.extension() // 1. Get OsStr extension.
            .and_then(OsStr::to_str) // 2. Try converting to &str.
            .map(str::to_lowercase) // 3. Convert to lowercase String if successful.
    }
}

/// A trait for finding repeated elements while preserving the original order.
/// Added to slices. Used by `ingest.rs` for duplicate header detection.
pub trait DuplicateElements<T> {
    /// Returns every element that repeats an earlier one, in the order the repeats occur.
    ///
    /// `[a, b, a, a]` yields `[a, a]`: each later occurrence is reported, not just the name.
    fn duplicates(&self) -> Vec<T>
    where
        T: Eq + Hash + Clone;
}

impl<T> DuplicateElements<T> for [T] {
    /// Implementation using `HashSet` for efficiency.
    ///
    /// ### Logic
    /// 1. Create an empty `HashSet` to track seen elements.
    /// 2. Walk the slice in order.
    /// 3. `HashSet::insert` returns `false` when the element was already seen.
    /// 4. Keep exactly those elements.
    fn duplicates(&self) -> Vec<T>
    where
        T: Eq + Hash + Clone,
    {
        let mut seen = HashSet::new(); // 1. Track seen elements.
        self.iter() // 2. Walk in order.
            .filter(|x| !seen.insert(*x)) // 3, 4: Keep repeats only.
            .cloned()
            .collect()
    }
}

/// Formats integers with `,` as the thousands separator (`50000` -> `"50,000"`).
/// Used by the user-facing messages of `CsvChartError` and `CsvWarning`.
pub trait ThousandsSeparator {
    fn with_thousands_separator(&self) -> String;
}

impl ThousandsSeparator for usize {
    fn with_thousands_separator(&self) -> String {
        let digits = self.to_string();
        let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                formatted.push(',');
            }
            formatted.push(digit);
        }

        formatted
    }
}

/// Renders a number as text the way ECMAScript `Number::toString` does.
/// Used by the `==` / `!=` filter operators, which compare cells with the rendered value.
pub trait CanonicalNumber {
    fn to_canonical_string(&self) -> String;
}

impl CanonicalNumber for f64 {
    /// ### Logic
    /// 1. Zero, including `-0`, renders as `"0"`.
    /// 2. Magnitudes `>= 1e21` or `< 1e-6` use the shortest exponent form with an
    ///    explicit exponent sign: `1e+21`, `1.5e-7`.
    /// 3. Everything else uses the shortest plain decimal: `25`, `0.000001`.
    fn to_canonical_string(&self) -> String {
        if *self == 0.0 {
            return "0".to_string();
        }

        let magnitude = self.abs();
        if !(1e-6..1e21).contains(&magnitude) {
            let formatted = format!("{self:e}");
            return match formatted.split_once('e') {
                Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                    format!("{mantissa}e+{exponent}")
                }
                _ => formatted,
            };
        }

        self.to_string()
    }
}

// --- Unit Tests ---
