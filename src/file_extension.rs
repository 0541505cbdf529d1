use crate::PathExtension;
use std::path::Path;

/// Represents the extension of a file offered for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileExtension {
    /// CSV file extension (any letter case).
    Csv,
    /// Unknown file extension, storing the extension as a string.
    Unknown(String),
    /// Missing file extension, when no extension is present in the name.
    Missing,
}

impl FileExtension {
    /// Determines the file extension from a given path or bare file name.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension_as_lowercase()
            .as_deref() // Converts `Option<String>` to `Option<&str>` for matching.
        {
            Some("csv") => FileExtension::Csv,
            Some(ext) => FileExtension::Unknown(ext.to_owned()),
            None => FileExtension::Missing,
        }
    }

    /// Determines the file extension from a file name as reported by the file picker.
    ///
    /// A name that ends in `.csv` is always `Csv`, including the bare dotfile `.csv`
    /// for which `Path::extension` reports nothing.
    pub fn from_name(name: &str) -> Self {
        if name.to_lowercase().ends_with(".csv") {
            return FileExtension::Csv;
        }
        Self::from_path(Path::new(name))
    }

    pub fn is_csv(&self) -> bool {
        matches!(self, FileExtension::Csv)
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
