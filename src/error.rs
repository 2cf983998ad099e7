//! Error types for export loading and aggregation operations.
//!
//! This module defines a structured error hierarchy that provides detailed
//! information about loading failures, including line/column positions and
//! format-specific context.

use crate::InputFormat;
use thiserror::Error;

/// A byte-offset span into the original source text.
///
/// Both `start` and `end` are byte offsets (not character indices) from the
/// beginning of the source string.  `start` is inclusive, `end` is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpan {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl SourceSpan {
    /// Create a new `SourceSpan`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Field name constants for consistent error reporting.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const YEAR: &str = "year";
    pub const AFFILIATIONS: &str = "affiliations";
    pub const DEPARTMENT: &str = "department";
    pub const CITED_BY: &str = "cited_by";
}

/// Top-level error type for export analysis operations.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unable to detect a tabular header row in input")]
    UnknownFormat,

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Load error with detailed location and context information.
#[derive(Error, Debug)]
#[error("Error in {format} input{}: {error}",
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {} column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        (None, Some(c)) => format!(" at column {}", c),
        (None, None) => String::new(),
    }
)]
pub struct LoadError {
    /// Line number where the error occurred (1-based, None if not available)
    pub line: Option<usize>,
    /// Column number where the error occurred (1-based, None if not available)
    pub column: Option<usize>,
    /// Byte-offset span into the source text, for rich diagnostic rendering.
    pub span: Option<SourceSpan>,
    /// The input format being loaded
    pub format: InputFormat,
    /// The specific error that occurred
    pub error: ValueError,
}

impl LoadError {
    /// Create a new LoadError.
    pub fn new(
        line: Option<usize>,
        column: Option<usize>,
        format: InputFormat,
        error: ValueError,
    ) -> Self {
        Self {
            line,
            column,
            span: None,
            format,
            error,
        }
    }

    /// Attach a byte-offset span to this error, returning `self` (builder style).
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Create a LoadError with just line information.
    pub fn at_line(line: usize, format: InputFormat, error: ValueError) -> Self {
        Self::new(Some(line), None, format, error)
    }

    /// Create a LoadError with line and column information.
    pub fn at_position(
        line: usize,
        column: usize,
        format: InputFormat,
        error: ValueError,
    ) -> Self {
        Self::new(Some(line), Some(column), format, error)
    }

    /// Create a LoadError without position information.
    pub fn without_position(format: InputFormat, error: ValueError) -> Self {
        Self::new(None, None, format, error)
    }
}

/// Specific value-level errors that can occur during loading.
#[derive(Error, Debug)]
pub enum ValueError {
    #[error("Bad syntax: {0}")]
    Syntax(String),

    #[error("Required column for {field} not found in header row")]
    MissingColumn { field: &'static str },

    #[error("Bad value for {field}: \"{value}\" ({reason})")]
    BadValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors from building an institution matcher.
#[derive(Error, Debug, PartialEq)]
pub enum MatcherError {
    #[error("No non-empty institution name variants provided")]
    NoVariants,
}

// Conversion implementations for external error types

#[cfg(feature = "csv")]
impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        let (line, column) = if let Some(position) = err.position() {
            (
                Some(position.line() as usize),
                Some(position.byte() as usize),
            )
        } else {
            (None, None)
        };

        LoadError::new(
            line,
            column,
            InputFormat::Csv,
            ValueError::Syntax(err.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let error = LoadError::at_line(
            42,
            InputFormat::Csv,
            ValueError::Syntax("Invalid record".to_string()),
        );

        let display = format!("{}", error);
        assert!(display.contains("line 42"));
        assert!(display.contains("CSV input"));
        assert!(display.contains("Invalid record"));
    }

    #[test]
    fn test_load_error_with_position() {
        let error = LoadError::at_position(
            10,
            25,
            InputFormat::Tsv,
            ValueError::MissingColumn {
                field: fields::AFFILIATIONS,
            },
        );

        let display = format!("{}", error);
        assert!(display.contains("line 10 column 25"));
        assert!(display.contains("TSV input"));
    }

    #[test]
    fn test_load_error_without_position() {
        let error = LoadError::without_position(
            InputFormat::Csv,
            ValueError::BadValue {
                field: fields::YEAR,
                value: "invalid".to_string(),
                reason: "not a valid year".to_string(),
            },
        );

        let display = format!("{}", error);
        assert!(display.contains("CSV input"));
        assert!(!display.contains("line"));
        assert!(!display.contains("column"));
    }

    #[test]
    fn test_value_error_display() {
        let error = ValueError::MissingColumn {
            field: fields::AFFILIATIONS,
        };
        assert_eq!(
            format!("{}", error),
            "Required column for affiliations not found in header row"
        );

        let error = ValueError::BadValue {
            field: fields::YEAR,
            value: "not-a-year".to_string(),
            reason: "no four-digit sequence".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Bad value for year: \"not-a-year\" (no four-digit sequence)"
        );
    }

    #[test]
    fn test_input_format_display() {
        assert_eq!(format!("{}", InputFormat::Csv), "CSV");
        assert_eq!(format!("{}", InputFormat::Tsv), "TSV");
        assert_eq!(format!("{}", InputFormat::Unknown), "Unknown");
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_error_conversion() {
        let csv_content = "invalid,csv\nwith,extra,field";
        let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
        let result = reader.records().next();

        if let Some(Err(csv_err)) = result {
            let load_err: LoadError = csv_err.into();
            assert_eq!(load_err.format, InputFormat::Csv);
            assert!(matches!(load_err.error, ValueError::Syntax(_)));
        }
    }
}
