//! A library for analyzing institutional affiliations in bibliographic exports.
//!
//! `affilstat` parses tabular publication exports (e.g. a Scopus or Web of
//! Science download) and answers the question a research office keeps asking:
//! how many of these records carry an affiliation match for our institution,
//! year by year?
//!
//! # Features
//!
//! The library has optional features that can be enabled in your Cargo.toml:
//!
//! - `csv` - Enable the CSV/TSV record loader and report writers (enabled by default)
//! - `diagnostics` - Enable rich ariadne-rendered load error reports
//!
//! To use only specific features, disable default features and enable just what
//! you need:
//!
//! ```toml
//! [dependencies]
//! affilstat = { version = "0.2.0", default-features = false, features = ["csv"] }
//! ```
//!
//! # Key Characteristics
//!
//! - **Configurable loading**: map arbitrary export column names onto the
//!   record fields via [`LoaderConfig`], with delimiter and header
//!   auto-detection for unlabelled files.
//! - **Auditable matching**: the target institution is an explicit set of name
//!   variants held by an [`InstitutionMatcher`] — no matching rule is baked in
//!   as a constant.
//! - **Pure aggregation**: [`aggregate`] is a single pass over the loaded
//!   records with no shared state; classifying one record never depends on
//!   another.
//!
//! # Basic Usage
//!
//! ```rust
//! use affilstat::{CsvLoader, InstitutionMatcher, RecordLoader, aggregate};
//!
//! let input = "\
//! Title,Year,Affiliations
//! Deep Learning for Tides,2021,\"Dept of Applied Mechanics, NITK Surathkal, India\"
//! Unrelated Work,2021,\"IIT Bombay, India\"";
//!
//! let records = CsvLoader::new().load(input).unwrap();
//! let matcher =
//!     InstitutionMatcher::new(["NITK", "National Institute of Technology Karnataka"]).unwrap();
//!
//! let result = aggregate(&records, &matcher);
//! assert_eq!(result.total, 1);
//! ```
//!
//! # Reports
//!
//! The [`report`] module serializes aggregation output to CSV tables suitable
//! for spreadsheet import:
//!
//! ```rust
//! use affilstat::{CsvLoader, InstitutionMatcher, RecordLoader, aggregate, report};
//!
//! let input = "Title,Year,Affiliations\nPaper,2020,NITK Surathkal";
//! let records = CsvLoader::new().load(input).unwrap();
//! let matcher = InstitutionMatcher::new(["NITK"]).unwrap();
//! let result = aggregate(&records, &matcher);
//!
//! let mut out = Vec::new();
//! report::write_aggregation(&mut out, &result).unwrap();
//! let table = String::from_utf8(out).unwrap();
//! assert!(table.starts_with("Year,Count\n"));
//! ```
//!
//! # Error Handling
//!
//! Loading uses a structured [`LoadError`] that names the missing or malformed
//! field and its position. Aggregation never fails: a record with an
//! unparseable year lands in the [`Year::Unknown`] bucket, a record with a
//! blank affiliation cell is simply unmatched, and zero matches is a valid
//! empty result.
//!
//! ```rust
//! use affilstat::{CsvLoader, RecordLoader};
//!
//! // No affiliation column at all is a schema problem, not a row problem.
//! let result = CsvLoader::new().load("Title,Year\nPaper,2020");
//! assert!(result.is_err());
//! ```
//!
//! # Thread Safety
//!
//! Loaders and matchers are immutable once built and can be shared between
//! threads. Each `load`/`aggregate` call operates on its own data; there is no
//! cross-run state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[cfg(feature = "csv")]
extern crate csv as csv_crate;

pub mod aggregate;
#[cfg(feature = "csv")]
pub mod csv;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod error;
pub mod institution;
#[cfg(feature = "csv")]
pub mod report;

// Reexports
pub use aggregate::{AggregationResult, CategoryBreakdown, aggregate, category_counts};
#[cfg(feature = "csv")]
pub use csv::{CsvLoader, LoaderConfig};
#[cfg(feature = "diagnostics")]
pub use diagnostics::load_with_diagnostics;
pub use error::{ExportError, LoadError, MatcherError, SourceSpan, ValueError};
pub use institution::{AffiliationCategory, InstitutionMatcher};

mod utils;

/// Tabular input format types supported by the library.
#[derive(Debug, Clone, PartialEq)]
pub enum InputFormat {
    Csv,
    Tsv,
    Unknown,
}

impl InputFormat {
    /// Convert the format to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Csv => "CSV",
            InputFormat::Tsv => "TSV",
            InputFormat::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A publication year, either a known calendar year or the sentinel bucket
/// for records whose year column was missing or unparseable.
///
/// The ordering places every known year before `Unknown`, so year-keyed maps
/// and report tables list numeric years ascending with the unknown bucket
/// last.
///
/// ```rust
/// use affilstat::Year;
///
/// assert!(Year::Known(1999) < Year::Known(2024));
/// assert!(Year::Known(2024) < Year::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Year {
    /// A parsed four-digit calendar year.
    Known(i32),
    /// Year column missing or not salvageable as a number.
    Unknown,
}

impl Year {
    /// Whether this is the unknown-year sentinel.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Year::Unknown)
    }
}

impl Default for Year {
    fn default() -> Self {
        Year::Unknown
    }
}

impl Ord for Year {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Year::Known(a), Year::Known(b)) => a.cmp(b),
            (Year::Known(_), Year::Unknown) => Ordering::Less,
            (Year::Unknown, Year::Known(_)) => Ordering::Greater,
            (Year::Unknown, Year::Unknown) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Year {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Year::Known(year) => write!(f, "{}", year),
            Year::Unknown => f.write_str("Unknown"),
        }
    }
}

/// A single publication record loaded from an export row.
///
/// Records are immutable after load and carry only the fields the analysis
/// needs; any other export columns are preserved verbatim in `extra_fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Title of the work, when the export has a title column.
    pub title: Option<String>,
    /// Publication year, coerced to [`Year::Unknown`] when unparseable.
    pub year: Year,
    /// Raw affiliation text, possibly listing several institutions separated
    /// by semicolons. `None` when the cell was blank.
    pub affiliations: Option<String>,
    /// Department attribution, when the export has a department column.
    pub department: Option<String>,
    /// Citation count, coerced to 0 when missing or unparseable.
    pub cited_by: u64,
    /// Columns not mapped to any standard field.
    pub extra_fields: HashMap<String, String>,
}

impl PublicationRecord {
    /// Create a new empty PublicationRecord.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Trait for implementing publication record loaders.
pub trait RecordLoader {
    /// Load a string containing one or more publication rows.
    ///
    /// # Arguments
    ///
    /// * `input` - The string containing the tabular export data
    ///
    /// # Returns
    ///
    /// A Result containing a vector of loaded records or a LoadError
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if a required column is absent or the input is not
    /// parseable tabular data
    fn load(
        &self,
        input: &str,
    ) -> std::result::Result<Vec<PublicationRecord>, crate::error::LoadError>;
}

/// Format detection and automatic loading of tabular export files.
///
/// # Arguments
///
/// * `content` - The content of the file to load
///
/// # Returns
///
/// A Result containing the loaded records and the detected format, or an
/// ExportError when no header row can be recognized or loading fails
///
/// # Examples
///
/// ```
/// use affilstat::detect_and_load;
///
/// let content = "Title\tYear\tAffiliations\nPaper\t2020\tNITK Surathkal";
///
/// let (records, format) = detect_and_load(content).unwrap();
/// assert_eq!(format.as_str(), "TSV");
/// assert_eq!(records.len(), 1);
/// ```
#[cfg(feature = "csv")]
pub fn detect_and_load(
    content: &str,
) -> std::result::Result<(Vec<PublicationRecord>, InputFormat), ExportError> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Ok((Vec::new(), InputFormat::Unknown));
    }

    let delimiter = csv::parse::detect_delimiter(content);
    if !csv::parse::detect_headers(content, delimiter) {
        return Err(ExportError::UnknownFormat);
    }

    let format = match delimiter {
        b'\t' => InputFormat::Tsv,
        _ => InputFormat::Csv,
    };

    let mut config = LoaderConfig::new();
    config.set_delimiter(delimiter);
    let records = CsvLoader::with_config(config)
        .load(content)
        .map_err(ExportError::Load)?;
    Ok((records, format))
}
