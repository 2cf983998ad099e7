//! CSV/TSV record loader implementation.
//!
//! This module provides functionality to load publication records from
//! tabular export files with configurable column mappings and enhanced
//! error handling.
//!
//! # Example
//!
//! ```
//! use affilstat::{CsvLoader, RecordLoader};
//!
//! let input = "Title,Year,Affiliations\nExample Paper,2023,NITK Surathkal";
//!
//! let loader = CsvLoader::new();
//!
//! let records = loader.load(input).unwrap();
//! assert_eq!(records[0].title.as_deref(), Some("Example Paper"));
//! ```

mod config;
pub(crate) mod parse;
mod structure;

use crate::{PublicationRecord, RecordLoader};
pub use config::LoaderConfig;
use parse::read_rows;

/// Loader for tabular export files with configurable column mappings.
///
/// Provides flexible loading of CSV/TSV files containing publication data,
/// with support for custom column mappings and different dialects.
///
/// # Features
///
/// - Custom header mappings with O(1) lookup performance
/// - Configurable delimiters, quotes, and trimming
/// - Automatic delimiter and header detection
/// - Preservation of unmapped columns as extra fields
/// - Error reporting with line numbers
///
/// # Examples
///
/// Basic usage:
/// ```
/// use affilstat::{CsvLoader, RecordLoader};
///
/// let input = "Title,Year,Affiliations\nExample Paper,2023,NITK Surathkal";
/// let loader = CsvLoader::new();
/// let records = loader.load(input).unwrap();
/// ```
///
/// With custom configuration:
/// ```
/// use affilstat::csv::{CsvLoader, LoaderConfig};
///
/// let mut config = LoaderConfig::new();
/// config.set_delimiter(b';');
///
/// let loader = CsvLoader::with_config(config);
/// ```
///
/// Auto-detection of format:
/// ```
/// use affilstat::csv::CsvLoader;
///
/// let loader = CsvLoader::with_auto_detection();
/// // Will automatically detect delimiter and header presence
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    config: LoaderConfig,
    auto_detect: bool,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Creates a new loader with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::new(),
            auto_detect: false,
        }
    }

    /// Creates a new loader with custom configuration
    #[must_use]
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config,
            auto_detect: false,
        }
    }

    /// Creates a new loader with automatic format detection
    #[must_use]
    pub fn with_auto_detection() -> Self {
        Self {
            config: LoaderConfig::new(),
            auto_detect: true,
        }
    }

    /// Sets the configuration for this loader
    pub fn set_config(&mut self, config: LoaderConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Gets a reference to the current configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Gets a mutable reference to the current configuration
    pub fn config_mut(&mut self) -> &mut LoaderConfig {
        &mut self.config
    }

    /// Enables or disables automatic format detection
    pub fn set_auto_detection(&mut self, enabled: bool) -> &mut Self {
        self.auto_detect = enabled;
        self
    }

    /// Auto-detects format parameters from the input
    fn auto_detect_format(&self, input: &str) -> LoaderConfig {
        let mut config = self.config.clone();

        if self.auto_detect {
            let delimiter = parse::detect_delimiter(input);
            let has_headers = parse::detect_headers(input, delimiter);

            config.set_delimiter(delimiter);
            config.set_has_header(has_headers);
        }

        config
    }
}

impl RecordLoader for CsvLoader {
    /// Loads publication records from tabular export text.
    ///
    /// # Arguments
    ///
    /// * `input` - The CSV/TSV formatted string to load
    ///
    /// # Returns
    ///
    /// A Result containing a vector of loaded records or a LoadError
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when a required column (`year` or `affiliations`)
    /// is absent from the header row, the configuration is invalid, or a row
    /// is malformed in strict mode. Per-cell problems never fail the load:
    /// blank affiliations stay unmatched, unparseable years become
    /// [`crate::Year::Unknown`].
    fn load(
        &self,
        input: &str,
    ) -> std::result::Result<Vec<PublicationRecord>, crate::error::LoadError> {
        let config = self.auto_detect_format(input);
        let rows = read_rows(input, &config)?;

        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Year;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_load() {
        let input = "\
Title,Year,Affiliations
Test Paper,2023,\"Dept of CS, NITK Surathkal\"
Another Paper,2022,\"IIT Bombay, India\"";

        let loader = CsvLoader::new();
        let records = loader.load(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("Test Paper"));
        assert_eq!(records[0].year, Year::Known(2023));
        assert_eq!(
            records[0].affiliations.as_deref(),
            Some("Dept of CS, NITK Surathkal")
        );
    }

    #[test]
    fn test_custom_headers() {
        let input = "\
Article Name,Published,Author Addresses
Test Paper,2023,NITK Surathkal";

        let mut config = LoaderConfig::new();
        config
            .set_header_mapping("title", vec!["Article Name".to_string()])
            .set_header_mapping("year", vec!["Published".to_string()])
            .set_header_mapping("affiliations", vec!["Author Addresses".to_string()]);

        let loader = CsvLoader::with_config(config);
        let records = loader.load(input).unwrap();
        assert_eq!(records[0].title.as_deref(), Some("Test Paper"));
        assert_eq!(records[0].year, Year::Known(2023));
        assert_eq!(records[0].affiliations.as_deref(), Some("NITK Surathkal"));
    }

    #[test]
    fn test_custom_delimiter() {
        let input = "Title;Year;Affiliations\nTest Paper;2023;NITK Surathkal";

        let mut config = LoaderConfig::new();
        config.set_delimiter(b';');

        let loader = CsvLoader::with_config(config);
        let records = loader.load(input).unwrap();
        assert_eq!(records[0].year, Year::Known(2023));
    }

    #[test]
    fn test_blank_affiliation_is_unmatched_not_error() {
        let input = "Title,Year,Affiliations\nPaper,2023,\nOther,2022,NITK";

        let loader = CsvLoader::new();
        let records = loader.load(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].affiliations, None);
        assert_eq!(records[1].affiliations.as_deref(), Some("NITK"));
    }

    #[test]
    fn test_missing_affiliation_column_errors() {
        let input = "Title,Year\nPaper,2023";

        let loader = CsvLoader::new();
        let err = loader.load(input).unwrap_err();
        let display = format!("{}", err);
        assert!(display.contains("affiliations"));
    }

    #[test]
    fn test_auto_detection() {
        let input = "\
title;year;affiliations
Test Paper;2023;NITK Surathkal
Another Paper;2024;IIT Bombay";

        let loader = CsvLoader::with_auto_detection();
        let records = loader.load(input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("Test Paper"));
        assert_eq!(records[1].year, Year::Known(2024));
    }

    #[test]
    fn test_extra_fields_handling() {
        let input = "\
Title,Year,Affiliations,Funding Agency
Test Paper,2023,NITK,DST
Second Paper,2024,IIT,SERB";

        let loader = CsvLoader::new();
        let records = loader.load(input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].extra_fields.get("Funding Agency"),
            Some(&"DST".to_string())
        );
    }

    #[test]
    fn test_empty_input() {
        let loader = CsvLoader::new();
        let records = loader.load("").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_loader_configuration_methods() {
        let mut loader = CsvLoader::new();

        // Test configuration access
        assert_eq!(loader.config().delimiter, b',');

        // Test mutable configuration
        loader.config_mut().set_delimiter(b';');
        assert_eq!(loader.config().delimiter, b';');

        // Test setting new config
        let new_config = LoaderConfig::new();
        loader.set_config(new_config);
        assert_eq!(loader.config().delimiter, b','); // Back to default

        // Test auto-detection toggle
        loader.set_auto_detection(true);
        assert!(loader.auto_detect);
    }

    #[test]
    fn test_record_order_preserved() {
        let input = "\
Title,Year,Affiliations
First,2020,NITK
Second,2019,NITK
Third,2021,NITK";

        let records = CsvLoader::new().load(input).unwrap();
        let titles: Vec<_> = records.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_improved_validation_errors() {
        // Empty field name validation
        let mut config = LoaderConfig::new();
        config.set_header_mapping("", vec!["test".to_string()]);

        let loader = CsvLoader::with_config(config);
        let result = loader.load("Year,Affiliations\n2023,NITK");
        assert!(result.is_err());

        // Invalid delimiter validation
        let mut config2 = LoaderConfig::new();
        config2.set_delimiter(b'\n');

        let loader2 = CsvLoader::with_config(config2);
        let result2 = loader2.load("Year,Affiliations\n2023,NITK");
        assert!(result2.is_err());
    }
}
