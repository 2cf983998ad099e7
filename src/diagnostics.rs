//! Pretty diagnostic reporting using [ariadne].
//!
//! This module provides rich, human-readable error output for [`LoadError`]
//! values, rendered with source-code context, underlines, and labels.  It
//! is only compiled when the `diagnostics` Cargo feature is enabled:
//!
//! ```toml
//! [dependencies]
//! affilstat = { version = "0.2", features = ["diagnostics"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use affilstat::{CsvLoader, RecordLoader};
//!
//! let source = "Title,Year\nPaper,2020";
//! match CsvLoader::new().load(source) {
//!     Ok(records) => println!("Loaded {} records", records.len()),
//!     Err(e) => eprintln!("{}", e.to_diagnostic("export.csv", source)),
//! }
//! ```

use crate::error::LoadError;

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

#[cfg(feature = "diagnostics")]
impl LoadError {
    /// Render this error as a pretty Ariadne diagnostic.
    ///
    /// The returned `String` contains ANSI colour codes when the terminal
    /// supports them.  Redirect to a file or pipe through `strip-ansi` if
    /// you need plain text.
    ///
    /// # Arguments
    ///
    /// * `filename` – Label shown in the report header (e.g. `"export.csv"`).
    /// * `source`   – The original source text that was loaded.
    pub fn to_diagnostic(&self, filename: &str, source: &str) -> String {
        let mut buf = Vec::new();

        // Ariadne 0.6+: Report::build takes a Span directly.
        // We use (filename, range) as our span type, where range is the
        // portion of the source that triggered the error.
        let primary_range = self.primary_byte_range(source);
        let header_span = (filename, primary_range.clone());

        let mut report =
            Report::build(ReportKind::Error, header_span).with_message(format!("{}", self));

        // Attach a label pointing at the exact span / line.
        report = report.with_label(
            Label::new((filename, primary_range))
                .with_message(format!("{}", self.error))
                .with_color(Color::Red),
        );

        report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();

        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Compute a byte-range into `source` that best represents the error
    /// location, used for Ariadne label placement.
    ///
    /// Priority: explicit `span` > line-derived range > whole-file fallback.
    #[cfg(feature = "diagnostics")]
    fn primary_byte_range(&self, source: &str) -> std::ops::Range<usize> {
        if let Some(ref span) = self.span {
            return span.start..span.end;
        }
        if let Some(line) = self.line {
            let line_start: usize = source
                .lines()
                .take(line.saturating_sub(1))
                .map(|l| l.len() + 1) // +1 for '\n'
                .sum();
            let line_len = source
                .lines()
                .nth(line.saturating_sub(1))
                .map(|l| l.len())
                .unwrap_or(0);
            return line_start..line_start + line_len;
        }
        // No position info — point at offset 0 (shows the first line).
        0..0
    }
}

/// Load an export string and, on failure, return a pretty Ariadne diagnostic
/// instead of a raw [`LoadError`].
///
/// This is a convenience wrapper around calling `.load()` and then
/// `.to_diagnostic()` on the resulting error.
///
/// # Arguments
///
/// * `loader`   – Any type implementing [`crate::RecordLoader`].
/// * `input`    – The source text to load.
/// * `filename` – A display label for the source (e.g. a file path).
///
/// # Returns
///
/// `Ok(records)` on success, or `Err(diagnostic_string)` on failure.
#[cfg(feature = "diagnostics")]
pub fn load_with_diagnostics(
    loader: &dyn crate::RecordLoader,
    input: &str,
    filename: &str,
) -> Result<Vec<crate::PublicationRecord>, String> {
    loader
        .load(input)
        .map_err(|e| e.to_diagnostic(filename, input))
}
