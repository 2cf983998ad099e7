//! Low-level parsing of tabular export text.
//!
//! This module handles the CSV-level pass over the input: header resolution,
//! required-column checking, and row extraction.

use crate::InputFormat;
use crate::csv::config::{LoaderConfig, REQUIRED_FIELDS};
use crate::csv::structure::RawRow;
use crate::error::{LoadError, ValueError, fields};
use csv::ReaderBuilder;

/// The input format implied by a loader configuration's delimiter.
pub(crate) fn format_of(config: &LoaderConfig) -> InputFormat {
    if config.delimiter == b'\t' {
        InputFormat::Tsv
    } else {
        InputFormat::Csv
    }
}

/// Parse the content of a tabular export file, returning structured rows.
///
/// Fails when the configuration is invalid, the header row lacks a required
/// column, or a row is malformed in strict mode. Blank rows are skipped.
pub(crate) fn read_rows<S: AsRef<str>>(
    input: S,
    config: &LoaderConfig,
) -> Result<Vec<RawRow>, LoadError> {
    let text = input.as_ref();
    let format = format_of(config);

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    // Validate configuration
    config.validate().map_err(|msg| {
        LoadError::without_position(
            format.clone(),
            ValueError::Syntax(format!("Invalid loader configuration: {}", msg)),
        )
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_header)
        .quote(config.quote)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .flexible(config.flexible)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = if config.has_header {
        reader
            .headers()
            .map_err(|e| {
                LoadError::without_position(
                    format.clone(),
                    ValueError::Syntax(format!("Header parsing error: {}", e)),
                )
            })?
            .iter()
            .map(String::from)
            .collect()
    } else {
        // Use column numbers as headers if no header row is present
        let first_record = reader.headers().map_err(|e| {
            LoadError::without_position(
                format.clone(),
                ValueError::Syntax(format!("Failed to read first record: {}", e)),
            )
        })?;
        (0..first_record.len())
            .map(|i| format!("Column{}", i + 1))
            .collect()
    };

    if headers.is_empty() {
        return Err(LoadError::without_position(
            format,
            ValueError::Syntax("No headers found in input".to_string()),
        ));
    }

    check_required_columns(&headers, config, &format)?;

    let mut rows = Vec::new();
    let mut line_number = if config.has_header { 2 } else { 1 };

    for result in reader.records() {
        let record = result.map_err(|e| {
            // Extract position information from csv::Error if available
            if let Some(position) = e.position() {
                LoadError::at_line(
                    position.line() as usize,
                    format.clone(),
                    ValueError::Syntax(format!("Record parsing error: {}", e)),
                )
            } else {
                LoadError::at_line(
                    line_number,
                    format.clone(),
                    ValueError::Syntax(format!("Record parsing error: {}", e)),
                )
            }
        })?;

        if record.is_empty() {
            line_number += 1;
            continue;
        }

        let byte_offset = record.position().map(|p| p.byte() as usize).unwrap_or(0);

        let row = RawRow::from_record(&headers, &record, config, line_number, byte_offset)?;

        // Rows with no cell content at all are noise, not data; a row that
        // merely lacks an affiliation is kept and later counted as unmatched.
        if row.has_content() {
            rows.push(row);
        }

        line_number += 1;
    }

    Ok(rows)
}

/// Verify that every required logical field has a column in the header row.
fn check_required_columns(
    headers: &[String],
    config: &LoaderConfig,
    format: &InputFormat,
) -> Result<(), LoadError> {
    for &required in REQUIRED_FIELDS {
        let present = headers
            .iter()
            .any(|h| config.get_field_for_header(h) == Some(required));
        if !present {
            let field = match required {
                "year" => fields::YEAR,
                "affiliations" => fields::AFFILIATIONS,
                other => {
                    return Err(LoadError::without_position(
                        format.clone(),
                        ValueError::Syntax(format!("Unknown required field '{}'", other)),
                    ));
                }
            };
            return Err(LoadError::at_line(
                1,
                format.clone(),
                ValueError::MissingColumn { field },
            ));
        }
    }
    Ok(())
}

/// Detect the column delimiter by analyzing the content.
pub(crate) fn detect_delimiter(content: &str) -> u8 {
    let delimiters = [b',', b';', b'\t', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(5).collect();

    if sample_lines.is_empty() {
        return b','; // Default to comma
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delimiter in &delimiters {
        let mut score = 0;
        let mut consistent = true;
        let mut expected_fields = None;

        for line in &sample_lines {
            let field_count = line.split(delimiter as char).count();

            if let Some(expected) = expected_fields {
                if field_count != expected {
                    consistent = false;
                    break;
                }
            } else {
                expected_fields = Some(field_count);
            }

            score += field_count;
        }

        if consistent && score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

/// Detect whether the input has a header row by analyzing the first lines.
pub(crate) fn detect_headers(content: &str, delimiter: u8) -> bool {
    let lines: Vec<&str> = content.lines().take(3).collect();

    if lines.len() < 2 {
        return true; // Assume headers if we can't analyze
    }

    let first_line_fields: Vec<&str> = lines[0].split(delimiter as char).collect();
    let second_line_fields: Vec<&str> = lines[1].split(delimiter as char).collect();

    // Check if the first line contains typical export header labels
    for field in &first_line_fields {
        let field_lower = field.to_lowercase();
        if field_lower.contains("title")
            || field_lower.contains("author")
            || field_lower.contains("year")
            || field_lower.contains("affiliation")
            || field_lower.contains("address")
            || field_lower.contains("department")
            || field_lower.contains("cited")
            || field_lower.contains("source")
            || field_lower.contains("doi")
        {
            return true;
        }
    }

    // Fallback heuristic: headers contain more text, data rows more numbers
    let first_line_text_ratio = first_line_fields
        .iter()
        .filter(|f| !f.trim().is_empty())
        .filter(|f| f.parse::<f64>().is_err() && f.len() > 3)
        .count() as f64
        / first_line_fields.len().max(1) as f64;

    let second_line_numeric_ratio = second_line_fields
        .iter()
        .filter(|f| !f.trim().is_empty())
        .filter(|f| f.parse::<f64>().is_ok() || f.len() <= 3)
        .count() as f64
        / second_line_fields.len().max(1) as f64;

    first_line_text_ratio > 0.5 && second_line_numeric_ratio > 0.3
}
