//! Intermediate data structures used during export loading.

use crate::csv::config::LoaderConfig;
use crate::csv::parse::format_of;
use crate::error::{LoadError, SourceSpan, ValueError};
use crate::{PublicationRecord, Year, utils};
use csv::StringRecord;
use std::collections::HashMap;

/// Structured raw data from one export row.
#[derive(Debug, Clone)]
pub(crate) struct RawRow {
    /// Cell values keyed by logical field name, or by the raw header name
    /// for columns with no mapping.
    pub(crate) fields: HashMap<String, String>,
}

impl RawRow {
    /// Create a new RawRow from a CSV record and headers.
    pub(crate) fn from_record(
        headers: &[String],
        record: &StringRecord,
        config: &LoaderConfig,
        line_number: usize,
        byte_offset: usize,
    ) -> Result<Self, LoadError> {
        let mut fields = HashMap::new();

        for (i, value) in record.iter().enumerate() {
            if i >= headers.len() {
                if !config.flexible {
                    return Err(LoadError::at_line(
                        line_number,
                        format_of(config),
                        ValueError::Syntax(format!(
                            "Record has more fields ({}) than headers ({})",
                            record.len(),
                            headers.len()
                        )),
                    )
                    .with_span(SourceSpan::new(byte_offset, byte_offset)));
                }
                break;
            }

            let header = &headers[i];
            let value = if config.trim { value.trim() } else { value };

            if value.is_empty() {
                continue;
            }

            if let Some(field) = config.get_field_for_header(header) {
                fields.insert(field.to_string(), value.to_string());
            } else {
                // Store unknown columns under their raw header name
                fields.insert(header.clone(), value.to_string());
            }
        }

        Ok(RawRow { fields })
    }

    /// Get a field value by logical name.
    pub(crate) fn get_field(&self, field: &str) -> Option<&String> {
        self.fields.get(field)
    }

    /// Check if the row has any cell content.
    pub(crate) fn has_content(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Convert into a [`PublicationRecord`].
    ///
    /// Infallible: required columns are enforced at the header level, and
    /// per-cell problems are coercions — a blank affiliation cell stays
    /// `None`, an unparseable year becomes [`Year::Unknown`], an unparseable
    /// citation count becomes 0.
    pub(crate) fn into_record(mut self) -> PublicationRecord {
        let title = self.fields.remove("title");

        let year = self
            .fields
            .remove("year")
            .map(|y| utils::parse_year_field(&y))
            .unwrap_or(Year::Unknown);

        let affiliations = self.fields.remove("affiliations");
        let department = self.fields.remove("department");

        let cited_by = self
            .fields
            .remove("cited_by")
            .map(|c| utils::parse_cited_by(&c))
            .unwrap_or(0);

        // Whatever is left was never mapped to a standard field
        PublicationRecord {
            title,
            year,
            affiliations,
            department,
            cited_by,
            extra_fields: self.fields,
        }
    }
}
