//! CSV report writers for aggregation output.
//!
//! Each writer serializes one report table to any [`std::io::Write`] sink,
//! producing plain CSV that spreadsheet tools open directly. Rendering
//! beyond that (styling, XLSX packaging, download plumbing) is the caller's
//! concern.
//!
//! # Example
//!
//! ```
//! use affilstat::{AggregationResult, Year, report};
//! use std::collections::BTreeMap;
//!
//! let result = AggregationResult {
//!     per_year: BTreeMap::from([(Year::Known(2020), 2), (Year::Unknown, 1)]),
//!     total: 3,
//! };
//!
//! let mut out = Vec::new();
//! report::write_aggregation(&mut out, &result).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "Year,Count\n2020,2\nUnknown,1\nTotal,3\n"
//! );
//! ```

use crate::aggregate::{
    AggregationResult, CategoryBreakdown, DepartmentCitations, YearDepartmentCitations,
};
use crate::institution::InstitutionMatcher;
use crate::{PublicationRecord, aggregate};
use std::io;
use thiserror::Error;

/// Errors from writing report tables.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Writes the per-year matched counts with a trailing `Total` row.
///
/// Columns: `Year,Count`. Years appear in the result's key order (numeric
/// ascending, unknown bucket last).
pub fn write_aggregation<W: io::Write>(
    writer: W,
    result: &AggregationResult,
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["Year", "Count"])?;
    for (year, count) in &result.per_year {
        wtr.write_record([year.to_string(), count.to_string()])?;
    }
    wtr.write_record(["Total".to_string(), result.total.to_string()])?;

    wtr.flush()?;
    Ok(())
}

/// Writes the combined year-wise and total affiliation category table.
///
/// Columns: `Year,Category,Count`. Year-wise rows come first in the
/// breakdown's order, then the totals block with `Total` in the year column.
pub fn write_affiliation_counts<W: io::Write>(
    writer: W,
    breakdown: &CategoryBreakdown,
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["Year", "Category", "Count"])?;
    for row in &breakdown.per_year {
        wtr.write_record([
            row.year.to_string(),
            row.category.label().to_string(),
            row.count.to_string(),
        ])?;
    }
    for row in &breakdown.totals {
        wtr.write_record([
            "Total".to_string(),
            row.category.label().to_string(),
            row.count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the department citation totals.
///
/// Columns: `Department,Total Cited By`, in the rows' order (descending
/// total).
pub fn write_department_citations<W: io::Write>(
    writer: W,
    rows: &[DepartmentCitations],
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["Department", "Total Cited By"])?;
    for row in rows {
        wtr.write_record([row.department.to_string(), row.total_cited_by.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the year × department citation totals.
///
/// Columns: `Year,Department,Total Cited By`.
pub fn write_year_department_citations<W: io::Write>(
    writer: W,
    rows: &[YearDepartmentCitations],
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["Year", "Department", "Total Cited By"])?;
    for row in rows {
        wtr.write_record([
            row.year.to_string(),
            row.department.to_string(),
            row.total_cited_by.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the matched-records listing: one row per record whose affiliation
/// text names the institution.
///
/// Columns: `Title,Year,Department,Cited By,Matched Affiliation`. Missing
/// titles and departments become empty cells; the matched affiliation is the
/// semicolon-delimited segment the matcher found.
pub fn write_matched_records<W: io::Write>(
    writer: W,
    records: &[PublicationRecord],
    matcher: &InstitutionMatcher,
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["Title", "Year", "Department", "Cited By", "Matched Affiliation"])?;
    for record in aggregate::matched_records(records, matcher) {
        let segment = record
            .affiliations
            .as_deref()
            .and_then(|text| matcher.matched_segment(text))
            .unwrap_or_default();
        wtr.write_record([
            record.title.clone().unwrap_or_default(),
            record.year.to_string(),
            record.department.clone().unwrap_or_default(),
            record.cited_by.to_string(),
            segment.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
