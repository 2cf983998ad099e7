//! Affiliation aggregation over loaded publication records.
//!
//! Everything here is a pure, single-pass map-filter-reduce: classifying one
//! record never depends on another, and no call mutates its inputs. The
//! functions take the record slice and a matcher and return freshly built
//! result values.
//!
//! # Example
//!
//! ```
//! use affilstat::{InstitutionMatcher, PublicationRecord, Year, aggregate};
//!
//! let records = vec![
//!     PublicationRecord {
//!         year: Year::Known(2020),
//!         affiliations: Some("NITK Surathkal".into()),
//!         ..Default::default()
//!     },
//!     PublicationRecord {
//!         year: Year::Known(2020),
//!         affiliations: Some("IIT Bombay".into()),
//!         ..Default::default()
//!     },
//! ];
//!
//! let matcher = InstitutionMatcher::new(["NITK"]).unwrap();
//! let result = aggregate(&records, &matcher);
//! assert_eq!(result.total, 1);
//! assert_eq!(result.per_year.get(&Year::Known(2020)), Some(&1));
//! ```

use crate::institution::{AffiliationCategory, InstitutionMatcher};
use crate::{PublicationRecord, Year};
use compact_str::CompactString;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Per-year matched counts and the grand total for one aggregation run.
///
/// Invariant: `total` equals the sum of `per_year` values, which equals the
/// number of records the matcher classified as matched. Matched records with
/// an unparseable year are counted under [`Year::Unknown`], which the key
/// ordering places after every numeric year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    /// Matched-record count per publication year, numeric years ascending,
    /// the unknown-year bucket last.
    pub per_year: BTreeMap<Year, u64>,
    /// Total number of matched records.
    pub total: u64,
}

impl AggregationResult {
    /// Whether the run matched no records at all.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn is_matched(record: &PublicationRecord, matcher: &InstitutionMatcher) -> bool {
    record
        .affiliations
        .as_deref()
        .is_some_and(|text| matcher.matches(text))
}

/// Counts matched records per year and in total.
///
/// Zero matched records is a valid outcome: the result has an empty map and a
/// total of 0. This function never fails.
pub fn aggregate(records: &[PublicationRecord], matcher: &InstitutionMatcher) -> AggregationResult {
    let per_year: BTreeMap<Year, u64> = records
        .iter()
        .filter(|r| is_matched(r, matcher))
        .counts_by(|r| r.year)
        .into_iter()
        .map(|(year, count)| (year, count as u64))
        .collect();

    let total = per_year.values().sum();

    AggregationResult { per_year, total }
}

/// Returns the records whose affiliation text names the institution, in
/// their original order.
pub fn matched_records<'a>(
    records: &'a [PublicationRecord],
    matcher: &InstitutionMatcher,
) -> Vec<&'a PublicationRecord> {
    records
        .iter()
        .filter(|r| is_matched(r, matcher))
        .collect()
}

/// One row of the per-year category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearCategoryCount {
    pub year: Year,
    pub category: AffiliationCategory,
    pub count: u64,
}

/// One row of the category totals table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: AffiliationCategory,
    pub count: u64,
}

/// Year-wise and total record counts per affiliation category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    /// Counts per (year, category), years ascending with the unknown bucket
    /// last; within a year, descending count, ties by label.
    pub per_year: Vec<YearCategoryCount>,
    /// Counts per category over all years, descending count, ties by label.
    pub totals: Vec<CategoryCount>,
}

/// Counts every record (matched or not) per year and affiliation category.
///
/// Unlike [`aggregate`], unmatched records are visible here: a record with a
/// blank affiliation cell lands in the blank category, a record naming only
/// other institutions in the no-mention category. Matched records are keyed
/// by their matching affiliation segment, so distinct campus spellings show
/// up as distinct rows.
pub fn category_counts(
    records: &[PublicationRecord],
    matcher: &InstitutionMatcher,
) -> CategoryBreakdown {
    let mut per_year: Vec<YearCategoryCount> = records
        .iter()
        .counts_by(|r| (r.year, matcher.classify(r)))
        .into_iter()
        .map(|((year, category), count)| YearCategoryCount {
            year,
            category,
            count: count as u64,
        })
        .collect();
    per_year.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then(b.count.cmp(&a.count))
            .then_with(|| a.category.label().cmp(b.category.label()))
    });

    let mut totals: Vec<CategoryCount> = records
        .iter()
        .counts_by(|r| matcher.classify(r))
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            count: count as u64,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.label().cmp(b.category.label()))
    });

    CategoryBreakdown { per_year, totals }
}

/// One row of the department citation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentCitations {
    pub department: CompactString,
    pub total_cited_by: u64,
}

/// Sums citation counts per department, descending by total, ties by name.
///
/// Records without a department attribution are skipped.
pub fn department_citations(records: &[PublicationRecord]) -> Vec<DepartmentCitations> {
    let mut sums: BTreeMap<CompactString, u64> = BTreeMap::new();
    for record in records {
        let Some(dept) = record.department.as_deref().map(str::trim) else {
            continue;
        };
        if dept.is_empty() {
            continue;
        }
        *sums.entry(CompactString::new(dept)).or_default() += record.cited_by;
    }

    let mut rows: Vec<DepartmentCitations> = sums
        .into_iter()
        .map(|(department, total_cited_by)| DepartmentCitations {
            department,
            total_cited_by,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_cited_by
            .cmp(&a.total_cited_by)
            .then_with(|| a.department.cmp(&b.department))
    });
    rows
}

/// One row of the year × department citation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearDepartmentCitations {
    pub year: Year,
    pub department: CompactString,
    pub total_cited_by: u64,
}

/// Sums citation counts per (year, department), years ascending with the
/// unknown bucket last; within a year, descending total, ties by name.
///
/// Records without a department attribution are skipped.
pub fn year_department_citations(records: &[PublicationRecord]) -> Vec<YearDepartmentCitations> {
    let mut sums: BTreeMap<(Year, CompactString), u64> = BTreeMap::new();
    for record in records {
        let Some(dept) = record.department.as_deref().map(str::trim) else {
            continue;
        };
        if dept.is_empty() {
            continue;
        }
        *sums
            .entry((record.year, CompactString::new(dept)))
            .or_default() += record.cited_by;
    }

    let mut rows: Vec<YearDepartmentCitations> = sums
        .into_iter()
        .map(|((year, department), total_cited_by)| YearDepartmentCitations {
            year,
            department,
            total_cited_by,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then(b.total_cited_by.cmp(&a.total_cited_by))
            .then_with(|| a.department.cmp(&b.department))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nitk() -> InstitutionMatcher {
        InstitutionMatcher::new(["NITK", "National Institute of Technology Karnataka"]).unwrap()
    }

    fn record(year: Year, affiliation: Option<&str>) -> PublicationRecord {
        PublicationRecord {
            year,
            affiliations: affiliation.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_empty_input() {
        let result = aggregate(&[], &nitk());
        assert_eq!(result, AggregationResult::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_aggregate_counts_per_year_and_total() {
        let records = vec![
            record(Year::Known(2020), Some("NITK")),
            record(Year::Known(2020), Some("NITK")),
            record(Year::Known(2021), Some("NITK")),
            record(Year::Known(2021), Some("Other U")),
        ];

        let result = aggregate(&records, &nitk());
        assert_eq!(result.per_year.get(&Year::Known(2020)), Some(&2));
        assert_eq!(result.per_year.get(&Year::Known(2021)), Some(&1));
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_aggregate_total_invariant() {
        let records = vec![
            record(Year::Known(2019), Some("Dept, NITK Surathkal")),
            record(Year::Known(2019), Some("nitk surathkal")),
            record(Year::Unknown, Some("NITK")),
            record(Year::Known(2020), None),
            record(Year::Known(2020), Some("IIT Bombay")),
        ];

        let result = aggregate(&records, &nitk());
        let matched = matched_records(&records, &nitk()).len() as u64;
        assert_eq!(result.total, matched);
        assert_eq!(result.total, result.per_year.values().sum::<u64>());
    }

    #[test]
    fn test_aggregate_is_case_insensitive() {
        let records = vec![
            record(Year::Known(2020), Some("Dept, NITK Surathkal")),
            record(Year::Known(2020), Some("nitk surathkal")),
        ];

        let result = aggregate(&records, &nitk());
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_aggregate_no_substring_false_positives() {
        let records = vec![record(Year::Known(2020), Some("IIT Bombay"))];

        let result = aggregate(&records, &nitk());
        assert!(result.is_empty());
        assert!(result.per_year.is_empty());
    }

    #[test]
    fn test_aggregate_unknown_year_counted_and_sorted_last() {
        let records = vec![
            record(Year::Unknown, Some("NITK")),
            record(Year::Known(2021), Some("NITK")),
            record(Year::Known(2019), Some("NITK")),
        ];

        let result = aggregate(&records, &nitk());
        assert_eq!(result.total, 3);

        let years: Vec<Year> = result.per_year.keys().copied().collect();
        assert_eq!(
            years,
            vec![Year::Known(2019), Year::Known(2021), Year::Unknown]
        );
    }

    #[test]
    fn test_aggregate_unmatched_records_have_no_bucket() {
        let records = vec![
            record(Year::Known(2020), Some("IIT Bombay")),
            record(Year::Unknown, Some("IIT Bombay")),
            record(Year::Unknown, None),
        ];

        let result = aggregate(&records, &nitk());
        assert!(result.per_year.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_matched_records_preserves_order() {
        let records = vec![
            record(Year::Known(2020), Some("NITK A")),
            record(Year::Known(2019), Some("Other")),
            record(Year::Known(2021), Some("NITK B")),
        ];

        let matched = matched_records(&records, &nitk());
        let texts: Vec<&str> = matched
            .iter()
            .filter_map(|r| r.affiliations.as_deref())
            .collect();
        assert_eq!(texts, vec!["NITK A", "NITK B"]);
    }

    #[test]
    fn test_category_counts_three_way_split() {
        let records = vec![
            record(Year::Known(2020), Some("NITK Surathkal")),
            record(Year::Known(2020), Some("IIT Bombay")),
            record(Year::Known(2020), None),
        ];

        let breakdown = category_counts(&records, &nitk());
        assert_eq!(breakdown.per_year.len(), 3);
        assert_eq!(breakdown.totals.len(), 3);

        let total_count: u64 = breakdown.totals.iter().map(|c| c.count).sum();
        assert_eq!(total_count, records.len() as u64);
    }

    #[test]
    fn test_category_counts_ordering() {
        let records = vec![
            record(Year::Known(2021), Some("NITK Surathkal")),
            record(Year::Known(2020), Some("IIT Bombay")),
            record(Year::Known(2020), Some("IIT Bombay")),
            record(Year::Known(2020), Some("NITK Surathkal")),
            record(Year::Unknown, Some("NITK Surathkal")),
        ];

        let breakdown = category_counts(&records, &nitk());

        // Years ascending, unknown last; within 2020 the larger count first
        let keys: Vec<(Year, u64)> = breakdown
            .per_year
            .iter()
            .map(|row| (row.year, row.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Year::Known(2020), 2),
                (Year::Known(2020), 1),
                (Year::Known(2021), 1),
                (Year::Unknown, 1),
            ]
        );
        assert_eq!(
            breakdown.per_year[0].category,
            AffiliationCategory::NoMention
        );

        // Totals descending by count
        assert!(breakdown.totals[0].count >= breakdown.totals[1].count);
    }

    #[test]
    fn test_category_counts_distinct_matched_segments() {
        let records = vec![
            record(Year::Known(2020), Some("Dept of CS, NITK Surathkal")),
            record(Year::Known(2020), Some("Dept of EE, NITK Surathkal")),
        ];

        let breakdown = category_counts(&records, &nitk());
        assert_eq!(breakdown.per_year.len(), 2);
        assert!(breakdown.per_year.iter().all(|row| row.category.is_matched()));
    }

    fn cited(year: Year, department: Option<&str>, cited_by: u64) -> PublicationRecord {
        PublicationRecord {
            year,
            department: department.map(String::from),
            cited_by,
            ..Default::default()
        }
    }

    #[test]
    fn test_department_citations_sums_and_sorts() {
        let records = vec![
            cited(Year::Known(2020), Some("Physics"), 5),
            cited(Year::Known(2021), Some("Physics"), 7),
            cited(Year::Known(2020), Some("Chemistry"), 3),
            cited(Year::Known(2020), None, 100),
        ];

        let rows = department_citations(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].department, "Physics");
        assert_eq!(rows[0].total_cited_by, 12);
        assert_eq!(rows[1].department, "Chemistry");
        assert_eq!(rows[1].total_cited_by, 3);
    }

    #[test]
    fn test_department_citations_tie_breaks_by_name() {
        let records = vec![
            cited(Year::Known(2020), Some("Physics"), 4),
            cited(Year::Known(2020), Some("Chemistry"), 4),
        ];

        let rows = department_citations(&records);
        assert_eq!(rows[0].department, "Chemistry");
        assert_eq!(rows[1].department, "Physics");
    }

    #[test]
    fn test_year_department_citations_ordering() {
        let records = vec![
            cited(Year::Known(2021), Some("Physics"), 1),
            cited(Year::Known(2020), Some("Physics"), 2),
            cited(Year::Known(2020), Some("Chemistry"), 9),
            cited(Year::Unknown, Some("Physics"), 4),
        ];

        let rows = year_department_citations(&records);
        let keys: Vec<(Year, &str, u64)> = rows
            .iter()
            .map(|r| (r.year, r.department.as_str(), r.total_cited_by))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Year::Known(2020), "Chemistry", 9),
                (Year::Known(2020), "Physics", 2),
                (Year::Known(2021), "Physics", 1),
                (Year::Unknown, "Physics", 4),
            ]
        );
    }
}
