//! Institution matching over free-text affiliation strings.
//!
//! The target institution is described as an explicit set of name variants
//! ("NITK", "National Institute of Technology Karnataka", …). Matching is a
//! case-insensitive substring test, so the rule set is auditable: every
//! string that can cause a match is visible in the matcher's configuration,
//! not buried in code.
//!
//! # Example
//!
//! ```
//! use affilstat::InstitutionMatcher;
//!
//! let matcher =
//!     InstitutionMatcher::new(["NITK", "National Institute of Technology Karnataka"]).unwrap();
//!
//! assert!(matcher.matches("Dept of Chemistry, NITK Surathkal, India"));
//! assert!(!matcher.matches("IIT Bombay, India"));
//! ```

use crate::error::MatcherError;
use crate::{PublicationRecord, utils};
use compact_str::CompactString;
use serde::Serialize;

/// Classification of one record's affiliation text against a target
/// institution.
///
/// Mirrors the three-way breakdown a research office works with: records
/// naming the institution, records naming only other institutions, and
/// records whose affiliation cell was blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AffiliationCategory {
    /// The affiliation text names the institution; carries the first
    /// semicolon-delimited affiliation segment containing a variant.
    Matched(String),
    /// Affiliation text present but no variant occurs in it.
    NoMention,
    /// No affiliation text on the record.
    Blank,
}

impl AffiliationCategory {
    /// Human-readable label for report tables.
    pub fn label(&self) -> &str {
        match self {
            AffiliationCategory::Matched(segment) => segment,
            AffiliationCategory::NoMention => "No institution mention",
            AffiliationCategory::Blank => "Blank affiliation",
        }
    }

    /// Whether this category represents a matched record.
    pub fn is_matched(&self) -> bool {
        matches!(self, AffiliationCategory::Matched(_))
    }
}

impl std::fmt::Display for AffiliationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive substring matcher for a target institution's name
/// variants.
///
/// Variants are normalized (trimmed, lowercased) once at construction;
/// matching a record is then a pure function of its affiliation text.
#[derive(Debug, Clone)]
pub struct InstitutionMatcher {
    /// Normalized, lowercased name variants.
    variants: Vec<CompactString>,
}

impl InstitutionMatcher {
    /// Creates a matcher from a set of institution name variants.
    ///
    /// Variants are trimmed and lowercased; empty and duplicate variants are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::NoVariants`] when no non-empty variant remains,
    /// since a matcher with nothing to match would silently classify every
    /// record as unmatched.
    pub fn new<I, S>(variants: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<CompactString> = variants
            .into_iter()
            .map(|v| CompactString::new(utils::normalize_affiliation(v.as_ref())))
            .filter(|v| !v.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();

        if normalized.is_empty() {
            return Err(MatcherError::NoVariants);
        }

        Ok(Self {
            variants: normalized,
        })
    }

    /// The normalized variants this matcher tests against.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.as_str())
    }

    /// Tests whether affiliation text names the institution.
    ///
    /// Case-insensitive substring test against every variant. Pure: the
    /// outcome depends only on this text and the variant set.
    pub fn matches(&self, affiliation_text: &str) -> bool {
        let normalized = utils::normalize_affiliation(affiliation_text);
        self.variants.iter().any(|v| normalized.contains(v.as_str()))
    }

    /// Returns the first semicolon-delimited affiliation segment containing a
    /// variant, trimmed, or `None` when no segment matches.
    ///
    /// Multi-affiliation records list one affiliation per author separated by
    /// semicolons; the matching segment is the institution-specific one worth
    /// showing in a report.
    pub fn matched_segment<'a>(&self, affiliation_text: &'a str) -> Option<&'a str> {
        utils::split_affiliations(affiliation_text).find(|segment| self.matches(segment))
    }

    /// Classifies a record's affiliation text.
    ///
    /// A record with no (or whitespace-only) affiliation text is `Blank`; a
    /// record whose text contains a variant is `Matched` with the matching
    /// segment; anything else is `NoMention`.
    pub fn classify(&self, record: &PublicationRecord) -> AffiliationCategory {
        let text = match record.affiliations.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return AffiliationCategory::Blank,
        };

        match self.matched_segment(text) {
            Some(segment) => AffiliationCategory::Matched(segment.to_string()),
            None => AffiliationCategory::NoMention,
        }
    }
}
