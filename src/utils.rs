use crate::Year;
use regex::Regex;
use std::sync::LazyLock;

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

static DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Salvages a publication year from a free-form field value.
///
/// Export files frequently decorate the year column ("c2020", "2020 (print)",
/// "2020/21"); the first four-digit sequence wins. Anything without one is
/// coerced to [`Year::Unknown`].
///
/// # Arguments
///
/// * `year_str` - The raw year column value
pub fn parse_year_field(year_str: &str) -> Year {
    let year_str = year_str.trim();

    if year_str.is_empty() {
        return Year::Unknown;
    }

    match YEAR_REGEX.find(year_str) {
        Some(m) => match m.as_str().parse::<i32>() {
            Ok(year) => Year::Known(year),
            Err(_) => Year::Unknown,
        },
        None => Year::Unknown,
    }
}

/// Salvages a citation count from a free-form field value.
///
/// The first digit sequence is taken ("12 citations" is 12); a value with no
/// digits, or one too large for u64, counts as zero.
///
/// # Arguments
///
/// * `cited_str` - The raw cited-by column value
pub fn parse_cited_by(cited_str: &str) -> u64 {
    DIGITS_REGEX
        .find(cited_str)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Normalizes affiliation text for matching: trimmed and lowercased.
pub fn normalize_affiliation(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Splits a multi-affiliation string into its individual segments.
///
/// Bibliographic exports separate affiliations with semicolons. Empty
/// segments (from trailing or doubled separators) are dropped.
pub fn split_affiliations(text: &str) -> impl Iterator<Item = &str> {
    text.split(';').map(str::trim).filter(|s| !s.is_empty())
}
