//! Feature extraction from raw movie metadata.
//!
//! `genres` and `keywords` are stored as comma-separated text; after
//! parsing they are case-insensitive sets. `BTreeSet` keeps iteration
//! order stable so everything downstream is deterministic.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

/// Split a comma-separated token list into a normalized set.
///
/// - Tokens are trimmed and lowercased.
/// - Empty tokens are dropped.
/// - `None` or an all-whitespace value yields an empty set.
pub fn parse_token_set(value: Option<&str>) -> BTreeSet<String> {
    match value {
        Some(raw) => raw
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
        None => BTreeSet::new(),
    }
}

/// Extract the release year from an optional date.
pub fn extract_year(release_date: Option<NaiveDate>) -> Option<i32> {
    release_date.map(|d| d.year())
}

/// Normalize an ISO language code for comparison (lowercased, trimmed).
pub fn normalize_language(language: Option<&str>) -> Option<String> {
    language
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
}

/// Escape `%`, `_`, and `\` in user input destined for a LIKE/ILIKE
/// pattern, so titles containing wildcard characters match literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
