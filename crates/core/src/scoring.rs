//! Scoring-context aggregation.
//!
//! Derives a user's like and dislike feature bundles from their most
//! recent rated titles. The aggregate is a plain frequency summary; the
//! taste vector handles the fine-grained signal, this handles the
//! explainable content heuristics the reranker blends in.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::features::{extract_year, normalize_language, parse_token_set};
use crate::rerank::ScoringContext;
use crate::style_keywords::style_subset;

/// Rating threshold at or above which a recent title counts as a like.
pub const LIKE_RATING_MIN: i16 = 4;

/// Rating threshold at or below which a recent title counts as a dislike.
pub const DISLIKE_RATING_MAX: i16 = 2;

/// Default number of recent ratings considered for context building.
pub const DEFAULT_SCORING_CONTEXT_LIMIT: i64 = 50;

/// Default cap on genres kept per context, by descending frequency.
pub const DEFAULT_MAX_SCORING_GENRES: usize = 8;

/// Default cap on keywords kept per context, by descending frequency.
pub const DEFAULT_MAX_SCORING_KEYWORDS: usize = 12;

/// One recently rated title, as loaded from the store.
#[derive(Debug, Clone)]
pub struct ScoringRow {
    pub movie_id: i64,
    pub genres: Option<String>,
    pub keywords: Option<String>,
    pub runtime: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub original_language: Option<String>,
    pub rating: Option<i16>,
}

/// Split recent rated rows into the like and dislike windows.
///
/// Rows rated 3 (or unrated) influence neither side.
pub fn split_likes_dislikes(rows: &[ScoringRow]) -> (Vec<&ScoringRow>, Vec<&ScoringRow>) {
    let mut likes = Vec::new();
    let mut dislikes = Vec::new();
    for row in rows {
        match row.rating {
            Some(r) if r >= LIKE_RATING_MIN => likes.push(row),
            Some(r) if r <= DISLIKE_RATING_MAX => dislikes.push(row),
            _ => {}
        }
    }
    (likes, dislikes)
}

/// Aggregate a window of rated titles into a [`ScoringContext`].
///
/// - Genres and keywords are counted across the window; the top
///   `max_genres` / `max_keywords` by frequency survive (ties broken
///   alphabetically so the result is deterministic).
/// - Runtime and release year are plain means over rows that carry them.
/// - Language is the mode, ties broken alphabetically.
///
/// Returns `None` for an empty window.
pub fn aggregate_context(
    rows: &[&ScoringRow],
    max_genres: usize,
    max_keywords: usize,
) -> Option<ScoringContext> {
    if rows.is_empty() {
        return None;
    }

    let mut genre_counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut keyword_counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut language_counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut runtime_sum = 0.0f64;
    let mut runtime_n = 0u32;
    let mut year_sum = 0.0f64;
    let mut year_n = 0u32;

    for row in rows {
        for genre in parse_token_set(row.genres.as_deref()) {
            *genre_counts.entry(genre).or_insert(0) += 1;
        }
        for keyword in parse_token_set(row.keywords.as_deref()) {
            *keyword_counts.entry(keyword).or_insert(0) += 1;
        }
        if let Some(runtime) = row.runtime {
            runtime_sum += f64::from(runtime);
            runtime_n += 1;
        }
        if let Some(year) = extract_year(row.release_date) {
            year_sum += f64::from(year);
            year_n += 1;
        }
        if let Some(lang) = normalize_language(row.original_language.as_deref()) {
            *language_counts.entry(lang).or_insert(0) += 1;
        }
    }

    let genres = top_by_frequency(&genre_counts, max_genres);
    let keywords = top_by_frequency(&keyword_counts, max_keywords);
    let style = style_subset(&keywords);

    Some(ScoringContext {
        genres,
        style,
        runtime: (runtime_n > 0).then(|| (runtime_sum / f64::from(runtime_n)).round() as i32),
        year: (year_n > 0).then(|| (year_sum / f64::from(year_n)).round() as i32),
        language: language_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(lang, _)| lang.clone()),
    })
}

/// Keep the `limit` most frequent tokens; ties resolve alphabetically
/// because `BTreeMap` iteration is ordered and the sort is stable.
fn top_by_frequency(
    counts: &BTreeMap<String, u32>,
    limit: usize,
) -> std::collections::BTreeSet<String> {
    let mut entries: Vec<(&String, &u32)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .into_iter()
        .take(limit)
        .map(|(token, _)| token.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
