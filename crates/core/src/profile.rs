//! Taste-vector construction from rating history.
//!
//! A rating contributes to the profile when `status = watched` and
//! `rating >= PROFILE_RATING_FLOOR`. Contribution weights favor strong
//! likes; a neutral 3 still nudges the profile but only slightly.

use crate::vector::{l2_normalize, weighted_centroid};

/// Minimum rating for a watched title to contribute to the profile.
pub const PROFILE_RATING_FLOOR: i16 = 3;

/// Default weight applied to neutral (rating = 3) contributors.
pub const DEFAULT_NEUTRAL_RATING_WEIGHT: f64 = 0.2;

/// Contribution weight of a rating toward the taste vector.
///
/// | rating | weight                  |
/// |--------|-------------------------|
/// | 5      | 1.0                     |
/// | 4      | 0.8                     |
/// | 3      | `neutral_weight`        |
/// | <= 2   | 0.0 (not a contributor) |
/// | null   | 0.0                     |
pub fn profile_weight(rating: Option<i16>, neutral_weight: f64) -> f64 {
    match rating {
        Some(r) if r > PROFILE_RATING_FLOOR => (f64::from(r) / 5.0).min(1.0),
        Some(r) if r == PROFILE_RATING_FLOOR => neutral_weight,
        _ => 0.0,
    }
}

/// Weight of a rating toward the dislike centroid: a 1 counts fully, a 2
/// counts half, everything else not at all.
pub fn dislike_weight(rating: Option<i16>) -> f64 {
    match rating {
        Some(r) if r <= 1 => 1.0,
        Some(2) => 0.5,
        _ => 0.0,
    }
}

/// A freshly built taste vector and the number of ratings behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltProfile {
    /// Unit-norm weighted centroid of contributor embeddings.
    pub embedding: Vec<f32>,
    /// Count of contributors whose embedding participated.
    pub num_ratings: i32,
}

/// Build a taste vector from `(embedding, rating)` contributor rows.
///
/// Rows are expected to already satisfy the watched + rating-floor filter;
/// rows whose weight resolves to zero or whose embedding dimension is off
/// are dropped here as a second line of defense. Returns `None` when no
/// contributors remain, in which case the caller deletes the profile row.
pub fn build_profile(
    rows: &[(Vec<f32>, Option<i16>)],
    neutral_weight: f64,
) -> Option<BuiltProfile> {
    let dim = rows.first().map(|(e, _)| e.len())?;

    let weighted: Vec<(Vec<f32>, f64)> = rows
        .iter()
        .filter(|(e, _)| e.len() == dim && !e.is_empty())
        .map(|(e, rating)| (e.clone(), profile_weight(*rating, neutral_weight)))
        .filter(|(_, w)| *w > 0.0)
        .collect();

    let mut embedding = weighted_centroid(&weighted)?;
    l2_normalize(&mut embedding);

    Some(BuiltProfile {
        embedding,
        num_ratings: weighted.len() as i32,
    })
}

/// Build the dislike centroid (unit-norm) from `(embedding, rating)` rows
/// of low-rated titles. `None` when nothing usable remains.
pub fn build_dislike_centroid(rows: &[(Vec<f32>, Option<i16>)]) -> Option<Vec<f32>> {
    let weighted: Vec<(Vec<f32>, f64)> = rows
        .iter()
        .map(|(e, rating)| (e.clone(), dislike_weight(*rating)))
        .collect();

    let mut centroid = weighted_centroid(&weighted)?;
    l2_normalize(&mut centroid);
    Some(centroid)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
