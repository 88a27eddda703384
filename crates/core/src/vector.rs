//! Embedding vector math and the pgvector text codec.
//!
//! We use runtime sqlx queries (no compile-time macros), so vector values
//! cross the database boundary as text literals (`[0.1,0.2,...]`) cast
//! with `::vector` on write and read back via `embedding::text`.

/// Compute cosine similarity between two vectors.
///
/// Returns a value in `[-1.0, 1.0]`. Returns `0.0` if the vectors have
/// different lengths, are empty, or either has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();

    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Cosine distance as pgvector's `<=>` operator computes it.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

/// L2 norm of a vector.
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// L2-normalize a vector in place. A zero vector is left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x = (*x as f64 / norm) as f32;
        }
    }
}

/// Weighted centroid of `(embedding, weight)` pairs.
///
/// Entries with non-positive weight or a dimension mismatch against the
/// first usable embedding are skipped. Returns `None` when nothing
/// contributes. The result is NOT normalized; callers decide.
pub fn weighted_centroid(rows: &[(Vec<f32>, f64)]) -> Option<Vec<f32>> {
    let dim = rows
        .iter()
        .find(|(e, w)| !e.is_empty() && *w > 0.0)
        .map(|(e, _)| e.len())?;

    let mut totals = vec![0.0f64; dim];
    let mut total_weight = 0.0f64;

    for (embedding, weight) in rows {
        if *weight <= 0.0 || embedding.len() != dim {
            continue;
        }
        total_weight += weight;
        for (acc, value) in totals.iter_mut().zip(embedding) {
            *acc += *value as f64 * weight;
        }
    }

    if total_weight <= 0.0 {
        return None;
    }
    Some(totals.iter().map(|v| (v / total_weight) as f32).collect())
}

// ---------------------------------------------------------------------------
// pgvector text codec
// ---------------------------------------------------------------------------

/// Render a vector as a pgvector text literal, e.g. `[0.1,0.2,0.3]`.
pub fn to_vector_literal(v: &[f32]) -> String {
    let mut out = String::with_capacity(v.len() * 10 + 2);
    out.push('[');
    for (i, x) in v.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&x.to_string());
    }
    out.push(']');
    out
}

/// Parse a pgvector text value (`[0.1,0.2,...]`) back into a vector.
pub fn parse_vector_text(text: &str) -> Option<Vec<f32>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    inner
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Cosine similarity ---------------------------------------------------

    #[test]
    fn cosine_identical_vectors_returns_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_orthogonal_vectors_returns_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn cosine_distance_of_opposite_vectors_is_two() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_distance(&a, &b) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_mismatched_or_zero_inputs_return_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    // -- Normalization -------------------------------------------------------

    #[test]
    fn normalize_produces_unit_norm() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_zero_vector_alone() {
        let mut v = vec![0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0]);
    }

    // -- Weighted centroid ---------------------------------------------------

    #[test]
    fn centroid_weights_contributions() {
        let rows = vec![
            (vec![1.0, 0.0], 1.0),
            (vec![0.0, 1.0], 1.0),
        ];
        let c = weighted_centroid(&rows).unwrap();
        assert!((c[0] - 0.5).abs() < 1e-6);
        assert!((c[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn centroid_skips_zero_weight_and_mismatched_rows() {
        let rows = vec![
            (vec![1.0, 0.0], 1.0),
            (vec![9.0, 9.0], 0.0),
            (vec![9.0, 9.0, 9.0], 1.0),
        ];
        let c = weighted_centroid(&rows).unwrap();
        assert_eq!(c, vec![1.0, 0.0]);
    }

    #[test]
    fn centroid_of_nothing_is_none() {
        assert_eq!(weighted_centroid(&[]), None);
        assert_eq!(weighted_centroid(&[(vec![1.0], 0.0)]), None);
    }

    // -- Text codec ----------------------------------------------------------

    #[test]
    fn vector_literal_round_trip() {
        let v = vec![0.5, -1.25, 3.0];
        let text = to_vector_literal(&v);
        assert_eq!(text, "[0.5,-1.25,3]");
        assert_eq!(parse_vector_text(&text), Some(v));
    }

    #[test]
    fn parse_accepts_pgvector_output_spacing() {
        assert_eq!(
            parse_vector_text("[1, 2, 3]"),
            Some(vec![1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert_eq!(parse_vector_text("1,2,3"), None);
        assert_eq!(parse_vector_text("[1,two,3]"), None);
    }
}
