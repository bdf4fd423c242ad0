//! Vector similarity.

/// Cosine similarity between two embedding vectors, in `[-1, 1]`.
///
/// Vectors of different length, empty vectors and zero-magnitude vectors
/// score `0.0`. A non-finite result (NaN/inf components) also scores `0.0`,
/// which keeps ranking total.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    #[allow(clippy::cast_possible_truncation)]
    let score = (dot / denominator).clamp(-1.0, 1.0) as f32;
    if score.is_finite() { score } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_identical_vectors() {
        let v = [0.3, -1.2, 4.0, 0.01];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, 0.5, 7.0];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < EPS);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_mismatched_lengths_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_zero_and_empty_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_nan_component_scores_zero() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_magnitude_independent() {
        let a = [0.9, 0.1];
        let scaled = [9.0, 1.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0]) - cosine_similarity(&scaled, &[1.0, 0.0])).abs() < EPS);
    }
}
