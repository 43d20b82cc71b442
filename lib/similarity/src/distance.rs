//! Distance and similarity functions over equal-length descriptors.
//!
//! All functions are pure and symmetric. A length mismatch between the two
//! inputs is a contract violation and fails immediately; it is never
//! coerced by truncation.

use cbir_core::{Error, Result};

fn ensure_same_length(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Sum of squared differences. Non-negative and unbounded.
pub fn ssd_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    ensure_same_length(a, b)?;
    let sum = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    Ok(sum)
}

/// Histogram intersection similarity: the sum of per-bin minimums.
///
/// Lies in [0, 1] when both inputs are normalized histograms.
pub fn histogram_intersection_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    ensure_same_length(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x.min(*y)).sum())
}

/// Histogram intersection distance: `1 - similarity`.
pub fn histogram_intersection_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    Ok(1.0 - histogram_intersection_similarity(a, b)?)
}

/// Weighted intersection distance over concatenated histogram blocks.
///
/// Block `i` spans indices `[i * bins_per_block, (i + 1) * bins_per_block)`.
/// Each block's intersection distance is weighted and the weighted sum is
/// divided by the weight sum. A flat intersection over the concatenation
/// would let a deficit in one block be masked by a surplus in another;
/// scoring per block keeps region boundaries meaningful.
///
/// Fails when the inputs differ in length, when the inputs do not cover
/// exactly `bins_per_block * block_count` elements, when `weights` does not
/// have one entry per block, or when the weight sum is not positive.
pub fn weighted_multi_block_distance(
    a: &[f32],
    b: &[f32],
    bins_per_block: usize,
    block_count: usize,
    weights: &[f32],
) -> Result<f32> {
    ensure_same_length(a, b)?;
    if a.len() != bins_per_block * block_count {
        return Err(Error::LengthMismatch {
            expected: bins_per_block * block_count,
            actual: a.len(),
        });
    }
    if weights.len() != block_count {
        return Err(Error::InvalidWeights(format!(
            "expected {} weights, got {}",
            block_count,
            weights.len()
        )));
    }
    let weight_sum: f32 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return Err(Error::InvalidWeights(
            "weights must sum to a positive value".to_string(),
        ));
    }

    let mut total = 0.0;
    for block in 0..block_count {
        let offset = block * bins_per_block;
        let block_a = &a[offset..offset + bins_per_block];
        let block_b = &b[offset..offset + bins_per_block];
        total += histogram_intersection_distance(block_a, block_b)? * weights[block];
    }
    Ok(total / weight_sum)
}

/// Cosine distance: `1 - (a . b) / (|a| * |b|)`.
///
/// Lies in [0, 2] for non-zero inputs. When either vector has zero norm the
/// ratio is undefined, and the maximum-dissimilarity sentinel 1.0 is
/// returned instead of dividing by zero.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    ensure_same_length(a, b)?;
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return Ok(1.0);
    }
    Ok(1.0 - dot / (norm_a.sqrt() * norm_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssd_distance() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 0.0, 6.0];
        assert!((ssd_distance(&a, &b).unwrap() - 13.0).abs() < 1e-6);
        assert_eq!(ssd_distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_ssd_length_mismatch_fails() {
        assert!(ssd_distance(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_intersection_self_distance_is_zero() {
        let a = [0.25, 0.25, 0.5];
        let distance = histogram_intersection_distance(&a, &a).unwrap();
        assert!(distance.abs() < 1e-6);
    }

    #[test]
    fn test_intersection_disjoint_histograms() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert!((histogram_intersection_similarity(&a, &b).unwrap()).abs() < 1e-6);
        assert!((histogram_intersection_distance(&a, &b).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_intersection_length_mismatch_fails() {
        assert!(histogram_intersection_distance(&[0.5], &[0.5, 0.5]).is_err());
    }

    #[test]
    fn test_weighted_multi_block_distance() {
        // Block 0 identical, block 1 fully disjoint.
        let a = [0.5, 0.5, 1.0, 0.0];
        let b = [0.5, 0.5, 0.0, 1.0];
        let distance = weighted_multi_block_distance(&a, &b, 2, 2, &[1.0, 1.0]).unwrap();
        assert!((distance - 0.5).abs() < 1e-6);

        // Weighting the disjoint block more heavily raises the distance.
        let skewed = weighted_multi_block_distance(&a, &b, 2, 2, &[1.0, 3.0]).unwrap();
        assert!((skewed - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_multi_block_rejects_bad_weights() {
        let a = [0.5, 0.5, 1.0, 0.0];
        let b = [0.5, 0.5, 0.0, 1.0];
        assert!(weighted_multi_block_distance(&a, &b, 2, 2, &[1.0]).is_err());
        assert!(weighted_multi_block_distance(&a, &b, 2, 2, &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_weighted_multi_block_rejects_block_layout_mismatch() {
        let a = [0.5, 0.5, 1.0, 0.0];
        let b = [0.5, 0.5, 0.0, 1.0];
        assert!(weighted_multi_block_distance(&a, &b, 3, 2, &[1.0, 1.0]).is_err());
        assert!(weighted_multi_block_distance(&a, &[0.5, 0.5], 2, 2, &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_cosine_distance_parallel_and_opposite() {
        let a = [1.0, 0.0];
        assert!(cosine_distance(&a, &[2.0, 0.0]).unwrap().abs() < 1e-6);
        assert!((cosine_distance(&a, &[-1.0, 0.0]).unwrap() - 2.0).abs() < 1e-6);
        assert!((cosine_distance(&a, &[0.0, 1.0]).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_distance_symmetry() {
        let a = [0.2, 0.8, 0.1];
        let b = [0.9, 0.3, 0.4];
        let ab = cosine_distance(&a, &b).unwrap();
        let ba = cosine_distance(&b, &a).unwrap();
        assert_eq!(ab, ba);
        assert!((0.0..=2.0).contains(&ab));
    }

    #[test]
    fn test_cosine_distance_zero_vector_sentinel() {
        let zero = [0.0, 0.0, 0.0];
        let a = [1.0, 2.0, 3.0];
        assert_eq!(cosine_distance(&zero, &a).unwrap(), 1.0);
        assert_eq!(cosine_distance(&a, &zero).unwrap(), 1.0);
        assert_eq!(cosine_distance(&zero, &zero).unwrap(), 1.0);
    }

    #[test]
    fn test_cosine_length_mismatch_fails() {
        assert!(cosine_distance(&[1.0], &[1.0, 2.0]).is_err());
    }
}
