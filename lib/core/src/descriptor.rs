use serde::{Deserialize, Serialize};

/// A fixed-length numeric summary of an image, used for comparison.
///
/// Depending on the extractor that produced it, the elements are raw
/// pixel intensities, a probability-normalized histogram, or a
/// concatenation of independently normalized histogram blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Descriptor {
    data: Vec<f32>,
}

impl Descriptor {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// All-zero descriptor of the given length.
    #[inline]
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Normalize a count vector into a probability distribution.
    ///
    /// Every element is divided by the element sum so the result sums to
    /// 1.0. A vector with a non-positive sum (no contributing samples) is
    /// returned unchanged rather than producing NaN.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let sum: f32 = self.data.iter().sum();
        if sum <= 0.0 {
            return self;
        }
        for value in &mut self.data {
            *value /= sum;
        }
        self
    }

    /// Sum of all elements.
    #[inline]
    #[must_use]
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

impl From<Vec<f32>> for Descriptor {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl From<Descriptor> for Vec<f32> {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_sums_to_one() {
        let descriptor = Descriptor::new(vec![1.0, 3.0, 4.0]).normalized();
        let sum = descriptor.sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((descriptor.as_slice()[0] - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_zero_sum_unchanged() {
        let descriptor = Descriptor::zeros(8).normalized();
        assert_eq!(descriptor, Descriptor::zeros(8));
    }

    #[test]
    fn test_len_and_slice() {
        let descriptor = Descriptor::from_slice(&[0.5, 0.5]);
        assert_eq!(descriptor.len(), 2);
        assert!(!descriptor.is_empty());
        assert_eq!(descriptor.as_slice(), &[0.5, 0.5]);
    }
}
