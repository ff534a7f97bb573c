//! Distance metrics for feature similarity

use crate::error::{Result, RecommenderError};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance metrics a fitted neighbor index can be built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean (L2) distance
    Euclidean,
    /// Manhattan (L1) distance
    Manhattan,
    /// Cosine similarity (converted to distance: 1 - similarity)
    Cosine,
}

impl DistanceMetric {
    /// Compute the distance between two vectors using this metric
    pub fn distance(&self, v1: &Vector, v2: &Vector) -> Result<f32> {
        self.distance_slices(v1.as_slice(), v2.as_slice())
    }

    /// Compute the distance between two raw rows using this metric
    pub fn distance_slices(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(RecommenderError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }

        match self {
            DistanceMetric::Euclidean => Ok(euclidean_distance(a, b)),
            DistanceMetric::Manhattan => Ok(manhattan_distance(a, b)),
            DistanceMetric::Cosine => cosine_distance(a, b),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Cosine => "cosine",
        };
        f.write_str(name)
    }
}

/// Compute Euclidean (L2) distance between two rows
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

/// Compute Manhattan (L1) distance between two rows
pub fn manhattan_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Compute cosine distance between two rows (1 - cosine similarity)
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    let norm1 = dot_product(a, a).sqrt();
    let norm2 = dot_product(b, b).sqrt();

    if norm1 == 0.0 || norm2 == 0.0 {
        return Err(RecommenderError::InvalidVector {
            reason: "Cannot compute cosine distance with zero vector".to_string(),
        });
    }

    let similarity = dot_product(a, b) / (norm1 * norm2);

    // Clamp to [-1, 1] to handle floating point errors
    let similarity = similarity.clamp(-1.0, 1.0);

    Ok(1.0 - similarity)
}

/// Compute dot product of two rows
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean_distance() {
        let dist = euclidean_distance(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        assert_relative_eq!(dist, 5.196152, epsilon = 1e-5);
    }

    #[test]
    fn test_euclidean_same_vector() {
        let v = [1.0, 2.0, 3.0];
        assert_relative_eq!(euclidean_distance(&v, &v), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_manhattan_distance() {
        let dist = manhattan_distance(&[1.0, 2.0, 3.0], &[4.0, 0.0, 3.5]);
        assert_relative_eq!(dist, 5.5, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_distance() {
        let dist = cosine_distance(&[1.0, 0.0, 0.0], &[2.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(dist, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let dist = cosine_distance(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_relative_eq!(dist, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let dist = cosine_distance(&[1.0, 0.0, 0.0], &[-1.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(dist, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert!(matches!(
            cosine_distance(&[0.0, 0.0], &[1.0, 0.0]),
            Err(RecommenderError::InvalidVector { .. })
        ));
    }

    #[test]
    fn test_distance_metric_euclidean() {
        let v1 = Vector::new(vec![1.0, 2.0, 3.0]);
        let v2 = Vector::new(vec![4.0, 5.0, 6.0]);
        let dist = DistanceMetric::Euclidean.distance(&v1, &v2).unwrap();
        assert_relative_eq!(dist, 5.196152, epsilon = 1e-5);
    }

    #[test]
    fn test_dimension_mismatch() {
        let v1 = Vector::new(vec![1.0, 2.0]);
        let v2 = Vector::new(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            DistanceMetric::Euclidean.distance(&v1, &v2),
            Err(RecommenderError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(DistanceMetric::Cosine.to_string(), "cosine");
    }
}
