//! Distance functions between coordinate vectors.
//!
//! The engine only ever asks a [`Distance`] for a scalar dissimilarity, so any
//! symmetric function that is zero on identical inputs can be plugged in. Closures
//! with the signature `Fn(&[f32], &[f32]) -> f32` implement the trait directly:
//!
//! ```rust
//! use dbscan::Dbscan;
//!
//! let manhattan = |a: &[f32], b: &[f32]| -> f32 {
//!     a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
//! };
//! let model = Dbscan::new(1.0, 2).with_distance(manhattan);
//! let data: Vec<Vec<f32>> = vec![vec![0.0, 0.0], vec![0.5, 0.5]];
//! let fit = model.fit(&data).unwrap();
//! assert_eq!(fit.n_clusters(), 1);
//! ```

use crate::error::{Error, Result};

/// A dissimilarity between two equal-length coordinate vectors.
pub trait Distance {
    /// Distance between `a` and `b`.
    ///
    /// Callers guarantee `a.len() == b.len()`; use [`checked_distance`] at API edges.
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;

    /// Whether `|a[i] - b[i]| <= distance(a, b)` holds on every axis.
    ///
    /// Grid indexing relies on this to prune cells; metrics that cannot promise it
    /// are always searched by brute force.
    fn bounds_coordinates(&self) -> bool {
        false
    }
}

/// Euclidean (L2) distance. The default metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Distance for Euclidean {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        squared_euclidean(a, b).sqrt()
    }

    fn bounds_coordinates(&self) -> bool {
        true
    }
}

impl<F> Distance for F
where
    F: Fn(&[f32], &[f32]) -> f32,
{
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self(a, b)
    }
}

/// Distance that rejects vectors of unequal length.
pub fn checked_distance<D: Distance + ?Sized>(metric: &D, a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(metric.distance(a, b))
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_three_four_five() {
        let d = Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn euclidean_is_symmetric_and_zero_on_identity() {
        let a = [1.5, -2.0, 7.25];
        let b = [0.0, 3.0, -1.0];
        assert_eq!(Euclidean.distance(&a, &b), Euclidean.distance(&b, &a));
        assert_eq!(Euclidean.distance(&a, &a), 0.0);
    }

    #[test]
    fn euclidean_any_dimension() {
        let a = vec![1.0; 10];
        let b = vec![0.0; 10];
        assert!((Euclidean.distance(&a, &b) - 10f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn checked_distance_rejects_mismatch() {
        let err = checked_distance(&Euclidean, &[0.0, 0.0], &[0.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn closure_is_a_distance() {
        let chebyshev = |a: &[f32], b: &[f32]| -> f32 {
            a.iter()
                .zip(b)
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f32::max)
        };
        assert_eq!(checked_distance(&chebyshev, &[0.0, 0.0], &[1.0, 3.0]).unwrap(), 3.0);
        assert!(!chebyshev.bounds_coordinates());
    }
}
