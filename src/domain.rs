//! Evaluation domains and radix-2 transforms
//!
//! A [`Domain`] is the order-`n` multiplicative subgroup
//! `H = {1, g, …, g^{n−1}}` for a power-of-two `n`. Construction validates
//! that `g` is primitive (`g^n = 1` and `g^{n/p} ≠ 1` for every prime
//! `p | n`), so every downstream transform can assume a well-formed domain.
//!
//! The radix-2 NTT/INTT pair converts between coefficient and evaluation
//! bases in `O(n log n)`; both operate on natural-order vectors. The INTT is
//! the interpolation fast path: over `H` it returns exactly the Lagrange
//! coefficients.

#![forbid(unsafe_code)]

use ark_ff::{Field, One, Zero};

use crate::field::{self, pow_u64, FieldError};
use crate::F;

/// Errors produced by domain checks / transforms.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomainError {
    /// Domain size is zero or not a power of two.
    #[error("domain size must be a positive power of two (got {0})")]
    BadSize(usize),
    /// Supplied generator does not generate the order-`n` subgroup.
    #[error("generator is not a primitive root of unity of order {0}")]
    NotPrimitive(usize),
    /// Input vector length does not match the domain size.
    #[error("vector length {got} does not match domain size {n}")]
    LengthMismatch {
        /// Supplied vector length.
        got: usize,
        /// Domain size.
        n: usize,
    },
    /// Arithmetic failure bubbled up from the field layer.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// The multiplicative subgroup `{g⁰, …, g^{n−1}}`, `n` a power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain {
    /// Domain size `n`.
    pub n: usize,
    /// Generator `g` of the subgroup.
    pub generator: F,
}

impl Domain {
    /// Construct a validated domain from an explicit generator.
    pub fn new(n: usize, generator: F) -> Result<Self, DomainError> {
        if n == 0 || !n.is_power_of_two() {
            return Err(DomainError::BadSize(n));
        }
        if !field::is_primitive_root_of_unity(generator, n) {
            return Err(DomainError::NotPrimitive(n));
        }
        Ok(Self { n, generator })
    }

    /// Construct the canonical order-`n` domain from the field's two-adic
    /// root of unity.
    pub fn of_size(n: usize) -> Result<Self, DomainError> {
        if n == 0 || !n.is_power_of_two() {
            return Err(DomainError::BadSize(n));
        }
        let g = field::primitive_root_of_unity(n)?;
        Ok(Self { n, generator: g })
    }

    /// The domain elements `[g⁰, g¹, …, g^{n−1}]` in ascending exponent order.
    pub fn elements(&self) -> Vec<F> {
        let mut out = Vec::with_capacity(self.n);
        let mut cur = F::one();
        for _ in 0..self.n {
            out.push(cur);
            cur *= self.generator;
        }
        out
    }

    /// `g^i` for an arbitrary index (reduced mod `n`).
    #[inline]
    pub fn element(&self, i: usize) -> F {
        pow_u64(self.generator, (i % self.n) as u64)
    }

    /// The half-size domain `{x² : x ∈ H}`, generated by `g²`.
    ///
    /// For a multiplicative subgroup this is exactly the even-exponent
    /// subset of `H`.
    pub fn halve(&self) -> Result<Self, DomainError> {
        if self.n < 2 {
            return Err(DomainError::BadSize(self.n));
        }
        Ok(Self { n: self.n / 2, generator: self.generator.square() })
    }
}

// ------------------------- NTT / INTT -------------------------

fn ntt_in_place(a: &mut [F], root: F) {
    let n = a.len();
    debug_assert!(n.is_power_of_two());

    // bit-reversal
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            a.swap(i, j);
        }
    }

    // Cooley–Tukey
    let mut len = 2;
    while len <= n {
        let w_len = pow_u64(root, (n / len) as u64);
        for start in (0..n).step_by(len) {
            let mut w = F::one();
            let half = len / 2;
            for i in 0..half {
                let u = a[start + i];
                let v = a[start + i + half] * w;
                a[start + i] = u + v;
                a[start + i + half] = u - v;
                w *= w_len;
            }
        }
        len <<= 1;
    }
}

fn intt_in_place(a: &mut [F], root: F) -> Result<(), DomainError> {
    let n = a.len();
    debug_assert!(n.is_power_of_two());
    let inv_root = field::inv(root)?;
    ntt_in_place(a, inv_root);
    let inv_n = field::inv(F::from(n as u64))?;
    for x in a.iter_mut() {
        *x *= inv_n;
    }
    Ok(())
}

/// Evaluate a coefficient vector on the whole domain (natural order).
///
/// Coefficients shorter than `n` are zero-padded; longer vectors are a
/// [`DomainError::LengthMismatch`].
pub fn evals_from_coeffs(domain: &Domain, coeffs: &[F]) -> Result<Vec<F>, DomainError> {
    if coeffs.len() > domain.n {
        return Err(DomainError::LengthMismatch { got: coeffs.len(), n: domain.n });
    }
    let mut a = coeffs.to_vec();
    a.resize(domain.n, F::zero());
    ntt_in_place(&mut a, domain.generator);
    Ok(a)
}

/// Interpolate a full evaluation vector over the domain into coefficients.
///
/// The result is the unique polynomial of degree `< n` with
/// `f(gⁱ) = evals[i]`; identical to Lagrange interpolation over the same
/// points.
pub fn coeffs_from_evals(domain: &Domain, evals: &[F]) -> Result<Vec<F>, DomainError> {
    if evals.len() != domain.n {
        return Err(DomainError::LengthMismatch { got: evals.len(), n: domain.n });
    }
    let mut a = evals.to_vec();
    intt_in_place(&mut a, domain.generator)?;
    Ok(a)
}
