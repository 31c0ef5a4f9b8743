//! Field helpers over the crate scalar `F`
//!
//! Arithmetic itself (`add`, `sub`, `mul`, `neg`, `pow`) comes from the
//! Arkworks `Field` traits; this module adds the fallible surface the rest of
//! the crate needs: inversion that reports division by zero instead of
//! returning `None`, primitive roots of unity with order validation, and the
//! canonical decimal-string codec used for serialization and Merkle leaves.
//!
//! ## Canonical form
//!
//! Every field element has exactly one decimal representation: the base-10
//! digits of its canonical representative in `[0, p)`, with no sign, no
//! leading zeros and no whitespace. [`fe_from_dec`] accepts that form and
//! nothing else, so a value that round-trips is canonical by construction.

#![forbid(unsafe_code)]

use ark_ff::{FftField, Field, One, PrimeField, Zero};
use std::str::FromStr;

use crate::F;

/// Field-arithmetic errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    /// Multiplicative inverse of zero was requested.
    #[error("division by zero in the scalar field")]
    DivisionByZero,
    /// No primitive root of unity exists for the requested order.
    #[error("no primitive root of unity of order {0}")]
    UnsupportedRootOrder(usize),
    /// A decimal string did not encode a canonical field element.
    #[error("`{0}` is not a canonical field element")]
    NonCanonical(String),
}

/// Multiplicative inverse; fails on zero.
#[inline]
pub fn inv(x: F) -> Result<F, FieldError> {
    x.inverse().ok_or(FieldError::DivisionByZero)
}

/// `base^exp` by square-and-multiply.
#[inline]
pub fn pow_u64(mut base: F, mut exp: u64) -> F {
    let mut acc = F::one();
    while exp > 0 {
        if (exp & 1) == 1 {
            acc *= base;
        }
        base.square_in_place();
        exp >>= 1;
    }
    acc
}

// ------------------------- Roots of unity -------------------------

fn prime_factors(mut n: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut p = 2usize;
    while p * p <= n {
        if n % p == 0 {
            out.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += if p == 2 { 1 } else { 2 }; // 2,3,5,7,...
    }
    if n > 1 {
        out.push(n);
    }
    out
}

/// Check that `g` generates the order-`n` subgroup: `g^n = 1` and
/// `g^{n/p} ≠ 1` for every prime `p | n`.
pub fn is_primitive_root_of_unity(g: F, n: usize) -> bool {
    if n == 0 || g.is_zero() {
        return false;
    }
    if !pow_u64(g, n as u64).is_one() {
        return false;
    }
    for p in prime_factors(n) {
        if pow_u64(g, (n / p) as u64).is_one() {
            return false;
        }
    }
    true
}

/// A generator of the order-`n` multiplicative subgroup.
///
/// `n` must be a power of two within the field's two-adicity; any other
/// order fails with [`FieldError::UnsupportedRootOrder`].
pub fn primitive_root_of_unity(n: usize) -> Result<F, FieldError> {
    if n == 0 || !n.is_power_of_two() || n.trailing_zeros() > F::TWO_ADICITY {
        return Err(FieldError::UnsupportedRootOrder(n));
    }
    let g = F::get_root_of_unity(n as u64).ok_or(FieldError::UnsupportedRootOrder(n))?;
    debug_assert!(is_primitive_root_of_unity(g, n));
    Ok(g)
}

// ------------------------- Decimal codec -------------------------

/// Canonical decimal string of a field element.
#[inline]
pub fn fe_to_dec(x: &F) -> String {
    x.into_bigint().to_string()
}

/// Parse a canonical decimal string into a field element.
///
/// Rejects anything that is not the exact canonical form: empty strings,
/// signs, whitespace, leading zeros, and values `≥ p`.
pub fn fe_from_dec(s: &str) -> Result<F, FieldError> {
    let x = F::from_str(s).map_err(|_| FieldError::NonCanonical(s.to_owned()))?;
    if fe_to_dec(&x) != s {
        return Err(FieldError::NonCanonical(s.to_owned()));
    }
    Ok(x)
}

/// Decimal string of the field modulus `p`.
pub fn modulus_dec() -> String {
    F::MODULUS.to_string()
}
