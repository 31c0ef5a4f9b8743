//! Crate root: public surface, core aliases, and protocol-wide invariants
//!
//! This module is the **single canonical entry-point** for downstream users of
//! the library. It centralizes the scalar field alias, the protocol
//! configuration record, shared error categories, and re-exports the main
//! submodules that implement the STARK pipeline.
//!
//! ## Invariants
//!
//! - **Field.** The scalar field is `ark_bn254::Fr` (`F` in this crate), whose
//!   multiplicative group has two-adicity 28: every power-of-two evaluation
//!   domain up to `2^28` has a primitive root of unity. All arithmetic is
//!   constant-time as provided by Arkworks; we **forbid unsafe** throughout
//!   the crate.
//!
//! - **Evaluation domains.** The trace lives on the order-`T` subgroup
//!   `{g⁰, …, g^{T−1}}` and is low-degree extended onto the order-`T·β`
//!   subgroup, `β` being the blowup factor. Both sizes are powers of two and
//!   are validated when a [`StarkConfig`] is constructed.
//!
//! - **Fiat–Shamir.** BLAKE3 with explicit domain-separation tags,
//!   length-delimited absorbs, and an XOF to derive challenges. The prover
//!   and verifier replay the exact same sequence of absorbs/challenges; all
//!   randomness (folding challenges, query indices) is derived from the
//!   transcript and nothing else.
//!
//! - **Commitments.** Merkle trees over BLAKE3 digests, leaves being the
//!   evaluation vectors of the committed polynomials. FRI layer `0` commits
//!   the same vector as the trace commitment.
//!
//! If any invariant is violated at runtime, the failure mode is a **precise
//! error** (never UB): the prover surfaces [`ProveError`], the verifier
//! rejects with the first applicable [`VerifyError`] and does not continue.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Field helpers (inversion, exponentiation, roots of unity, decimal codec).
pub mod field;
/// Coefficient-form univariate polynomials (Horner, Lagrange interpolation).
pub mod poly;
/// Power-of-two multiplicative subgroups and radix-2 NTT/INTT transforms.
pub mod domain;
/// Binary BLAKE3 hash tree with inclusion proofs.
pub mod merkle;
/// Fiat–Shamir transcript (domain-separated hashing, hash→field, hash→index).
pub mod transcript;
/// AIR interface (boundary and transition constraints) and reference instance.
pub mod air;
/// FRI low-degree proximity protocol: commit and query phases.
pub mod fri;
/// Typed boundary records: statement, witness, proof object, serialization.
pub mod proof;
/// Proof generation pipeline.
pub mod prover;
/// Proof verification pipeline.
pub mod verifier;
/// One-shot helpers and JSON I/O.
pub mod api;

// ============================================================================
// Canonical aliases and root-level re-exports (centralization)
// ============================================================================

/// Scalar field used across the crate (BN254 scalar field).
pub type F = ark_bn254::Fr;

/// Protocol version tag embedded in every proof.
pub const PROTOCOL_VERSION: &str = "STARK-1.0";

pub use crate::prover::{ProveError, StarkProver};
pub use crate::verifier::{StarkVerifier, VerifyError};

pub use crate::proof::{Statement, StarkProof, Witness};

pub use crate::air::{Air, CounterAir};

// ============================================================================
// Protocol parameters
// ============================================================================

/// Protocol parameters shared by the prover and verifier.
///
/// These must be agreed out of band; the verifier rejects proofs whose
/// declared parameters differ from its own. All invariants are enforced by
/// [`StarkConfig::new`]; the `Default` instance is the reference profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StarkConfig {
    /// Number of trace rows `T`. Power of two.
    pub trace_length: usize,
    /// LDE blowup factor `β`. Power of two; the extended domain has size `T·β`.
    pub blowup_factor: usize,
    /// Number of FRI query indices `Q`. Also the final-layer degree bound.
    pub num_queries: usize,
    /// Target soundness in bits, reported in the proof.
    pub security_level: u32,
}

/// Parameter-validation errors raised when constructing a [`StarkConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The trace length is zero or not a power of two.
    #[error("trace length must be a positive power of two (got {0})")]
    BadTraceLength(usize),
    /// The blowup factor is zero or not a power of two.
    #[error("blowup factor must be a positive power of two (got {0})")]
    BadBlowup(usize),
    /// The query count is zero.
    #[error("query count must be positive")]
    NoQueries,
    /// The extended domain exceeds the field's two-adic subgroup capacity.
    #[error("extended domain size {0} exceeds the largest power-of-two subgroup")]
    DomainTooLarge(usize),
}

impl StarkConfig {
    /// Construct a validated configuration.
    pub fn new(
        trace_length: usize,
        blowup_factor: usize,
        num_queries: usize,
        security_level: u32,
    ) -> Result<Self, ConfigError> {
        if trace_length == 0 || !trace_length.is_power_of_two() {
            return Err(ConfigError::BadTraceLength(trace_length));
        }
        if blowup_factor == 0 || !blowup_factor.is_power_of_two() {
            return Err(ConfigError::BadBlowup(blowup_factor));
        }
        if num_queries == 0 {
            return Err(ConfigError::NoQueries);
        }
        let extended = trace_length * blowup_factor;
        if extended.trailing_zeros() > <F as ark_ff::FftField>::TWO_ADICITY {
            return Err(ConfigError::DomainTooLarge(extended));
        }
        Ok(Self { trace_length, blowup_factor, num_queries, security_level })
    }

    /// Size of the LDE domain, `T·β`.
    #[inline]
    pub fn extended_length(&self) -> usize {
        self.trace_length * self.blowup_factor
    }
}

impl Default for StarkConfig {
    /// Reference profile: 1024 trace rows, blowup 4, 40 queries, 80-bit target.
    fn default() -> Self {
        Self { trace_length: 1024, blowup_factor: 4, num_queries: 40, security_level: 80 }
    }
}
