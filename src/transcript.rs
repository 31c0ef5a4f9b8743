//! Fiat–Shamir transcript with domain separation
//!
//! A **deterministic, label-stable** Fiat–Shamir transform built on BLAKE3
//! with explicit domain-separation tags and length-delimited absorbs.
//!
//! ### Design
//! - **Stable DSTs.** Every absorb is prefixed by a fixed domain-separation
//!   tag and a human-readable label, so the prover and verifier replay the
//!   exact same byte schedule.
//! - **Length-delimited items.** All absorbs include an explicit byte-length
//!   prefix to avoid concatenation ambiguity.
//! - **Clone-before-challenge.** Challenge derivation clones the running
//!   hash state and uses the BLAKE3 XOF, so deriving challenges does not
//!   consume the transcript state; only a monotone counter advances.
//!
//! The determinism contract is the protocol's only ordering requirement:
//! identical absorb sequences produce bit-identical squeeze outputs.
//!
//! ```
//! use tinystark::transcript::{FsLabel, Transcript};
//!
//! let mut t1 = Transcript::new("example");
//! t1.absorb_bytes(FsLabel::TraceCommit, b"root");
//! let a = t1.challenge_f(FsLabel::FoldChallenge);
//!
//! let mut t2 = Transcript::new("example");
//! // Same data but a *different* label ⇒ different challenge.
//! t2.absorb_bytes(FsLabel::FriLayerCommit, b"root");
//! let b = t2.challenge_f(FsLabel::FoldChallenge);
//!
//! assert_ne!(a, b);
//! ```

#![forbid(unsafe_code)]

use ark_ff::PrimeField; // needed for from_le_bytes_mod_order
use ark_serialize::CanonicalSerialize;
use blake3::Hasher;
use std::io::Read; // needed for OutputReader::read

use crate::merkle::Digest;
use crate::F;

/// Canonical labels to avoid typos across prover/verifier.
///
/// These stringified labels are part of the transcript's **stable** domain
/// separation. Adding new variants is backward-compatible; reordering or
/// renaming existing ones is **not**.
#[derive(Clone, Copy, Debug)]
pub enum FsLabel {
    /// Protocol header: version, sizes, statement fingerprint.
    ProtocolHeader,
    /// The trace LDE commitment root.
    TraceCommit,
    /// One FRI layer commitment root.
    FriLayerCommit,
    /// The final folded polynomial's coefficients.
    FriFinal,
    /// A per-layer folding challenge.
    FoldChallenge,
    /// A query index into the LDE domain.
    QueryIndex,
}

impl FsLabel {
    #[inline]
    fn as_str(self) -> &'static str {
        match self {
            FsLabel::ProtocolHeader => "protocol_header",
            FsLabel::TraceCommit => "trace_commit",
            FsLabel::FriLayerCommit => "fri_layer_commit",
            FsLabel::FriFinal => "fri_final",
            FsLabel::FoldChallenge => "fold_challenge",
            FsLabel::QueryIndex => "query_index",
        }
    }
}

/// Fiat–Shamir transcript with domain separation (BLAKE3-based).
pub struct Transcript {
    /// Domain-separation label for this transcript instance.
    label: &'static str,
    /// Running hash state.
    hasher: Hasher,
    /// Monotone counter for challenge derivations.
    ctr: u64,
}

impl Transcript {
    /// Create a new transcript with a domain-separation `label`.
    ///
    /// The label distinguishes independent FS domains (e.g., proof types).
    pub fn new(label: &'static str) -> Self {
        let mut hasher = Hasher::new();
        // Domain separation preamble: fixed prefix + label.
        hasher.update(b"tinystark.transcript.v1");
        hasher.update(label.as_bytes());
        Self { label, hasher, ctr: 0 }
    }

    // ---------------------------- Absorb ----------------------------

    /// Absorb an arbitrary byte slice with a label (length-delimited).
    pub fn absorb_bytes(&mut self, label: FsLabel, bytes: &[u8]) {
        // Item preamble: stable DST + label + length + data.
        self.hasher.update(b"item:");
        self.hasher.update(label.as_str().as_bytes());
        self.hasher.update(b":len:");
        self.hasher.update(&(bytes.len() as u64).to_be_bytes());
        self.hasher.update(b":data:");
        self.hasher.update(bytes);
    }

    /// Absorb a 32-byte commitment digest.
    #[inline]
    pub fn absorb_digest(&mut self, label: FsLabel, d: &Digest) {
        self.absorb_bytes(label, d);
    }

    /// Absorb a field element using compressed canonical serialization.
    pub fn absorb_scalar(&mut self, label: FsLabel, f: &F) {
        let mut bytes = Vec::with_capacity(32);
        f.serialize_compressed(&mut bytes).expect("serialize field");
        self.absorb_bytes(label, &bytes);
    }

    /// Absorb a **vector** of field elements as a single, length-delimited
    /// item: `u64(len) || Σ_i compressed(f_i)`.
    pub fn absorb_scalars(&mut self, label: FsLabel, fs: &[F]) {
        let mut buf = Vec::with_capacity(8 + fs.len() * 32);
        buf.extend_from_slice(&(fs.len() as u64).to_be_bytes());
        for f in fs {
            f.serialize_compressed(&mut buf).expect("serialize field");
        }
        self.absorb_bytes(label, &buf);
    }

    /// Absorb a big-endian counter (sizes, indices) with the given label.
    #[inline]
    pub fn absorb_counter(&mut self, label: FsLabel, ctr: u64) {
        self.absorb_bytes(label, &ctr.to_be_bytes());
    }

    // -------------------------- Challenge --------------------------

    /// Derive a field-element challenge.
    ///
    /// Internally this clones the running state and applies an XOF, so
    /// calls are independent and do not mutate the absorb state (only the
    /// local derivation counter advances).
    pub fn challenge_f(&mut self, label: FsLabel) -> F {
        let mut xof = self.challenge_xof(label);
        let mut buf = [0u8; 64];
        let _ = xof.read(&mut buf);
        self.ctr = self.ctr.wrapping_add(1);
        F::from_le_bytes_mod_order(&buf)
    }

    /// Derive a query index uniform in `[0, domain_size)`.
    ///
    /// `domain_size` must be non-zero; the reduction is an 8-byte XOF read
    /// taken mod the domain size.
    pub fn challenge_index(&mut self, label: FsLabel, domain_size: usize) -> usize {
        debug_assert!(domain_size > 0);
        let mut xof = self.challenge_xof(label);
        let mut buf = [0u8; 8];
        let _ = xof.read(&mut buf);
        self.ctr = self.ctr.wrapping_add(1);
        (u64::from_be_bytes(buf) % domain_size as u64) as usize
    }

    /// Clone the running state and bind the challenge DST + counter.
    fn challenge_xof(&self, label: FsLabel) -> blake3::OutputReader {
        let mut h = self.hasher.clone();
        h.update(b"challenge:");
        h.update(b"tinystark.v1");
        h.update(b":tlabel:");
        h.update(self.label.as_bytes());
        h.update(b":label:");
        h.update(label.as_str().as_bytes());
        h.update(b":ctr:");
        h.update(&self.ctr.to_be_bytes());
        h.finalize_xof()
    }
}
