//! Proof generation pipeline
//!
//! [`StarkProver`] orchestrates the full pipeline over an [`Air`] instance:
//! trace generation from the witness, the AIR consistency check,
//! interpolation over the trace subgroup, low-degree extension onto the
//! blown-up subgroup, Merkle commitment of the extension, the FRI commit
//! phase, query-index derivation, and proof assembly.
//!
//! Transcript schedule (the verifier replays it byte for byte): protocol
//! header (version, sizes, query count, statement fingerprint), trace
//! commitment root, then per FRI round the layer root followed by its
//! folding challenge, the final polynomial, and finally the query indices.
//! The pipeline is synchronous and pure: all randomness comes from the
//! transcript, never from the OS.

#![forbid(unsafe_code)]

use ark_ff::One;
use tracing::debug;

use crate::air::Air;
use crate::domain::{self, Domain, DomainError};
use crate::field::{self, FieldError};
use crate::fri::{self, FriError};
use crate::merkle::{MerkleError, MerkleTree};
use crate::proof::{StarkProof, Statement, Witness};
use crate::transcript::{FsLabel, Transcript};
use crate::{StarkConfig, F, PROTOCOL_VERSION};

/// Instance label for the proof transcript.
pub(crate) const TRANSCRIPT_LABEL: &str = "tinystark.proof";

/// Prover-side errors. Inputs are deterministic, so there are no retries:
/// the first failure surfaces as-is.
#[derive(Debug, thiserror::Error)]
pub enum ProveError {
    /// The generated trace violates a boundary or transition constraint.
    #[error("trace does not satisfy the AIR constraints")]
    AirUnsatisfied,
    /// Field arithmetic failure (division by zero, unsupported root order).
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Domain construction or transform failure.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Commitment failure.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// FRI failure.
    #[error(transparent)]
    Fri(#[from] FriError),
}

/// The proving orchestrator, generic over the AIR.
pub struct StarkProver<A: Air> {
    config: StarkConfig,
    air: A,
}

impl<A: Air> StarkProver<A> {
    /// Build a prover from validated parameters and an AIR instance.
    pub fn new(config: StarkConfig, air: A) -> Self {
        Self { config, air }
    }

    /// The prover's parameters.
    pub fn config(&self) -> &StarkConfig {
        &self.config
    }

    /// Generate the execution trace for the reference counter computation:
    /// `trace[0] = secret mod p`, `trace[i+1] = trace[i] + 1`.
    pub fn generate_trace(&self, witness: &Witness) -> Vec<F> {
        let mut trace = Vec::with_capacity(self.config.trace_length);
        let mut current = F::from(witness.secret);
        for _ in 0..self.config.trace_length {
            trace.push(current);
            current += F::one();
        }
        trace
    }

    /// Produce a proof that the statement's computation was executed on the
    /// witness.
    pub fn prove(&self, statement: &Statement, witness: &Witness) -> Result<StarkProof, ProveError> {
        let t = self.config.trace_length;
        let extended = self.config.extended_length();
        let fingerprint = statement.fingerprint();

        debug!(
            claim = %statement.claim,
            threshold = statement.threshold,
            trace_length = t,
            "building execution trace"
        );

        // Trace, checked against the AIR before anything is committed.
        let trace = self.generate_trace(witness);
        if !self.air.check_trace(&trace) {
            return Err(ProveError::AirUnsatisfied);
        }
        let public_output = trace[t - 1];

        // Header-first transcript discipline: the proof context is bound
        // before any commitment is absorbed.
        let mut fs = Transcript::new(TRANSCRIPT_LABEL);
        fs.absorb_bytes(FsLabel::ProtocolHeader, PROTOCOL_VERSION.as_bytes());
        fs.absorb_counter(FsLabel::ProtocolHeader, t as u64);
        fs.absorb_counter(FsLabel::ProtocolHeader, self.config.blowup_factor as u64);
        fs.absorb_counter(FsLabel::ProtocolHeader, self.config.num_queries as u64);
        fs.absorb_digest(FsLabel::ProtocolHeader, &fingerprint);

        // Interpolate the trace polynomial over the order-T subgroup.
        let trace_domain = Domain::of_size(t)?;
        let trace_coeffs = domain::coeffs_from_evals(&trace_domain, &trace)?;

        // Low-degree extension onto the order-T·β subgroup, then commit.
        let lde_domain = Domain::of_size(extended)?;
        let lde_evals = domain::evals_from_coeffs(&lde_domain, &trace_coeffs)?;
        let leaves: Vec<Vec<u8>> = lde_evals.iter().map(fri::leaf_bytes).collect();
        let trace_tree = MerkleTree::build(&leaves)?;
        let trace_root = trace_tree.root();
        fs.absorb_digest(FsLabel::TraceCommit, &trace_root);
        debug!(extended, root = %hex::encode(trace_root), "trace LDE committed");

        // The reference AIR is linear, so its composition polynomial reduces
        // to the trace polynomial itself. A richer AIR builds
        // Σ αⱼ·Cⱼ/Zⱼ from its transition constraints here.
        let composition_coeffs = trace_coeffs;

        // FRI: commit and fold until the domain is no larger than the
        // query count.
        let commitment =
            fri::commit_phase(&mut fs, composition_coeffs, lde_domain, self.config.num_queries)?;

        // Query indices, squeezed only after every commitment is absorbed.
        let indices: Vec<usize> = (0..self.config.num_queries)
            .map(|_| fs.challenge_index(FsLabel::QueryIndex, extended))
            .collect();
        let query_responses = fri::query_phase(&commitment, &indices)?;

        debug!(queries = indices.len(), layers = commitment.layers.len(), "proof assembled");

        Ok(StarkProof {
            version: PROTOCOL_VERSION.to_owned(),
            trace_length: t as u64,
            extended_trace_length: extended as u64,
            blowup_factor: self.config.blowup_factor as u64,
            trace_merkle_root: trace_root,
            fri_roots: commitment.layers.iter().map(|l| l.tree.root()).collect(),
            fri_final_polynomial: commitment.final_coefficients,
            query_responses,
            field_prime: field::modulus_dec(),
            security_level: self.config.security_level,
            public_output,
            statement_fingerprint: fingerprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::CounterAir;

    fn small_config() -> StarkConfig {
        StarkConfig::new(64, 4, 8, 16).unwrap()
    }

    #[test]
    fn trace_starts_at_secret_and_increments() {
        let prover = StarkProver::new(small_config(), CounterAir);
        let trace = prover.generate_trace(&Witness::new(42));
        assert_eq!(trace[0], F::from(42u64));
        assert_eq!(trace[63], F::from(105u64));
        assert!(CounterAir.check_trace(&trace));
    }

    #[test]
    fn proof_declares_consistent_parameters() {
        let prover = StarkProver::new(small_config(), CounterAir);
        assert_eq!(prover.config().extended_length(), 256);
        let statement = Statement::new("counter_ok", 21);
        let proof = prover.prove(&statement, &Witness::new(42)).unwrap();

        assert_eq!(proof.version, PROTOCOL_VERSION);
        assert_eq!(proof.trace_length, 64);
        assert_eq!(proof.extended_trace_length, 256);
        assert_eq!(proof.blowup_factor, 4);
        assert_eq!(proof.fri_roots.len(), fri::expected_layer_count(256, 8));
        assert_eq!(proof.query_responses.len(), 8);
        assert!(proof.fri_final_polynomial.len() <= 8);
        assert_eq!(proof.public_output, F::from(105u64));
        assert_eq!(proof.statement_fingerprint, statement.fingerprint());
        // Layer 0 of FRI commits the same vector as the trace commitment.
        assert_eq!(proof.fri_roots[0], proof.trace_merkle_root);
    }

    #[test]
    fn proving_is_deterministic() {
        let prover = StarkProver::new(small_config(), CounterAir);
        let statement = Statement::new("counter_ok", 21);
        let a = prover.prove(&statement, &Witness::new(9)).unwrap();
        let b = prover.prove(&statement, &Witness::new(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unsatisfiable_air_is_refused() {
        // An AIR whose transition never holds for the counter trace.
        struct DecrementAir;
        impl Air for DecrementAir {
            fn boundary_constraints(&self, _trace: &[F]) -> Vec<(usize, F)> {
                Vec::new()
            }
            fn transition(&self, current: F, next: F) -> F {
                next - current + F::one()
            }
        }

        let prover = StarkProver::new(small_config(), DecrementAir);
        let statement = Statement::new("counter_ok", 21);
        assert!(matches!(
            prover.prove(&statement, &Witness::new(1)),
            Err(ProveError::AirUnsatisfied)
        ));
    }
}
