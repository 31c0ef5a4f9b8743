//! Proof verification pipeline
//!
//! [`StarkVerifier`] rejects with the **first applicable error** and never
//! continues past a failure — partial verification must not accept. The
//! check order is:
//!
//! 1. structural validation of the parsed proof against the verifier's own
//!    parameters (anything inconsistent is [`VerifyError::MalformedProof`]),
//! 2. statement binding via the fingerprint,
//! 3. the final-polynomial degree bound,
//! 4. transcript replay (header, trace root, per-layer roots and folding
//!    challenges, final polynomial, query indices),
//! 5. per query and per layer: Merkle inclusion of both openings, then the
//!    folding chain down to the final polynomial.
//!
//! The verifier trusts only the indices it squeezes itself; the `index`
//! fields in the proof are descriptive. A tampered commitment diverges the
//! transcript, so the replayed indices no longer match the openings and the
//! Merkle checks fail.

#![forbid(unsafe_code)]

use ark_ff::Field;
use tracing::debug;

use crate::domain::{Domain, DomainError};
use crate::field::{self, FieldError};
use crate::fri;
use crate::merkle::MerkleTree;
use crate::poly::Polynomial;
use crate::proof::{MerklePathStep, StarkProof, Statement};
use crate::prover::TRANSCRIPT_LABEL;
use crate::transcript::{FsLabel, Transcript};
use crate::{StarkConfig, F, PROTOCOL_VERSION};

/// Verifier-side rejection reasons.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The proof record is structurally inconsistent with the declared or
    /// configured parameters.
    #[error("malformed proof: {0}")]
    MalformedProof(&'static str),
    /// The proof was generated for a different statement.
    #[error("statement fingerprint does not match the supplied statement")]
    StatementBindingMismatch,
    /// The final FRI polynomial exceeds the degree bound.
    #[error("final polynomial has {len} coefficients, bound is {max}")]
    DegreeBoundExceeded {
        /// Declared coefficient count.
        len: usize,
        /// Maximum allowed (the query count).
        max: usize,
    },
    /// A Merkle inclusion check failed.
    #[error("invalid Merkle opening at query {query}, layer {layer}")]
    InvalidMerkleProof {
        /// Query position (in squeeze order).
        query: usize,
        /// FRI layer index.
        layer: usize,
    },
    /// An opened pair does not fold to the next layer's opened value.
    #[error("inconsistent folding at query {query}, layer {layer}")]
    InconsistentFolding {
        /// Query position (in squeeze order).
        query: usize,
        /// FRI layer index.
        layer: usize,
    },
    /// Field arithmetic failure.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Domain reconstruction failure.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// The verifying orchestrator.
///
/// Holds the parameters the proof must have been generated with; anything
/// else is rejected before cryptographic work starts.
pub struct StarkVerifier {
    config: StarkConfig,
}

impl StarkVerifier {
    /// Build a verifier from validated parameters.
    pub fn new(config: StarkConfig) -> Self {
        Self { config }
    }

    /// The verifier's parameters.
    pub fn config(&self) -> &StarkConfig {
        &self.config
    }

    /// Verify a proof against the statement it claims to prove.
    pub fn verify(&self, proof: &StarkProof, statement: &Statement) -> Result<(), VerifyError> {
        let t = self.config.trace_length;
        let extended = self.config.extended_length();
        let queries = self.config.num_queries;
        let layer_count = fri::expected_layer_count(extended, queries);

        // 1 — structural validation against the configured parameters.
        self.validate_shape(proof, layer_count)?;

        // 2 — statement binding.
        if statement.fingerprint() != proof.statement_fingerprint {
            return Err(VerifyError::StatementBindingMismatch);
        }

        // 3 — degree bound on the final polynomial.
        if proof.fri_final_polynomial.len() > queries {
            return Err(VerifyError::DegreeBoundExceeded {
                len: proof.fri_final_polynomial.len(),
                max: queries,
            });
        }

        // 4 — transcript replay.
        let mut fs = Transcript::new(TRANSCRIPT_LABEL);
        fs.absorb_bytes(FsLabel::ProtocolHeader, PROTOCOL_VERSION.as_bytes());
        fs.absorb_counter(FsLabel::ProtocolHeader, t as u64);
        fs.absorb_counter(FsLabel::ProtocolHeader, self.config.blowup_factor as u64);
        fs.absorb_counter(FsLabel::ProtocolHeader, queries as u64);
        fs.absorb_digest(FsLabel::ProtocolHeader, &proof.statement_fingerprint);
        fs.absorb_digest(FsLabel::TraceCommit, &proof.trace_merkle_root);

        let mut alphas = Vec::with_capacity(layer_count);
        for root in &proof.fri_roots {
            fs.absorb_digest(FsLabel::FriLayerCommit, root);
            alphas.push(fs.challenge_f(FsLabel::FoldChallenge));
        }
        fs.absorb_scalars(FsLabel::FriFinal, &proof.fri_final_polynomial);

        let indices: Vec<usize> =
            (0..queries).map(|_| fs.challenge_index(FsLabel::QueryIndex, extended)).collect();

        // 5 — openings and the folding chain. Rebuild the halving domain
        // schedule the prover committed over: layer r lives on the order
        // `extended >> r` subgroup.
        let mut layer_domains = Vec::with_capacity(layer_count);
        let mut dom = Domain::of_size(extended)?;
        for _ in 0..layer_count {
            layer_domains.push(dom);
            dom = dom.halve()?;
        }
        let two_inv = field::inv(F::from(2u64))?;
        let final_poly = Polynomial::from_coefficients(proof.fri_final_polynomial.clone());

        for (q, (&index, response)) in indices.iter().zip(&proof.query_responses).enumerate() {
            let mut p = index;
            for (r, opening) in response.layers.iter().enumerate() {
                let n_r = layer_domains[r].n;
                let sym = (p + n_r / 2) % n_r;
                let root = &proof.fri_roots[r];

                let leaf = fri::leaf_bytes(&opening.value);
                let path = MerklePathStep::to_path(&opening.merkle_proof);
                // Layer 0 *is* the trace commitment: its opening must also
                // hold against the trace root absorbed into the transcript.
                if r == 0 && !MerkleTree::verify(&leaf, p, &path, &proof.trace_merkle_root) {
                    return Err(VerifyError::InvalidMerkleProof { query: q, layer: r });
                }
                if !MerkleTree::verify(&leaf, p, &path, root) {
                    return Err(VerifyError::InvalidMerkleProof { query: q, layer: r });
                }

                let sym_leaf = fri::leaf_bytes(&opening.sym_value);
                let sym_path = MerklePathStep::to_path(&opening.sym_merkle_proof);
                if !MerkleTree::verify(&sym_leaf, sym, &sym_path, root) {
                    return Err(VerifyError::InvalidMerkleProof { query: q, layer: r });
                }

                // Fold the opened pair and chain it into the next layer
                // (or the final polynomial after the last one).
                let x = layer_domains[r].element(p);
                let f_even = (opening.value + opening.sym_value) * two_inv;
                let f_odd = (opening.value - opening.sym_value) * two_inv * field::inv(x)?;
                let folded = f_even + alphas[r] * f_odd;

                let expected = if r + 1 < response.layers.len() {
                    response.layers[r + 1].value
                } else {
                    final_poly.evaluate(x.square())
                };
                if folded != expected {
                    return Err(VerifyError::InconsistentFolding { query: q, layer: r });
                }

                p %= n_r / 2;
            }
        }

        debug!(queries, layers = layer_count, "proof accepted");
        Ok(())
    }

    /// Boolean acceptance for callers that do not inspect error kinds.
    pub fn is_valid(&self, proof: &StarkProof, statement: &Statement) -> bool {
        self.verify(proof, statement).is_ok()
    }

    fn validate_shape(&self, proof: &StarkProof, layer_count: usize) -> Result<(), VerifyError> {
        let cfg = &self.config;
        if proof.version != PROTOCOL_VERSION {
            return Err(VerifyError::MalformedProof("unknown protocol version"));
        }
        if proof.field_prime != field::modulus_dec() {
            return Err(VerifyError::MalformedProof("field modulus mismatch"));
        }
        if proof.trace_length != cfg.trace_length as u64 {
            return Err(VerifyError::MalformedProof("trace length mismatch"));
        }
        if proof.blowup_factor != cfg.blowup_factor as u64 {
            return Err(VerifyError::MalformedProof("blowup factor mismatch"));
        }
        if proof.extended_trace_length != cfg.extended_length() as u64 {
            return Err(VerifyError::MalformedProof(
                "extended length is not trace length times blowup",
            ));
        }
        if proof.fri_roots.len() != layer_count {
            return Err(VerifyError::MalformedProof("fri layer count mismatch"));
        }
        if proof.query_responses.len() != cfg.num_queries {
            return Err(VerifyError::MalformedProof("query count mismatch"));
        }
        for response in &proof.query_responses {
            if response.layers.len() != layer_count {
                return Err(VerifyError::MalformedProof("query opening layer count mismatch"));
            }
            if (response.index as usize) >= cfg.extended_length() {
                return Err(VerifyError::MalformedProof("query index out of domain"));
            }
            for (r, opening) in response.layers.iter().enumerate() {
                let depth = (cfg.extended_length() >> r).trailing_zeros() as usize;
                if opening.merkle_proof.len() != depth
                    || opening.sym_merkle_proof.len() != depth
                {
                    return Err(VerifyError::MalformedProof("merkle path depth mismatch"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::CounterAir;
    use crate::proof::Witness;
    use crate::prover::StarkProver;

    fn setup() -> (StarkProver<CounterAir>, StarkVerifier, Statement, Witness) {
        let config = StarkConfig::new(64, 4, 8, 16).unwrap();
        (
            StarkProver::new(config, CounterAir),
            StarkVerifier::new(config),
            Statement::new("counter_ok", 21),
            Witness::new(42),
        )
    }

    #[test]
    fn honest_proof_is_accepted() {
        let (prover, verifier, statement, witness) = setup();
        assert_eq!(verifier.config(), prover.config());
        let proof = prover.prove(&statement, &witness).unwrap();
        verifier.verify(&proof, &statement).unwrap();
        assert!(verifier.is_valid(&proof, &statement));
    }

    #[test]
    fn parameter_mismatch_is_malformed() {
        let (prover, verifier, statement, witness) = setup();
        let mut proof = prover.prove(&statement, &witness).unwrap();
        proof.trace_length = 128;
        assert!(matches!(
            verifier.verify(&proof, &statement),
            Err(VerifyError::MalformedProof(_))
        ));

        let mut proof = prover.prove(&statement, &witness).unwrap();
        proof.query_responses.pop();
        assert!(matches!(
            verifier.verify(&proof, &statement),
            Err(VerifyError::MalformedProof(_))
        ));

        let mut proof = prover.prove(&statement, &witness).unwrap();
        proof.field_prime.push('3');
        assert!(matches!(
            verifier.verify(&proof, &statement),
            Err(VerifyError::MalformedProof(_))
        ));
    }

    #[test]
    fn tampered_fri_root_is_rejected() {
        let (prover, verifier, statement, witness) = setup();
        let mut proof = prover.prove(&statement, &witness).unwrap();
        proof.fri_roots[2][7] ^= 0x10;
        assert!(matches!(
            verifier.verify(&proof, &statement),
            Err(VerifyError::InvalidMerkleProof { .. })
        ));
    }

    #[test]
    fn tampered_sym_opening_is_rejected() {
        let (prover, verifier, statement, witness) = setup();
        let mut proof = prover.prove(&statement, &witness).unwrap();
        proof.query_responses[3].layers[1].sym_value += F::from(1u64);
        assert!(matches!(
            verifier.verify(&proof, &statement),
            Err(VerifyError::InvalidMerkleProof { .. })
        ));
    }

    #[test]
    fn swapped_final_polynomial_breaks_the_fold_chain() {
        let (prover, verifier, statement, witness) = setup();
        let mut proof = prover.prove(&statement, &witness).unwrap();
        // Same length (so the degree bound holds) but different values: the
        // transcript diverges, so the replayed indices no longer match the
        // openings.
        for c in proof.fri_final_polynomial.iter_mut() {
            *c += F::from(1u64);
        }
        assert!(verifier.verify(&proof, &statement).is_err());
    }
}
