//! Happy-path crate API
//!
//! This module wraps the protocol core with a small, ergonomic surface:
//! one-shot [`prove`] / [`verify`] over the reference AIR with the default
//! parameter profile, `_with_config` variants for custom profiles, and JSON
//! payload helpers in [`io`]. Everything delegates to
//! [`StarkProver`] / [`StarkVerifier`]; no protocol logic lives here.
//!
//! The transport layer (HTTP, queues, persistence) is deliberately out of
//! scope: callers hand in parsed records or JSON strings and get the same
//! back.

#![forbid(unsafe_code)]

use crate::air::CounterAir;
use crate::proof::{StarkProof, Statement, Witness};
use crate::prover::{ProveError, StarkProver};
use crate::verifier::{StarkVerifier, VerifyError};
use crate::StarkConfig;

/// Prove the reference counter computation with the default profile.
pub fn prove(statement: &Statement, witness: &Witness) -> Result<StarkProof, ProveError> {
    prove_with_config(StarkConfig::default(), statement, witness)
}

/// Prove the reference counter computation with an explicit profile.
pub fn prove_with_config(
    config: StarkConfig,
    statement: &Statement,
    witness: &Witness,
) -> Result<StarkProof, ProveError> {
    StarkProver::new(config, CounterAir).prove(statement, witness)
}

/// Verify a proof against a statement with the default profile.
pub fn verify(proof: &StarkProof, statement: &Statement) -> Result<(), VerifyError> {
    verify_with_config(StarkConfig::default(), proof, statement)
}

/// Verify with an explicit profile.
pub fn verify_with_config(
    config: StarkConfig,
    proof: &StarkProof,
    statement: &Statement,
) -> Result<(), VerifyError> {
    StarkVerifier::new(config).verify(proof, statement)
}

/// Boolean acceptance with the default profile, for callers that do not
/// inspect error kinds.
pub fn verify_bool(proof: &StarkProof, statement: &Statement) -> bool {
    verify(proof, statement).is_ok()
}

/// JSON payload helpers.
///
/// JSON is the boundary format: untyped on the wire, parsed into the typed
/// records here, full precision preserved (scalars are decimal strings,
/// digests lowercase hex).
pub mod io {
    use super::*;

    /// Serialize a proof to a JSON string.
    pub fn proof_to_json(proof: &StarkProof) -> anyhow::Result<String> {
        serde_json::to_string(proof).map_err(|e| anyhow::anyhow!("serialize proof: {e}"))
    }

    /// Parse a proof from a JSON string.
    pub fn proof_from_json(json: &str) -> anyhow::Result<StarkProof> {
        serde_json::from_str(json).map_err(|e| anyhow::anyhow!("parse proof: {e}"))
    }

    /// Parse a statement from a JSON string.
    pub fn statement_from_json(json: &str) -> anyhow::Result<Statement> {
        serde_json::from_str(json).map_err(|e| anyhow::anyhow!("parse statement: {e}"))
    }

    /// Parse a witness from a JSON string.
    pub fn witness_from_json(json: &str) -> anyhow::Result<Witness> {
        serde_json::from_str(json).map_err(|e| anyhow::anyhow!("parse witness: {e}"))
    }
}

// =============================================================================
// End-to-end scenarios (reference profile: T = 1024, β = 4, Q = 40)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fe_to_dec;
    use crate::F;

    fn s1_inputs() -> (Statement, Witness) {
        (Statement::new("counter_ok", 21), Witness::new(42))
    }

    #[test]
    fn s1_valid_proof_identity_claim() {
        let (statement, witness) = s1_inputs();
        let proof = prove(&statement, &witness).unwrap();

        assert_eq!(proof.trace_length, 1024);
        assert_eq!(proof.blowup_factor, 4);
        assert_eq!(proof.extended_trace_length, 4096);
        assert_eq!(proof.query_responses.len(), 40);
        // public_output = (42 + 1023) mod p
        assert_eq!(proof.public_output, F::from(1065u64));

        verify(&proof, &statement).unwrap();
        assert!(verify_bool(&proof, &statement));
    }

    #[test]
    fn s2_statement_swap_is_rejected() {
        let (statement, witness) = s1_inputs();
        let proof = prove(&statement, &witness).unwrap();

        let swapped = Statement::new("counter_ok", 99);
        assert!(matches!(
            verify(&proof, &swapped),
            Err(VerifyError::StatementBindingMismatch)
        ));
    }

    #[test]
    fn s3_tampered_scalar_is_rejected() {
        let (statement, witness) = s1_inputs();
        let mut proof = prove(&statement, &witness).unwrap();

        proof.query_responses[0].layers[0].value = F::from(0u64);
        assert!(matches!(
            verify(&proof, &statement),
            Err(VerifyError::InvalidMerkleProof { query: 0, layer: 0 })
        ));
    }

    #[test]
    fn s4_tampered_trace_root_is_rejected() {
        let (statement, witness) = s1_inputs();
        let mut proof = prove(&statement, &witness).unwrap();

        // Flip the last hex nibble of the trace commitment. The transcript
        // diverges and the layer-0 openings no longer bind.
        proof.trace_merkle_root[31] ^= 0x01;
        assert!(matches!(
            verify(&proof, &statement),
            Err(VerifyError::InvalidMerkleProof { .. })
        ));
    }

    #[test]
    fn s5_degree_bound_violation_is_rejected() {
        let (statement, witness) = s1_inputs();
        let mut proof = prove(&statement, &witness).unwrap();

        // Pad the final polynomial to Q + 1 coefficients.
        while proof.fri_final_polynomial.len() < 41 {
            proof.fri_final_polynomial.push(F::from(0u64));
        }
        assert!(matches!(
            verify(&proof, &statement),
            Err(VerifyError::DegreeBoundExceeded { len: 41, max: 40 })
        ));
    }

    #[test]
    fn s6_json_round_trip_preserves_types() {
        let (statement, witness) = s1_inputs();
        let proof = prove(&statement, &witness).unwrap();

        let json = io::proof_to_json(&proof).unwrap();
        let parsed = io::proof_from_json(&json).unwrap();
        assert_eq!(parsed, proof);
        verify(&parsed, &statement).unwrap();

        // Exact wire formats: decimal strings and lowercase hex, no
        // precision loss through the untyped representation.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["field_prime"], crate::field::modulus_dec());
        assert_eq!(value["trace_merkle_root"], hex::encode(proof.trace_merkle_root));
        assert_eq!(value["public_output"], "1065");
        assert_eq!(
            value["query_responses"][0]["layers"][0]["value"],
            fe_to_dec(&proof.query_responses[0].layers[0].value),
        );
        assert_eq!(
            value["query_responses"][0]["layers"][0]["merkle_proof"][0]["is_left"]
                .as_bool()
                .is_some(),
            true,
        );
        assert_eq!(
            value["fri_final_polynomial"][0],
            fe_to_dec(&proof.fri_final_polynomial[0]),
        );
    }

    #[test]
    fn json_statement_and_witness_parse_at_the_boundary() {
        let statement =
            io::statement_from_json(r#"{"claim":"counter_ok","threshold":21,"epoch":7}"#).unwrap();
        assert_eq!(statement.claim, "counter_ok");
        assert_eq!(statement.threshold, 21);
        assert_eq!(statement.extra["epoch"], serde_json::json!(7));

        let witness = io::witness_from_json(r#"{"secret":42}"#).unwrap();
        assert_eq!(witness.secret, 42);

        assert!(io::statement_from_json(r#"{"threshold":21}"#).is_err());
        assert!(io::witness_from_json(r#"{"secret":"forty-two"}"#).is_err());
    }

    #[test]
    fn completeness_across_witnesses() {
        let config = StarkConfig::new(128, 4, 10, 20).unwrap();
        for secret in [0u64, 1, 42, u64::MAX] {
            let statement = Statement::new("counter_ok", 21);
            let witness = Witness::new(secret);
            let proof = prove_with_config(config, &statement, &witness).unwrap();
            verify_with_config(config, &proof, &statement).unwrap();
        }
    }
}
