//! Typed boundary records and their wire encoding
//!
//! The statement, witness and proof cross the crate boundary as JSON; this
//! module owns the typed records they parse into and the encoding rules:
//!
//! - field elements travel as **canonical decimal strings** (never machine
//!   integers — full precision is preserved through any JSON stack),
//! - digests travel as **lowercase hex** without a `0x` prefix,
//! - booleans travel as booleans.
//!
//! Parsing is strict: a non-canonical scalar, a digest of the wrong width
//! or the wrong case, or a missing field all fail at the serde layer, which
//! the verifier surfaces as a malformed proof. The statement fingerprint
//! binds a proof to the exact statement it was generated for.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::merkle::{self, Digest};
use crate::F;

// ============================================================================
// Serde codecs (decimal scalars, hex digests)
// ============================================================================

/// Canonical decimal-string encoding for a single field element.
pub(crate) mod serde_dec {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use crate::field::{fe_from_dec, fe_to_dec};
    use crate::F;

    pub fn serialize<S: Serializer>(f: &F, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&fe_to_dec(f))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<F, D::Error> {
        let s = String::deserialize(d)?;
        fe_from_dec(&s).map_err(D::Error::custom)
    }
}

/// Canonical decimal-string encoding for a vector of field elements.
pub(crate) mod serde_dec_vec {
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use crate::field::{fe_from_dec, fe_to_dec};
    use crate::F;

    pub fn serialize<S: Serializer>(fs: &[F], s: S) -> Result<S::Ok, S::Error> {
        let strings: Vec<String> = fs.iter().map(fe_to_dec).collect();
        strings.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<F>, D::Error> {
        let strings = Vec::<String>::deserialize(d)?;
        strings
            .iter()
            .map(|s| fe_from_dec(s).map_err(D::Error::custom))
            .collect()
    }
}

fn digest_from_hex<E: serde::de::Error>(s: &str) -> Result<Digest, E> {
    if s.len() != 2 * merkle::DIGEST_LEN
        || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        return Err(E::custom(format!("`{s}` is not a lowercase 32-byte hex digest")));
    }
    let bytes = hex::decode(s).map_err(E::custom)?;
    let mut out = [0u8; merkle::DIGEST_LEN];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Lowercase-hex encoding for a single digest.
pub(crate) mod serde_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::merkle::Digest;

    pub fn serialize<S: Serializer>(d: &Digest, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Digest, D::Error> {
        let s = String::deserialize(d)?;
        super::digest_from_hex(&s)
    }
}

/// Lowercase-hex encoding for a vector of digests.
pub(crate) mod serde_hex_vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::merkle::Digest;

    pub fn serialize<S: Serializer>(ds: &[Digest], s: S) -> Result<S::Ok, S::Error> {
        let strings: Vec<String> = ds.iter().map(hex::encode).collect();
        strings.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Digest>, D::Error> {
        let strings = Vec::<String>::deserialize(d)?;
        strings.iter().map(|s| super::digest_from_hex(s)).collect()
    }
}

// ============================================================================
// Statement / witness
// ============================================================================

/// The public statement a proof is bound to.
///
/// `claim` and `threshold` are the fields the reference AIR consumes;
/// arbitrary additional public fields ride along in `extra` (a sorted map,
/// so the fingerprint below is deterministic).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Human-readable claim identifier.
    pub claim: String,
    /// Public threshold consumed by the reference AIR.
    pub threshold: u64,
    /// Any further public fields, fingerprinted alongside the named ones.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Statement {
    /// A statement with only the named fields.
    pub fn new(claim: impl Into<String>, threshold: u64) -> Self {
        Self { claim: claim.into(), threshold, extra: BTreeMap::new() }
    }

    /// BLAKE3 fingerprint of the canonical JSON encoding.
    ///
    /// Every public field participates, so changing any of them (scenario:
    /// a threshold swap) changes the fingerprint.
    pub fn fingerprint(&self) -> Digest {
        let bytes = serde_json::to_vec(self).expect("statement serializes");
        let mut h = blake3::Hasher::new();
        h.update(b"tinystark.statement.v1");
        h.update(&bytes);
        *h.finalize().as_bytes()
    }
}

/// The private witness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Secret input; the reference AIR seeds `trace[0]` with it.
    pub secret: u64,
}

impl Witness {
    /// Wrap a secret value.
    pub fn new(secret: u64) -> Self {
        Self { secret }
    }
}

// ============================================================================
// Proof object
// ============================================================================

/// One step of a serialized Merkle inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePathStep {
    /// Sibling digest, lowercase hex.
    #[serde(rename = "sibling_hex", with = "serde_hex")]
    pub sibling: Digest,
    /// Whether the running node is the left child at this level.
    pub is_left: bool,
}

impl MerklePathStep {
    pub(crate) fn from_path(path: &[merkle::PathStep]) -> Vec<Self> {
        path.iter()
            .map(|s| Self { sibling: s.sibling, is_left: s.is_left })
            .collect()
    }

    pub(crate) fn to_path(steps: &[Self]) -> Vec<merkle::PathStep> {
        steps
            .iter()
            .map(|s| merkle::PathStep { sibling: s.sibling, is_left: s.is_left })
            .collect()
    }
}

/// The openings for one FRI layer at one query: the evaluation at the query
/// position and at its symmetric position, each with its inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerOpening {
    /// Evaluation at the query position.
    #[serde(with = "serde_dec")]
    pub value: F,
    /// Inclusion proof for `value`.
    pub merkle_proof: Vec<MerklePathStep>,
    /// Evaluation at the symmetric position (`p + N/2 mod N`).
    #[serde(with = "serde_dec")]
    pub sym_value: F,
    /// Inclusion proof for `sym_value`.
    pub sym_merkle_proof: Vec<MerklePathStep>,
}

/// All layer openings for one query index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The query index in the LDE domain, as squeezed from the transcript.
    pub index: u64,
    /// Openings per FRI layer, outermost first.
    pub layers: Vec<LayerOpening>,
}

/// A self-describing STARK proof.
///
/// Every scalar is a canonical field element; every digest is 32 bytes; the
/// query and layer counts are consistent with the declared parameters. The
/// verifier re-checks all of this before doing any cryptographic work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarkProof {
    /// Protocol version tag (see [`crate::PROTOCOL_VERSION`]).
    pub version: String,
    /// Trace length `T` (power of two).
    pub trace_length: u64,
    /// LDE domain size `T·β`.
    pub extended_trace_length: u64,
    /// Blowup factor `β` (power of two).
    pub blowup_factor: u64,
    /// Root of the trace LDE commitment.
    #[serde(with = "serde_hex")]
    pub trace_merkle_root: Digest,
    /// Roots of the FRI layer commitments, outermost first.
    #[serde(with = "serde_hex_vec")]
    pub fri_roots: Vec<Digest>,
    /// Coefficients of the final folded polynomial, ascending order.
    #[serde(with = "serde_dec_vec")]
    pub fri_final_polynomial: Vec<F>,
    /// One response per query index, in squeeze order.
    pub query_responses: Vec<QueryResponse>,
    /// Decimal modulus of the scalar field.
    pub field_prime: String,
    /// Target soundness in bits.
    pub security_level: u32,
    /// Claimed public output, `trace[T−1]`.
    #[serde(with = "serde_dec")]
    pub public_output: F,
    /// Fingerprint of the statement this proof was generated for.
    #[serde(with = "serde_hex")]
    pub statement_fingerprint: Digest,
}
