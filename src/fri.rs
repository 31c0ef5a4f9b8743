//! FRI: fast Reed–Solomon IOP of proximity
//!
//! The commit phase repeatedly (1) evaluates the current polynomial on the
//! current domain, (2) Merkle-commits the evaluation vector (evaluations are
//! the leaves, encoded as canonical decimal bytes), (3) absorbs the root into
//! the transcript, (4) squeezes a folding challenge `α`, (5) folds
//! `f(x) = f_e(x²) + x·f_o(x²)` into `f'(y) = f_e(y) + α·f_o(y)`, and
//! (6) squares the generator to halve the domain. Folding stops once the
//! domain is no larger than the query count; the surviving coefficient
//! vector is the final polynomial carried in the proof.
//!
//! The query phase walks each squeezed index `i` through the layers with
//! `p₀ = i` and `p_{r+1} = p_r mod N_{r+1}`, opening the evaluation at `p_r`
//! **and** at the symmetric position `p_r + N_r/2 mod N_r`. The pair is what
//! lets the verifier recompute the fold
//! `(v + v_sym)/2 + α·(v − v_sym)/(2x)` and chain it into the next layer —
//! each opening binds the prover to a codeword, and the chain binds the
//! codewords to each other down to the final polynomial.

#![forbid(unsafe_code)]

use ark_ff::Zero;
use tracing::debug;

use crate::domain::{self, Domain, DomainError};
use crate::field::fe_to_dec;
use crate::merkle::{MerkleError, MerkleTree};
use crate::proof::{LayerOpening, MerklePathStep, QueryResponse};
use crate::transcript::{FsLabel, Transcript};
use crate::F;

/// FRI errors.
#[derive(Debug, thiserror::Error)]
pub enum FriError {
    /// Domain/transform failure.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Commitment failure.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
}

/// One committed folding round: the evaluation vector on the round's domain
/// and the Merkle tree over it.
pub struct FriLayer {
    /// Evaluations of the round's polynomial, ascending exponent order.
    pub evals: Vec<F>,
    /// Merkle tree with the evaluations as leaves.
    pub tree: MerkleTree,
}

/// Output of the commit phase: the committed layers (outermost first) and
/// the final folded polynomial's coefficients.
pub struct FriCommitment {
    /// Committed folding rounds.
    pub layers: Vec<FriLayer>,
    /// Coefficients of the final polynomial, ascending order.
    pub final_coefficients: Vec<F>,
}

/// Canonical leaf encoding of an evaluation: its decimal-string bytes.
///
/// The same encoding the proof uses for scalars, so a parsed opening can be
/// re-hashed without any conversion ambiguity.
#[inline]
pub fn leaf_bytes(f: &F) -> Vec<u8> {
    fe_to_dec(f).into_bytes()
}

/// Number of committed layers for an initial domain of `extended_len`
/// halving until it is no larger than `num_queries`.
pub fn expected_layer_count(extended_len: usize, num_queries: usize) -> usize {
    let mut n = extended_len;
    let mut layers = 0;
    while n > num_queries {
        layers += 1;
        n /= 2;
    }
    layers
}

/// Fold `f(x) = f_e(x²) + x·f_o(x²)` into `f_e + α·f_o`.
///
/// An odd-length coefficient vector is zero-padded before the even/odd
/// split, so the fold halves the length exactly.
pub fn fold_coefficients(coeffs: &[F], alpha: F) -> Vec<F> {
    let mut padded;
    let coeffs = if coeffs.len() % 2 == 1 {
        padded = coeffs.to_vec();
        padded.push(F::zero());
        &padded[..]
    } else {
        coeffs
    };
    coeffs
        .chunks(2)
        .map(|pair| pair[0] + alpha * pair[1])
        .collect()
}

/// Run the commit phase over `coeffs` on `initial_domain`.
///
/// Absorb/squeeze order per round: layer root, then the folding challenge.
/// After the last round the final coefficients are absorbed, so the query
/// indices squeezed afterwards depend on every commitment in the proof.
pub fn commit_phase(
    fs: &mut Transcript,
    coeffs: Vec<F>,
    initial_domain: Domain,
    num_queries: usize,
) -> Result<FriCommitment, FriError> {
    let mut coeffs = coeffs;
    let mut dom = initial_domain;
    let mut layers = Vec::new();

    while dom.n > num_queries {
        let evals = domain::evals_from_coeffs(&dom, &coeffs)?;
        let leaves: Vec<Vec<u8>> = evals.iter().map(leaf_bytes).collect();
        let tree = MerkleTree::build(&leaves)?;

        fs.absorb_digest(FsLabel::FriLayerCommit, &tree.root());
        let alpha = fs.challenge_f(FsLabel::FoldChallenge);

        debug!(round = layers.len(), domain = dom.n, "fri layer committed");

        coeffs = fold_coefficients(&coeffs, alpha);
        dom = dom.halve()?;
        layers.push(FriLayer { evals, tree });
    }

    fs.absorb_scalars(FsLabel::FriFinal, &coeffs);
    debug!(layers = layers.len(), final_len = coeffs.len(), "fri commit phase complete");

    Ok(FriCommitment { layers, final_coefficients: coeffs })
}

/// Produce the query responses for the given indices.
///
/// Indices are consumed in squeeze order; within one query the layers are
/// walked outermost-first with `p_{r+1} = p_r mod N_{r+1}`.
pub fn query_phase(
    commitment: &FriCommitment,
    indices: &[usize],
) -> Result<Vec<QueryResponse>, FriError> {
    let mut responses = Vec::with_capacity(indices.len());
    for &index in indices {
        let mut p = index;
        let mut layers = Vec::with_capacity(commitment.layers.len());
        for layer in &commitment.layers {
            // The tree commits exactly the layer's evaluation vector.
            let n = layer.tree.leaf_count();
            debug_assert_eq!(n, layer.evals.len());
            let sym = (p + n / 2) % n;

            layers.push(LayerOpening {
                value: layer.evals[p],
                merkle_proof: MerklePathStep::from_path(&layer.tree.prove(p)?),
                sym_value: layer.evals[sym],
                sym_merkle_proof: MerklePathStep::from_path(&layer.tree.prove(sym)?),
            });
            p %= n / 2;
        }
        responses.push(QueryResponse { index: index as u64, layers });
    }
    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::poly::Polynomial;
    use ark_ff::{Field, UniformRand};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn fold_matches_even_odd_identity() {
        // f'(x²) = (f(x) + f(−x))/2 + α·(f(x) − f(−x))/(2x) for random points.
        let mut rng = StdRng::seed_from_u64(17);
        let coeffs: Vec<F> = (0..9).map(|_| F::rand(&mut rng)).collect();
        let alpha = F::rand(&mut rng);
        let folded = Polynomial::from_coefficients(fold_coefficients(&coeffs, alpha));
        // Nine coefficients pad to ten and fold to five.
        assert_eq!(folded.coefficients().len(), 5);
        let f = Polynomial::from_coefficients(coeffs);

        let two_inv = field::inv(F::from(2u64)).unwrap();
        for _ in 0..8 {
            let x = F::rand(&mut rng);
            let f_even = (f.evaluate(x) + f.evaluate(-x)) * two_inv;
            let f_odd = (f.evaluate(x) - f.evaluate(-x)) * two_inv * field::inv(x).unwrap();
            assert_eq!(folded.evaluate(x.square()), f_even + alpha * f_odd);
        }
    }

    #[test]
    fn layer_count_matches_halving_schedule() {
        assert_eq!(expected_layer_count(4096, 40), 7); // 4096→…→64, stop at 32
        assert_eq!(expected_layer_count(64, 40), 1);
        assert_eq!(expected_layer_count(32, 40), 0);
    }

    #[test]
    fn commit_phase_is_transcript_deterministic() {
        let mut rng = StdRng::seed_from_u64(23);
        let dom = Domain::of_size(64).unwrap();
        let coeffs: Vec<F> = (0..16).map(|_| F::rand(&mut rng)).collect();

        let run = |coeffs: Vec<F>| {
            let mut fs = Transcript::new("fri-test");
            let c = commit_phase(&mut fs, coeffs, dom, 4).unwrap();
            (
                c.layers.iter().map(|l| l.tree.root()).collect::<Vec<_>>(),
                c.final_coefficients,
            )
        };
        assert_eq!(run(coeffs.clone()), run(coeffs));
    }

    #[test]
    fn committed_layers_shrink_to_the_degree_bound() {
        let mut rng = StdRng::seed_from_u64(29);
        let dom = Domain::of_size(64).unwrap();
        let coeffs: Vec<F> = (0..16).map(|_| F::rand(&mut rng)).collect();

        let mut fs = Transcript::new("fri-test");
        let c = commit_phase(&mut fs, coeffs, dom, 4).unwrap();
        assert_eq!(c.layers.len(), expected_layer_count(64, 4));
        let sizes: Vec<usize> = c.layers.iter().map(|l| l.evals.len()).collect();
        assert_eq!(sizes, vec![64, 32, 16, 8]);
        assert!(c.final_coefficients.len() <= 4);
    }

    #[test]
    fn query_openings_verify_against_their_layers() {
        let mut rng = StdRng::seed_from_u64(31);
        let dom = Domain::of_size(32).unwrap();
        let coeffs: Vec<F> = (0..8).map(|_| F::rand(&mut rng)).collect();

        let mut fs = Transcript::new("fri-test");
        let c = commit_phase(&mut fs, coeffs, dom, 4).unwrap();
        let responses = query_phase(&c, &[0, 5, 31]).unwrap();

        for resp in &responses {
            let mut p = resp.index as usize;
            for (layer, opening) in c.layers.iter().zip(&resp.layers) {
                let n = layer.tree.leaf_count();
                assert_eq!(n, layer.evals.len());
                let sym = (p + n / 2) % n;
                assert!(MerkleTree::verify(
                    &leaf_bytes(&opening.value),
                    p,
                    &MerklePathStep::to_path(&opening.merkle_proof),
                    &layer.tree.root(),
                ));
                assert!(MerkleTree::verify(
                    &leaf_bytes(&opening.sym_value),
                    sym,
                    &MerklePathStep::to_path(&opening.sym_merkle_proof),
                    &layer.tree.root(),
                ));
                p %= n / 2;
            }
        }
    }
}
