//! Merkle commitments over BLAKE3
//!
//! Binary hash tree over byte-string leaves with array-backed levels. Leaf
//! digests and internal nodes use distinct domain-separation prefixes so a
//! leaf can never be confused with an interior node. The leaf vector is
//! padded to a power of two by repeating the last leaf, which keeps every
//! level even and makes inclusion proofs exactly `log₂(padded len)` steps.
//!
//! An inclusion proof is ordered leaf→root; each [`PathStep`] carries the
//! sibling digest and whether the running node is the **left** child.
//! [`verify`] is stateless: it recomputes the root from the leaf bytes and
//! compares.

#![forbid(unsafe_code)]

/// Width of a BLAKE3 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// A 32-byte node digest.
pub type Digest = [u8; DIGEST_LEN];

const LEAF_TAG: &[u8] = b"tinystark.merkle.leaf.v1";
const NODE_TAG: &[u8] = b"tinystark.merkle.node.v1";

/// Merkle errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree was requested over zero leaves.
    #[error("cannot build a Merkle tree over zero leaves")]
    Empty,
    /// An inclusion proof was requested for an index past the last leaf.
    #[error("leaf index {index} out of range (leaf count {len})")]
    IndexOutOfRange {
        /// Requested leaf index.
        index: usize,
        /// Number of (unpadded) leaves.
        len: usize,
    },
}

/// One step of an inclusion proof: the sibling digest and the side of the
/// running node (`is_left == true` means the running node is the left child).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    /// Digest of the sibling node.
    pub sibling: Digest,
    /// Whether the running node is the left child at this level.
    pub is_left: bool,
}

/// A complete binary hash tree with array-backed levels.
///
/// `levels[0]` holds the (padded) leaf digests; `levels.last()` is the
/// single root digest.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
    leaf_count: usize,
}

#[inline]
fn hash_leaf(bytes: &[u8]) -> Digest {
    let mut h = blake3::Hasher::new();
    h.update(LEAF_TAG);
    h.update(bytes);
    *h.finalize().as_bytes()
}

#[inline]
fn hash_node(left: &Digest, right: &Digest) -> Digest {
    let mut h = blake3::Hasher::new();
    h.update(NODE_TAG);
    h.update(left);
    h.update(right);
    *h.finalize().as_bytes()
}

impl MerkleTree {
    /// Build a tree over the given leaf byte-strings.
    pub fn build<B: AsRef<[u8]>>(leaves: &[B]) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::Empty);
        }
        let leaf_count = leaves.len();
        let padded = leaf_count.next_power_of_two();

        let mut level: Vec<Digest> = Vec::with_capacity(padded);
        for leaf in leaves {
            level.push(hash_leaf(leaf.as_ref()));
        }
        let last = *level.last().expect("non-empty");
        level.resize(padded, last);

        let mut levels = vec![level];
        while levels.last().expect("non-empty").len() > 1 {
            let prev = levels.last().expect("non-empty");
            let mut next = Vec::with_capacity(prev.len() / 2);
            for pair in prev.chunks(2) {
                next.push(hash_node(&pair[0], &pair[1]));
            }
            levels.push(next);
        }
        Ok(Self { levels, leaf_count })
    }

    /// Root digest.
    pub fn root(&self) -> Digest {
        self.levels.last().expect("non-empty")[0]
    }

    /// Number of leaves supplied to [`MerkleTree::build`] (before padding).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Inclusion proof for leaf `index`, ordered leaf→root.
    pub fn prove(&self, index: usize) -> Result<Vec<PathStep>, MerkleError> {
        if index >= self.leaf_count {
            return Err(MerkleError::IndexOutOfRange { index, len: self.leaf_count });
        }
        let mut proof = Vec::with_capacity(self.levels.len() - 1);
        let mut cur = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let is_left = cur % 2 == 0;
            let sibling = level[cur ^ 1];
            proof.push(PathStep { sibling, is_left });
            cur /= 2;
        }
        Ok(proof)
    }

    /// Verify an inclusion proof against a root.
    ///
    /// Stateless; returns `true` iff hashing `leaf` up through `proof`
    /// reproduces `root`.
    pub fn verify(leaf: &[u8], index: usize, proof: &[PathStep], root: &Digest) -> bool {
        let mut cur = hash_leaf(leaf);
        let mut idx = index;
        for step in proof {
            // The flag must agree with the index bit it claims to describe.
            if step.is_left != (idx % 2 == 0) {
                return false;
            }
            cur = if step.is_left {
                hash_node(&cur, &step.sibling)
            } else {
                hash_node(&step.sibling, &cur)
            };
            idx /= 2;
        }
        cur == *root
    }
}
