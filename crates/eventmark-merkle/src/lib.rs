//! A binary Merkle tree over 32-byte leaves with duplicate-last pairing.
//!
//! The tree is stored as an explicit sequence of levels: level 0 holds the
//! leaves, every following level holds the pairwise keccak-256 hashes of the
//! level below, and the last level holds the single root node. A level of odd
//! length pairs its final node with itself, so that `[A, B, C]` hashes up as
//! `keccak(keccak(A || B) || keccak(C || C))`. This rule is load-bearing:
//! roots and proofs produced here must match external verifiers that pair the
//! same way, so it must not be "fixed" to a different padding scheme.
//!
//! Leaves are `[u8; 32]` values. Callers committing to longer material hash
//! it down first (see [`hash`]); callers with shorter material left-pad it
//! before building the tree.
//!
//! All hashing uses keccak-256, the native hash of ethereum-compatible
//! chains, so that roots can be recomputed on-chain.
//!
//! # Examples
//! ```
//! use eventmark_merkle::Tree;
//!
//! let leaves = vec![[1; 32], [2; 32], [3; 32]];
//! let tree = Tree::from_leaves(leaves).expect("one or more leaves");
//!
//! let root = tree.root();
//! let proof = tree
//!     .construct_proof(2)
//!     .expect("leaf 2 must be inside the tree");
//!
//! assert!(proof.verify([3; 32], root));
//! assert!(!proof.verify([4; 32], root));
//! ```
use sha3::{
    Digest as _,
    Keccak256,
};

pub mod audit;
#[cfg(test)]
mod tests;

pub use audit::{
    Position,
    Proof,
    ProofStep,
};

/// Calculates `keccak256(data)`.
#[must_use]
pub fn hash(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Calculates `keccak256(left || right)`, the parent of two sibling nodes.
#[must_use]
pub fn combine(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Returned when constructing a tree from an empty leaf sequence.
///
/// There is no meaningful root for zero leaves, and a silently produced
/// default would be indistinguishable from a commitment to actual data.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot construct a merkle tree from zero leaves")]
pub struct NoLeaves;

/// Returned when requesting a proof for an index outside the tree.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("leaf index `{index}` is outside the tree; it contains `{leaf_count}` leaves")]
pub struct IndexOutOfBounds {
    index: usize,
    leaf_count: usize,
}

/// An immutable binary Merkle tree, leaves to root.
///
/// Built once by [`Tree::from_leaves`] and read-only afterwards. Two trees
/// compare equal exactly if they were built from the same leaf sequence in
/// the same order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    levels: Vec<Vec<[u8; 32]>>,
}

impl Tree {
    /// Constructs the tree over `leaves`, in the given order.
    ///
    /// The construction is deterministic: the same leaf sequence always
    /// yields the same tree. The order of leaves is significant; this is a
    /// commitment to a sequence, not to a set.
    ///
    /// # Errors
    /// Returns [`NoLeaves`] if `leaves` is empty.
    ///
    /// # Examples
    /// ```
    /// use eventmark_merkle::{
    ///     combine,
    ///     Tree,
    /// };
    ///
    /// let tree = Tree::from_leaves(vec![[1; 32], [2; 32]]).unwrap();
    /// assert_eq!(combine(&[1; 32], &[2; 32]), tree.root());
    /// ```
    pub fn from_leaves(leaves: Vec<[u8; 32]>) -> Result<Self, NoLeaves> {
        if leaves.is_empty() {
            return Err(NoLeaves);
        }
        let mut levels = vec![leaves];
        loop {
            let current = levels
                .last()
                .expect("the leaf level is pushed before the loop is entered");
            if current.len() == 1 {
                break;
            }
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                next.push(combine(left, right));
            }
            levels.push(next);
        }
        Ok(Self {
            levels,
        })
    }

    /// Returns the root of the tree, the single node of its last level.
    ///
    /// A tree of exactly one leaf has that leaf as its root; no hashing
    /// rounds are performed.
    ///
    /// # Examples
    /// ```
    /// use eventmark_merkle::Tree;
    ///
    /// let tree = Tree::from_leaves(vec![[42; 32]]).unwrap();
    /// assert_eq!([42; 32], tree.root());
    /// ```
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        let top = self
            .levels
            .last()
            .expect("a constructed tree always contains a root level");
        top[0]
    }

    /// Returns the leaves the tree was built over, in order.
    #[must_use]
    pub fn leaves(&self) -> &[[u8; 32]] {
        &self.levels[0]
    }

    /// Returns the number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Constructs the inclusion proof for the leaf at `index`.
    ///
    /// The proof carries one step per level below the root: the sibling node
    /// at that level and whether it sits left or right of the running hash.
    /// At an odd-length level the unpaired final node is its own sibling,
    /// mirroring the pairing rule of [`Tree::from_leaves`].
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` does not address a leaf.
    ///
    /// # Examples
    /// A single-leaf tree yields an empty proof, which verifies the leaf
    /// against itself:
    /// ```
    /// use eventmark_merkle::Tree;
    ///
    /// let tree = Tree::from_leaves(vec![[42; 32]]).unwrap();
    /// let proof = tree.construct_proof(0).unwrap();
    /// assert!(proof.is_empty());
    /// assert!(proof.verify([42; 32], tree.root()));
    /// ```
    pub fn construct_proof(&self, index: usize) -> Result<Proof, IndexOutOfBounds> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(IndexOutOfBounds {
                index,
                leaf_count,
            });
        }
        let mut steps = Vec::with_capacity(self.levels.len().saturating_sub(1));
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_idx = idx ^ 1;
            let sibling = *level.get(sibling_idx).unwrap_or(&level[idx]);
            let position = if idx % 2 == 0 {
                Position::Right
            } else {
                Position::Left
            };
            steps.push(ProofStep::new(sibling, position));
            idx /= 2;
        }
        Ok(Proof::new(steps))
    }
}
