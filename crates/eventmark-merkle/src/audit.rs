//! Inclusion proofs detached from the tree that produced them.
//!
//! A [`Proof`] carries everything needed to recompute a root from one leaf,
//! so verification runs on (leaf, proof, root) alone. A party holding only
//! the published root can check membership without ever seeing the tree.
use crate::combine;

/// Which side of the running hash a sibling sits on.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// The sibling is the left operand; the running hash is hashed in second.
    Left,
    /// The sibling is the right operand; the running hash is hashed in first.
    Right,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Left => f.write_str("left"),
            Position::Right => f.write_str("right"),
        }
    }
}

/// One level's worth of proof: the sibling node and its side.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofStep {
    #[cfg_attr(feature = "serde", serde(with = "hex::serde"))]
    sibling: [u8; 32],
    position: Position,
}

impl ProofStep {
    #[must_use]
    pub fn new(sibling: [u8; 32], position: Position) -> Self {
        Self {
            sibling,
            position,
        }
    }

    #[must_use]
    pub fn sibling(&self) -> &[u8; 32] {
        &self.sibling
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }
}

/// A Merkle inclusion proof: the ordered sibling path from a leaf up to just
/// below the root.
///
/// See [`crate::Tree::construct_proof`] for how proofs are derived.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    steps: Vec<ProofStep>,
}

impl Proof {
    #[must_use]
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self {
            steps,
        }
    }

    /// Recomputes the root from `leaf` along the sibling path and compares it
    /// to `root`.
    ///
    /// A mismatch is an expected outcome, not an exceptional one, so this
    /// returns a plain `bool`. The empty proof verifies a leaf against
    /// itself, matching the single-leaf tree whose root is its only leaf.
    #[must_use]
    pub fn verify(&self, leaf: [u8; 32], root: [u8; 32]) -> bool {
        let mut current = leaf;
        for step in &self.steps {
            current = match step.position {
                Position::Right => combine(&current, &step.sibling),
                Position::Left => combine(&step.sibling, &current),
            };
        }
        current == root
    }

    /// Returns the number of steps in the proof, one per tree level below
    /// the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProofStep> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Proof {
    type IntoIter = std::slice::Iter<'a, ProofStep>;
    type Item = &'a ProofStep;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
