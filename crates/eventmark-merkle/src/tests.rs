use hex_literal::hex;

use super::{
    combine,
    hash,
    IndexOutOfBounds,
    NoLeaves,
    Position,
    Proof,
    ProofStep,
    Tree,
};

fn distinct_leaves(n: u8) -> Vec<[u8; 32]> {
    (0..n).map(|i| [i; 32]).collect()
}

#[test]
fn keccak256_of_the_empty_string_matches_the_known_value() {
    assert_eq!(
        hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"),
        hash(b""),
    );
}

#[test]
fn combine_is_hash_of_concatenation() {
    let left = [1; 32];
    let right = [2; 32];
    let mut concatenated = Vec::new();
    concatenated.extend_from_slice(&left);
    concatenated.extend_from_slice(&right);
    assert_eq!(hash(&concatenated), combine(&left, &right));
}

#[test]
fn constructing_without_leaves_is_rejected() {
    assert_eq!(Err(NoLeaves), Tree::from_leaves(Vec::new()));
}

#[test]
fn construction_is_deterministic() {
    let leaves = distinct_leaves(5);
    let first = Tree::from_leaves(leaves.clone()).unwrap();
    let second = Tree::from_leaves(leaves).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.root(), second.root());
}

#[test]
fn single_leaf_tree_has_the_leaf_as_root() {
    let tree = Tree::from_leaves(vec![[42; 32]]).unwrap();
    assert_eq!([42; 32], tree.root());

    let proof = tree.construct_proof(0).unwrap();
    assert!(proof.is_empty());
    assert!(proof.verify([42; 32], tree.root()));
}

#[test]
fn two_leaf_tree_root_is_the_combined_pair() {
    let tree = Tree::from_leaves(vec![[1; 32], [2; 32]]).unwrap();
    assert_eq!(combine(&[1; 32], &[2; 32]), tree.root());
}

#[test]
fn odd_level_pairs_its_last_node_with_itself() {
    // The unpaired third leaf is hashed with itself, not promoted and not
    // zero-padded. External verifiers pair the same way, so this shape is
    // part of the public contract.
    let a = [1; 32];
    let b = [2; 32];
    let c = [3; 32];
    let tree = Tree::from_leaves(vec![a, b, c]).unwrap();

    let left = combine(&a, &b);
    let right = combine(&c, &c);
    assert_eq!(combine(&left, &right), tree.root());
}

#[test]
fn proof_for_a_duplicated_leaf_has_the_expected_shape() {
    let a = [1; 32];
    let b = [2; 32];
    let c = [3; 32];
    let tree = Tree::from_leaves(vec![a, b, c]).unwrap();

    // Index 2 is even with no distinct sibling, so step 0 pairs the leaf
    // with itself on the right; at level 1 the running hash sits at index 1,
    // so step 1 brings in `combine(a, b)` from the left.
    let proof = tree.construct_proof(2).unwrap();
    let steps: Vec<ProofStep> = proof.iter().copied().collect();
    assert_eq!(
        vec![
            ProofStep::new(c, Position::Right),
            ProofStep::new(combine(&a, &b), Position::Left),
        ],
        steps,
    );
    assert!(proof.verify(c, tree.root()));
}

#[test]
fn every_leaf_of_every_small_tree_round_trips() {
    for n in 1..=8 {
        let leaves = distinct_leaves(n);
        let tree = Tree::from_leaves(leaves.clone()).unwrap();
        let root = tree.root();
        for (index, leaf) in leaves.iter().enumerate() {
            let proof = tree.construct_proof(index).unwrap();
            assert!(
                proof.verify(*leaf, root),
                "leaf {index} of the {n}-leaf tree failed to verify",
            );
        }
    }
}

#[test]
fn leaf_order_determines_the_root() {
    let forward = Tree::from_leaves(vec![[1; 32], [2; 32]]).unwrap();
    let backward = Tree::from_leaves(vec![[2; 32], [1; 32]]).unwrap();
    assert_ne!(forward.root(), backward.root());
}

#[test]
fn a_tampered_leaf_fails_verification() {
    let leaves = distinct_leaves(4);
    let tree = Tree::from_leaves(leaves.clone()).unwrap();
    let proof = tree.construct_proof(1).unwrap();

    let mut tampered = leaves[1];
    tampered[0] ^= 1;
    assert!(!proof.verify(tampered, tree.root()));
}

#[test]
fn a_tampered_sibling_fails_verification() {
    let leaves = distinct_leaves(4);
    let tree = Tree::from_leaves(leaves.clone()).unwrap();
    let proof = tree.construct_proof(1).unwrap();

    let mut steps: Vec<ProofStep> = proof.iter().copied().collect();
    let mut sibling = *steps[0].sibling();
    sibling[31] ^= 1;
    steps[0] = ProofStep::new(sibling, steps[0].position());

    let tampered = Proof::new(steps);
    assert!(!tampered.verify(leaves[1], tree.root()));
}

#[test]
fn a_tampered_root_fails_verification() {
    let leaves = distinct_leaves(4);
    let tree = Tree::from_leaves(leaves.clone()).unwrap();
    let proof = tree.construct_proof(1).unwrap();

    let mut root = tree.root();
    root[15] ^= 1;
    assert!(!proof.verify(leaves[1], root));
}

#[test]
fn proof_index_at_leaf_count_is_rejected() {
    let tree = Tree::from_leaves(distinct_leaves(4)).unwrap();
    assert_eq!(
        Err(IndexOutOfBounds {
            index: 4,
            leaf_count: 4,
        }),
        tree.construct_proof(4),
    );
}

#[cfg(feature = "serde")]
#[test]
fn proof_json_round_trip_preserves_the_verification_outcome() {
    let leaves = distinct_leaves(5);
    let tree = Tree::from_leaves(leaves.clone()).unwrap();
    let proof = tree.construct_proof(3).unwrap();

    let json = serde_json::to_string(&proof).unwrap();
    let restored: Proof = serde_json::from_str(&json).unwrap();
    assert_eq!(proof, restored);
    assert!(restored.verify(leaves[3], tree.root()));
}
