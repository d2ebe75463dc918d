//! RFC 6962 Merkle tree test suite
//!
//! Reference vectors are the eight-leaf tree used by the Certificate
//! Transparency and transparency-dev/merkle test suites.
//! https://github.com/transparency-dev/merkle

use rstest::rstest;
use tlog_merkle::rfc6962::{
    consistency_path, inclusion_path, verify_consistency_proof, verify_inclusion_proof,
};
use tlog_merkle::{
    consistency_proof, hash_children, hash_leaf, inclusion_proof, verify_consistency,
    verify_inclusion, verify_inclusion_in_head, CachedProvider, Error, Hash, HashProvider,
    LeafHashes, MismatchedRoot, Result, Rfc6962Hasher, Segment, TreeHead, Verification,
};
use tracing_subscriber::EnvFilter;

/// Leaf entries of the reference tree, hex encoded
const REFERENCE_LEAVES: [&str; 8] = [
    "",
    "00",
    "10",
    "2021",
    "3031",
    "40414243",
    "5051525354555657",
    "606162636465666768696a6b6c6d6e6f",
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn reference_tree(size: usize) -> LeafHashes {
    let entries = REFERENCE_LEAVES[..size]
        .iter()
        .map(|leaf| hex::decode(leaf).unwrap());
    LeafHashes::from_entries(Rfc6962Hasher::new(), entries)
}

/// A tree of `size` distinct synthetic leaves
fn synthetic_tree(size: usize) -> LeafHashes {
    LeafHashes::from_entries(
        Rfc6962Hasher::new(),
        (0..size).map(|i| format!("entry {}", i)),
    )
}

fn hex_hash(s: &str) -> Hash {
    Hash::from_hex(s).unwrap()
}

fn seg(start: usize, end: usize) -> Segment {
    Segment::new(start, end).unwrap()
}

// ==== Reference vectors ====

#[rstest]
#[case(1, "6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d")]
#[case(2, "fac54203e7cc696cf0dfcb42c92a1d9dbaf70ad9e621f4bd8d98662f00e3c125")]
#[case(3, "aeb6bcfe274b70a14fb067a5e5578264db0fa9b51af5e0ba159158f329e06e77")]
#[case(4, "d37ee418976dd95753c1c73862b9398fa2a2cf9b4ff0fdfe8b30cd95209614b7")]
#[case(5, "4e3bbb1f7b478dcfe71fb631631519a3bca12c9aefca1612bfce4c13a86264d4")]
#[case(6, "76e67dadbcdf1e10e1b74ddc608abd2f98dfb16fbce75277b5232a127f2087ef")]
#[case(7, "ddb89be403809e325750d3d263cd78929c2942b7942a34b77e122c9594a74c8c")]
#[case(8, "5dc9da79a70659a9ad559cb701ded9a2ab9d823aad2f4960cfe370eff4604328")]
fn test_reference_roots(#[case] size: usize, #[case] root: &str) {
    let tree = reference_tree(8);
    assert_eq!(tree.root_at(size).unwrap(), hex_hash(root));
    assert_eq!(tree.node_hash(seg(0, size)).unwrap(), hex_hash(root));
}

#[test]
fn test_reference_inclusion_path_leaf_0() {
    let tree = reference_tree(8);
    let expected = vec![
        hex_hash("96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"),
        hex_hash("5f083f0a1a33ca076a95279832580db3e0ef4584bdff1f54c8a360f50de3031e"),
        hex_hash("6b47aaf29ee3c2af9af889bc1fb9254dabd31177f16232dd6aab035ca39bf6e4"),
    ];
    assert_eq!(inclusion_path(8, 0, &tree).unwrap(), expected);
}

#[rstest]
#[case(
    6,
    8,
    &[
        "0ebc5d3437fbe2db158b9f126a1d118e308181031d0a949f8dededebc558ef6a",
        "ca854ea128ed050b41b35ffc1b87b8eb2bde461e9e3b5596ece6b9d5975a0ae0",
        "d37ee418976dd95753c1c73862b9398fa2a2cf9b4ff0fdfe8b30cd95209614b7",
    ]
)]
#[case(
    2,
    5,
    &[
        "5f083f0a1a33ca076a95279832580db3e0ef4584bdff1f54c8a360f50de3031e",
        "bc1a0643b12e4d2d7c77918f44e0f4f79a838b6cf9ec5b5c283e1f4d88599e6b",
    ]
)]
#[case(
    1,
    8,
    &[
        "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7",
        "5f083f0a1a33ca076a95279832580db3e0ef4584bdff1f54c8a360f50de3031e",
        "6b47aaf29ee3c2af9af889bc1fb9254dabd31177f16232dd6aab035ca39bf6e4",
    ]
)]
fn test_reference_consistency_paths(
    #[case] old_size: usize,
    #[case] new_size: usize,
    #[case] expected: &[&str],
) {
    let tree = reference_tree(8);
    let expected: Vec<Hash> = expected.iter().map(|h| hex_hash(h)).collect();
    let path = consistency_path(old_size, new_size, &tree).unwrap();
    assert_eq!(path, expected);

    let outcome = verify_consistency_proof(
        tree.hasher(),
        old_size,
        new_size,
        &path,
        &tree.root_at(old_size).unwrap(),
        &tree.root_at(new_size).unwrap(),
    )
    .unwrap();
    assert!(outcome.is_verified());
}

#[test]
fn test_documented_segment_proofs() {
    assert_eq!(
        inclusion_proof(8, 3).unwrap(),
        vec![seg(2, 3), seg(0, 2), seg(4, 8)]
    );
    assert_eq!(
        consistency_proof(3, 4).unwrap(),
        vec![seg(2, 3), seg(3, 4), seg(0, 2)]
    );
    assert!(inclusion_proof(1, 0).unwrap().is_empty());
}

// ==== Exhaustive small trees ====

#[test]
fn test_every_inclusion_proof_up_to_64_leaves() {
    init_tracing();
    let tree = synthetic_tree(64);
    let hasher = tree.hasher();
    for size in 1..=64 {
        let root = tree.root_at(size).unwrap();
        for index in 0..size {
            let leaf = tree.leaf_hash(index).unwrap();
            let proof = inclusion_proof(size, index).unwrap();
            let outcome =
                verify_inclusion(size, index, &leaf, &proof, &tree, hasher, &root).unwrap();
            assert!(outcome.is_verified(), "leaf {} of {}", index, size);

            // The same proof as a bare hash list verifies independently.
            let path = inclusion_path(size, index, &tree).unwrap();
            let outcome =
                verify_inclusion_proof(hasher, &leaf, index, size, &path, &root).unwrap();
            assert!(outcome.is_verified(), "hash list for leaf {} of {}", index, size);
        }
    }
}

#[test]
fn test_every_consistency_proof_up_to_40_leaves() {
    init_tracing();
    let tree = synthetic_tree(40);
    let hasher = tree.hasher();
    for new_size in 1..=40 {
        let new_root = tree.root_at(new_size).unwrap();
        for old_size in 1..=new_size {
            let old_root = tree.root_at(old_size).unwrap();
            let proof = consistency_proof(old_size, new_size).unwrap();
            let outcome = verify_consistency(
                old_size, new_size, &proof, &tree, hasher, &old_root, &new_root,
            )
            .unwrap();
            assert!(outcome.is_verified(), "{} -> {}", old_size, new_size);

            let path = consistency_path(old_size, new_size, &tree).unwrap();
            let outcome =
                verify_consistency_proof(hasher, old_size, new_size, &path, &old_root, &new_root)
                    .unwrap();
            assert!(outcome.is_verified(), "hash list {} -> {}", old_size, new_size);
        }
    }
}

// ==== Tampering ====

#[test]
fn test_tampered_node_hash_is_a_mismatch() {
    let tree = synthetic_tree(13);
    let hasher = Rfc6962Hasher::new();
    let proof = inclusion_proof(13, 6).unwrap();
    let target = proof[1];
    let tampered = |segment: Segment| -> Result<Hash> {
        if segment == target {
            Ok(hash_leaf(b"forged"))
        } else {
            tree.node_hash(segment)
        }
    };

    let outcome = verify_inclusion(
        13,
        6,
        &tree.leaf_hash(6).unwrap(),
        &proof,
        &tampered,
        &hasher,
        &tree.root(),
    )
    .unwrap();
    assert!(matches!(
        outcome,
        Verification::Mismatch {
            root: MismatchedRoot::Tree,
            ..
        }
    ));
}

#[test]
fn test_tampered_consistency_path_is_a_mismatch() {
    let tree = synthetic_tree(11);
    let hasher = Rfc6962Hasher::new();
    let mut path = consistency_path(6, 11, &tree).unwrap();
    path[0] = hash_children(&path[0], &path[0]);

    let outcome = verify_consistency_proof(
        &hasher,
        6,
        11,
        &path,
        &tree.root_at(6).unwrap(),
        &tree.root(),
    )
    .unwrap();
    assert!(!outcome.is_verified());
}

#[test]
fn test_provider_errors_propagate() {
    let tree = synthetic_tree(4);
    let unavailable =
        |segment: Segment| -> Result<Hash> { Err(Error::HashUnavailable(segment.to_string())) };
    let proof = inclusion_proof(4, 1).unwrap();
    let result = verify_inclusion(
        4,
        1,
        &tree.leaf_hash(1).unwrap(),
        &proof,
        &unavailable,
        tree.hasher(),
        &tree.root(),
    );
    assert!(matches!(result, Err(Error::HashUnavailable(_))));
}

// ==== Tree heads ====

#[test]
fn test_inclusion_against_parsed_tree_head() {
    let tree = CachedProvider::new(reference_tree(8));
    let head = TreeHead::from_json(
        r#"{
            "tree_size": 8,
            "timestamp": 1700000000000,
            "sha256_root_hash": "XcnaeacGWamtVZy3Ad7ZoqudgjqtL0lgz+Nw7/RgQyg="
        }"#,
    )
    .unwrap();

    for index in 0..8 {
        let proof = inclusion_proof(head.tree_size, index).unwrap();
        let leaf = tree.leaf_hash(index).unwrap();
        let outcome =
            verify_inclusion_in_head(&head, index, &leaf, &proof, &tree, tree.inner().hasher())
                .unwrap();
        assert!(outcome.is_verified(), "leaf {}", index);
    }
    // Leaves plus every proof node of an eight-leaf tree.
    assert!(tree.cached_len() > 8);
}
