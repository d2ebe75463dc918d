//! RFC 6962 audit paths as plain hash lists
//!
//! CT logs serve proofs as bare lists of hashes (`get-proof-by-hash`,
//! `get-sth-consistency`), without saying which node each hash belongs to.
//! This module converts segment proofs into those lists and verifies such
//! lists directly, the way transparency-dev/merkle does.

use crate::error::{Error, Result};
use crate::hasher::TreeHasher;
use crate::proof::{consistency_proof, inclusion_proof};
use crate::provider::HashProvider;
use crate::tree::bit_length;
use crate::verify::{MismatchedRoot, Verification};
use tlog_types::Hash;

/// The audit path a log returns for leaf `index` of a tree of `tree_size` leaves
pub fn inclusion_path<P>(tree_size: usize, index: usize, provider: &P) -> Result<Vec<Hash>>
where
    P: HashProvider + ?Sized,
{
    inclusion_proof(tree_size, index)?
        .into_iter()
        .map(|segment| provider.node_hash(segment))
        .collect()
}

/// The consistency path a log returns between tree sizes `old_size` and `new_size`
///
/// RFC 6962 leaves out the old root itself when the old tree is a complete
/// subtree of the new one (`old_size` a power of two), since the verifier
/// already holds it. Equal sizes give an empty path.
pub fn consistency_path<P>(old_size: usize, new_size: usize, provider: &P) -> Result<Vec<Hash>>
where
    P: HashProvider + ?Sized,
{
    let proof = consistency_proof(old_size, new_size)?;
    if old_size == new_size {
        return Ok(Vec::new());
    }
    let skip = usize::from(proof.first().is_some_and(|first| first.start() == 0));
    proof
        .into_iter()
        .skip(skip)
        .map(|segment| provider.node_hash(segment))
        .collect()
}

/// Verify an audit path for `leaf_hash` at `leaf_index` in a tree of `tree_size` leaves
///
/// `proof_hashes` runs leaf first, as `get-proof-by-hash` serves it, and must
/// have exactly the length the tree shape dictates.
pub fn verify_inclusion_proof<H>(
    hasher: &H,
    leaf_hash: &Hash,
    leaf_index: usize,
    tree_size: usize,
    proof_hashes: &[Hash],
    expected_root: &Hash,
) -> Result<Verification>
where
    H: TreeHasher + ?Sized,
{
    if tree_size == 0 {
        return Err(Error::InvalidArgument(
            "audit path requested for an empty tree".to_string(),
        ));
    }
    if leaf_index >= tree_size {
        return Err(Error::IndexOutOfRange {
            index: leaf_index,
            tree_size,
        });
    }

    let (inner, border) = path_shape(leaf_index, tree_size);
    if proof_hashes.len() != inner + border {
        return Err(Error::InvalidProof(format!(
            "audit path for leaf {} of {} needs {} hashes, got {}",
            leaf_index,
            tree_size,
            inner + border,
            proof_hashes.len()
        )));
    }

    let (inner_path, border_path) = proof_hashes.split_at(inner);
    let hash = chain_inner(hasher, leaf_hash, inner_path, leaf_index);
    let root = chain_border_right(hasher, &hash, border_path);
    Ok(Verification::compare(MismatchedRoot::Tree, expected_root, &root))
}

/// Verify a consistency path between trees of `old_size` and `new_size` leaves
///
/// `proof_hashes` is what `get-sth-consistency` serves. An empty old tree is
/// consistent with every tree, and equal sizes need an empty path.
pub fn verify_consistency_proof<H>(
    hasher: &H,
    old_size: usize,
    new_size: usize,
    proof_hashes: &[Hash],
    old_root: &Hash,
    new_root: &Hash,
) -> Result<Verification>
where
    H: TreeHasher + ?Sized,
{
    if old_size > new_size {
        return Err(Error::InvalidArgument(format!(
            "old size {} > new size {}",
            old_size, new_size
        )));
    }

    if old_size == 0 || old_size == new_size {
        if !proof_hashes.is_empty() {
            return Err(Error::InvalidProof(format!(
                "sizes {} and {} need an empty consistency path, got {} hashes",
                old_size,
                new_size,
                proof_hashes.len()
            )));
        }
        return Ok(if old_size == 0 {
            Verification::Verified
        } else {
            Verification::compare(MismatchedRoot::New, new_root, old_root)
        });
    }

    // The last complete subtree of the old tree has 2^shift leaves and ends
    // at old_size. Its path up to the new root is the audit path of leaf
    // old_size - 1 without the levels inside that subtree.
    let shift = old_size.trailing_zeros() as usize;
    let (inner, border) = path_shape(old_size - 1, new_size);
    let inner = inner.saturating_sub(shift);

    // A complete old tree is that subtree, and its root is not repeated.
    let (seed, path) = if old_size.is_power_of_two() {
        (*old_root, proof_hashes)
    } else {
        match proof_hashes.split_first() {
            Some((first, rest)) => (*first, rest),
            None => {
                return Err(Error::InvalidProof(format!(
                    "empty consistency path from size {} to size {}",
                    old_size, new_size
                )))
            }
        }
    };
    if path.len() != inner + border {
        return Err(Error::InvalidProof(format!(
            "consistency path from size {} to size {} needs {} hashes after the seed, got {}",
            old_size,
            new_size,
            inner + border,
            path.len()
        )));
    }

    let (inner_path, border_path) = path.split_at(inner);
    let mask = (old_size - 1) >> shift;
    let old_hash = chain_inner_right(hasher, &seed, inner_path, mask);
    let old_hash = chain_border_right(hasher, &old_hash, border_path);
    let new_hash = chain_inner(hasher, &seed, inner_path, mask);
    let new_hash = chain_border_right(hasher, &new_hash, border_path);

    Ok(match Verification::compare(MismatchedRoot::Old, old_root, &old_hash) {
        Verification::Verified => {
            Verification::compare(MismatchedRoot::New, new_root, &new_hash)
        }
        mismatch => mismatch,
    })
}

/// Length of the two parts of the audit path of leaf `index`, as `(inner, border)`
///
/// Inner hashes sit below the level where the leaf's ancestors join the
/// right border of the tree. Border hashes are the left siblings along it.
fn path_shape(index: usize, tree_size: usize) -> (usize, usize) {
    let inner = bit_length(index ^ (tree_size - 1)) as usize;
    let border = (index >> inner).count_ones() as usize;
    (inner, border)
}

/// Fold `path` into `seed`, taking each side from the matching bit of `index`
fn chain_inner<H: TreeHasher + ?Sized>(hasher: &H, seed: &Hash, path: &[Hash], index: usize) -> Hash {
    path.iter().enumerate().fold(*seed, |hash, (level, sibling)| {
        if (index >> level) & 1 == 0 {
            hasher.hash_children(&hash, sibling)
        } else {
            hasher.hash_children(sibling, &hash)
        }
    })
}

/// Like [`chain_inner`], but skips right siblings, which lie outside the old tree
fn chain_inner_right<H: TreeHasher + ?Sized>(
    hasher: &H,
    seed: &Hash,
    path: &[Hash],
    index: usize,
) -> Hash {
    path.iter()
        .enumerate()
        .filter(|(level, _)| (index >> level) & 1 == 1)
        .fold(*seed, |hash, (_, sibling)| hasher.hash_children(sibling, &hash))
}

/// Fold `path` into `seed` with every sibling on the left
fn chain_border_right<H: TreeHasher + ?Sized>(hasher: &H, seed: &Hash, path: &[Hash]) -> Hash {
    path.iter()
        .fold(*seed, |hash, sibling| hasher.hash_children(sibling, &hash))
}
