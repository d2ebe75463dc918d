//! Merkle audit path generation
//!
//! Proofs are returned as ordered lists of [`Segment`]s, each naming the tree
//! node whose hash a verifier needs. Resolving segments to hashes is left to a
//! [`HashProvider`](crate::HashProvider).

use crate::error::{Error, Result};
use crate::tree::{split_point, tree_depth};
use tlog_types::Segment;

/// Sibling segments proving that leaf `index` is part of a tree of `tree_size` leaves
///
/// The segments run from the leaf's sibling up to the root's child. Folding
/// the leaf hash with their hashes in order, each on the side its position
/// dictates, yields the root. A leaf whose subtree has no right neighbour at
/// some level (the incomplete right edge of the tree) gets no segment for that
/// level.
///
/// ```
/// use tlog_merkle::inclusion_proof;
/// use tlog_types::Segment;
///
/// let proof = inclusion_proof(8, 3).unwrap();
/// assert_eq!(
///     proof,
///     vec![
///         Segment::new(2, 3).unwrap(),
///         Segment::new(0, 2).unwrap(),
///         Segment::new(4, 8).unwrap(),
///     ]
/// );
/// ```
pub fn inclusion_proof(tree_size: usize, index: usize) -> Result<Vec<Segment>> {
    if tree_size == 0 {
        return Err(Error::InvalidArgument(
            "inclusion proof requested for an empty tree".to_string(),
        ));
    }
    if index >= tree_size {
        return Err(Error::IndexOutOfRange { index, tree_size });
    }

    let mut proof = Vec::with_capacity(tree_depth(tree_size) as usize - 1);
    // Width of the aligned subtree around `index` that the proof covers so far.
    let mut width: usize = 1;
    while width < tree_size {
        // The parent at twice the width, aligned as in a complete binary
        // tree. Its end may lie past `tree_size`. The shift drops the top bit
        // at the last level of a maximal tree, which clears the mask to zero.
        let parent_start = index & !((width << 1).wrapping_sub(1));
        let mid = parent_start + width;
        if index < mid {
            if mid < tree_size {
                let end = mid.saturating_add(width).min(tree_size);
                proof.push(Segment::new(mid, end)?);
            }
            // Nothing to the right yet: this level of the tree is incomplete.
        } else {
            proof.push(Segment::new(parent_start, mid)?);
        }
        width = width.saturating_mul(2);
    }

    Ok(proof)
}

/// Segments proving that the tree of `old_size` leaves is a prefix of the tree
/// of `new_size` leaves
///
/// The first segment always ends at `old_size` and lies inside the old tree.
/// Every later segment extends the running range by one sibling until it
/// spans `[0, new_size)`. Segments ending at or before `old_size` are shared
/// with the old tree, so folding just those rebuilds the old root, and folding
/// all of them rebuilds the new root.
///
/// When `old_size == new_size` the proof is the single segment `[0, new_size)`:
/// the two roots must simply be equal.
pub fn consistency_proof(old_size: usize, new_size: usize) -> Result<Vec<Segment>> {
    if old_size == 0 {
        return Err(Error::InvalidArgument(
            "consistency proof requested from an empty tree".to_string(),
        ));
    }
    if old_size > new_size {
        return Err(Error::InvalidArgument(format!(
            "old size {} > new size {}",
            old_size, new_size
        )));
    }

    // Walk from the root towards the node that ends exactly at `old_size`,
    // keeping the sibling of every node we descend into.
    let mut proof = Vec::with_capacity(tree_depth(new_size) as usize);
    let mut node = Segment::new(0, new_size)?;
    loop {
        debug_assert!(node.start() < old_size && old_size <= node.end());
        if old_size == node.end() {
            proof.push(node);
            break;
        }

        let split = node.start() + split_point(node.len())?;
        let left = Segment::new(node.start(), split)?;
        let right = Segment::new(split, node.end())?;
        if old_size <= split {
            // The right child holds only new leaves.
            proof.push(right);
            node = left;
        } else {
            // The left child holds only old leaves.
            proof.push(left);
            node = right;
        }
    }

    // Collected root first; proofs are consumed leaf first.
    proof.reverse();
    Ok(proof)
}
