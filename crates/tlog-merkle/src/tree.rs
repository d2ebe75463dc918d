//! Size and depth arithmetic for implicit Merkle trees
//!
//! A tree of `n` leaves is never built. Every node is the leaf range
//! `[k·2^i, min((k+1)·2^i, n))` at depth `i`, so the shape follows entirely
//! from `n`. When `n` is not a power of two, the last node at each depth may
//! cover fewer than `2^i` leaves.

use crate::error::{Error, Result};

/// Position of the most significant bit (0 for 0)
pub fn bit_length(n: usize) -> u32 {
    usize::BITS - n.leading_zeros()
}

/// Smallest power of two that is `>= n`, or `None` if it does not fit in a `usize`
///
/// `smallest_pow2_ge(0) == Some(1)`.
pub fn smallest_pow2_ge(n: usize) -> Option<usize> {
    n.checked_next_power_of_two()
}

/// Largest power of two strictly below `n`
///
/// This is the size of the complete left child of a subtree with `n` leaves.
/// Returns 0 for `n <= 1`, where there is nothing to split.
pub fn largest_pow2_lt(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    1 << (bit_length(n - 1) - 1)
}

/// Number of leaves in the left child of a node covering `n` leaves
///
/// The right child holds the remaining `n - split_point(n)` leaves. Fails for
/// `n < 2`, since a single leaf has no children.
pub fn split_point(n: usize) -> Result<usize> {
    if n < 2 {
        return Err(Error::InvalidArgument(format!(
            "a subtree of {} leaves cannot be split",
            n
        )));
    }
    Ok(largest_pow2_lt(n))
}

/// Number of levels in a tree of `n` leaves, counting the leaf level
///
/// 1 for `n <= 1`, otherwise the smallest `d` with `2^(d-1) >= n`.
pub fn tree_depth(n: usize) -> u32 {
    if n <= 1 {
        return 1;
    }
    bit_length(n - 1) + 1
}
