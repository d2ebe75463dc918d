//! RFC 6962 Merkle audit paths for transparency logs
//!
//! This crate computes which tree nodes a verifier needs to check that a
//! leaf is in a log ([`inclusion_proof`]) or that a log only ever appended to
//! an older version of itself ([`consistency_proof`]), and folds the hashes of
//! those nodes back into roots to compare against trusted ones.
//!
//! The tree is implicit: every node is a [`Segment`] of leaf indices, and
//! node hashes come from a caller-supplied [`HashProvider`].
//!
//! ```
//! use tlog_merkle::{inclusion_proof, verify_inclusion, HashProvider, LeafHashes, Rfc6962Hasher};
//!
//! let tree = LeafHashes::from_entries(Rfc6962Hasher::new(), [b"a", b"b", b"c", b"d", b"e"]);
//! let proof = inclusion_proof(5, 2).unwrap();
//! let outcome = verify_inclusion(
//!     5,
//!     2,
//!     &tree.leaf_hash(2).unwrap(),
//!     &proof,
//!     &tree,
//!     tree.hasher(),
//!     &tree.root(),
//! )
//! .unwrap();
//! assert!(outcome.is_verified());
//! ```

pub mod error;
pub mod hasher;
pub mod proof;
pub mod provider;
pub mod rfc6962;
pub mod tree;
pub mod verify;

pub use error::{Error, Result};
pub use hasher::{
    hash_children, hash_leaf, DomainPrefixes, Rfc6962Hasher, TreeHasher, LEAF_HASH_PREFIX,
    NODE_HASH_PREFIX,
};
pub use proof::{consistency_proof, inclusion_proof};
pub use provider::{CachedProvider, HashProvider, LeafHashes};
pub use tlog_types::{Hash, Segment, TreeHead, HASH_SIZE};
pub use tree::{largest_pow2_lt, smallest_pow2_ge, split_point, tree_depth};
pub use verify::{
    fold_proof, verify_consistency, verify_inclusion, verify_inclusion_in_head,
    verify_tree_heads, MismatchedRoot, Verification,
};
