//! Leaf and node hashing
//!
//! RFC 6962 hashes a leaf as `SHA-256(0x00 || data)` and an interior node as
//! `SHA-256(0x01 || left || right)`, so no leaf can pass for a node. The
//! prefix bytes come from [`DomainPrefixes`] for logs that use other values.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tlog_types::Hash;

/// RFC 6962 leaf prefix
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// RFC 6962 interior node prefix
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Combines leaf data and child hashes into tree hashes
pub trait TreeHasher {
    /// Hash of a single leaf entry
    fn hash_leaf(&self, data: &[u8]) -> Hash;

    /// Hash of an interior node from its left and right children
    fn hash_children(&self, left: &Hash, right: &Hash) -> Hash;

    /// Root of a tree with no leaves
    fn empty_root(&self) -> Hash;
}

/// Leaf and node prefix bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainPrefixes {
    /// Byte prepended to leaf data
    pub leaf: u8,
    /// Byte prepended to a pair of child hashes
    pub node: u8,
}

impl Default for DomainPrefixes {
    fn default() -> Self {
        Self {
            leaf: LEAF_HASH_PREFIX,
            node: NODE_HASH_PREFIX,
        }
    }
}

impl DomainPrefixes {
    /// Use a custom leaf prefix
    pub fn with_leaf(mut self, prefix: u8) -> Self {
        self.leaf = prefix;
        self
    }

    /// Use a custom node prefix
    pub fn with_node(mut self, prefix: u8) -> Self {
        self.node = prefix;
        self
    }
}

/// SHA-256 tree hasher with RFC 6962 domain separation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rfc6962Hasher {
    prefixes: DomainPrefixes,
}

impl Rfc6962Hasher {
    /// Create a hasher with the RFC 6962 prefixes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher with custom prefixes
    ///
    /// Fails if the two prefixes are equal, since leaves and nodes would then
    /// share a hash domain.
    pub fn with_prefixes(prefixes: DomainPrefixes) -> Result<Self> {
        if prefixes.leaf == prefixes.node {
            return Err(Error::InvalidArgument(format!(
                "leaf and node prefixes must differ, both are {:#04x}",
                prefixes.leaf
            )));
        }
        Ok(Self { prefixes })
    }

    /// The prefixes in use
    pub fn prefixes(&self) -> DomainPrefixes {
        self.prefixes
    }
}

impl TreeHasher for Rfc6962Hasher {
    /// Returns: SHA256(leaf_prefix || leaf_data)
    fn hash_leaf(&self, data: &[u8]) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update([self.prefixes.leaf]);
        hasher.update(data);
        Hash::from_bytes(hasher.finalize().into())
    }

    /// Returns: SHA256(node_prefix || left || right)
    fn hash_children(&self, left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update([self.prefixes.node]);
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Hash::from_bytes(hasher.finalize().into())
    }

    /// Returns: SHA256("")
    fn empty_root(&self) -> Hash {
        Hash::from_bytes(Sha256::digest(b"").into())
    }
}

/// Hash a leaf node with the RFC 6962 prefix
pub fn hash_leaf(data: &[u8]) -> Hash {
    Rfc6962Hasher::new().hash_leaf(data)
}

/// Hash two child nodes with the RFC 6962 prefix
pub fn hash_children(left: &Hash, right: &Hash) -> Hash {
    Rfc6962Hasher::new().hash_children(left, right)
}
