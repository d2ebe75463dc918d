//! Tree head values published by a log
//!
//! A tree head commits a log to a tree size and root hash. This module only
//! models the committed values; the signature is carried as opaque bytes.

use crate::encoding::{Hash, TreeHeadSignature};
use crate::error::Result;
use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// The content of an RFC 6962 signed tree head, in the shape of a log's
/// `get-sth` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeHead {
    /// Number of leaves committed to
    pub tree_size: usize,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Root hash of the tree of `tree_size` leaves
    #[serde(rename = "sha256_root_hash")]
    pub root_hash: Hash,
    /// Signature over the tree head (not verified here)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_head_signature: Option<TreeHeadSignature>,
}

impl TreeHead {
    /// Create an unsigned tree head
    pub fn new(tree_size: usize, root_hash: Hash) -> Self {
        Self {
            tree_size,
            timestamp: 0,
            root_hash,
            tree_head_signature: None,
        }
    }

    /// Parse from a `get-sth` JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The segment covering the whole committed tree, or `None` for an empty log
    pub fn root_segment(&self) -> Option<Segment> {
        Segment::new(0, self.tree_size).ok()
    }
}
