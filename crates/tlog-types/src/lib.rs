//! Core value types for transparency-log Merkle trees
//!
//! This crate provides the data structures shared by proof generation and
//! verification: fixed-size hashes, leaf-range segments naming implicit tree
//! nodes, and the tree head a log commits to.

pub mod encoding;
pub mod error;
pub mod segment;
pub mod tree_head;

pub use encoding::{Hash, TreeHeadSignature, HASH_SIZE};
pub use error::{Error, Result};
pub use segment::Segment;
pub use tree_head::TreeHead;
