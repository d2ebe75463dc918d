//! Error types for tlog-merkle

use thiserror::Error;
use tlog_types::Hash;

/// Errors that can occur in Merkle tree operations
///
/// A root that fails to match is normally reported as
/// [`Verification::Mismatch`](crate::Verification::Mismatch), not as an error.
/// [`Error::VerificationMismatch`] only appears when a caller opts into
/// treating a mismatch as fatal via
/// [`Verification::into_result`](crate::Verification::into_result).
#[derive(Error, Debug)]
pub enum Error {
    /// Leaf index is not inside the tree
    #[error("Leaf index {index} out of range for tree of size {tree_size}")]
    IndexOutOfRange { index: usize, tree_size: usize },

    /// Degenerate tree sizes or arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Proof that cannot describe any path through the tree
    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    /// Reconstructed root differs from the trusted one
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    VerificationMismatch { expected: Hash, actual: Hash },

    /// A hash provider could not resolve a segment
    #[error("Hash unavailable: {0}")]
    HashUnavailable(String),

    /// Error from the shared value types
    #[error(transparent)]
    Types(#[from] tlog_types::Error),
}

/// Result type for Merkle tree operations
pub type Result<T> = std::result::Result<T, Error>;
