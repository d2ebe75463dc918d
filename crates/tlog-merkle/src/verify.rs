//! Proof verification
//!
//! Verification folds the hashes of a segment proof into a root and compares
//! it with a root the caller already trusts. A root that does not match is
//! reported as [`Verification::Mismatch`]: it is evidence against the log (or
//! the proof's source), not a programming error, and callers decide what to
//! do about it.

use crate::error::{Error, Result};
use crate::hasher::TreeHasher;
use crate::proof::{consistency_proof, inclusion_proof};
use crate::provider::HashProvider;
use tlog_types::{Hash, Segment, TreeHead};

/// Which root failed to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchedRoot {
    /// The root of the tree an inclusion proof was checked against
    Tree,
    /// The old root of a consistency proof
    Old,
    /// The new root of a consistency proof
    New,
}

impl std::fmt::Display for MismatchedRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchedRoot::Tree => write!(f, "tree root"),
            MismatchedRoot::Old => write!(f, "old root"),
            MismatchedRoot::New => write!(f, "new root"),
        }
    }
}

/// Outcome of checking a proof against trusted roots
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Verification {
    /// Every reconstructed root matched
    Verified,
    /// A reconstructed root differed from the trusted one
    Mismatch {
        root: MismatchedRoot,
        expected: Hash,
        computed: Hash,
    },
}

impl Verification {
    pub(crate) fn compare(root: MismatchedRoot, expected: &Hash, computed: &Hash) -> Self {
        if expected == computed {
            Verification::Verified
        } else {
            tracing::warn!(
                "{} mismatch: expected {}, computed {}",
                root,
                expected,
                computed
            );
            Verification::Mismatch {
                root,
                expected: *expected,
                computed: *computed,
            }
        }
    }

    /// Whether every root matched
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }

    /// Treat a mismatch as an error
    pub fn into_result(self) -> Result<()> {
        match self {
            Verification::Verified => Ok(()),
            Verification::Mismatch {
                expected, computed, ..
            } => Err(Error::VerificationMismatch {
                expected,
                actual: computed,
            }),
        }
    }
}

/// Combine the running node with one adjacent sibling
///
/// The sibling with the lower start is hashed on the left.
fn fold_step<H: TreeHasher + ?Sized>(
    hasher: &H,
    covered: Segment,
    hash: &Hash,
    sibling: Segment,
    sibling_hash: &Hash,
) -> Result<(Segment, Hash)> {
    let merged = covered.merge(&sibling).ok_or_else(|| {
        Error::InvalidProof(format!("segment {} does not border {}", sibling, covered))
    })?;
    let combined = if sibling.start() < covered.start() {
        hasher.hash_children(sibling_hash, hash)
    } else {
        hasher.hash_children(hash, sibling_hash)
    };
    Ok((merged, combined))
}

/// Fold a segment proof into a root
///
/// Starts from `anchor` (a leaf, or a node of an older tree) with hash
/// `anchor_hash` and combines it with the hash of each proof segment in turn.
/// A segment starting before the running range is hashed on the left,
/// anything else on the right. Returns the range covered by the result and
/// its hash.
///
/// Fails with [`Error::InvalidProof`] if a segment does not border the range
/// covered so far.
///
/// Node hashes are resolved through `provider`, which may be any
/// `Fn(Segment) -> Result<Hash>` closure. Combining goes through
/// [`TreeHasher::hash_children`] rather than a bare closure, so a fold always
/// uses the same domain separation as the log's leaf hashing.
pub fn fold_proof<P, H>(
    anchor: Segment,
    anchor_hash: &Hash,
    proof: &[Segment],
    provider: &P,
    hasher: &H,
) -> Result<(Segment, Hash)>
where
    P: HashProvider + ?Sized,
    H: TreeHasher + ?Sized,
{
    let mut covered = anchor;
    let mut hash = *anchor_hash;
    for &segment in proof {
        let sibling_hash = provider.node_hash(segment)?;
        (covered, hash) = fold_step(hasher, covered, &hash, segment, &sibling_hash)?;
    }
    Ok((covered, hash))
}

/// Verify that `leaf_hash` is the leaf at `index` of the tree with root `expected_root`
///
/// `proof` must be the proof [`inclusion_proof`] produces for `(tree_size, index)`.
pub fn verify_inclusion<P, H>(
    tree_size: usize,
    index: usize,
    leaf_hash: &Hash,
    proof: &[Segment],
    provider: &P,
    hasher: &H,
    expected_root: &Hash,
) -> Result<Verification>
where
    P: HashProvider + ?Sized,
    H: TreeHasher + ?Sized,
{
    let expected_proof = inclusion_proof(tree_size, index)?;
    if proof != expected_proof.as_slice() {
        return Err(Error::InvalidProof(format!(
            "expected {} segments for leaf {} in tree of size {}, got {:?}",
            expected_proof.len(),
            index,
            tree_size,
            proof
        )));
    }

    tracing::debug!(
        "Starting inclusion verification for leaf {} in tree of size {}",
        index,
        tree_size
    );
    let (covered, root) = fold_proof(Segment::leaf(index)?, leaf_hash, proof, provider, hasher)?;
    if covered.start() != 0 || covered.end() != tree_size {
        return Err(Error::InvalidProof(format!(
            "proof covers {} instead of the whole tree of size {}",
            covered, tree_size
        )));
    }

    let outcome = Verification::compare(MismatchedRoot::Tree, expected_root, &root);
    tracing::debug!("Inclusion verification completed, verified: {}", outcome.is_verified());
    Ok(outcome)
}

/// Verify that the tree with root `old_root` is a prefix of the tree with root `new_root`
///
/// `proof` must be the proof [`consistency_proof`] produces for
/// `(old_size, new_size)`. Two roots are rebuilt from it: the old one from
/// the segments inside the old tree, the new one from all segments. When the
/// first segment is the whole old tree, its hash is `old_root` itself.
///
/// Equal sizes need no hashing: the roots must simply be equal.
pub fn verify_consistency<P, H>(
    old_size: usize,
    new_size: usize,
    proof: &[Segment],
    provider: &P,
    hasher: &H,
    old_root: &Hash,
    new_root: &Hash,
) -> Result<Verification>
where
    P: HashProvider + ?Sized,
    H: TreeHasher + ?Sized,
{
    let expected_proof = consistency_proof(old_size, new_size)?;
    let trivial = old_size == new_size && proof.is_empty();
    if !trivial && proof != expected_proof.as_slice() {
        return Err(Error::InvalidProof(format!(
            "expected {} segments from size {} to size {}, got {:?}",
            expected_proof.len(),
            old_size,
            new_size,
            proof
        )));
    }

    if old_size == new_size {
        return Ok(Verification::compare(
            MismatchedRoot::New,
            new_root,
            old_root,
        ));
    }

    tracing::debug!(
        "Starting consistency verification from size {} to size {}",
        old_size,
        new_size
    );
    let (&first, rest) = proof
        .split_first()
        .ok_or_else(|| Error::InvalidProof("empty consistency proof".to_string()))?;
    let seed = if first.start() == 0 {
        *old_root
    } else {
        provider.node_hash(first)?
    };

    let (mut old_covered, mut old_hash) = (first, seed);
    let (mut new_covered, mut new_hash) = (first, seed);
    for &segment in rest {
        let sibling_hash = provider.node_hash(segment)?;
        if segment.end() <= old_size {
            (old_covered, old_hash) =
                fold_step(hasher, old_covered, &old_hash, segment, &sibling_hash)?;
        }
        (new_covered, new_hash) =
            fold_step(hasher, new_covered, &new_hash, segment, &sibling_hash)?;
    }

    if old_covered.start() != 0 || old_covered.end() != old_size {
        return Err(Error::InvalidProof(format!(
            "proof rebuilds {} instead of the old tree of size {}",
            old_covered, old_size
        )));
    }
    if new_covered.start() != 0 || new_covered.end() != new_size {
        return Err(Error::InvalidProof(format!(
            "proof rebuilds {} instead of the new tree of size {}",
            new_covered, new_size
        )));
    }

    let outcome = match Verification::compare(MismatchedRoot::Old, old_root, &old_hash) {
        Verification::Verified => Verification::compare(MismatchedRoot::New, new_root, &new_hash),
        mismatch => mismatch,
    };
    tracing::debug!("Consistency verification completed, verified: {}", outcome.is_verified());
    Ok(outcome)
}

/// [`verify_inclusion`] against a tree head
pub fn verify_inclusion_in_head<P, H>(
    head: &TreeHead,
    index: usize,
    leaf_hash: &Hash,
    proof: &[Segment],
    provider: &P,
    hasher: &H,
) -> Result<Verification>
where
    P: HashProvider + ?Sized,
    H: TreeHasher + ?Sized,
{
    verify_inclusion(
        head.tree_size,
        index,
        leaf_hash,
        proof,
        provider,
        hasher,
        &head.root_hash,
    )
}

/// [`verify_consistency`] between two tree heads of the same log
pub fn verify_tree_heads<P, H>(
    old: &TreeHead,
    new: &TreeHead,
    proof: &[Segment],
    provider: &P,
    hasher: &H,
) -> Result<Verification>
where
    P: HashProvider + ?Sized,
    H: TreeHasher + ?Sized,
{
    verify_consistency(
        old.tree_size,
        new.tree_size,
        proof,
        provider,
        hasher,
        &old.root_hash,
        &new.root_hash,
    )
}
