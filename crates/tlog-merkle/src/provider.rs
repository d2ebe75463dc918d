//! Hash providers
//!
//! A proof only names tree nodes. A [`HashProvider`] turns those names into
//! hashes, either by recomputing them from leaf hashes ([`LeafHashes`]) or by
//! looking up node hashes a log has already published. [`CachedProvider`]
//! memoizes any provider; that is sound because a node's hash never changes
//! once the log has fixed its leaves.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::hasher::{Rfc6962Hasher, TreeHasher};
use crate::tree::largest_pow2_lt;
use tlog_types::{Hash, Segment};

/// Resolves tree nodes to their hashes
pub trait HashProvider {
    /// Hash of the node covering `segment`
    ///
    /// Must return the same value every time it is called with the same
    /// segment.
    fn node_hash(&self, segment: Segment) -> Result<Hash>;

    /// Hash of the leaf at `index`
    fn leaf_hash(&self, index: usize) -> Result<Hash> {
        self.node_hash(Segment::leaf(index)?)
    }
}

impl<F> HashProvider for F
where
    F: Fn(Segment) -> Result<Hash>,
{
    fn node_hash(&self, segment: Segment) -> Result<Hash> {
        self(segment)
    }
}

/// In-memory list of leaf hashes that recomputes any node on demand
///
/// # Example
///
/// ```
/// use tlog_merkle::{HashProvider, LeafHashes};
/// use tlog_types::Segment;
///
/// let mut tree = LeafHashes::new();
/// for entry in [b"a", b"b", b"c"] {
///     tree.push_entry(entry);
/// }
///
/// let root = tree.node_hash(Segment::new(0, 3).unwrap()).unwrap();
/// assert_eq!(root, tree.root());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LeafHashes<H = Rfc6962Hasher> {
    hasher: H,
    leaves: Vec<Hash>,
}

impl LeafHashes<Rfc6962Hasher> {
    /// Create an empty tree using RFC 6962 hashing
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: TreeHasher> LeafHashes<H> {
    /// Create an empty tree with a specific hasher
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            hasher,
            leaves: Vec::new(),
        }
    }

    /// Create a tree from leaf hashes that were computed elsewhere
    pub fn from_leaf_hashes(hasher: H, leaves: Vec<Hash>) -> Self {
        Self { hasher, leaves }
    }

    /// Create a tree by hashing each entry as a leaf
    pub fn from_entries<I, D>(hasher: H, entries: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        let leaves = entries
            .into_iter()
            .map(|entry| hasher.hash_leaf(entry.as_ref()))
            .collect();
        Self { hasher, leaves }
    }

    /// Append a leaf hash, returning its index
    pub fn push(&mut self, leaf_hash: Hash) -> usize {
        self.leaves.push(leaf_hash);
        self.leaves.len() - 1
    }

    /// Hash `data` as a leaf and append it, returning its index
    pub fn push_entry(&mut self, data: impl AsRef<[u8]>) -> usize {
        let leaf_hash = self.hasher.hash_leaf(data.as_ref());
        self.push(leaf_hash)
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the tree has no leaves
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// The hasher used to combine nodes
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Root of the whole tree
    pub fn root(&self) -> Hash {
        self.subtree_hash(0, self.leaves.len())
    }

    /// Root of the tree truncated to its first `size` leaves
    pub fn root_at(&self, size: usize) -> Result<Hash> {
        if size > self.leaves.len() {
            return Err(Error::InvalidArgument(format!(
                "tree size {} exceeds the {} stored leaves",
                size,
                self.leaves.len()
            )));
        }
        Ok(self.subtree_hash(0, size))
    }

    /// RFC 6962 MTH over leaves `[start, end)`
    fn subtree_hash(&self, start: usize, end: usize) -> Hash {
        match end - start {
            0 => self.hasher.empty_root(),
            1 => self.leaves[start],
            n => {
                let split = start + largest_pow2_lt(n);
                let left = self.subtree_hash(start, split);
                let right = self.subtree_hash(split, end);
                self.hasher.hash_children(&left, &right)
            }
        }
    }
}

impl<H: TreeHasher> HashProvider for LeafHashes<H> {
    fn node_hash(&self, segment: Segment) -> Result<Hash> {
        if segment.end() > self.leaves.len() {
            return Err(Error::HashUnavailable(format!(
                "segment {} lies beyond the {} stored leaves",
                segment,
                self.leaves.len()
            )));
        }
        Ok(self.subtree_hash(segment.start(), segment.end()))
    }
}

/// Memoizes node hashes resolved by another provider
///
/// Safe to share between threads when the wrapped provider is.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    cache: RwLock<HashMap<Segment, Hash>>,
}

impl<P: HashProvider> CachedProvider<P> {
    /// Wrap a provider with an empty cache
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached node hashes
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Drop the cache and return the wrapped provider
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: HashProvider> HashProvider for CachedProvider<P> {
    fn node_hash(&self, segment: Segment) -> Result<Hash> {
        // A poisoned lock only costs us the cache, never correctness.
        let cached = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(&segment).copied());
        if let Some(hash) = cached {
            tracing::trace!("Node hash cache hit for {}", segment);
            return Ok(hash);
        }

        let hash = self.inner.node_hash(segment)?;
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(segment, hash);
        }
        Ok(hash)
    }
}
