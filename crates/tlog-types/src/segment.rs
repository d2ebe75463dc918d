//! Leaf ranges identifying implicit tree nodes

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A half-open leaf range `[start, end)` naming one node of an implicit
/// Merkle tree.
///
/// The tree itself is never materialized: a node is fully described by the
/// leaves it covers. `start < end` always holds.
///
/// Ordering is by `(start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawSegment")]
pub struct Segment {
    start: usize,
    end: usize,
}

#[derive(Deserialize)]
struct RawSegment {
    start: usize,
    end: usize,
}

impl TryFrom<RawSegment> for Segment {
    type Error = Error;

    fn try_from(raw: RawSegment) -> Result<Self> {
        Segment::new(raw.start, raw.end)
    }
}

impl Segment {
    /// Create a segment covering `[start, end)`
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidSegment(format!(
                "start {} must be below end {}",
                start, end
            )));
        }
        Ok(Segment { start, end })
    }

    /// The segment holding the single leaf at `index`
    ///
    /// Fails for `usize::MAX`, which no tree can address.
    pub fn leaf(index: usize) -> Result<Self> {
        let end = index.checked_add(1).ok_or_else(|| {
            Error::InvalidSegment(format!("leaf index {} has no end bound", index))
        })?;
        Ok(Segment { start: index, end })
    }

    /// First leaf covered
    pub const fn start(&self) -> usize {
        self.start
    }

    /// One past the last leaf covered
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of leaves covered, never zero
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether `other` lies entirely inside this segment
    pub fn contains(&self, other: &Segment) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two segments touch without overlapping
    pub fn is_adjacent_to(&self, other: &Segment) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// The union of two adjacent segments, or `None` if they do not touch
    pub fn merge(&self, other: &Segment) -> Option<Segment> {
        if !self.is_adjacent_to(other) {
            return None;
        }
        Some(Segment {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }

    /// Whether the two segments are the children of one node
    ///
    /// The left child is always a complete, aligned power-of-two subtree. The
    /// right child directly follows it and may be shorter when it is the
    /// incomplete rightmost subtree of the tree.
    pub fn is_sibling_of(&self, other: &Segment) -> bool {
        let (left, right) = if self.start < other.start {
            (self, other)
        } else {
            (other, self)
        };
        let width = left.len();
        width.is_power_of_two()
            && left.start % width == 0
            && (left.start / width) % 2 == 0
            && right.start == left.end
            && right.len() <= width
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
