//! Accepted blocks of repeated lines.

use std::ops::Range;

use serde::Serialize;

use crate::error::{ConcordanceError, Result};

/// A run of `part_count` consecutive elements that repeats at two or more
/// disjoint places in the input.
///
/// Each repetition is an *occurrence*; each element within it is a *part*.
/// Blocks borrow the searched sequence and cannot be modified once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a, T> {
    source: &'a [T],
    starts: Vec<usize>,
    part_count: usize,
}

impl<'a, T> Block<'a, T> {
    pub(crate) fn new(source: &'a [T], starts: Vec<usize>, part_count: usize) -> Self {
        debug_assert!(starts.len() > 1 && part_count > 0);
        debug_assert!(starts.iter().all(|&s| s + part_count <= source.len()));
        Self {
            source,
            starts,
            part_count,
        }
    }

    /// Number of places this block repeats.
    #[must_use]
    pub fn occurrence_count(&self) -> usize {
        self.starts.len()
    }

    /// Number of consecutive elements in each occurrence.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.part_count
    }

    /// Element `part` of occurrence `occurrence`.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::OutOfRange`] when either index is outside
    /// the block.
    pub fn part_at(&self, occurrence: usize, part: usize) -> Result<&'a T> {
        let range = self.positions(occurrence)?;
        if part >= self.part_count {
            return Err(ConcordanceError::OutOfRange {
                what: "part",
                index: part,
                len: self.part_count,
            });
        }
        Ok(&self.source[range.start + part])
    }

    /// Original positions covered by occurrence `occurrence`.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordanceError::OutOfRange`] for an unknown occurrence.
    pub fn positions(&self, occurrence: usize) -> Result<Range<usize>> {
        let start = *self
            .starts
            .get(occurrence)
            .ok_or(ConcordanceError::OutOfRange {
                what: "occurrence",
                index: occurrence,
                len: self.starts.len(),
            })?;
        Ok(start..start + self.part_count)
    }

    /// First position of every occurrence, in ascending order.
    #[must_use]
    pub fn occurrence_starts(&self) -> &[usize] {
        &self.starts
    }

    /// Elements of the first occurrence; all occurrences key the same way.
    #[must_use]
    pub fn parts(&self) -> &'a [T] {
        let start = self.starts[0];
        &self.source[start..start + self.part_count]
    }

    /// Total positions claimed by this block.
    #[must_use]
    pub fn covered_positions(&self) -> usize {
        self.starts.len() * self.part_count
    }

    /// Serializable position summary.
    #[must_use]
    pub fn layout(&self) -> BlockLayout {
        BlockLayout {
            part_count: self.part_count,
            occurrence_starts: self.starts.clone(),
        }
    }
}

/// Positions of a block without the borrowed elements.
///
/// Two runs produced the same block when their layouts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BlockLayout {
    /// Consecutive elements per occurrence.
    pub part_count: usize,
    /// First position of each occurrence.
    pub occurrence_starts: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<&'static str> {
        vec!["a", "b", "x", "a", "b"]
    }

    #[test]
    fn test_counts() {
        let lines = sample();
        let block = Block::new(&lines, vec![0, 3], 2);
        assert_eq!(block.occurrence_count(), 2);
        assert_eq!(block.part_count(), 2);
        assert_eq!(block.covered_positions(), 4);
    }

    #[test]
    fn test_part_at() {
        let lines = sample();
        let block = Block::new(&lines, vec![0, 3], 2);
        assert_eq!(*block.part_at(1, 0).unwrap(), "a");
        assert_eq!(*block.part_at(1, 1).unwrap(), "b");
        assert_eq!(block.parts(), &["a", "b"]);
    }

    #[test]
    fn test_part_at_out_of_range() {
        let lines = sample();
        let block = Block::new(&lines, vec![0, 3], 2);
        assert!(matches!(
            block.part_at(2, 0),
            Err(ConcordanceError::OutOfRange {
                what: "occurrence",
                index: 2,
                len: 2
            })
        ));
        assert!(matches!(
            block.part_at(0, 2),
            Err(ConcordanceError::OutOfRange { what: "part", .. })
        ));
    }

    #[test]
    fn test_positions() {
        let lines = sample();
        let block = Block::new(&lines, vec![0, 3], 2);
        assert_eq!(block.positions(1).unwrap(), 3..5);
        assert!(block.positions(5).is_err());
        assert_eq!(
            block.layout(),
            BlockLayout {
                part_count: 2,
                occurrence_starts: vec![0, 3]
            }
        );
    }
}
