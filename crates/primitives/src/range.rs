use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transaction::{Assoc, ChangeSet, MapMode};

/// A position in the text, measured in UTF-16 code units.
///
/// This is the coordinate space of every interface in weft: not bytes, not
/// chars. Offsets that split a surrogate pair are rejected where text is
/// touched.
pub type CuIdx = usize;

/// A length or count in the text, measured in UTF-16 code units.
///
/// Distinct from [`CuIdx`] to avoid passing an index where a length is
/// expected or vice versa.
pub type CuLen = usize;

/// Range direction (anchor to head).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// Head is at or after anchor.
	Forward,
	/// Head is before anchor.
	Backward,
}

/// A text range defined by anchor and head positions.
///
/// The extent is the half-open `[min, max)`. Cursors, selections and
/// decorations are all ranges; they follow concurrent edits through
/// [`Range::map`] or [`Range::track`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
	/// The fixed end of the range.
	pub anchor: CuIdx,
	/// The moving end of the range.
	pub head: CuIdx,
}

impl Range {
	/// Creates a new range from anchor to head.
	pub fn new(anchor: CuIdx, head: CuIdx) -> Self {
		Self { anchor, head }
	}

	/// Creates a zero-width range (cursor) at the given position.
	pub fn point(pos: CuIdx) -> Self {
		Self::new(pos, pos)
	}

	/// Returns the smaller of anchor and head.
	#[inline]
	pub fn min(&self) -> CuIdx {
		std::cmp::min(self.anchor, self.head)
	}

	/// Returns the larger of anchor and head.
	#[inline]
	pub fn max(&self) -> CuIdx {
		std::cmp::max(self.anchor, self.head)
	}

	/// Returns the length of the extent in code units.
	#[inline]
	pub fn len(&self) -> CuLen {
		self.max() - self.min()
	}

	/// Returns true if anchor equals head.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.anchor == self.head
	}

	/// Alias of [`Range::is_empty`] that reads better for cursors.
	#[inline]
	pub fn is_point(&self) -> bool {
		self.is_empty()
	}

	/// Returns the direction of this range.
	#[inline]
	pub fn direction(&self) -> Direction {
		if self.head < self.anchor {
			Direction::Backward
		} else {
			Direction::Forward
		}
	}

	/// Returns true if the position is within `[min, max)`.
	pub fn contains(&self, pos: CuIdx) -> bool {
		pos >= self.min() && pos < self.max()
	}

	/// Returns true if this range overlaps with another.
	pub fn overlaps(&self, other: &Range) -> bool {
		if self.min() < other.max() && other.min() < self.max() {
			return true;
		}

		self.is_empty() && other.is_empty() && self.min() == other.min()
	}

	/// Merges two ranges, preserving direction of self.
	pub fn merge(&self, other: &Range) -> Self {
		let from = std::cmp::min(self.min(), other.min());
		let to = std::cmp::max(self.max(), other.max());

		if self.direction() == Direction::Forward {
			Self::new(from, to)
		} else {
			Self::new(to, from)
		}
	}

	/// Relocates the range through a changeset.
	///
	/// Text inserted exactly at either edge stays outside the range: the
	/// lower edge associates after, the upper edge before. A cursor
	/// associates before. If the whole extent is replaced the range
	/// collapses onto the start of the replacement.
	pub fn map(&self, changes: &ChangeSet) -> Result<Range> {
		let (lower, upper) = self.edge_assoc();
		let min = changes.map_pos(self.min(), lower)?;
		let max = changes.map_pos(self.max(), upper)?;
		Ok(self.with_extent(min.min(max), max))
	}

	/// Relocates the range, or reports `None` if a concurrent deletion
	/// destroyed either edge.
	pub fn track(&self, changes: &ChangeSet) -> Result<Option<Range>> {
		let (lower, upper) = self.edge_assoc();
		let min = changes.map(self.min(), lower, MapMode::TrackDeletion)?.pos();
		let max = changes.map(self.max(), upper, MapMode::TrackDeletion)?.pos();
		Ok(min.zip(max).map(|(min, max)| self.with_extent(min.min(max), max)))
	}

	fn edge_assoc(&self) -> (Assoc, Assoc) {
		if self.is_empty() {
			(Assoc::Before, Assoc::Before)
		} else {
			(Assoc::After, Assoc::Before)
		}
	}

	fn with_extent(&self, min: CuIdx, max: CuIdx) -> Self {
		match self.direction() {
			Direction::Forward => Self::new(min, max),
			Direction::Backward => Self::new(max, min),
		}
	}
}

impl Default for Range {
	fn default() -> Self {
		Self::point(0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transaction::Change;

	#[test]
	fn test_range_basics() {
		let r = Range::new(5, 10);
		assert_eq!(r.min(), 5);
		assert_eq!(r.max(), 10);
		assert_eq!(r.len(), 5);
		assert!(!r.is_empty());
		assert_eq!(r.direction(), Direction::Forward);
	}

	#[test]
	fn test_range_backward() {
		let r = Range::new(10, 5);
		assert_eq!(r.min(), 5);
		assert_eq!(r.max(), 10);
		assert_eq!(r.len(), 5);
		assert_eq!(r.direction(), Direction::Backward);
	}

	#[test]
	fn test_range_contains() {
		let r = Range::new(5, 10);
		assert!(!r.contains(4));
		assert!(r.contains(5));
		assert!(r.contains(7));
		assert!(!r.contains(10));
	}

	#[test]
	fn test_range_overlaps() {
		let r1 = Range::new(5, 10);
		let r2 = Range::new(8, 15);
		let r3 = Range::new(10, 15);

		assert!(r1.overlaps(&r2));
		assert!(!r1.overlaps(&r3));
		assert!(Range::point(5).overlaps(&Range::point(5)));
	}

	#[test]
	fn test_range_merge() {
		let merged = Range::new(5, 10).merge(&Range::new(8, 15));
		assert_eq!(merged, Range::new(5, 15));
		let merged = Range::new(10, 5).merge(&Range::new(8, 15));
		assert_eq!(merged, Range::new(15, 5));
	}

	#[test]
	fn test_map_keeps_edge_insertions_outside() {
		let cs = ChangeSet::new(20, [Change::insert(5, "<<"), Change::insert(10, ">>")]).unwrap();
		assert_eq!(Range::new(5, 10).map(&cs).unwrap(), Range::new(7, 12));
		assert_eq!(Range::new(10, 5).map(&cs).unwrap(), Range::new(12, 7));
		assert_eq!(Range::point(5).map(&cs).unwrap(), Range::point(5));
	}

	#[test]
	fn test_map_collapses_replaced_extent() {
		let cs = ChangeSet::new(20, [Change::replace(2, 12, "xyz")]).unwrap();
		assert_eq!(Range::new(4, 8).map(&cs).unwrap(), Range::point(2));
	}

	#[test]
	fn test_track_reports_destroyed_range() {
		let cs = ChangeSet::new(20, [Change::delete(3, 9)]).unwrap();
		assert_eq!(cs.len_after(), 14);
		assert_eq!(Range::new(4, 12).track(&cs).unwrap(), None);
		assert_eq!(Range::new(10, 12).track(&cs).unwrap(), Some(Range::new(4, 6)));
		assert_eq!(Range::new(9, 12).track(&cs).unwrap(), Some(Range::new(3, 6)));
	}
}
