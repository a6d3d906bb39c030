use smallvec::{SmallVec, smallvec};

use crate::error::Result;
use crate::range::{CuIdx, Range};
use crate::transaction::ChangeSet;


/// A set of non-overlapping ranges with a designated primary.
///
/// A selection always contains at least one range. Remote edits move it
/// through [`Selection::map`]; decorations that must notice their content
/// disappearing use [`Selection::track`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	/// The collection of ranges (always non-empty).
	ranges: SmallVec<[Range; 1]>,
	/// Index of the primary range within `ranges`.
	primary_index: usize,
}

impl Selection {
	/// Create a new selection with at least one range.
	pub fn new(primary: Range, others: impl IntoIterator<Item = Range>) -> Self {
		let mut ranges: SmallVec<[Range; 1]> = smallvec![primary];
		ranges.extend(others);

		let mut sel = Self { ranges, primary_index: 0 };
		sel.normalize();
		sel
	}

	/// Creates a selection from a vector of ranges.
	///
	/// # Panics
	///
	/// Panics if `ranges` is empty or `primary_index` is out of bounds.
	pub fn from_vec(ranges: Vec<Range>, primary_index: usize) -> Self {
		assert!(!ranges.is_empty(), "Selection cannot be empty");
		assert!(
			primary_index < ranges.len(),
			"primary_index ({primary_index}) out of bounds for {} ranges",
			ranges.len()
		);

		let mut sel = Self {
			ranges: ranges.into_iter().collect(),
			primary_index,
		};
		sel.normalize();
		sel
	}

	/// Creates a single-range selection.
	pub fn single(anchor: CuIdx, head: CuIdx) -> Self {
		Self {
			ranges: smallvec![Range::new(anchor, head)],
			primary_index: 0,
		}
	}

	/// Creates a point selection (zero-width cursor).
	pub fn point(pos: CuIdx) -> Self {
		Self::single(pos, pos)
	}

	/// Returns the primary range.
	pub fn primary(&self) -> Range {
		self.ranges[self.primary_index]
	}

	/// Returns the index of the primary range.
	pub fn primary_index(&self) -> usize {
		self.primary_index
	}

	/// Returns all ranges as a slice.
	pub fn ranges(&self) -> &[Range] {
		&self.ranges
	}

	/// Returns the number of ranges in this selection.
	#[allow(clippy::len_without_is_empty, reason = "Selection is never empty")]
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	/// Iterates over all ranges.
	pub fn iter(&self) -> impl Iterator<Item = &Range> {
		self.ranges.iter()
	}

	/// Adds a new range to the selection.
	pub fn push(&mut self, range: Range) {
		self.ranges.push(range);
		self.normalize();
	}

	/// Transforms ranges with a fallible function, filtering out `None` results.
	///
	/// Returns `None` if all ranges are filtered out. If the primary range is
	/// dropped, the first surviving range becomes primary.
	pub fn try_filter_transform<F>(&self, mut f: F) -> Option<Self>
	where
		F: FnMut(&Range) -> Option<Range>,
	{
		let mut ranges = Vec::new();
		let mut new_primary_index = 0;

		for (idx, range) in self.ranges.iter().enumerate() {
			if let Some(new_range) = f(range) {
				if idx == self.primary_index {
					new_primary_index = ranges.len();
				}
				ranges.push(new_range);
			}
		}

		if ranges.is_empty() {
			None
		} else {
			Some(Self::from_vec(ranges, new_primary_index))
		}
	}

	/// Relocates every range through a changeset.
	pub fn map(&self, changes: &ChangeSet) -> Result<Self> {
		let ranges = self
			.ranges
			.iter()
			.map(|range| range.map(changes))
			.collect::<Result<SmallVec<[Range; 1]>>>()?;
		let mut sel = Self {
			ranges,
			primary_index: self.primary_index,
		};
		sel.normalize();
		Ok(sel)
	}

	/// Relocates every range, dropping ranges a deletion destroyed.
	///
	/// Returns `Ok(None)` when nothing survives.
	pub fn track(&self, changes: &ChangeSet) -> Result<Option<Self>> {
		let mut tracked = Vec::with_capacity(self.ranges.len());
		for range in &self.ranges {
			tracked.push(range.track(changes)?);
		}
		let mut tracked = tracked.into_iter();
		Ok(self.try_filter_transform(|_| tracked.next().flatten()))
	}

	/// Returns true if any range contains the given position.
	pub fn contains(&self, pos: CuIdx) -> bool {
		self.ranges.iter().any(|r: &Range| r.contains(pos))
	}

	/// Sorts ranges and merges overlapping ones, following the primary.
	///
	/// Adjacent ranges such as `[0, 5)` and `[5, 10)` stay separate.
	fn normalize(&mut self) {
		if self.ranges.len() <= 1 {
			self.primary_index = 0;
			return;
		}

		let primary = self.ranges[self.primary_index];

		self.ranges.sort_by_key(|r: &Range| r.min());

		let mut merged: SmallVec<[Range; 1]> = SmallVec::new();
		let mut primary_index = 0;

		for range in &self.ranges {
			if let Some(last) = merged.last_mut()
				&& last.overlaps(range)
			{
				let old_last = *last;
				*last = last.merge(range);
				if *range == primary || old_last == primary {
					primary_index = merged.len() - 1;
				}
				continue;
			}

			if *range == primary {
				primary_index = merged.len();
			}
			merged.push(*range);
		}

		self.ranges = merged;
		self.primary_index = primary_index.min(self.ranges.len().saturating_sub(1));
	}
}

impl Default for Selection {
	fn default() -> Self {
		Self::point(0)
	}
}

impl From<Range> for Selection {
	fn from(range: Range) -> Self {
		Self {
			ranges: smallvec![range],
			primary_index: 0,
		}
	}
}
