use std::cmp::Ordering;
use std::iter::Peekable;
use std::slice;

use super::types::{Change, Insertion, Operation};
use crate::error::{ChangeError, Result, TextError};
use crate::range::{CuIdx, CuLen};
use crate::text::Text;

/// A set of changes to a document, applied atomically.
///
/// Stored as a sequence of retain, delete and insert operations that walks
/// the whole source document. The sequence is kept canonical: neighbouring
/// operations of the same kind are merged and empty operations are never
/// stored. An insertion keeps its anchor: text placed before a deletion
/// replaces it, text placed after a deletion sits at the deletion's end.
/// Both place the same characters but map positions differently, so they
/// stay distinct and only changesets with the same effect on positions
/// compare equal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	/// Sequence of retain/delete/insert operations.
	pub(super) ops: Vec<Operation>,
	/// Length of the source document.
	pub(super) len: CuLen,
	/// Length of the document after applying the changes.
	pub(super) len_after: CuLen,
}

impl ChangeSet {
	/// Builds a changeset for a document of length `len`.
	///
	/// Changes may be given in any order. They are sorted by position;
	/// changes that merely touch stay independent (an insertion at `x` sorts
	/// before a replacement starting at `x`, insertions at the same point
	/// keep their given order). Ranges that are inverted, out of bounds or
	/// overlapping are rejected.
	///
	/// Only the document length is known here, so offsets that split a
	/// surrogate pair are not detected yet: [`ChangeSet::apply`] and
	/// [`ChangeSet::invert`] reject them with [`TextError::NotCharBoundary`].
	pub fn new(len: CuLen, changes: impl IntoIterator<Item = Change>) -> Result<Self> {
		let mut changes: Vec<Change> = changes.into_iter().collect();
		for change in &changes {
			validate_bounds(change.from, change.to, len)?;
		}
		changes.sort_by_key(|c| (c.from, c.to));

		let mut result = ChangeSet::default();
		let mut prev: Option<(CuIdx, CuIdx)> = None;
		let mut pos = 0;
		for change in changes {
			if let Some((first_from, first_to)) = prev
				&& change.from < first_to
			{
				return Err(ChangeError::Overlapping {
					first_from,
					first_to,
					second_from: change.from,
					second_to: change.to,
				});
			}
			result.retain(change.from - pos);
			if let Some(text) = change.insert {
				result.insert(Insertion::new(text));
			}
			result.delete(change.to - change.from);
			pos = change.to;
			prev = Some((change.from, change.to));
		}
		result.retain(len - pos);

		Ok(result)
	}

	/// A changeset that leaves a document of length `len` untouched.
	pub fn empty(len: CuLen) -> Self {
		let mut result = ChangeSet::default();
		result.retain(len);
		result
	}

	/// Returns the length of the source document.
	pub fn len(&self) -> CuLen {
		self.len
	}

	/// Returns the length of the document after applying the changes.
	pub fn len_after(&self) -> CuLen {
		self.len_after
	}

	/// Returns true if applying this changeset changes nothing.
	pub fn is_identity(&self) -> bool {
		self.ops.iter().all(|op| matches!(op, Operation::Retain(_)))
	}

	/// Returns the canonical operation sequence.
	pub fn operations(&self) -> &[Operation] {
		&self.ops
	}

	/// Iterates over the normalized changes, ascending by position in the
	/// source document.
	pub fn changes(&self) -> impl Iterator<Item = Change> + '_ {
		self.hunks().map(|hunk| Change {
			from: hunk.from,
			to: hunk.to,
			insert: hunk.insert.map(|ins| ins.text().to_owned()),
		})
	}

	/// Iterates over the edits in source coordinates, ascending and without
	/// the retained stretches between them.
	pub fn hunks(&self) -> Hunks<'_> {
		Hunks {
			ops: self.ops.iter().peekable(),
			pos: 0,
		}
	}

	/// Appends a retain of `n` code units.
	pub(crate) fn retain(&mut self, n: CuLen) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.ops.last_mut() {
			*count += n;
		} else {
			self.ops.push(Operation::Retain(n));
		}
	}

	/// Appends a deletion of `n` code units.
	pub(crate) fn delete(&mut self, n: CuLen) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.ops.last_mut() {
			*count += n;
		} else {
			self.ops.push(Operation::Delete(n));
		}
	}

	/// Appends an insertion at the current point.
	///
	/// Inserting right after a delete anchors the text at the deletion's end;
	/// a replacement is an insert followed by the delete.
	pub(crate) fn insert(&mut self, ins: Insertion) {
		if ins.is_empty() {
			return;
		}

		self.len_after += ins.len();

		match self.ops.last_mut() {
			Some(Operation::Insert(prev)) => prev.push(&ins),
			_ => self.ops.push(Operation::Insert(ins)),
		}
	}

	/// Applies the changeset to `doc`, returning the edited text.
	pub fn apply(&self, doc: &Text) -> Result<Text> {
		self.check_source(doc)?;
		let mut text = doc.clone();
		let hunks: Vec<Hunk<'_>> = self.hunks().collect();
		// Back to front, so earlier offsets stay valid in source coordinates.
		for hunk in hunks.iter().rev() {
			text.splice(hunk.from, hunk.to, hunk.text())?;
		}
		Ok(text)
	}

	/// Builds the changeset that undoes this one.
	///
	/// `before` must be the document this changeset was derived from.
	pub fn invert(&self, before: &Text) -> Result<ChangeSet> {
		self.check_source(before)?;
		let mut result = ChangeSet::default();

		let mut pos = 0;
		for hunk in self.hunks() {
			result.retain(hunk.from - pos);
			if hunk.to > hunk.from {
				let deleted = before.slice(hunk.from, hunk.to)?;
				result.insert(Insertion::new(deleted.to_string()));
			}
			result.delete(hunk.insert_len());
			pos = hunk.to;
		}
		result.retain(self.len - pos);

		Ok(result)
	}

	/// Composes two changesets into one equivalent to applying `self` then
	/// `other`.
	///
	/// `other`'s coordinates are renumbered through `self`, so every position
	/// of the result is expressed against `self`'s source document.
	/// Replacements that end up touching stay separate changes.
	pub fn compose(self, other: ChangeSet) -> Result<ChangeSet> {
		if self.len_after != other.len {
			return Err(ChangeError::ComposeMismatch {
				len_after: self.len_after,
				len: other.len,
			});
		}
		let mismatch = ChangeError::ComposeMismatch {
			len_after: self.len_after,
			len: other.len,
		};

		let mut result = ChangeSet::default();
		let mut a_ops = self.ops.into_iter();
		let mut b_ops = other.ops.into_iter();
		let mut a = a_ops.next();
		let mut b = b_ops.next();
		// Position in the intermediate document.
		let mut mid: CuIdx = 0;

		loop {
			match (a, b) {
				(None, None) => break,
				(Some(Operation::Delete(n)), rest) => {
					result.delete(n);
					a = a_ops.next();
					b = rest;
				}
				(rest, Some(Operation::Insert(ins))) => {
					result.insert(ins);
					a = rest;
					b = b_ops.next();
				}
				(None, _) | (_, None) => return Err(mismatch),
				(Some(Operation::Retain(i)), Some(Operation::Retain(j))) => {
					result.retain(i.min(j));
					mid += i.min(j);
					match i.cmp(&j) {
						Ordering::Less => {
							a = a_ops.next();
							b = Some(Operation::Retain(j - i));
						}
						Ordering::Equal => {
							a = a_ops.next();
							b = b_ops.next();
						}
						Ordering::Greater => {
							a = Some(Operation::Retain(i - j));
							b = b_ops.next();
						}
					}
				}
				(Some(Operation::Insert(ins)), Some(Operation::Delete(j))) => {
					let n = ins.len();
					match n.cmp(&j) {
						Ordering::Less => {
							a = a_ops.next();
							b = Some(Operation::Delete(j - n));
						}
						Ordering::Equal => {
							a = a_ops.next();
							b = b_ops.next();
						}
						Ordering::Greater => {
							let (_, rest) = ins
								.split_at(j)
								.ok_or(TextError::NotCharBoundary { pos: mid + j })?;
							a = Some(Operation::Insert(rest));
							b = b_ops.next();
						}
					}
					mid += n.min(j);
				}
				(Some(Operation::Insert(ins)), Some(Operation::Retain(j))) => {
					let n = ins.len();
					match n.cmp(&j) {
						Ordering::Less => {
							result.insert(ins);
							a = a_ops.next();
							b = Some(Operation::Retain(j - n));
						}
						Ordering::Equal => {
							result.insert(ins);
							a = a_ops.next();
							b = b_ops.next();
						}
						Ordering::Greater => {
							let (head, rest) = ins
								.split_at(j)
								.ok_or(TextError::NotCharBoundary { pos: mid + j })?;
							result.insert(head);
							a = Some(Operation::Insert(rest));
							b = b_ops.next();
						}
					}
					mid += n.min(j);
				}
				(Some(Operation::Retain(i)), Some(Operation::Delete(j))) => {
					result.delete(i.min(j));
					mid += i.min(j);
					match i.cmp(&j) {
						Ordering::Less => {
							a = a_ops.next();
							b = Some(Operation::Delete(j - i));
						}
						Ordering::Equal => {
							a = a_ops.next();
							b = b_ops.next();
						}
						Ordering::Greater => {
							a = Some(Operation::Retain(i - j));
							b = b_ops.next();
						}
					}
				}
			}
		}

		Ok(result)
	}

	fn check_source(&self, doc: &Text) -> Result<()> {
		if doc.len() != self.len {
			return Err(ChangeError::LengthMismatch {
				expected: self.len,
				actual: doc.len(),
			});
		}
		Ok(())
	}
}

/// Incremental construction of a changeset, one operation at a time.
///
/// The operations walk the source document from its start; the builder
/// keeps them canonical. Insert before deleting to replace a span. The
/// rebase engine uses this to emit transformed changesets.
#[derive(Debug, Default)]
pub struct ChangeSetBuilder {
	changes: ChangeSet,
}

impl ChangeSetBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Keeps the next `n` code units.
	pub fn retain(&mut self, n: CuLen) -> &mut Self {
		self.changes.retain(n);
		self
	}

	/// Removes the next `n` code units.
	pub fn delete(&mut self, n: CuLen) -> &mut Self {
		self.changes.delete(n);
		self
	}

	/// Inserts text at the current point.
	pub fn insert(&mut self, ins: Insertion) -> &mut Self {
		self.changes.insert(ins);
		self
	}

	/// Source length consumed so far.
	pub fn len(&self) -> CuLen {
		self.changes.len
	}

	/// Output length produced so far.
	pub fn len_after(&self) -> CuLen {
		self.changes.len_after
	}

	/// Finishes the changeset.
	pub fn finish(self) -> ChangeSet {
		self.changes
	}
}

/// One edit of a changeset, in source coordinates.
///
/// Replaces `[from, to)` with `insert`: an insertion anchored at `from`, a
/// deletion, or both. Consecutive hunks may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk<'a> {
	/// Start of the edited span.
	pub from: CuIdx,
	/// End of the edited span (exclusive).
	pub to: CuIdx,
	/// Text placed at `from`, if any.
	pub insert: Option<&'a Insertion>,
}

impl Hunk<'_> {
	/// Length of the inserted text in code units.
	pub fn insert_len(&self) -> CuLen {
		self.insert.map_or(0, Insertion::len)
	}

	/// The inserted text, empty for a deletion.
	pub fn text(&self) -> &str {
		self.insert.map_or("", Insertion::text)
	}
}

/// Iterator returned by [`ChangeSet::hunks`].
#[derive(Debug, Clone)]
pub struct Hunks<'a> {
	ops: Peekable<slice::Iter<'a, Operation>>,
	pos: CuIdx,
}

impl<'a> Iterator for Hunks<'a> {
	type Item = Hunk<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			match self.ops.next()? {
				Operation::Retain(n) => {
					self.pos += n;
				}
				// Text after a delete is its own hunk at the deletion's end.
				Operation::Delete(n) => {
					let from = self.pos;
					self.pos += n;
					return Some(Hunk {
						from,
						to: self.pos,
						insert: None,
					});
				}
				Operation::Insert(ins) => {
					let from = self.pos;
					// An insert followed by a delete is one replacement.
					if let Some(Operation::Delete(n)) = self.ops.peek() {
						self.pos += n;
						self.ops.next();
					}
					return Some(Hunk {
						from,
						to: self.pos,
						insert: Some(ins),
					});
				}
			}
		}
	}
}

fn validate_bounds(from: CuIdx, to: CuIdx, len: CuLen) -> Result<()> {
	if from > to {
		return Err(ChangeError::InvalidRange { from, to });
	}
	if to > len {
		return Err(ChangeError::OutOfBounds { from, to, len });
	}
	Ok(())
}
