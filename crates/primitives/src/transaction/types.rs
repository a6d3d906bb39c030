use serde::{Deserialize, Serialize};

use crate::range::{CuIdx, CuLen};
use crate::text::{utf16_len, utf16_to_byte};

/// Owned inserted text.
pub type Tendril = String;

/// A single text change.
///
/// Replaces the half-open range `[from, to)` with `insert`. A change with
/// `from == to` is a pure insertion; one without `insert` is a pure deletion.
/// This is also the wire form of a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
	/// Start of the replaced range.
	pub from: CuIdx,
	/// End of the replaced range (exclusive).
	pub to: CuIdx,
	/// The replacement text, or [`None`] for a deletion.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub insert: Option<Tendril>,
}

impl Change {
	/// A pure insertion of `text` at `at`.
	pub fn insert(at: CuIdx, text: impl Into<Tendril>) -> Self {
		Self {
			from: at,
			to: at,
			insert: Some(text.into()),
		}
	}

	/// A pure deletion of `[from, to)`.
	pub fn delete(from: CuIdx, to: CuIdx) -> Self {
		Self { from, to, insert: None }
	}

	/// Replaces `[from, to)` with `text`.
	pub fn replace(from: CuIdx, to: CuIdx, text: impl Into<Tendril>) -> Self {
		Self {
			from,
			to,
			insert: Some(text.into()),
		}
	}

	/// Length of the inserted text in code units.
	pub fn insert_len(&self) -> CuLen {
		self.insert.as_deref().map_or(0, utf16_len)
	}
}

/// Which side of an edited span an ambiguous position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assoc {
	/// Stay before text inserted at the position.
	Before,
	/// Move past text inserted at the position.
	After,
}

/// Whether mapping clamps or reports positions lost to a deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapMode {
	/// Always produce a position, clamped to an edge of the edited span.
	#[default]
	Simple,
	/// Produce [`Mapped::Deleted`] when the position's content was removed.
	TrackDeletion,
}

/// Outcome of mapping a position through a changeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mapped {
	/// The position in the edited document.
	Pos(CuIdx),
	/// The position was inside a deleted span (only under
	/// [`MapMode::TrackDeletion`]).
	Deleted,
}

impl Mapped {
	/// Returns the mapped position, or `None` if it was deleted.
	pub fn pos(self) -> Option<CuIdx> {
		match self {
			Mapped::Pos(pos) => Some(pos),
			Mapped::Deleted => None,
		}
	}
}

/// A text insertion with its code unit length cached.
///
/// Fields are private so `len` always equals the UTF-16 length of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
	text: Tendril,
	len: CuLen,
}

impl Insertion {
	/// Creates a new insertion, computing the length once.
	#[inline]
	pub fn new(text: impl Into<Tendril>) -> Self {
		let text = text.into();
		let len = utf16_len(&text);
		Self { text, len }
	}

	/// Returns true if this insertion is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns the inserted text.
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns the cached length in code units.
	#[inline]
	pub fn len(&self) -> CuLen {
		self.len
	}

	/// Appends text from another insertion, updating the cached length.
	pub(super) fn push(&mut self, other: &Insertion) {
		self.text.push_str(&other.text);
		self.len += other.len;
	}

	/// Splits after the first `n` code units.
	///
	/// Returns `None` if `n` falls inside a surrogate pair or past the end.
	pub(super) fn split_at(self, n: CuLen) -> Option<(Insertion, Insertion)> {
		let byte = utf16_to_byte(&self.text, n)?;
		let (head, tail) = self.text.split_at(byte);
		Some((
			Insertion {
				text: head.to_owned(),
				len: n,
			},
			Insertion {
				text: tail.to_owned(),
				len: self.len - n,
			},
		))
	}
}

/// A single operation in a changeset.
///
/// Operations walk the source document from the start: retain or delete the
/// next N code units, or insert new text at the current point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	/// Keep the next N code units of the source document.
	Retain(CuLen),
	/// Remove the next N code units of the source document.
	Delete(CuLen),
	/// Insert new text at the current position.
	Insert(Insertion),
}
