//! Span view of a changeset over its whole base document.

use weft_primitives::{ChangeSet, CuIdx, CuLen, Insertion};

/// A stretch of the base document and what one changeset does to it.
///
/// The spans of a changeset tile `[0, len)` without gaps. A replace span with
/// `from == to` is a pure insertion and covers no base content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Span<'a> {
	/// Untouched base content.
	Keep { from: CuIdx, to: CuIdx },
	/// Base content `[from, to)` replaced by `insert`.
	Replace {
		from: CuIdx,
		to: CuIdx,
		insert: Option<&'a Insertion>,
	},
}

impl<'a> Span<'a> {
	pub fn from(&self) -> CuIdx {
		match *self {
			Span::Keep { from, .. } | Span::Replace { from, .. } => from,
		}
	}

	pub fn to(&self) -> CuIdx {
		match *self {
			Span::Keep { to, .. } | Span::Replace { to, .. } => to,
		}
	}

	pub fn len(&self) -> CuLen {
		self.to() - self.from()
	}

	/// Returns true if this span removes the base content it covers.
	pub fn deletes(&self) -> bool {
		matches!(self, Span::Replace { .. }) && self.len() > 0
	}

	pub fn insert(&self) -> Option<&'a Insertion> {
		match *self {
			Span::Keep { .. } => None,
			Span::Replace { insert, .. } => insert,
		}
	}
}

/// Re-expresses `changes` as spans covering its entire base document.
///
/// Each hunk becomes a replace span; the retained stretches between and
/// after them become keep spans.
pub(crate) fn spans(changes: &ChangeSet) -> Vec<Span<'_>> {
	let mut spans = Vec::new();
	let mut pos = 0;
	for hunk in changes.hunks() {
		if hunk.from > pos {
			spans.push(Span::Keep { from: pos, to: hunk.from });
		}
		spans.push(Span::Replace {
			from: hunk.from,
			to: hunk.to,
			insert: hunk.insert,
		});
		pos = hunk.to;
	}
	if changes.len() > pos {
		spans.push(Span::Keep {
			from: pos,
			to: changes.len(),
		});
	}
	spans
}
