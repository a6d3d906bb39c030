//! Error types for text and changeset operations.

use thiserror::Error;

use crate::range::{CuIdx, CuLen};

/// Errors raised by [`Text`](crate::Text) accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
	/// A position lies past the end of the text.
	#[error("position {pos} is out of bounds for text of length {len}")]
	OutOfBounds {
		/// The offending position.
		pos: CuIdx,
		/// Length of the text in code units.
		len: CuLen,
	},
	/// A range has its start after its end.
	#[error("invalid range {from}..{to}")]
	InvalidRange {
		/// Start of the range.
		from: CuIdx,
		/// End of the range.
		to: CuIdx,
	},
	/// A position falls between the two halves of a surrogate pair.
	#[error("position {pos} splits a surrogate pair")]
	NotCharBoundary {
		/// The offending position.
		pos: CuIdx,
	},
	/// A line index past the last line.
	#[error("line {line} is out of bounds ({lines} lines)")]
	LineOutOfBounds {
		/// The requested line.
		line: usize,
		/// Number of lines in the text.
		lines: usize,
	},
}

/// Errors raised while building, applying or combining changesets.
///
/// Every variant is a caller-side contract violation. Nothing here is
/// retryable and nothing is clamped into range on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
	/// A change has `from > to`.
	#[error("invalid change range {from}..{to}")]
	InvalidRange {
		/// Start of the change.
		from: CuIdx,
		/// End of the change.
		to: CuIdx,
	},
	/// A change reaches past the end of the document it targets.
	#[error("change {from}..{to} is out of bounds for document of length {len}")]
	OutOfBounds {
		/// Start of the change.
		from: CuIdx,
		/// End of the change.
		to: CuIdx,
		/// Length of the targeted document.
		len: CuLen,
	},
	/// Two changes in one batch overlap.
	#[error("change {second_from}..{second_to} overlaps change {first_from}..{first_to}")]
	Overlapping {
		/// Start of the earlier change.
		first_from: CuIdx,
		/// End of the earlier change.
		first_to: CuIdx,
		/// Start of the overlapping change.
		second_from: CuIdx,
		/// End of the overlapping change.
		second_to: CuIdx,
	},
	/// The document does not have the length the changeset was built for.
	#[error("changeset expects a document of length {expected}, got {actual}")]
	LengthMismatch {
		/// Length the changeset was derived from.
		expected: CuLen,
		/// Length of the document that was passed in.
		actual: CuLen,
	},
	/// The second changeset of a composition does not start where the first ends.
	#[error("cannot compose: first changeset produces length {len_after}, second expects {len}")]
	ComposeMismatch {
		/// Output length of the first changeset.
		len_after: CuLen,
		/// Input length of the second changeset.
		len: CuLen,
	},
	/// A mapped position lies past the end of the source document.
	#[error("position {pos} is out of bounds for changeset over length {len}")]
	PositionOutOfBounds {
		/// The offending position.
		pos: CuIdx,
		/// Source length of the changeset.
		len: CuLen,
	},
	/// The underlying text rejected an offset.
	#[error(transparent)]
	Text(#[from] TextError),
}

/// Result type for changeset operations.
pub type Result<T> = std::result::Result<T, ChangeError>;
