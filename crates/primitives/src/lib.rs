//! Core editing primitives: immutable text, changesets, position mapping and
//! selections.
//!
//! Every offset is a UTF-16 code unit offset ([`CuIdx`]).

/// Error types for text and changeset operations.
pub mod error;
/// Text range and coordinate types.
pub mod range;
/// Selection types for single and multi-cursor editing.
pub mod selection;
/// Immutable document text.
pub mod text;
/// Changes, changesets and position mapping.
pub mod transaction;

pub use error::{ChangeError, TextError};
pub use range::{CuIdx, CuLen, Direction, Range};
pub use selection::Selection;
pub use text::{Line, Text};
pub use transaction::{
	Assoc, Change, ChangeSet, ChangeSetBuilder, Hunk, Hunks, Insertion, MapMode, Mapped, Operation,
};
