//! Position mapping through a changeset.

use super::changeset::ChangeSet;
use super::types::{Assoc, MapMode, Mapped};
use crate::error::{ChangeError, Result};
use crate::range::CuIdx;

impl ChangeSet {
	/// Maps a position in the source document to the edited document.
	///
	/// Changes are scanned in ascending order while tracking how far the
	/// preceding ones shifted the text:
	///
	/// - before a change: shifted by the preceding changes only;
	/// - on a pure insertion point: `assoc` alone decides whether the
	///   position lands before or after the inserted text;
	/// - inside a replaced or deleted span: `Before` gives the start of the
	///   inserted content, `After` its end. Under [`MapMode::TrackDeletion`]
	///   the result is [`Mapped::Deleted`] instead, except for a position at
	///   the very start of a span that receives new content, which still
	///   exists as that boundary;
	/// - at or after the end of a change: shifted past it.
	pub fn map(&self, pos: CuIdx, assoc: Assoc, mode: MapMode) -> Result<Mapped> {
		if pos > self.len {
			return Err(ChangeError::PositionOutOfBounds { pos, len: self.len });
		}

		let mut old_end = 0;
		let mut new_end = 0;

		for hunk in self.hunks() {
			if pos < hunk.from {
				break;
			}

			let new_from = new_end + (hunk.from - old_end);
			let new_to = new_from + hunk.insert_len();
			let edge = match assoc {
				Assoc::Before => new_from,
				Assoc::After => new_to,
			};

			if hunk.from == hunk.to {
				if pos == hunk.from {
					return Ok(Mapped::Pos(edge));
				}
			} else if pos < hunk.to {
				let boundary_survives = pos == hunk.from && hunk.insert_len() > 0;
				if mode == MapMode::TrackDeletion && !boundary_survives {
					return Ok(Mapped::Deleted);
				}
				return Ok(Mapped::Pos(edge));
			}

			old_end = hunk.to;
			new_end = new_to;
		}

		Ok(Mapped::Pos(new_end + (pos - old_end)))
	}

	/// Maps a position with [`MapMode::Simple`], which always yields one.
	pub fn map_pos(&self, pos: CuIdx, assoc: Assoc) -> Result<CuIdx> {
		match self.map(pos, assoc, MapMode::Simple)? {
			Mapped::Pos(mapped) => Ok(mapped),
			Mapped::Deleted => unreachable!("simple mapping never reports deletions"),
		}
	}
}
