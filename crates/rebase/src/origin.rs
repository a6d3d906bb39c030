//! Edit origins and the precedence policy between concurrent edits.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use weft_primitives::ChangeSet;

use crate::error::{RebaseError, Result};
use crate::rebase::{Precedence, rebase};

/// Identifies the client and transaction an edit came from.
///
/// Origins are totally ordered (client first, then sequence number), which
/// is what makes the tie-break between concurrent edits globally agreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Origin {
	/// Client identifier, unique per replica.
	pub client: u64,
	/// Transaction counter local to the client.
	pub seq: u64,
}

impl Origin {
	/// Creates an origin.
	pub const fn new(client: u64, seq: u64) -> Self {
		Self { client, seq }
	}
}

impl fmt::Display for Origin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.client, self.seq)
	}
}

/// Precedence rule between two concurrent edits.
///
/// Decides whose insertion comes first when both insert at the same point,
/// whose text survives when both replace the very same range, and the
/// serialization order used by [`History`](crate::History). Every replica
/// must use the same rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
	/// The lower origin goes first.
	#[default]
	LowerOriginFirst,
	/// The higher origin goes first.
	HigherOriginFirst,
}

impl TieBreak {
	/// Orders two origins; `Less` means `a` goes first.
	pub fn cmp(self, a: Origin, b: Origin) -> Ordering {
		match self {
			TieBreak::LowerOriginFirst => a.cmp(&b),
			TieBreak::HigherOriginFirst => b.cmp(&a),
		}
	}

	/// Resolves which of an applied and a pending edit takes precedence.
	pub fn precedence(self, applied: Origin, pending: Origin) -> Result<Precedence> {
		match self.cmp(applied, pending) {
			Ordering::Less => Ok(Precedence::AppliedFirst),
			Ordering::Greater => Ok(Precedence::PendingFirst),
			Ordering::Equal => Err(RebaseError::SameOrigin(applied)),
		}
	}
}

/// A changeset tagged with the origin that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
	/// Who produced the changes.
	pub origin: Origin,
	/// The changes, against the shared base document.
	pub changes: ChangeSet,
}

impl Edit {
	/// Creates an edit.
	pub fn new(origin: Origin, changes: ChangeSet) -> Self {
		Self { origin, changes }
	}

	/// Rebases `pending` over `applied`, resolving ties with `tie_break`.
	///
	/// Returns `(pending', applied')`: `pending'` applies after `applied`,
	/// `applied'` applies after `pending`, and both orders produce the same
	/// document.
	pub fn rebase(applied: &Edit, pending: &Edit, tie_break: TieBreak) -> Result<(Edit, Edit)> {
		let precedence = tie_break.precedence(applied.origin, pending.origin)?;
		let rebased = rebase(&applied.changes, &pending.changes, precedence)?;
		Ok((
			Edit::new(pending.origin, rebased.pending),
			Edit::new(applied.origin, rebased.applied),
		))
	}
}
