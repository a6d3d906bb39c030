//! Serialized integration of many concurrent edits.

use tracing::{debug, trace};
use weft_primitives::{ChangeSet, Text};

use crate::error::{RebaseError, Result};
use crate::origin::{Edit, Origin, TieBreak};
use crate::rebase::{Precedence, rebase};

/// Result of integrating one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integrated {
	/// The new head document.
	pub doc: Text,
	/// Changes that turn the previous head into the new one.
	///
	/// Collaborators relocate selections and decorations through this.
	pub delta: ChangeSet,
}

#[derive(Debug, Clone)]
struct Entry {
	edit: Edit,
	/// Every edit up to and including this one, composed against the base.
	committed: ChangeSet,
}

/// A base document and the concurrent edits integrated on top of it.
///
/// Every edit is derived from the same base. Edits are folded in the order
/// the tie-break assigns to their origins, not in arrival order, so replicas
/// that receive the same edits in different orders hold the same head.
#[derive(Debug, Clone)]
pub struct History {
	base: Text,
	head: Text,
	tie_break: TieBreak,
	/// Sorted by `tie_break` over the edits' origins.
	entries: Vec<Entry>,
}

impl History {
	/// Starts an empty history on `base`.
	pub fn new(base: Text, tie_break: TieBreak) -> Self {
		Self {
			head: base.clone(),
			base,
			tie_break,
			entries: Vec::new(),
		}
	}

	/// The document every edit derives from.
	pub fn base(&self) -> &Text {
		&self.base
	}

	/// The document with every integrated edit applied.
	pub fn head(&self) -> &Text {
		&self.head
	}

	/// The policy integrated edits are ordered by.
	pub fn tie_break(&self) -> TieBreak {
		self.tie_break
	}

	/// Number of integrated edits.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no edit has been integrated yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Origins of the integrated edits, in serialization order.
	pub fn origins(&self) -> impl Iterator<Item = Origin> + '_ {
		self.entries.iter().map(|entry| entry.edit.origin)
	}

	/// All integrated edits composed into one base-to-head changeset.
	pub fn committed(&self) -> ChangeSet {
		self.entries
			.last()
			.map_or_else(|| ChangeSet::empty(self.base.len()), |entry| entry.committed.clone())
	}

	/// Integrates a concurrent edit derived from the base document.
	///
	/// An edit that sorts after every integrated one is rebased over the
	/// committed changes and applied to the head. An edit that sorts earlier
	/// forces the edits after it to be folded again.
	///
	/// Fails with [`RebaseError::BaseMismatch`] if the edit does not apply to
	/// the base, and with [`RebaseError::SameOrigin`] if an edit with the same
	/// origin was already integrated. The history is unchanged on failure.
	pub fn integrate(&mut self, edit: Edit) -> Result<Integrated> {
		if edit.changes.len() != self.base.len() {
			return Err(RebaseError::BaseMismatch {
				applied: self.base.len(),
				pending: edit.changes.len(),
			});
		}

		let index = match self
			.entries
			.binary_search_by(|entry| self.tie_break.cmp(entry.edit.origin, edit.origin))
		{
			Ok(_) => return Err(RebaseError::SameOrigin(edit.origin)),
			Err(index) => index,
		};

		if index == self.entries.len() {
			let committed = self.committed();
			let (committed, delta) = fold(committed, &edit)?;
			let doc = delta.apply(&self.head)?;
			trace!(
				origin = %edit.origin,
				edits = self.entries.len() + 1,
				len = doc.len(),
				"edit appended"
			);
			self.entries.push(Entry { edit, committed });
			self.head = doc.clone();
			return Ok(Integrated { doc, delta });
		}

		debug!(
			origin = %edit.origin,
			index,
			refolded = self.entries.len() - index,
			"edit sorts before committed edits, rebuilding suffix"
		);
		let old = self.committed();
		let mut committed = match index {
			0 => ChangeSet::empty(self.base.len()),
			_ => self.entries[index - 1].committed.clone(),
		};
		let mut rebuilt = Vec::with_capacity(self.entries.len() + 1 - index);
		for edit in std::iter::once(edit).chain(self.entries[index..].iter().map(|entry| entry.edit.clone())) {
			committed = fold(committed, &edit)?.0;
			rebuilt.push(Entry {
				edit,
				committed: committed.clone(),
			});
		}

		let doc = committed.apply(&self.base)?;
		let delta = old.invert(&self.base)?.compose(committed)?;
		self.entries.truncate(index);
		self.entries.extend(rebuilt);
		self.head = doc.clone();
		Ok(Integrated { doc, delta })
	}
}

/// Rebases `edit` over everything committed before it, returning the new
/// composition and the rebased edit.
fn fold(committed: ChangeSet, edit: &Edit) -> Result<(ChangeSet, ChangeSet)> {
	let rebased = rebase(&committed, &edit.changes, Precedence::AppliedFirst)?.pending;
	let committed = committed.compose(rebased.clone())?;
	Ok((committed, rebased))
}

impl PartialEq for History {
	fn eq(&self, other: &Self) -> bool {
		self.base == other.base
			&& self.tie_break == other.tie_break
			&& self.entries.len() == other.entries.len()
			&& self
				.entries
				.iter()
				.zip(&other.entries)
				.all(|(a, b)| a.edit == b.edit)
	}
}

impl Eq for History {}
