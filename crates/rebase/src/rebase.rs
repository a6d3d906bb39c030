//! Pairwise rebase of concurrent changesets.
//!
//! Both changesets are turned into [`Span`] lists over the shared base and
//! walked together. Each inserted text is first *placed*: it either survives
//! at an anchor in base coordinates or is dropped because the content it was
//! anchored to no longer exists on the other side. The walk then emits, for
//! every placed text and every stretch of base content, what the transformed
//! changesets must do with it. Both outputs are produced from the same event
//! sequence, so applying them in either order yields the same document.

use tracing::trace;
use weft_primitives::{ChangeSet, ChangeSetBuilder, CuIdx, CuLen, Insertion};

use crate::error::{RebaseError, Result};
use crate::spans::{Span, spans};

/// Which of two concurrent changesets goes first on a tie.
///
/// Usually derived from the edits' origins through
/// [`TieBreak::precedence`](crate::TieBreak::precedence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precedence {
	/// The applied changeset's insertion goes first and wins identical ranges.
	AppliedFirst,
	/// The pending changeset's insertion goes first and wins identical ranges.
	PendingFirst,
}

/// Output of [`rebase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rebased {
	/// The pending changeset, expressed against the applied one's result.
	pub pending: ChangeSet,
	/// The applied changeset, expressed against the pending one's result.
	pub applied: ChangeSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
	Applied,
	Pending,
}

/// An inserted text and where it ends up.
#[derive(Debug)]
struct Placed<'a> {
	side: Side,
	/// Base position the text sits at.
	pos: CuIdx,
	/// Whether the text survives the merge.
	kept: bool,
	text: &'a Insertion,
}

/// Transforms two changesets derived from the same document against each
/// other.
///
/// `pending` is rebased to apply after `applied`, and `applied` to apply
/// after `pending`:
///
/// ```text
/// rebased.pending.apply(applied.apply(doc)) == rebased.applied.apply(pending.apply(doc))
/// ```
///
/// Content deleted by both sides is deleted once. An insertion anchored
/// strictly inside a range the other side deleted is dropped. A replacement
/// whose range lies inside the other side's deleted range loses its text,
/// while one that also deletes content the other side kept moves its text to
/// the end of the other side's deletion. Insertions at the same point are
/// ordered by `precedence`, which also decides whose text survives when both
/// sides replace the very same range.
///
/// Runs in time linear in the size of both changesets.
pub fn rebase(applied: &ChangeSet, pending: &ChangeSet, precedence: Precedence) -> Result<Rebased> {
	if applied.len() != pending.len() {
		return Err(RebaseError::BaseMismatch {
			applied: applied.len(),
			pending: pending.len(),
		});
	}

	let winner = match precedence {
		Precedence::AppliedFirst => Side::Applied,
		Precedence::PendingFirst => Side::Pending,
	};
	let applied_spans = spans(applied);
	let pending_spans = spans(pending);

	let mut placed = place(Side::Applied, &applied_spans, &pending_spans, winner);
	placed.extend(place(Side::Pending, &pending_spans, &applied_spans, winner));
	placed.sort_by_key(|p| (p.pos, p.side != winner));
	let dropped = placed.iter().filter(|p| !p.kept).count();

	// `over_applied` consumes the applied result, `over_pending` the pending one.
	let mut over_applied = ChangeSetBuilder::new();
	let mut over_pending = ChangeSetBuilder::new();
	let mut events = placed.into_iter().peekable();

	for (start, len, applied_deletes, pending_deletes) in segments(&applied_spans, &pending_spans) {
		while let Some(p) = events.next_if(|p| p.pos <= start) {
			emit_text(&p, &mut over_applied, &mut over_pending);
		}
		match (applied_deletes, pending_deletes) {
			(false, false) => {
				over_applied.retain(len);
				over_pending.retain(len);
			}
			(true, false) => {
				over_pending.delete(len);
			}
			(false, true) => {
				over_applied.delete(len);
			}
			(true, true) => {}
		}
	}
	for p in events {
		emit_text(&p, &mut over_applied, &mut over_pending);
	}

	let rebased = Rebased {
		pending: over_applied.finish(),
		applied: over_pending.finish(),
	};
	debug_assert_eq!(rebased.pending.len(), applied.len_after());
	debug_assert_eq!(rebased.applied.len(), pending.len_after());
	debug_assert_eq!(rebased.pending.len_after(), rebased.applied.len_after());

	trace!(
		base_len = applied.len(),
		applied_len = applied.len_after(),
		pending_len = pending.len_after(),
		merged_len = rebased.pending.len_after(),
		dropped,
		"rebased concurrent changesets"
	);
	Ok(rebased)
}

/// Decides where each text inserted by `own` lands, given the other side's
/// spans.
fn place<'a>(side: Side, own: &[Span<'a>], other: &[Span<'_>], winner: Side) -> Vec<Placed<'a>> {
	let edits: Vec<&Span<'_>> = other.iter().filter(|s| matches!(s, Span::Replace { .. })).collect();
	let mut placed = Vec::new();
	let mut j = 0;

	for span in own {
		let Some(text) = span.insert() else {
			continue;
		};
		let (from, to) = (span.from(), span.to());
		while j < edits.len() && edits[j].to() <= from {
			j += 1;
		}
		// The first edit ending after `from`; it deletes unit `from` when it
		// starts at or before it.
		let covering = edits.get(j).copied().filter(|e| e.from() <= from && e.deletes());

		let (pos, kept) = match covering {
			None => (from, true),
			Some(edit) if from == to => (from, edit.from() == from),
			Some(edit) if to > edit.to() => (edit.to(), true),
			Some(edit) => {
				let identical = edit.from() == from && edit.to() == to;
				let survives = identical && (side == winner || edit.insert().is_none());
				(from, survives)
			}
		};
		placed.push(Placed { side, pos, kept, text });
	}
	placed
}

fn emit_text(p: &Placed<'_>, over_applied: &mut ChangeSetBuilder, over_pending: &mut ChangeSetBuilder) {
	let len = p.text.len();
	match (p.side, p.kept) {
		(Side::Applied, true) => {
			over_applied.retain(len);
			over_pending.insert(p.text.clone());
		}
		(Side::Applied, false) => {
			over_applied.delete(len);
		}
		(Side::Pending, true) => {
			over_applied.insert(p.text.clone());
			over_pending.retain(len);
		}
		(Side::Pending, false) => {
			over_pending.delete(len);
		}
	}
}

/// Walks both span lists in lockstep, yielding `(start, len, applied_deletes,
/// pending_deletes)` for each maximal stretch of base content on which
/// neither side changes its mind.
fn segments<'s>(
	applied: &'s [Span<'_>],
	pending: &'s [Span<'_>],
) -> impl Iterator<Item = (CuIdx, CuLen, bool, bool)> + 's {
	let mut a = applied.iter().filter(|s| s.len() > 0).peekable();
	let mut b = pending.iter().filter(|s| s.len() > 0).peekable();
	let mut pos: CuIdx = 0;

	std::iter::from_fn(move || {
		while a.next_if(|s| s.to() <= pos).is_some() {}
		while b.next_if(|s| s.to() <= pos).is_some() {}
		let (sa, sb) = (a.peek()?, b.peek()?);
		let end = sa.to().min(sb.to());
		let segment = (pos, end - pos, sa.deletes(), sb.deletes());
		pos = end;
		Some(segment)
	})
}
