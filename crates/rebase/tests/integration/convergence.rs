//! Pairwise convergence of concurrent changesets.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use weft_primitives::{Assoc, Change, ChangeSet, MapMode, Mapped, Range, Text};
use weft_rebase::{Edit, Precedence, TieBreak, rebase};

use crate::common::{arb_changes, arb_document, cs, edit, init_tracing};

/// Merges `a` and `b` in both application orders and returns the result.
fn converge(doc: &str, a: &ChangeSet, b: &ChangeSet, precedence: Precedence) -> String {
	let doc = Text::from(doc);
	let rebased = rebase(a, b, precedence).unwrap();
	let via_a = rebased.pending.apply(&a.apply(&doc).unwrap()).unwrap();
	let via_b = rebased.applied.apply(&b.apply(&doc).unwrap()).unwrap();
	assert_eq!(via_a.to_string(), via_b.to_string());
	via_a.to_string()
}

#[test]
fn insertion_inside_deleted_range_is_dropped() {
	init_tracing();
	let a = cs(12, [Change::delete(5, 11)]);
	let b = cs(12, [Change::insert(8, "X")]);
	assert_eq!(converge("hello world!", &a, &b, Precedence::AppliedFirst), "hello!");
	assert_eq!(converge("hello world!", &b, &a, Precedence::AppliedFirst), "hello!");
}

#[test]
fn overlapping_replacements_merge() {
	let a = cs(18, [Change::replace(0, 7, "ONE TWO")]);
	let b = cs(18, [Change::replace(4, 13, "THREE")]);
	assert_eq!(converge("one two three four", &a, &b, Precedence::AppliedFirst), "ONE TWOTHREE four");
	assert_eq!(converge("one two three four", &b, &a, Precedence::PendingFirst), "ONE TWOTHREE four");
}

#[test]
fn double_delete_is_applied_once() {
	let a = cs(11, [Change::delete(3, 8)]);
	let b = cs(11, [Change::delete(3, 8)]);
	let rebased = rebase(&a, &b, Precedence::AppliedFirst).unwrap();
	assert!(rebased.pending.is_identity());
	assert!(rebased.applied.is_identity());
	assert_eq!(converge("abcdefghijk", &a, &b, Precedence::AppliedFirst), "abcijk");
}

#[test]
fn partially_overlapping_deletes() {
	let a = cs(10, [Change::delete(2, 6)]);
	let b = cs(10, [Change::delete(4, 8)]);
	assert_eq!(converge("0123456789", &a, &b, Precedence::AppliedFirst), "0189");
	let rebased = rebase(&a, &b, Precedence::AppliedFirst).unwrap();
	assert_eq!(rebased.pending, cs(6, [Change::delete(2, 4)]));
}

#[test]
fn touching_edits_stay_independent() {
	let a = cs(6, [Change::replace(0, 3, "A")]);
	let b = cs(6, [Change::replace(3, 6, "B")]);
	assert_eq!(converge("abcdef", &a, &b, Precedence::PendingFirst), "AB");
}

#[test]
fn tie_break_is_independent_of_argument_order() {
	let low = edit(1, 4, [Change::insert(2, "low")]);
	let high = edit(9, 4, [Change::insert(2, "high")]);
	let doc = Text::from("abcd");

	for tie_break in [TieBreak::LowerOriginFirst, TieBreak::HigherOriginFirst] {
		let (high_after_low, low_after_high) = Edit::rebase(&low, &high, tie_break).unwrap();
		let via_low = high_after_low.changes.apply(&low.changes.apply(&doc).unwrap()).unwrap();
		let via_high = low_after_high.changes.apply(&high.changes.apply(&doc).unwrap()).unwrap();
		assert_eq!(via_low, via_high);

		let (swapped, _) = Edit::rebase(&high, &low, tie_break).unwrap();
		let swapped = swapped.changes.apply(&high.changes.apply(&doc).unwrap()).unwrap();
		assert_eq!(swapped, via_low);
	}

	let (pending, _) = Edit::rebase(&low, &high, TieBreak::LowerOriginFirst).unwrap();
	assert_eq!(
		pending.changes.apply(&low.changes.apply(&doc).unwrap()).unwrap().to_string(),
		"ablowhighcd"
	);
}

#[test]
fn track_deletion_reports_lost_positions() {
	let a = cs(12, [Change::delete(5, 11)]);
	let b = cs(12, [Change::insert(8, "X")]);
	let rebased = rebase(&a, &b, Precedence::AppliedFirst).unwrap();

	// A cursor strictly inside the concurrently deleted span.
	assert_eq!(a.map(8, Assoc::Before, MapMode::TrackDeletion).unwrap(), Mapped::Deleted);
	assert_eq!(a.map(8, Assoc::Before, MapMode::Simple).unwrap(), Mapped::Pos(5));

	// B's cursor sits right after its own, now dropped, insertion.
	let mapped = rebased.applied.map(9, Assoc::After, MapMode::TrackDeletion).unwrap();
	assert_eq!(mapped, Mapped::Deleted);
	assert_eq!(rebased.applied.map(12, Assoc::Before, MapMode::TrackDeletion).unwrap(), Mapped::Pos(5));
}

#[test]
fn selections_follow_the_rebased_edit() {
	let doc = Text::from("fn main() {}");
	let local = cs(12, [Change::insert(11, "todo!()")]);
	let remote = cs(12, [Change::replace(3, 7, "start")]);
	let rebased = rebase(&remote, &local, Precedence::AppliedFirst).unwrap();

	let local_doc = local.apply(&doc).unwrap();
	assert_eq!(local_doc.to_string(), "fn main() {todo!()}");
	let cursor = Range::new(11, 18);
	let moved = cursor.map(&rebased.applied).unwrap();
	let merged = rebased.applied.apply(&local_doc).unwrap();
	assert_eq!(merged.to_string(), "fn start() {todo!()}");
	assert_eq!(merged.slice(moved.min(), moved.max()).unwrap().to_string(), "todo!()");
}

proptest! {
	/// Both application orders produce the same document.
	#[test]
	fn prop_pairwise_convergence(doc in arb_document()) {
		let len = doc.len();

		proptest!(|(a in arb_changes(len), b in arb_changes(len), applied_first in any::<bool>())| {
			let a = ChangeSet::new(len, a).unwrap();
			let b = ChangeSet::new(len, b).unwrap();
			let precedence = if applied_first { Precedence::AppliedFirst } else { Precedence::PendingFirst };

			let rebased = rebase(&a, &b, precedence).unwrap();
			prop_assert_eq!(rebased.pending.len(), a.len_after());
			prop_assert_eq!(rebased.applied.len(), b.len_after());
			let via_a = rebased.pending.apply(&a.apply(&doc).unwrap()).unwrap();
			let via_b = rebased.applied.apply(&b.apply(&doc).unwrap()).unwrap();
			prop_assert_eq!(via_a.to_string(), via_b.to_string());
		});
	}

	/// Swapping the arguments and the precedence swaps the outputs.
	#[test]
	fn prop_rebase_is_symmetric(doc in arb_document()) {
		let len = doc.len();

		proptest!(|(a in arb_changes(len), b in arb_changes(len))| {
			let a = ChangeSet::new(len, a).unwrap();
			let b = ChangeSet::new(len, b).unwrap();
			let ab = rebase(&a, &b, Precedence::AppliedFirst).unwrap();
			let ba = rebase(&b, &a, Precedence::PendingFirst).unwrap();
			prop_assert_eq!(ab.pending, ba.applied);
			prop_assert_eq!(ab.applied, ba.pending);
		});
	}

	/// Rebasing over an identity changeset changes nothing.
	#[test]
	fn prop_identity_is_neutral(doc in arb_document()) {
		let len = doc.len();

		proptest!(|(a in arb_changes(len))| {
			let a = ChangeSet::new(len, a).unwrap();
			let rebased = rebase(&ChangeSet::empty(len), &a, Precedence::AppliedFirst).unwrap();
			prop_assert_eq!(&rebased.pending, &a);
			prop_assert!(rebased.applied.is_identity());
		});
	}
}
