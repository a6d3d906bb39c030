//! Convergence of many concurrent edits under every arrival order.

use itertools::Itertools;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use weft_primitives::{Change, ChangeSet, Selection, Text};
use weft_rebase::{Edit, History, Origin, RebaseConfig, TieBreak};

use crate::common::{arb_changes, arb_document, edit, init_tracing};

/// Integrates `edits` in every possible order and returns the distinct heads.
fn heads(base: &Text, edits: &[Edit], tie_break: TieBreak) -> Vec<String> {
	edits
		.iter()
		.permutations(edits.len())
		.map(|order| {
			let mut history = History::new(base.clone(), tie_break);
			let mut head = base.clone();
			for e in order {
				let integrated = history.integrate(e.clone()).unwrap();
				assert_eq!(integrated.delta.apply(&head).unwrap(), integrated.doc);
				head = integrated.doc;
			}
			assert_eq!(&head, history.head());
			head.to_string()
		})
		.unique()
		.collect()
}

#[test]
fn adversarial_overlaps_converge() {
	init_tracing();
	let base = Text::from("the quick brown fox");
	let edits = vec![
		edit(1, 19, [Change::delete(4, 10)]),
		edit(2, 19, [Change::delete(4, 10)]),
		edit(3, 19, [Change::insert(7, "!!"), Change::insert(19, ".")]),
		edit(4, 19, [Change::replace(8, 15, "red"), Change::insert(4, "very ")]),
	];

	for tie_break in [TieBreak::LowerOriginFirst, TieBreak::HigherOriginFirst] {
		let heads = heads(&base, &edits, tie_break);
		assert_eq!(heads.len(), 1, "diverged: {heads:?}");
	}
}

#[test]
fn same_point_insertions_order_by_origin() {
	let base = Text::from("[]");
	let edits: Vec<Edit> = (1..=3).map(|client| edit(client, 2, [Change::insert(1, client.to_string())])).collect();

	assert_eq!(heads(&base, &edits, TieBreak::LowerOriginFirst), vec!["[123]"]);
	assert_eq!(heads(&base, &edits, TieBreak::HigherOriginFirst), vec!["[321]"]);
}

#[test]
fn configured_policy_drives_history() {
	let config = RebaseConfig::from_toml_str(r#"tie-break = "higher-origin-first""#).unwrap();
	let mut history = config.history(Text::from("ab"));
	history
		.integrate(Edit::new(Origin::new(1, 0), ChangeSet::new(2, [Change::insert(1, "x")]).unwrap()))
		.unwrap();
	let out = history
		.integrate(Edit::new(Origin::new(1, 1), ChangeSet::new(2, [Change::insert(1, "y")]).unwrap()))
		.unwrap();
	assert_eq!(out.doc.to_string(), "ayxb");
	let origins: Vec<Origin> = history.origins().collect();
	assert_eq!(origins, vec![Origin::new(1, 1), Origin::new(1, 0)]);
}

#[test]
fn cursors_survive_reordering() {
	let base = Text::from("abcdef");
	let mut history = History::new(base, TieBreak::default());
	history.integrate(edit(5, 6, [Change::insert(0, ">")])).unwrap();
	let cursor = Selection::single(4, 6);

	// An edit from a lower origin arrives late and is ordered first.
	let out = history.integrate(edit(2, 6, [Change::delete(1, 3)])).unwrap();
	assert_eq!(out.doc.to_string(), ">adef");
	let moved = cursor.map(&out.delta).unwrap();
	assert_eq!(out.doc.slice(moved.primary().min(), moved.primary().max()).unwrap().to_string(), "de");
}

proptest! {
	/// Three random concurrent edits reach the same head in all six orders.
	#[test]
	fn prop_permutation_convergence(base in arb_document()) {
		let len = base.len();

		proptest!(|(a in arb_changes(len), b in arb_changes(len), c in arb_changes(len))| {
			let edits = vec![
				Edit::new(Origin::new(3, 0), ChangeSet::new(len, a).unwrap()),
				Edit::new(Origin::new(1, 0), ChangeSet::new(len, b).unwrap()),
				Edit::new(Origin::new(2, 0), ChangeSet::new(len, c).unwrap()),
			];
			let heads = heads(&base, &edits, TieBreak::default());
			prop_assert_eq!(heads.len(), 1);
		});
	}
}
