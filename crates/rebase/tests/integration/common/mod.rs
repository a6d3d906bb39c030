//! Common utilities for rebase integration tests.

use proptest::prelude::*;
use weft_primitives::{Change, ChangeSet, Text};
use weft_rebase::{Edit, Origin};

/// Installs a fmt subscriber once, so `RUST_LOG` shows engine traces.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub fn cs(len: usize, changes: impl IntoIterator<Item = Change>) -> ChangeSet {
	ChangeSet::new(len, changes).unwrap()
}

pub fn edit(client: u64, len: usize, changes: impl IntoIterator<Item = Change>) -> Edit {
	Edit::new(Origin::new(client, 0), cs(len, changes))
}

/// Generates a random document with some non-ASCII content.
pub fn arb_document() -> impl Strategy<Value = Text> {
	"[a-d \n\u{e9}]{0,40}".prop_map(|s| Text::from(s.as_str()))
}

/// Generates a normalized change list for a document of `len` code units.
///
/// Changes are kept short and clustered so that overlaps, touching edges and
/// same-point insertions between two independent lists are common.
pub fn arb_changes(len: usize) -> impl Strategy<Value = Vec<Change>> {
	prop::collection::vec((0..=len, 0..=4usize, prop::option::of("[A-Z]{0,3}")), 0..4).prop_map(move |mut items| {
		items.sort_by_key(|(pos, _, _)| *pos);
		let mut changes = Vec::new();
		let mut last_end = 0;
		for (pos, delete_len, insert) in items {
			let from = pos.max(last_end);
			if from > len {
				break;
			}
			let to = (from + delete_len).min(len);
			changes.push(Change { from, to, insert });
			last_end = to;
		}
		changes
	})
}
