//! Serde wire form of a changeset.
//!
//! A changeset travels as its source length plus the normalized change
//! list. Decoding goes back through [`ChangeSet::new`], so malformed input
//! fails with the same validation error a local caller would get.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::changeset::ChangeSet;
use super::types::Change;
use crate::range::CuLen;

#[derive(Serialize, Deserialize)]
struct WireChangeSet {
	len: CuLen,
	changes: Vec<Change>,
}

impl Serialize for ChangeSet {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		WireChangeSet {
			len: self.len(),
			changes: self.changes().collect(),
		}
		.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for ChangeSet {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let wire = WireChangeSet::deserialize(deserializer)?;
		ChangeSet::new(wire.len, wire.changes).map_err(D::Error::custom)
	}
}
