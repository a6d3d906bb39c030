//! Atomic edits: changes, changesets and position mapping.

mod changeset;
mod map;
mod types;
mod wire;


pub use changeset::{ChangeSet, ChangeSetBuilder, Hunk, Hunks};
pub use types::{Assoc, Change, Insertion, MapMode, Mapped, Operation, Tendril};
