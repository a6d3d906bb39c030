//! Rebase engine for concurrent edits to a shared document.
//!
//! Two changesets derived from the same document are transformed against
//! each other with [`rebase`] so that either can be applied after the other
//! and both replicas converge. [`Edit`] tags a changeset with its [`Origin`],
//! from which a [`TieBreak`] policy derives the [`Precedence`] between
//! concurrent edits. [`History`] folds any number of concurrent edits in an
//! order every replica agrees on.

/// Rebase policy configuration.
pub mod config;
/// Error types.
pub mod error;
/// Serialized integration of concurrent edits.
pub mod history;
/// Edit origins and tie-breaking.
pub mod origin;
/// Pairwise rebase.
pub mod rebase;
mod spans;

pub use config::RebaseConfig;
pub use error::{ConfigError, RebaseError, Result};
pub use history::{History, Integrated};
pub use origin::{Edit, Origin, TieBreak};
pub use rebase::{Precedence, Rebased, rebase};
