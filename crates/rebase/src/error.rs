//! Error types for rebasing and configuration.

use thiserror::Error;
use weft_primitives::{ChangeError, CuLen};

use crate::origin::Origin;

/// Errors raised by the rebase engine and [`History`](crate::History).
///
/// All of them are contract violations by the caller: the session layer is
/// expected to keep divergent histories away from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebaseError {
	/// The two changesets were not derived from documents of the same length.
	#[error("changesets derive from different bases: applied expects length {applied}, pending expects {pending}")]
	BaseMismatch {
		/// Source length of the applied changeset.
		applied: CuLen,
		/// Source length of the pending changeset.
		pending: CuLen,
	},
	/// Two concurrent edits carry the same origin, so no precedence exists.
	#[error("concurrent edits share origin {0}")]
	SameOrigin(Origin),
	/// A changeset operation failed.
	#[error(transparent)]
	Change(#[from] ChangeError),
}

/// Result type for rebase operations.
pub type Result<T> = std::result::Result<T, RebaseError>;

/// Errors that can occur when parsing rebase configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML source could not be parsed into a [`RebaseConfig`](crate::RebaseConfig).
	#[error("invalid rebase config: {0}")]
	Parse(#[from] toml::de::Error),
}
