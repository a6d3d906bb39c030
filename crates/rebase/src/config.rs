//! Rebase policy loaded from configuration.

use serde::{Deserialize, Serialize};
use weft_primitives::Text;

use crate::error::ConfigError;
use crate::history::History;
use crate::origin::TieBreak;

/// Policy shared by every replica of a document.
///
/// ```toml
/// tie-break = "higher-origin-first"
/// ```
///
/// Missing keys fall back to their defaults; unknown keys are rejected so a
/// typo cannot silently select a different policy on one replica.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RebaseConfig {
	/// Precedence between concurrent edits.
	pub tie_break: TieBreak,
}

impl RebaseConfig {
	/// Parses a configuration from TOML source.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}

	/// Starts a [`History`] on `base` under this policy.
	pub fn history(&self, base: Text) -> History {
		History::new(base, self.tie_break)
	}
}
