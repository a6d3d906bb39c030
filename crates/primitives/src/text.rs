//! Immutable document text.
//!
//! [`Text`] wraps a [`ropey::Rope`], so clones share structure and slicing,
//! concatenation and line lookup stay logarithmic. Every offset exposed here
//! is a UTF-16 code unit offset; see [`CuIdx`].

use std::fmt;

use ropey::{Rope, RopeSlice};

use crate::error::TextError;
use crate::range::{CuIdx, CuLen};

/// An immutable document.
///
/// There is no public mutation API: edits go through
/// [`ChangeSet::apply`](crate::ChangeSet::apply), which returns a new value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Text {
	rope: Rope,
}

/// A single line of a [`Text`], without its line separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
	/// Zero-based line index.
	pub number: usize,
	/// Offset of the first code unit of the line.
	pub from: CuIdx,
	/// Offset just past the line content (before the separator).
	pub to: CuIdx,
	/// Line content with the separator stripped.
	pub content: String,
}

impl Text {
	/// Creates an empty text.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a text from lines, joining them with `\n`.
	pub fn from_lines<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut joined = String::new();
		for (i, line) in lines.into_iter().enumerate() {
			if i > 0 {
				joined.push('\n');
			}
			joined.push_str(line.as_ref());
		}
		Self::from(joined.as_str())
	}

	/// Length in UTF-16 code units.
	#[inline]
	pub fn len(&self) -> CuLen {
		self.rope.len_utf16_cu()
	}

	/// Returns true if the text holds no content.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.rope.len_chars() == 0
	}

	/// Number of lines, including the empty line after a trailing separator.
	#[inline]
	pub fn len_lines(&self) -> usize {
		self.rope.len_lines()
	}

	/// Returns the half-open range `[from, to)` as a new text.
	pub fn slice(&self, from: CuIdx, to: CuIdx) -> Result<Text, TextError> {
		let (start, end) = self.char_range(from, to)?;
		Ok(Self {
			rope: Rope::from(self.rope.slice(start..end)),
		})
	}

	/// Returns a new text holding `self` followed by `other`.
	pub fn concat(&self, other: &Text) -> Text {
		let mut rope = self.rope.clone();
		rope.append(other.rope.clone());
		Self { rope }
	}

	/// Returns line `n`.
	pub fn line(&self, n: usize) -> Result<Line, TextError> {
		let lines = self.len_lines();
		if n >= lines {
			return Err(TextError::LineOutOfBounds { line: n, lines });
		}
		Ok(self.line_unchecked(n))
	}

	/// Returns the index of the line containing `pos`.
	pub fn line_at(&self, pos: CuIdx) -> Result<usize, TextError> {
		let idx = self.char_idx(pos)?;
		Ok(self.rope.char_to_line(idx))
	}

	/// Iterates over every line.
	pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
		(0..self.len_lines()).map(|n| self.line_unchecked(n))
	}

	/// Replaces `[from, to)` with `insert` in place.
	///
	/// Only changeset application reaches this; the edited value is a fresh
	/// clone owned by the caller.
	pub(crate) fn splice(&mut self, from: CuIdx, to: CuIdx, insert: &str) -> Result<(), TextError> {
		let (start, end) = self.char_range(from, to)?;
		if start < end {
			self.rope.remove(start..end);
		}
		if !insert.is_empty() {
			self.rope.insert(start, insert);
		}
		Ok(())
	}

	fn line_unchecked(&self, n: usize) -> Line {
		let slice = self.rope.line(n);
		let from = self.rope.char_to_utf16_cu(self.rope.line_to_char(n));
		let content_chars = slice.len_chars() - separator_len(slice);
		let content = slice.slice(..content_chars).to_string();
		let to = from + utf16_len(&content);
		Line {
			number: n,
			from,
			to,
			content,
		}
	}

	fn char_range(&self, from: CuIdx, to: CuIdx) -> Result<(usize, usize), TextError> {
		if from > to {
			return Err(TextError::InvalidRange { from, to });
		}
		Ok((self.char_idx(from)?, self.char_idx(to)?))
	}

	/// Converts a code unit offset into a char index, rejecting offsets that
	/// are past the end or split a surrogate pair.
	fn char_idx(&self, pos: CuIdx) -> Result<usize, TextError> {
		let len = self.len();
		if pos > len {
			return Err(TextError::OutOfBounds { pos, len });
		}
		let idx = self.rope.utf16_cu_to_char(pos);
		if self.rope.char_to_utf16_cu(idx) != pos {
			return Err(TextError::NotCharBoundary { pos });
		}
		Ok(idx)
	}
}

/// Number of chars taken by the separator at the end of `line`.
///
/// Every separator ropey recognises is in the BMP, so this is also its
/// length in code units.
fn separator_len(line: RopeSlice) -> usize {
	let n = line.len_chars();
	if n == 0 {
		return 0;
	}
	match line.char(n - 1) {
		'\n' if n >= 2 && line.char(n - 2) == '\r' => 2,
		'\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}' => 1,
		_ => 0,
	}
}

/// Length of `s` in UTF-16 code units.
#[inline]
pub(crate) fn utf16_len(s: &str) -> CuLen {
	s.chars().map(char::len_utf16).sum()
}

/// Byte offset of code unit `cu` in `s`, or `None` if `cu` splits a
/// surrogate pair or lies past the end.
pub(crate) fn utf16_to_byte(s: &str, cu: CuIdx) -> Option<usize> {
	let mut units = 0;
	for (byte, ch) in s.char_indices() {
		if units == cu {
			return Some(byte);
		}
		if units > cu {
			return None;
		}
		units += ch.len_utf16();
	}
	(units == cu).then_some(s.len())
}

impl From<&str> for Text {
	fn from(s: &str) -> Self {
		Self { rope: Rope::from_str(s) }
	}
}

impl From<String> for Text {
	fn from(s: String) -> Self {
		Self::from(s.as_str())
	}
}

impl From<Rope> for Text {
	fn from(rope: Rope) -> Self {
		Self { rope }
	}
}

impl fmt::Display for Text {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for chunk in self.rope.chunks() {
			f.write_str(chunk)?;
		}
		Ok(())
	}
}

impl fmt::Debug for Text {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Text").field(&self.to_string()).finish()
	}
}
