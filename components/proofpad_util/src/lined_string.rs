//! Wrapper around std's `String` which stores the positions of any newline
//! characters, so that byte offsets can be converted to and from
//! line/character [`Position`]s without rescanning the document.
//!
//! The segmenter uses this to report where each form ends, and the batch
//! checker uses it to turn a failing form's byte span back into line numbers
//! for display. The indices stored in `lines` are the successors of any
//! newline characters.

use crate::{Position, Range, Span};
use std::ops::{Deref, Index};

/// A `String` paired with the byte positions of the starts of its lines
/// (everything after a `'\n'`).
#[derive(Default, Clone, Debug)]
pub struct LinedString {
  s: String,
  lines: Vec<usize>,
}

/// Allows [`LinedString`] to be indexed with a [`Span`], since [`Span`] is
/// essentially a range.
impl Index<Span> for LinedString {
  type Output = [u8];
  fn index(&self, s: Span) -> &[u8] { &self.as_bytes()[s.start..s.end] }
}

impl LinedString {
  /// Index a [`LinedString`] with a [`Span`], returning a `str`.
  ///
  /// # Safety
  /// This function uses `str::from_utf8_unchecked()` internally, so the
  /// [`Span`] used in the index must lie on character boundaries of the
  /// string being indexed.
  #[must_use]
  pub fn str_at(&self, s: Span) -> &str {
    // Safety: the span was produced by scanning this string
    unsafe { std::str::from_utf8_unchecked(&self[s]) }
  }

  fn get_lines(s: &str) -> Vec<usize> {
    memchr::memchr_iter(b'\n', s.as_bytes()).map(|b| b + 1).collect()
  }

  /// Turn a byte index into a [`Position`].
  ///
  /// The `character` field counts bytes from the start of the line, which
  /// agrees with column counts for the ASCII documents the prover consumes.
  #[must_use]
  pub fn to_pos(&self, idx: usize) -> Position {
    let (pos, line) = match self.lines.binary_search(&idx) {
      Ok(n) => (idx, n + 1),
      Err(n) => (n.checked_sub(1).map_or(0, |i| self.lines[i]), n),
    };
    Position {
      line: line.try_into().expect("too many lines"),
      character: (idx - pos).try_into().expect("too many characters"),
    }
  }

  /// Turn a [`Span`] into a [`Range`].
  #[must_use]
  pub fn to_range(&self, s: Span) -> Range {
    Range { start: self.to_pos(s.start), end: self.to_pos(s.end) }
  }

  /// Get the total number of line breaks in the document.
  #[must_use]
  pub fn num_lines(&self) -> u32 {
    self.lines.len().try_into().expect("too many lines")
  }

  /// Get the [`Position`] of the end of the document.
  #[must_use]
  pub fn end(&self) -> Position { self.to_pos(self.s.len()) }

  /// Turn a [`Position`] into a byte index, or `None` if the line is out of
  /// range. [`Position`] is already zero-based, but `lines` stores
  /// `1 + position` of the actual linebreak characters, so `lines[0]` points
  /// to the start of line 1, with the start of line 0 just being 0.
  #[must_use]
  pub fn to_idx(&self, pos: Position) -> Option<usize> {
    match pos.line.checked_sub(1) {
      None => Some(pos.character as usize),
      Some(n) => self.lines.get(n as usize).map(|&idx| idx + pos.character as usize),
    }
  }
}

impl Deref for LinedString {
  type Target = String;
  fn deref(&self) -> &String { &self.s }
}

impl From<String> for LinedString {
  fn from(s: String) -> LinedString {
    LinedString { lines: LinedString::get_lines(&s), s }
  }
}

impl From<&str> for LinedString {
  fn from(s: &str) -> LinedString { s.to_owned().into() }
}
