//! Byte-level scanner over ACL2 source text.
//!
//! The scanner is deliberately shallow: it recognizes just enough structure
//! (parens, strings, comments, atoms) for the form segmenter to count
//! nesting correctly. In particular parens inside strings and comments must
//! not count, but numbers, keywords like `:ubu`, and reader sugar such as
//! `'` all lex as plain [`Atom`](TokenKind::Atom)s. Malformed input never
//! fails the scan: an unterminated string or block comment extends to the
//! end of the input and is retried after the next edit.

use proofpad_util::Span;

/// The classification of a [`Token`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
  /// A left parenthesis.
  LParen,
  /// A right parenthesis.
  RParen,
  /// A maximal run of non-delimiter characters: symbols, numbers,
  /// keywords, reader sugar.
  Atom,
  /// A double-quoted string literal, with `\` escapes.
  Str,
  /// A `;` line comment or a (nestable) `#| ... |#` block comment.
  Comment,
  /// A maximal run of whitespace.
  Whitespace,
}

/// A token: a classification and the byte range it covers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
  /// The classification of the token.
  pub kind: TokenKind,
  /// The extent of the token in the source.
  pub span: Span,
}

/// Characters that terminate an [`Atom`](TokenKind::Atom).
fn delimiter(c: u8) -> bool {
  c.is_ascii_whitespace() || matches!(c, b'(' | b')' | b'"' | b';')
}

/// An iterator over the [`Token`]s of a source string, starting at a given
/// byte offset. Token spans are absolute offsets into the full string.
#[derive(Debug)]
pub struct Lexer<'a> {
  source: &'a [u8],
  idx: usize,
}

impl<'a> Lexer<'a> {
  /// Construct a lexer over `source`, beginning the scan at byte `from`.
  #[must_use]
  pub fn new(source: &'a str, from: usize) -> Self {
    Lexer { source: source.as_bytes(), idx: from }
  }

  fn cur_opt(&self) -> Option<u8> { self.source.get(self.idx).copied() }

  fn line_comment(&mut self) {
    self.idx = memchr::memchr(b'\n', &self.source[self.idx..])
      .map_or(self.source.len(), |n| self.idx + n);
  }

  fn block_comment(&mut self) {
    self.idx += 2;
    let mut depth = 1u32;
    while depth > 0 {
      match (self.cur_opt(), self.source.get(self.idx + 1).copied()) {
        (Some(b'#'), Some(b'|')) => { depth += 1; self.idx += 2 }
        (Some(b'|'), Some(b'#')) => { depth -= 1; self.idx += 2 }
        (Some(_), _) => self.idx += 1,
        (None, _) => break,
      }
    }
  }

  fn string(&mut self) {
    self.idx += 1;
    loop {
      match self.cur_opt() {
        Some(b'"') => { self.idx += 1; break }
        Some(b'\\') if self.idx + 1 < self.source.len() => self.idx += 2,
        Some(_) => self.idx += 1,
        None => break,
      }
    }
  }
}

impl Iterator for Lexer<'_> {
  type Item = Token;
  fn next(&mut self) -> Option<Token> {
    let start = self.idx;
    let c = self.cur_opt()?;
    let kind = match c {
      b'(' => { self.idx += 1; TokenKind::LParen }
      b')' => { self.idx += 1; TokenKind::RParen }
      b';' => { self.line_comment(); TokenKind::Comment }
      b'#' if self.source.get(self.idx + 1) == Some(&b'|') => {
        self.block_comment();
        TokenKind::Comment
      }
      b'"' => { self.string(); TokenKind::Str }
      c if c.is_ascii_whitespace() => {
        while self.cur_opt().is_some_and(|c| c.is_ascii_whitespace()) {
          self.idx += 1
        }
        TokenKind::Whitespace
      }
      _ => {
        while self.cur_opt().is_some_and(|c| !delimiter(c)) {
          self.idx += 1
        }
        TokenKind::Atom
      }
    };
    Some(Token { kind, span: (start..self.idx).into() })
  }
}
