//! Segmentation of ACL2 source documents into top-level forms.
//!
//! A *form* is one top-level parenthesized expression (or bare top-level
//! atom). The prover consumes a document one form at a time, so the session
//! engine needs the boundaries of every form past the proved-through
//! watermark after each edit. [`segment`] produces them with a single
//! paren-depth scan over the token stream; it never fails, it just stops
//! early on input whose nesting cannot be repaired locally (a stray `)`)
//! and silently drops a trailing unterminated form, which will be picked up
//! again once the user balances it.

// rust lints we want
#![warn(
  bare_trait_objects,
  elided_lifetimes_in_paths,
  missing_copy_implementations,
  missing_debug_implementations,
  future_incompatible,
  rust_2018_idioms,
  trivial_numeric_casts,
  variant_size_differences,
  unreachable_pub,
  unused,
  missing_docs
)]
#![deny(unsafe_op_in_unsafe_fn)]
// all the clippy
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// all the clippy::restriction lints we want
#![warn(
  clippy::else_if_without_else,
  clippy::float_arithmetic,
  clippy::get_unwrap,
  clippy::rc_buffer,
  clippy::rest_pat_in_fully_bound_structs,
  clippy::string_add,
  clippy::undocumented_unsafe_blocks,
  clippy::unwrap_used
)]
// all the clippy lints we don't want
#![allow(
  clippy::cognitive_complexity,
  clippy::default_trait_access,
  clippy::missing_const_for_fn,
  clippy::missing_errors_doc,
  clippy::missing_panics_doc,
  clippy::module_name_repetitions,
  clippy::multiple_crate_versions,
  clippy::option_if_let_else,
  clippy::semicolon_if_nothing_returned,
  clippy::use_self
)]

pub mod lexer;

use lexer::{Lexer, TokenKind};
use proofpad_util::{LinedString, Position, Span};

/// A top-level form of the document.
///
/// Forms tile the scanned region: each form's span begins where the previous
/// form's span ends (or at the scan origin), so leading whitespace between
/// forms belongs to the following form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Form {
  /// The extent of the form, from the end of the previous form (or the scan
  /// origin) through the final token.
  pub span: Span,
  /// The position just past the form's final token.
  pub end: Position,
  /// The number of document lines this form spans, counted from the line
  /// after the previous form's end (or from the first scanned line). Two
  /// forms ending on one line give the second a line count of zero.
  pub lines: u32,
  /// The form's text with comments stripped, ready for submission to the
  /// prover. Whitespace (including newlines) is preserved.
  pub source: String,
}

/// Split the document into top-level forms, beginning the scan at byte
/// offset `from` (the proved-through watermark).
///
/// Comment tokens are skipped entirely: they do not affect nesting and they
/// are stripped from each form's [`source`](Form::source). A token that
/// returns the nesting depth to zero ends a form, so bare top-level atoms
/// are forms of their own. A token that takes the depth negative ends the
/// scan: the rest of the document is unsegmentable until the stray `)` is
/// edited away, and only the forms completed so far are returned.
///
/// The result is a pure function of `(text, from)`.
#[must_use]
pub fn segment(text: &LinedString, from: usize) -> Vec<Form> {
  let mut forms = vec![];
  let mut depth = 0i32;
  let mut source = String::new();
  let mut start = from;
  // A nonzero watermark sits just past a verified form's final token, so
  // line counting resumes on the following line, matching a fresh scan.
  let mut starting_line = if from == 0 { 0 } else { text.to_pos(from).line + 1 };
  for tok in Lexer::new(text, from) {
    match tok.kind {
      TokenKind::Comment => continue,
      TokenKind::Whitespace => {
        source.push_str(text.str_at(tok.span));
        continue
      }
      TokenKind::LParen => { source.push('('); depth += 1 }
      TokenKind::RParen => { source.push(')'); depth -= 1 }
      TokenKind::Atom | TokenKind::Str => source.push_str(text.str_at(tok.span)),
    }
    if depth < 0 { return forms }
    if depth == 0 {
      let end = text.to_pos(tok.span.end);
      forms.push(Form {
        span: (start..tok.span.end).into(),
        end,
        lines: end.line + 1 - starting_line,
        source: std::mem::take(&mut source),
      });
      start = tok.span.end;
      starting_line = end.line + 1;
    }
  }
  forms
}
