//! The terminal transcript: an ordered log of inputs and prover responses.
//!
//! This is the state behind the terminal panel: submissions pair up with
//! the response that answers them, everything an advance produces is
//! appended as output-only entries, and past inputs can be recalled in
//! reverse order the way a shell history is.

use crate::bridge::{Kind, Response};
use crate::session::Listener;

/// Presentation classification of a transcript entry. `Input` and
/// `Pending` classify the echoed input half and the in-flight placeholder
/// for renderers; [`Transcript`] itself only stores the output kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogKind {
  /// A line the user submitted.
  Input,
  /// A submission still awaiting its response.
  Pending,
  /// An informational response (any tag other than `SUCCESS`/`ERROR`).
  Info,
  /// An `ERROR` response or a transport failure.
  Error,
  /// A `SUCCESS` response.
  Success,
  /// The greeting shown when the session opens.
  Welcome,
}

/// One transcript entry: the input that provoked it (for manual
/// submissions) and the classified output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
  /// The submitted text, for entries produced by a manual submission.
  pub input: Option<String>,
  /// Classification of the output.
  pub kind: LogKind,
  /// The output text; `None` for the welcome entry.
  pub body: Option<String>,
}

/// The transcript itself. Created with a welcome entry; grows as responses
/// arrive.
#[derive(Clone, Debug)]
pub struct Transcript {
  entries: Vec<LogEntry>,
  pending_input: Option<String>,
  history_idx: usize,
}

impl Default for Transcript {
  fn default() -> Self { Transcript::new() }
}

impl Transcript {
  /// A fresh transcript holding only the welcome entry.
  #[must_use]
  pub fn new() -> Transcript {
    Transcript {
      entries: vec![LogEntry { input: None, kind: LogKind::Welcome, body: None }],
      pending_input: None,
      history_idx: 0,
    }
  }

  /// The entries, oldest first.
  #[must_use]
  pub fn entries(&self) -> &[LogEntry] { &self.entries }

  /// The submission currently awaiting its response, if any.
  #[must_use]
  pub fn pending_input(&self) -> Option<&str> { self.pending_input.as_deref() }

  /// Note a submission; the next recorded output is paired with it.
  pub fn record_input(&mut self, input: &str) {
    self.pending_input = Some(input.to_owned());
    self.history_idx = 0;
  }

  /// Append a response, consuming the pending input. Response kinds other
  /// than `SUCCESS`/`ERROR` are unexpected here and classified as
  /// informational.
  pub fn record_output(&mut self, resp: &Response) {
    let kind = match &resp.kind {
      Kind::Success => LogKind::Success,
      Kind::Error => LogKind::Error,
      Kind::Other(tag) => {
        log::error!("unexpected response kind: {tag}");
        LogKind::Info
      }
    };
    self.entries.push(LogEntry {
      input: self.pending_input.take(),
      kind,
      body: Some(resp.body.clone()),
    });
  }

  /// Append a transport-level failure, consuming the pending input.
  pub fn record_error(&mut self, msg: &str) {
    self.entries.push(LogEntry {
      input: self.pending_input.take(),
      kind: LogKind::Error,
      body: Some(format!("Error: {msg}")),
    });
  }

  /// Drop every entry (the terminal's Ctrl-L).
  pub fn clear(&mut self) {
    self.entries.clear();
    self.history_idx = 0;
  }

  /// The recorded inputs, oldest first.
  pub fn inputs(&self) -> impl DoubleEndedIterator<Item = &str> {
    self.entries.iter().filter_map(|e| e.input.as_deref())
  }

  /// Step back through the input history (the up arrow), returning the
  /// recalled input, or `None` at the oldest entry.
  pub fn history_prev(&mut self) -> Option<&str> {
    if self.history_idx >= self.inputs().count() { return None }
    self.history_idx += 1;
    self.recalled()
  }

  /// Step forward through the input history (the down arrow), or `None`
  /// when already at the most recent entry.
  pub fn history_next(&mut self) -> Option<&str> {
    if self.history_idx <= 1 { return None }
    self.history_idx -= 1;
    self.recalled()
  }

  fn recalled(&self) -> Option<&str> {
    let back = self.history_idx.checked_sub(1)?;
    self.inputs().rev().nth(back)
  }
}

impl Listener for Transcript {
  fn on_output(&mut self, input: Option<&str>, resp: &Response) {
    if let Some(input) = input { self.record_input(input) }
    self.record_output(resp)
  }

  fn on_progress(&mut self, _: Option<usize>, _: usize) {}
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resp(kind: Kind, body: &str) -> Response {
    Response { kind, body: body.to_owned() }
  }

  #[test]
  fn starts_with_welcome() {
    let t = Transcript::new();
    assert_eq!(t.entries().len(), 1);
    assert_eq!(t.entries()[0].kind, LogKind::Welcome);
  }

  #[test]
  fn pairs_input_with_output() {
    let mut t = Transcript::new();
    t.record_input("(f 1)");
    assert_eq!(t.pending_input(), Some("(f 1)"));
    t.record_output(&resp(Kind::Success, "1"));
    let e = t.entries().last().unwrap();
    assert_eq!(e.input.as_deref(), Some("(f 1)"));
    assert_eq!(e.kind, LogKind::Success);
    assert_eq!(t.pending_input(), None);
    // an advance response arrives with no pending input
    t.record_output(&resp(Kind::Error, "no"));
    assert_eq!(t.entries().last().unwrap().input, None);
  }

  #[test]
  fn unknown_kinds_are_informational() {
    let mut t = Transcript::new();
    t.record_output(&resp(Kind::Other("STDOUT".to_owned()), "hello"));
    assert_eq!(t.entries().last().unwrap().kind, LogKind::Info);
  }

  #[test]
  fn history_walk() {
    let mut t = Transcript::new();
    for (i, input) in ["a", "b", "c"].iter().enumerate() {
      t.record_input(input);
      t.record_output(&resp(Kind::Success, &i.to_string()));
    }
    assert_eq!(t.history_prev(), Some("c"));
    assert_eq!(t.history_prev(), Some("b"));
    assert_eq!(t.history_prev(), Some("a"));
    assert_eq!(t.history_prev(), None);
    assert_eq!(t.history_next(), Some("b"));
    assert_eq!(t.history_next(), Some("c"));
    assert_eq!(t.history_next(), None);
    // a fresh submission restarts the walk
    t.record_input("d");
    t.record_output(&resp(Kind::Success, "3"));
    assert_eq!(t.history_prev(), Some("d"));
  }

  #[test]
  fn clear_empties_the_log() {
    let mut t = Transcript::new();
    t.record_input("x");
    t.record_output(&resp(Kind::Success, "ok"));
    t.clear();
    assert!(t.entries().is_empty());
    assert_eq!(t.history_prev(), None);
  }
}
