//! The proof session: a document, its segmentation into forms, and the
//! proved-through watermark.
//!
//! A [`Session`] owns everything one open editor buffer needs: the text as
//! a [`LinedString`], the proved prefix (forms the prover has accepted this
//! session), the unverified forms past the watermark, and a handle to the
//! [`Bridge`]. The watermark only moves forward one form at a time, in
//! document order, as [`advance_to`](Session::advance_to) gets successful
//! responses back; it returns to nothing on [`reset`](Session::reset).
//!
//! Sequential submission is load-bearing: the remote evaluator is a single
//! ordered session, so form *i + 1* is never sent before form *i*'s
//! response arrives. Within one session that is enforced here by awaiting
//! each response, and reentrant calls are ruled out by `&mut self`: a
//! caller cannot start a second advance (or a reset) while one is in
//! flight. There is no mid-form cancellation: dropping the future of an
//! in-flight advance abandons a request whose eventual response will be
//! misdelivered to the next waiter, so drive each advance to completion.

use crate::bridge::{Bridge, BridgeError, Kind, Response};
use acl2_parser::{Form, segment};
use proofpad_util::LinedString;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Observer of session activity, implemented by the presentation layer.
pub trait Listener {
  /// An evaluator response arrived, paired with the submitted text when it
  /// came from a manual [`submit`](Session::submit) rather than an advance.
  /// Every evaluation is forwarded here, successful or not.
  fn on_output(&mut self, input: Option<&str>, resp: &Response);

  /// The proved prefix changed: `proved_through` is the index of the last
  /// proved form (`None` after a reset) and `read_only_up_to` is the byte
  /// offset of the end of the proved prefix, which the editor should render
  /// read-only.
  fn on_progress(&mut self, proved_through: Option<usize>, read_only_up_to: usize);
}

/// A [`Listener`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullListener;

impl Listener for NullListener {
  fn on_output(&mut self, _: Option<&str>, _: &Response) {}
  fn on_progress(&mut self, _: Option<usize>, _: usize) {}
}

/// Errors from session operations.
#[derive(Debug)]
pub enum SessionError {
  /// An advance targeted a form index past the end of the document.
  NoSuchForm(usize),
  /// The bridge failed while evaluating a manual submission.
  Bridge(BridgeError),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

impl fmt::Display for SessionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SessionError::NoSuchForm(n) => write!(f, "no form at index {n}"),
      SessionError::Bridge(e) => e.fmt(f),
    }
  }
}

impl std::error::Error for SessionError {}

impl From<BridgeError> for SessionError {
  fn from(e: BridgeError) -> Self { SessionError::Bridge(e) }
}

/// The error that halted the last advance, kept until the next advance or
/// reset. Prover rejections and transport failures both stop the watermark
/// but are distinguishable here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofError {
  /// The prover rejected a form (a response with a non-`SUCCESS` kind).
  Rejected(Response),
  /// The connection failed before a response arrived.
  Transport(String),
}

/// How an [`advance_to`](Session::advance_to) call ended.
#[derive(Debug)]
pub enum AdvanceOutcome {
  /// Every requested form was proved.
  Complete,
  /// The prover rejected the form at (document) index `index`; it and its
  /// successors remain unverified.
  Rejected {
    /// Index of the rejected form.
    index: usize,
    /// The rejecting response.
    response: Response,
  },
  /// The connection failed while the form at `index` was outstanding.
  TransportFailed {
    /// Index of the form whose response never arrived.
    index: usize,
    /// The transport error.
    error: BridgeError,
  },
}

/// One editing session against the prover. See the module docs.
pub struct Session<L> {
  text: LinedString,
  /// The proved prefix, in document order.
  verified: Vec<Form>,
  /// Forms past the watermark, recomputed on every edit.
  forms: VecDeque<Form>,
  last_error: Option<ProofError>,
  bridge: Arc<Bridge>,
  listener: L,
}

impl<L: fmt::Debug> fmt::Debug for Session<L> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("verified", &self.verified.len())
      .field("forms", &self.forms.len())
      .field("last_error", &self.last_error)
      .field("listener", &self.listener)
      .finish_non_exhaustive()
  }
}

impl<L: Listener> Session<L> {
  /// Create a session over `text`, segmenting it from the start.
  pub fn new(bridge: Arc<Bridge>, text: String, listener: L) -> Session<L> {
    let text: LinedString = text.into();
    let forms = segment(&text, 0).into();
    Session { text, verified: vec![], forms, last_error: None, bridge, listener }
  }

  /// The document text.
  #[must_use]
  pub fn text(&self) -> &LinedString { &self.text }

  /// The forms past the watermark, in document order. The front form is at
  /// document index [`proved_through`](Self::proved_through)` + 1`.
  #[must_use]
  pub fn forms(&self) -> &VecDeque<Form> { &self.forms }

  /// The proved prefix, in document order.
  #[must_use]
  pub fn verified(&self) -> &[Form] { &self.verified }

  /// Index of the last proved form, or `None` if nothing is proved.
  #[must_use]
  pub fn proved_through(&self) -> Option<usize> { self.verified.len().checked_sub(1) }

  /// Byte offset of the end of the proved prefix (0 if nothing is proved).
  /// The document up to this offset should be treated as read-only.
  #[must_use]
  pub fn read_only_up_to(&self) -> usize {
    self.verified.last().map_or(0, |f| f.span.end)
  }

  /// The error that halted the last advance, if any.
  #[must_use]
  pub fn last_error(&self) -> Option<&ProofError> { self.last_error.as_ref() }

  /// The underlying connection.
  #[must_use]
  pub fn bridge(&self) -> &Bridge { &self.bridge }

  /// The listener.
  pub fn listener(&self) -> &L { &self.listener }

  /// The listener, mutably.
  pub fn listener_mut(&mut self) -> &mut L { &mut self.listener }

  /// Replace the document text and recompute the forms past the watermark.
  /// The proved prefix is untouched; keeping edits out of it is the
  /// editor's job, via [`read_only_up_to`](Self::read_only_up_to).
  pub fn update_text(&mut self, text: String) {
    self.text = text.into();
    self.forms = segment(&self.text, self.read_only_up_to()).into();
  }

  /// Prove forms up through document index `target`, one at a time and
  /// strictly in order, stopping at the first failure.
  ///
  /// Each success advances the watermark and notifies the listener before
  /// the next form is sent. A non-`SUCCESS` response or a transport error
  /// stops the loop with the watermark at the last proved form; the
  /// remaining forms are not submitted and nothing is retried. A target
  /// at or below the watermark trivially completes.
  pub async fn advance_to(&mut self, target: usize) -> Result<AdvanceOutcome> {
    let proved = self.verified.len();
    if target < proved { return Ok(AdvanceOutcome::Complete) }
    let remaining = target + 1 - proved;
    if remaining > self.forms.len() { return Err(SessionError::NoSuchForm(target)) }
    self.last_error = None;
    for _ in 0..remaining {
      let Some(form) = self.forms.pop_front() else { break };
      match self.bridge.evaluate(&form.source).await {
        Ok(resp) => {
          self.listener.on_output(None, &resp);
          if resp.kind == Kind::Success {
            self.verified.push(form);
            self.listener.on_progress(self.proved_through(), self.read_only_up_to());
          } else {
            let index = self.verified.len();
            self.forms.push_front(form);
            self.last_error = Some(ProofError::Rejected(resp.clone()));
            return Ok(AdvanceOutcome::Rejected { index, response: resp })
          }
        }
        Err(e) => {
          let index = self.verified.len();
          self.forms.push_front(form);
          self.last_error = Some(ProofError::Transport(e.to_string()));
          return Ok(AdvanceOutcome::TransportFailed { index, error: e })
        }
      }
    }
    Ok(AdvanceOutcome::Complete)
  }

  /// Undo everything: reset the prover, clear the watermark and error
  /// state, and resegment the document from offset 0. The reset command's
  /// own response is not forwarded to the listener, matching the advance
  /// UI, which discards it.
  pub async fn reset(&mut self) {
    self.bridge.reset().await;
    self.verified.clear();
    self.last_error = None;
    self.forms = segment(&self.text, 0).into();
    self.listener.on_progress(None, 0);
  }

  /// Evaluate one manually entered line (the terminal input field),
  /// forwarding the response to the listener paired with its input.
  pub async fn submit(&mut self, input: &str) -> Result<Response> {
    let resp = self.bridge.evaluate(input).await?;
    self.listener.on_output(Some(input), &resp);
    Ok(resp)
  }
}
