//! Client for the remote ACL2 bridge service.
//!
//! The bridge is a persistent duplex connection carrying an ordered
//! request/response exchange: each outbound message is the raw source text
//! of one form (or REPL line), JSON-encoded on a single line, and each
//! inbound message is a JSON object `{"Kind": ..., "Body": ...}` on a
//! single line. Responses are correlated to requests by order alone, so a
//! FIFO queue of waiters is resolved by a reader thread as lines arrive.
//!
//! A [`Bridge`] is an explicitly constructed handle with lifecycle
//! `connect -> use -> close`; nothing here lives in module globals. Events
//! that arrive with no request outstanding are routed to a connection-wide
//! unhandled-error callback (settable with
//! [`on_unhandled_error`](Bridge::on_unhandled_error)).

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use futures::channel::oneshot::{Canceled, Receiver, Sender as FSender, channel};
use proofpad_util::MutexExt;
use serde::Deserialize;

/// The command submitted by [`Bridge::reset`]: undo back through the
/// bridge bootstrap event, discarding everything proved this session.
pub const RESET_COMMAND: &str = ":ubu \"centaur/bridge/top\"";

/// The default bridge endpoint, overridable with the `PROOFPAD_SERVER`
/// environment variable.
#[must_use]
pub fn default_address() -> String {
  std::env::var("PROOFPAD_SERVER").unwrap_or_else(|_| "localhost:55433".to_owned())
}

/// Errors arising from the connection itself, as opposed to proof failures,
/// which are ordinary [`Response`]s with [`Kind::Error`].
#[derive(Debug)]
pub enum BridgeError {
  /// A request was made on a connection that is no longer open.
  NotOpen,
  /// The connection failed out from under us.
  Unclean(String),
  /// An I/O error while sending a request.
  Io(io::Error),
  /// The server sent a line that does not parse as a response.
  Json(serde_json::Error),
  /// The connection was torn down with this request still queued.
  Dropped,
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl fmt::Display for BridgeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BridgeError::NotOpen => write!(f, "Socket is not open"),
      BridgeError::Unclean(cause) => write!(f, "Socket closed unexpectedly. {cause}"),
      BridgeError::Io(e) => e.fmt(f),
      BridgeError::Json(e) => write!(f, "malformed response: {e}"),
      BridgeError::Dropped => write!(f, "Socket closed with the request still pending"),
    }
  }
}

impl std::error::Error for BridgeError {}

impl From<io::Error> for BridgeError {
  fn from(e: io::Error) -> Self { BridgeError::Io(e) }
}
impl From<serde_json::Error> for BridgeError {
  fn from(e: serde_json::Error) -> Self { BridgeError::Json(e) }
}
impl From<Canceled> for BridgeError {
  fn from(_: Canceled) -> Self { BridgeError::Dropped }
}

/// The tag of a [`Response`]. `SUCCESS` and `ERROR` drive the proof
/// watermark; anything else is informational and passed through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
  /// The form was accepted by the prover.
  Success,
  /// The form was rejected, or the synthetic "Socket closed." response.
  Error,
  /// Any other tag the service emits.
  Other(String),
}

impl Kind {
  fn from_tag(tag: String) -> Kind {
    match &*tag {
      "SUCCESS" => Kind::Success,
      "ERROR" => Kind::Error,
      _ => Kind::Other(tag),
    }
  }

  /// The wire tag for this kind.
  #[must_use]
  pub fn as_str(&self) -> &str {
    match self {
      Kind::Success => "SUCCESS",
      Kind::Error => "ERROR",
      Kind::Other(tag) => tag,
    }
  }
}

/// One evaluator response: a tag and the prover's output text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
  /// The response tag.
  pub kind: Kind,
  /// The prover's output.
  pub body: String,
}

impl Response {
  /// The synthetic response delivered to the oldest waiter when the server
  /// closes the connection in an orderly way.
  #[must_use]
  pub fn socket_closed() -> Response {
    Response { kind: Kind::Error, body: "Socket closed.".to_owned() }
  }
}

#[derive(Deserialize)]
struct RawResponse {
  #[serde(rename = "Kind")]
  kind: String,
  #[serde(rename = "Body", default)]
  body: String,
}

impl From<RawResponse> for Response {
  fn from(r: RawResponse) -> Response {
    Response { kind: Kind::from_tag(r.kind), body: r.body }
  }
}

type Waiter = FSender<Result<Response>>;
type ErrorCallback = Box<dyn FnMut(BridgeError) + Send>;

struct ConnState {
  stream: TcpStream,
  pending: VecDeque<Waiter>,
}

struct Shared {
  conn: Mutex<ConnState>,
  open: AtomicBool,
  on_unhandled: Mutex<ErrorCallback>,
}

impl Shared {
  fn unhandled(&self, e: BridgeError) {
    let mut cb = self.on_unhandled.ulock();
    (*cb)(e)
  }

  /// Resolve the oldest waiter with `res`. With nothing waiting, a response
  /// is merely logged but an error goes to the unhandled-error callback.
  fn settle(&self, res: Result<Response>) {
    let waiter = self.conn.ulock().pending.pop_front();
    match (waiter, res) {
      (Some(w), res) => { let _ = w.send(res); }
      (None, Ok(resp)) => log::warn!("no handler for {resp:?}"),
      (None, Err(e)) => self.unhandled(e),
    }
  }
}

fn reader_loop(stream: TcpStream, shared: &Shared) {
  let mut reader = BufReader::new(stream);
  let mut line = String::new();
  loop {
    line.clear();
    match reader.read_line(&mut line) {
      Ok(0) => {
        // orderly EOF: the server is done with us
        shared.open.store(false, Ordering::Relaxed);
        shared.settle(Ok(Response::socket_closed()));
        break
      }
      Ok(_) => {
        log::debug!("recv {}", line.trim_end());
        match serde_json::from_str::<RawResponse>(&line) {
          Ok(raw) => shared.settle(Ok(raw.into())),
          Err(e) => shared.settle(Err(e.into())),
        }
      }
      Err(e) => {
        shared.open.store(false, Ordering::Relaxed);
        shared.settle(Err(BridgeError::Unclean(e.to_string())));
        break
      }
    }
  }
  // any waiters behind the one that saw the close can never be answered
  shared.conn.ulock().pending.clear();
}

/// A live connection to the bridge service.
pub struct Bridge {
  shared: Arc<Shared>,
  reader: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for Bridge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Bridge").field("open", &self.is_open()).finish_non_exhaustive()
  }
}

impl Bridge {
  /// Open a connection to the bridge service at `addr` and start the
  /// reader thread.
  pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Bridge> {
    let stream = TcpStream::connect(addr)?;
    let shared = Arc::new(Shared {
      conn: Mutex::new(ConnState { stream: stream.try_clone()?, pending: VecDeque::new() }),
      open: AtomicBool::new(true),
      on_unhandled: Mutex::new(Box::new(|e| log::warn!("no handler for {e}"))),
    });
    let reader = {
      let shared = shared.clone();
      thread::spawn(move || reader_loop(stream, &shared))
    };
    Ok(Bridge { shared, reader: Mutex::new(Some(reader)) })
  }

  /// Whether the connection is still believed open. A request sent in the
  /// window after the server closes will fail with an I/O error instead.
  #[must_use]
  pub fn is_open(&self) -> bool { self.shared.open.load(Ordering::Relaxed) }

  /// Replace the callback receiving errors that no request is waiting for.
  pub fn on_unhandled_error(&self, cb: impl FnMut(BridgeError) + Send + 'static) {
    *self.shared.on_unhandled.ulock() = Box::new(cb);
  }

  /// Write one request line and enqueue its waiter, atomically with respect
  /// to other senders so that queue order matches wire order.
  fn send_request(&self, code: &str) -> Result<Receiver<Result<Response>>> {
    if !self.is_open() { return Err(BridgeError::NotOpen) }
    log::debug!("send {code}");
    let mut conn = self.shared.conn.ulock();
    let mut line = serde_json::to_string(code)?;
    line.push('\n');
    conn.stream.write_all(line.as_bytes())?;
    let (send, recv) = channel();
    conn.pending.push_back(send);
    Ok(recv)
  }

  /// Submit one form (or REPL line) for evaluation. The returned future
  /// resolves when every earlier request has been answered and the next
  /// line arrives; there is no timeout.
  pub async fn evaluate(&self, code: &str) -> Result<Response> {
    let recv = self.send_request(code)?;
    recv.await?
  }

  /// Submit the given source once, wrapped in a `:program` / `:logic` mode
  /// switch, so definitions run without proof obligations.
  pub async fn evaluate_in_program_mode(&self, code: &str) -> Result<Response> {
    self.evaluate(&format!(":program\n{code}\n:logic")).await
  }

  /// Undo back to the bridge bootstrap state. A transport failure here is
  /// routed to the unhandled-error callback rather than the caller, which
  /// has no per-request recovery for it.
  pub async fn reset(&self) -> Option<Response> {
    match self.evaluate(RESET_COMMAND).await {
      Ok(resp) => Some(resp),
      Err(e) => {
        self.shared.unhandled(e);
        None
      }
    }
  }

  /// Shut the connection down and wait for the reader thread to drain.
  pub fn close(&self) {
    self.shared.open.store(false, Ordering::Relaxed);
    let _ = self.shared.conn.ulock().stream.shutdown(Shutdown::Both);
    if let Some(h) = self.reader.ulock().take() {
      let _ = h.join();
    }
  }
}

impl Drop for Bridge {
  fn drop(&mut self) { self.close() }
}
