//! The `proofpad repl` subcommand: the terminal panel, headless.
//!
//! Lines read from stdin are submitted through the session and the
//! transcript is printed as it grows. Bridge errors that arrive with no
//! request outstanding (the server hanging up while we sit at the prompt)
//! are carried from the reader thread over a channel and surfaced in the
//! transcript on the next loop turn.

use crate::bridge::{Bridge, default_address};
use crate::session::Session;
use crate::transcript::{LogEntry, LogKind, Transcript};
use futures::executor::block_on;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const WELCOME: &str = "\
Welcome to Proof Pad. Type a form to evaluate it, :reset to undo
everything, :history to list past inputs, :clear to clear the log,
or :quit to leave.";

/// Arguments to `proofpad repl`.
#[derive(clap::Args, Debug)]
pub struct Args {
  /// The prover bridge endpoint (host:port)
  #[arg(short, long, default_value_t = default_address())]
  pub address: String,
}

fn print_entry(e: &LogEntry) {
  match e.kind {
    LogKind::Welcome => println!("{WELCOME}"),
    // the prompt itself already echoes inputs and shows in-flight state
    LogKind::Input | LogKind::Pending => {}
    LogKind::Info | LogKind::Error | LogKind::Success => {
      if let Some(body) = &e.body {
        println!("{body}");
      }
    }
  }
}

fn print_new(t: &Transcript, printed: &mut usize) {
  for e in &t.entries()[*printed..] {
    print_entry(e);
  }
  *printed = t.entries().len();
}

/// Main entry point for the `proofpad repl` subcommand.
pub fn main(args: &Args) -> io::Result<()> {
  let bridge = Arc::new(Bridge::connect(&args.address)?);
  let (err_send, err_recv) = crossbeam::channel::unbounded();
  bridge.on_unhandled_error(move |e| {
    let _ = err_send.send(e);
  });
  let mut session = Session::new(bridge, String::new(), Transcript::new());
  let mut printed = 0;

  let stdin = io::stdin();
  let mut line = String::new();
  loop {
    while let Ok(e) = err_recv.try_recv() {
      session.listener_mut().record_error(&e.to_string());
    }
    print_new(session.listener(), &mut printed);
    print!("> ");
    io::stdout().flush()?;
    line.clear();
    if stdin.lock().read_line(&mut line)? == 0 { break }
    let input = line.trim();
    match input {
      "" => {}
      ":quit" | ":q" => break,
      ":reset" => block_on(session.reset()),
      ":clear" => {
        session.listener_mut().clear();
        printed = 0;
      }
      ":history" => {
        for i in session.listener().inputs() {
          println!("> {i}");
        }
      }
      _ => {
        if let Err(e) = block_on(session.submit(input)) {
          session.listener_mut().record_error(&e.to_string());
        }
      }
    }
  }
  Ok(())
}
