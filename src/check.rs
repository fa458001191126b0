//! The standalone (command line) checker interface.
//!
//! This drives a whole file through the prover the way the proof bar does
//! interactively: segment the buffer, advance the watermark over every
//! form in order, and stop at the first failure, which is reported as a
//! Rust-style diagnostic using the [`annotate_snippets`] crate.

use crate::bridge::{Bridge, Kind, Response, default_address};
use crate::session::{AdvanceOutcome, Listener, Session};
use acl2_parser::Form;
use annotate_snippets::{Level, Renderer, Snippet};
use futures::executor::block_on;
use proofpad_util::{FileRef, LinedString, Position, Range, Span};
use std::path::PathBuf;
use std::sync::Arc;
use std::{fs, io, process};

/// Arguments to `proofpad check`.
#[derive(clap::Args, Debug)]
pub struct Args {
  /// The Lisp source file to check
  pub input: PathBuf,
  /// The prover bridge endpoint (host:port)
  #[arg(short, long, default_value_t = default_address())]
  pub address: String,
  /// Submit the whole buffer once in program mode instead of form by form
  #[arg(short, long)]
  pub program_mode: bool,
}

struct Progress {
  total: usize,
}

impl Listener for Progress {
  fn on_output(&mut self, _: Option<&str>, resp: &Response) {
    log::debug!("{}: {}", resp.kind.as_str(), resp.body);
  }

  fn on_progress(&mut self, proved_through: Option<usize>, _: usize) {
    if let Some(i) = proved_through {
      println!("proved {}/{}", i + 1, self.total);
    }
  }
}

/// Render the rejected form with the first line of the prover's complaint,
/// rustc style, followed by the full prover output.
fn render_failure(path: &FileRef, file: &LinedString, form: &Form, msg: &str) {
  // the span tiles the document, so trim the leading inter-form whitespace
  // off the highlight
  let slice = file.str_at(form.span);
  let ws = slice.len() - slice.trim_start().len();
  let span = Span::from(form.span.start + ws..form.span.end);
  let Range { start, end } = file.to_range(span);
  let line_start = span.start - start.character as usize;
  let end_idx =
    file.to_idx(Position { line: end.line + 1, character: 0 }).unwrap_or_else(|| file.len());
  let title = msg.lines().next().unwrap_or("the prover rejected this form");
  let message = Level::Error.title(title).snippet(
    Snippet::source(file.str_at((line_start..end_idx).into()))
      .origin(path.rel())
      .line_start(start.line as usize + 1)
      .fold(end.line - start.line >= 5)
      .annotation(Level::Error.span(span.start - line_start..span.end - line_start)),
  );
  eprintln!("{}", Renderer::styled().render(message));
  if msg.lines().nth(1).is_some() {
    eprintln!("\n{msg}");
  }
}

/// Main entry point for the `proofpad check` subcommand.
pub fn main(args: &Args) -> io::Result<()> {
  let path = FileRef::new(fs::canonicalize(&args.input)?);
  let text = fs::read_to_string(path.path())?;
  let bridge = Arc::new(Bridge::connect(&args.address)?);

  if args.program_mode {
    match block_on(bridge.evaluate_in_program_mode(&text)) {
      Ok(resp) => {
        println!("{}", resp.body);
        if resp.kind != Kind::Success { process::exit(1) }
      }
      Err(e) => {
        eprintln!("{e}");
        process::exit(1)
      }
    }
    return Ok(())
  }

  let mut session = Session::new(bridge, text, Progress { total: 0 });
  let total = session.forms().len();
  if total == 0 {
    println!("no forms in {path}");
    return Ok(())
  }
  session.listener_mut().total = total;
  match block_on(session.advance_to(total - 1)) {
    Ok(AdvanceOutcome::Complete) => println!("proved {total} forms in {path}"),
    Ok(AdvanceOutcome::Rejected { index, response }) => {
      let form = session.forms().front().expect("the rejected form stays queued");
      eprintln!("form {} of {} failed:", index + 1, total);
      render_failure(&path, session.text(), form, &response.body);
      process::exit(1)
    }
    Ok(AdvanceOutcome::TransportFailed { index, error }) => {
      eprintln!("form {} of {}: {}", index + 1, total, error);
      process::exit(1)
    }
    Err(e) => {
      eprintln!("{e}");
      process::exit(1)
    }
  }
  Ok(())
}
