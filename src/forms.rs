//! The `proofpad forms` subcommand: print the form table for a file
//! without contacting the prover. Useful for checking how a document will
//! segment, and for debugging segmentation itself.

use acl2_parser::segment;
use proofpad_util::LinedString;
use std::path::PathBuf;
use std::{fs, io};

/// Arguments to `proofpad forms`.
#[derive(clap::Args, Debug)]
pub struct Args {
  /// The Lisp source file to segment
  pub input: PathBuf,
}

/// Main entry point for the `proofpad forms` subcommand.
pub fn main(args: &Args) -> io::Result<()> {
  let text: LinedString = fs::read_to_string(&args.input)?.into();
  let forms = segment(&text, 0);
  for (i, f) in forms.iter().enumerate() {
    let head = f.source.trim_start().lines().next().unwrap_or("");
    println!(
      "{i:>3}  {:>5}..{:<5}  line {:<4} {head}",
      f.span.start,
      f.span.end,
      f.end.line + 1
    );
  }
  if forms.last().is_none_or(|f| f.span.end < text.len()) {
    let tail = text.str_at((forms.last().map_or(0, |f| f.span.end)..text.len()).into());
    if !tail.trim().is_empty() {
      println!("  (trailing text is not part of any form)");
    }
  }
  Ok(())
}
