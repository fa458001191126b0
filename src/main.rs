use clap::{Parser, Subcommand};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;

/// Proof Pad session engine
#[derive(Parser)]
#[command(name = "proofpad", version, about)]
struct Cli {
  /// Enable debug logging to proofpad.log
  #[arg(short, long)]
  debug: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Check a Lisp file against the prover, form by form
  Check(proofpad::check::Args),
  /// Print the top-level forms of a Lisp file
  Forms(proofpad::forms::Args),
  /// Interactive prover session
  Repl(proofpad::repl::Args),
}

fn main() -> io::Result<()> {
  let cli = Cli::parse();
  if cli.debug {
    let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), File::create("proofpad.log")?);
  }
  match &cli.command {
    Command::Check(args) => proofpad::check::main(args),
    Command::Forms(args) => proofpad::forms::main(args),
    Command::Repl(args) => proofpad::repl::main(args),
  }
}
