//! Proof Pad session engine: incremental checking of ACL2 source files
//! against a remote proof server.
//!
//! ```text
//! USAGE:
//! proofpad <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     check    Check a Lisp file against the prover, form by form
//!     forms    Print the top-level forms of a Lisp file
//!     help     Print this message or the help of the given subcommand(s)
//!     repl     Interactive prover session
//! ```
//!
//! The library is the engine behind those commands (and behind any richer
//! front-end): [`acl2_parser::segment`] splits a document into top-level
//! forms, [`session::Session`] owns the proved-through watermark and
//! submits unverified forms to the prover one at a time, and
//! [`bridge::Bridge`] is the connection doing the talking.

// rust lints we want
#![warn(bare_trait_objects, elided_lifetimes_in_paths,
  missing_copy_implementations, missing_debug_implementations, future_incompatible,
  rust_2018_idioms, trivial_numeric_casts, variant_size_differences, unreachable_pub,
  unused, missing_docs)]
// all the clippy
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// all the clippy::restriction lints we want
#![warn(clippy::float_arithmetic,
  clippy::get_unwrap, clippy::rc_buffer, clippy::rest_pat_in_fully_bound_structs,
  clippy::string_add, clippy::unwrap_used)]
// all the clippy lints we don't want
#![allow(clippy::cognitive_complexity, clippy::comparison_chain,
  clippy::default_trait_access, clippy::manual_map, clippy::map_err_ignore,
  clippy::missing_const_for_fn, clippy::missing_errors_doc, clippy::missing_panics_doc,
  clippy::module_name_repetitions, clippy::multiple_crate_versions,
  clippy::option_if_let_else, clippy::redundant_pub_crate,
  clippy::semicolon_if_nothing_returned, clippy::shadow_unrelated, clippy::too_many_lines,
  clippy::use_self)]

pub mod bridge;
pub mod check;
pub mod forms;
pub mod repl;
pub mod session;
pub mod transcript;

pub use acl2_parser::{Form, segment};
pub use bridge::{Bridge, BridgeError, Kind, Response};
pub use proofpad_util::*;
pub use session::{AdvanceOutcome, Listener, ProofError, Session, SessionError};
pub use transcript::{LogEntry, LogKind, Transcript};
