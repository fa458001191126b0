//! Support types shared by the Proof Pad crates: byte spans, line/character
//! positions, the newline-indexed [`LinedString`] document wrapper, and a few
//! small lock and path utilities.

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

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

mod lined_string;

pub use lined_string::LinedString;

/// Extension trait for [`Mutex`]`<T>`.
pub trait MutexExt<T> {
  /// Like `lock`, but propagates instead of catches panics.
  fn ulock(&self) -> MutexGuard<'_, T>;
}

impl<T> MutexExt<T> for Mutex<T> {
  fn ulock(&self) -> MutexGuard<'_, T> {
    self.lock().expect("propagating poisoned mutex")
  }
}

/// Points to a specific region of a source document by identifying the
/// region's start and end points.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span {
  /// The byte index of the beginning of the span (inclusive).
  pub start: usize,
  /// The byte index of the end of the span (exclusive).
  pub end: usize,
}

impl From<std::ops::Range<usize>> for Span {
  #[inline]
  fn from(r: std::ops::Range<usize>) -> Self { Span { start: r.start, end: r.end } }
}

impl From<Span> for std::ops::Range<usize> {
  #[inline]
  fn from(s: Span) -> Self { s.start..s.end }
}

impl fmt::Debug for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.start, self.end)
  }
}

/// Position in a text document expressed as zero-based line and character
/// offset. A position is between two characters like an 'insert' cursor in an
/// editor.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Default)]
pub struct Position {
  /// Line position in a document (zero-based).
  pub line: u32,
  /// Character offset on a line in a document (zero-based).
  pub character: u32,
}

/// A range in a text document expressed as (zero-based) start and end
/// positions. The end position is exclusive.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct Range {
  /// The range's start position.
  pub start: Position,
  /// The range's end position.
  pub end: Position,
}

/// A [`PathBuf`] lazily initialized to a canonicalized "."
static CURRENT_DIR: once_cell::sync::Lazy<PathBuf> =
  once_cell::sync::Lazy::new(|| std::fs::canonicalize(".").expect("failed to find current directory"));

/// Given a path, constructs a relative path from [`CURRENT_DIR`] to it,
/// returning it as a `String` for display purposes.
///
/// [`CURRENT_DIR`]: struct@CURRENT_DIR
fn make_relative(buf: &Path) -> String {
  pathdiff::diff_paths(buf, &*CURRENT_DIR)
    .as_deref()
    .unwrap_or(buf)
    .to_str()
    .expect("bad unicode in file path")
    .to_owned()
}

#[derive(Default)]
struct FileRefInner {
  path: PathBuf,
  rel: String,
}

/// A reference to a file. It wraps an [`Arc`] so it can be cloned
/// thread-safely, and provides (precomputed) access to the absolute path
/// via [`path()`](FileRef::path) and the relative path from the current
/// directory via [`rel()`](FileRef::rel).
#[derive(Clone, Default)]
pub struct FileRef(Arc<FileRefInner>);

impl From<PathBuf> for FileRef {
  fn from(path: PathBuf) -> FileRef {
    let rel = make_relative(&path);
    FileRef(Arc::new(FileRefInner { path, rel }))
  }
}

impl FileRef {
  /// Constructs a new [`FileRef`] from a canonicalized path.
  #[must_use]
  pub fn new(path: PathBuf) -> FileRef { path.into() }

  /// Returns the absolute path of the file.
  #[must_use]
  pub fn path(&self) -> &PathBuf { &self.0.path }

  /// Returns the relative path of the file (for display).
  #[must_use]
  pub fn rel(&self) -> &str { &self.0.rel }
}

impl PartialEq for FileRef {
  fn eq(&self, other: &Self) -> bool { self.0.path == other.0.path }
}
impl Eq for FileRef {}

impl std::hash::Hash for FileRef {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) { self.0.path.hash(state) }
}

impl fmt::Display for FileRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.rel.fmt(f) }
}

impl fmt::Debug for FileRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}
