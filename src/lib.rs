//! `scrubber` is a library for transforming a source-code tree so that it is
//! safe to publish outside its original environment.
//!
//! It reads a [`config::Config`], scans a directory of inputs via
//! [`dispatcher::Dispatcher`], and produces a scrubbed `output/` tree plus
//! `originals/`/`modified/`/`diffs/` side trees, an optional tar archive, and
//! an optional in-place overwrite through [`emitter::Emitter`]. The hard and
//! interesting part — the rule model, comment-aware rewriting, and the
//! per-file content lifecycle — lives in:
//!
//! - [`scanned_file`]: lazy UTF-8/binary content, mutation tracking, write-back.
//! - [`findings`]: tagged findings and the whitelist that suppresses them.
//! - [`matchers`]: word/regex sensitive-string detectors.
//! - [`usernames`]: publishable/scrubbable/unknown classification.
//! - [`comments`] / [`comment_rules`]: language-aware comment extraction and
//!   the comment-span rule stack (TODO, author, sensitive-in-comment, ...).
//! - [`line_rules`] / [`file_rules`] / [`batch_rules`]: per-line, whole-file,
//!   and cross-file transformations.
//! - [`rule`]: the `PerFileRule`/`BatchRule` trait seam every rule implements.
//! - [`renamer`]: the directory-rearranging file renamer.
//! - [`config`]: compiles the JSON configuration into rule tables.
//! - [`context`]: the mutable per-run state threaded through dispatch.
//! - [`dispatcher`]: resolves rules per file and orchestrates the pipeline.
//! - [`emitter`]: writes the five output artifacts.

pub mod batch_rules;
pub mod cli;
pub mod comment_rules;
pub mod comments;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod emitter;
pub mod errors;
pub mod file_rules;
pub mod findings;
pub mod line_rules;
pub mod matchers;
pub mod renamer;
pub mod rule;
pub mod scanned_file;
pub mod usernames;

pub use config::Config;
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use emitter::{EmitOptions, Emitter};
pub use errors::{Error, Result};
pub use findings::{Finding, Whitelist};
pub use scanned_file::ScannedFile;
