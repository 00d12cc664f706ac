//! sitewalk: streaming content discovery and output-directory guard for static site builds.
//!
//! - [`stream_files`] walks a tree and sends every file passing a [`Filter`] chain through a
//!   bounded channel while the walk is still running.
//! - [`spawn_stream`] runs that walk on its own thread and hands back a [`FileStream`].
//! - [`OutputGuard`] removes a previous build's output before a new build writes.
//!
//! All disk access goes through [`fs::Fs`], so both halves run against [`fs::MemFs`] in tests.

pub mod engine;
pub mod error;
pub mod fs;
pub mod output;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{GuardError, StreamError};
pub use output::{OutputGuard, OutputState, RemovalPolicy, prepare_output};
pub use pipeline::{
    CancelToken, FileStream, Filter, StreamOpts, collect_files, markdown_only, matches,
    no_underscores, spawn_stream, stream_files,
};
