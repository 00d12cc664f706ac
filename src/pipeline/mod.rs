//! Streaming discovery pipeline: filter chain, walk loop, per-stream context, spawned streams.

pub mod context;
pub mod filter;
pub mod orchestrator;
pub mod walk;

pub use context::{CancelToken, StreamContext, StreamOpts, create_path_channel};
pub use filter::{Filter, markdown_only, matches, no_underscores};
pub use orchestrator::{FileStream, collect_files, spawn_stream};
pub use walk::{DepthFirst, WalkOutcome, run_walk_loop, stream_files, stream_files_with};
