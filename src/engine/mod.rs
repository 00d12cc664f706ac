//! CLI surface: argument parsing, the run handler, progress output and path display.

pub mod arg_parser;
pub mod cli;
pub mod progress;
pub mod tools;

pub use arg_parser::Cli;
pub use cli::handle_run;
pub use tools::{canonicalize_paths, display_path, path_relative_to, resolve_path};
