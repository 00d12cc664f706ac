//! Build output lifecycle.

pub mod guard;

pub use guard::{OutputGuard, OutputState, RemovalPolicy, marker_path, prepare_output};
