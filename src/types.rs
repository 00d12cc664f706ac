//! Options shared by the CLI and its config file.

use std::path::PathBuf;

use crate::output::RemovalPolicy;
use crate::pipeline::{Filter, StreamOpts};
use crate::utils::config::{DEFAULT_EXTENSION, PRIVATE_PREFIX, StreamingChannelCap};

/// Full options (CLI + `.sitewalk.toml`). Library callers build [`StreamOpts`] directly.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Root of the content tree to stream.
    pub content_dir: PathBuf,
    /// Output directory to wipe and recreate before streaming. None leaves output alone.
    pub out_dir: Option<PathBuf>,
    /// Content file extensions (without the dot).
    pub extensions: Vec<String>,
    /// Stream private files too (names starting with `private_prefix`).
    pub include_private: bool,
    /// Leading character that marks a file as private.
    pub private_prefix: char,
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Path channel capacity.
    pub channel_cap: usize,
    /// Only remove a populated output directory if it carries the build marker.
    pub require_marker: bool,
    /// Print each streamed path.
    pub list_paths: bool,
    /// Debug logging and a progress counter.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("."),
            out_dir: None,
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            include_private: false,
            private_prefix: PRIVATE_PREFIX,
            follow_links: false,
            channel_cap: StreamingChannelCap::DEFAULT,
            require_marker: false,
            list_paths: false,
            verbose: false,
        }
    }
}

impl Opts {
    /// Filter chain for these options: extension first, then the private-file check.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::with_capacity(2);
        if !self.extensions.is_empty() {
            filters.push(Filter::extensions(&self.extensions));
        }
        if !self.include_private {
            filters.push(Filter::no_prefix(self.private_prefix));
        }
        filters
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        if self.require_marker {
            RemovalPolicy::RequireMarker
        } else {
            RemovalPolicy::Unconditional
        }
    }
}

impl From<&Opts> for StreamOpts {
    fn from(o: &Opts) -> Self {
        StreamOpts {
            filters: o.filters(),
            channel_cap: o.channel_cap.min(StreamingChannelCap::MAX),
            follow_links: o.follow_links,
        }
    }
}
