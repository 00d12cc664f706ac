//! Per-stream context and options: filters, link policy, cancellation, channel capacity.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::filter::{Filter, markdown_only, no_underscores};
use crate::utils::config::StreamingChannelCap;

/// Shared stop flag for a running walk. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Lib options for [`spawn_stream`](crate::pipeline::spawn_stream) and
/// [`collect_files`](crate::pipeline::collect_files).
#[derive(Clone, Debug)]
pub struct StreamOpts {
    /// Filter chain; a path is emitted only if all pass.
    pub filters: Vec<Filter>,
    /// Capacity of the path channel. 0 makes every send a rendezvous with the consumer.
    pub channel_cap: usize,
    /// Follow symbolic links (host filesystem only).
    pub follow_links: bool,
}

impl Default for StreamOpts {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            channel_cap: StreamingChannelCap::DEFAULT,
            follow_links: false,
        }
    }
}

impl StreamOpts {
    /// Markdown files only, private (`_`-prefixed) files skipped.
    pub fn content() -> Self {
        Self {
            filters: vec![markdown_only(), no_underscores()],
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn channel_cap(mut self, cap: usize) -> Self {
        self.channel_cap = cap;
        self
    }
}

/// What the walk loop needs besides the traversal itself. Owned by the walk; nothing here is
/// shared with other walks.
#[derive(Clone, Debug, Default)]
pub struct StreamContext {
    pub filters: Vec<Filter>,
    pub follow_links: bool,
    pub cancel: Option<CancelToken>,
}

impl StreamContext {
    pub fn new(filters: &[Filter]) -> Self {
        Self {
            filters: filters.to_vec(),
            ..Self::default()
        }
    }

    pub fn from_opts(opts: &StreamOpts, cancel: CancelToken) -> Self {
        Self {
            filters: opts.filters.clone(),
            follow_links: opts.follow_links,
            cancel: Some(cancel),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// Bounded path channel for one stream.
pub fn create_path_channel(channel_cap: usize) -> (Sender<PathBuf>, Receiver<PathBuf>) {
    bounded::<PathBuf>(channel_cap)
}
