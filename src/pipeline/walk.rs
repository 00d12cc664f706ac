//! Walk loop: consumes a traversal of [`WalkOutcome`]s, filters non-directory entries and sends
//! them to the path channel as they are found.

use crossbeam_channel::{SendTimeoutError, Sender};
use log::{debug, trace};
use std::io;
use std::path::{Path, PathBuf};

use super::context::StreamContext;
use super::filter::{Filter, matches};
use crate::error::StreamError;
use crate::fs::{Fs, FsEntry};
use crate::utils::config::CANCEL_POLL_INTERVAL;

/// One step of a directory walk: an entry (file, dir or symlink) or the error that ends it.
#[derive(Debug)]
pub enum WalkOutcome {
    Entry(FsEntry),
    Err {
        source: io::Error,
        path: Option<PathBuf>,
    },
}

/// Lazy depth-first, pre-order traversal over any [`Fs`]. Directory children are visited in
/// file-name order; a directory is read only when the walk moves past it.
pub struct DepthFirst<'a, F: Fs + ?Sized> {
    fs: &'a F,
    root: Option<PathBuf>,
    /// Directory yielded last, read on the next call.
    expand: Option<PathBuf>,
    stack: Vec<FsEntry>,
    done: bool,
}

impl<'a, F: Fs + ?Sized> DepthFirst<'a, F> {
    pub fn new(fs: &'a F, root: &Path) -> Self {
        Self {
            fs,
            root: Some(root.to_path_buf()),
            expand: None,
            stack: Vec::new(),
            done: false,
        }
    }

    fn fail(&mut self, source: io::Error, path: PathBuf) -> Option<WalkOutcome> {
        self.done = true;
        Some(WalkOutcome::Err {
            source,
            path: Some(path),
        })
    }
}

impl<F: Fs + ?Sized> Iterator for DepthFirst<'_, F> {
    type Item = WalkOutcome;

    fn next(&mut self) -> Option<WalkOutcome> {
        if self.done {
            return None;
        }
        if let Some(root) = self.root.take() {
            match self.fs.stat(&root) {
                Ok(kind) => self.stack.push(FsEntry::new(root, kind)),
                Err(e) => return self.fail(e, root),
            }
        }
        if let Some(dir) = self.expand.take() {
            match self.fs.read_dir(&dir) {
                Ok(mut children) => {
                    // Reverse order so the smallest name is popped first.
                    children.sort_by(|a, b| b.path.file_name().cmp(&a.path.file_name()));
                    self.stack.extend(children);
                }
                Err(e) => return self.fail(e, dir),
            }
        }
        match self.stack.pop() {
            Some(entry) => {
                if entry.kind.is_dir() {
                    self.expand = Some(entry.path.clone());
                }
                Some(WalkOutcome::Entry(entry))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

enum Delivery {
    Sent,
    Disconnected,
    Cancelled,
}

/// Blocking send that still notices cancellation while the channel is full.
fn deliver(files: &Sender<PathBuf>, path: PathBuf, ctx: &StreamContext) -> Delivery {
    let Some(cancel) = ctx.cancel.as_ref() else {
        return match files.send(path) {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Disconnected,
        };
    };
    let mut path = path;
    loop {
        if cancel.is_cancelled() {
            return Delivery::Cancelled;
        }
        match files.send_timeout(path, CANCEL_POLL_INTERVAL) {
            Ok(()) => return Delivery::Sent,
            Err(SendTimeoutError::Timeout(p)) => path = p,
            Err(SendTimeoutError::Disconnected(_)) => return Delivery::Disconnected,
        }
    }
}

/// Run the walk loop: consume `iter`, skip directories, apply the filter chain and send matches
/// to `files`. Stops at the first error, on cancellation, or when every receiver is gone.
/// `files` is dropped on return, which closes the sequence. Returns the number of paths sent.
pub fn run_walk_loop<I>(
    files: Sender<PathBuf>,
    ctx: &StreamContext,
    iter: I,
) -> Result<usize, StreamError>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        if ctx.is_cancelled() {
            return Err(StreamError::Cancelled);
        }
        match outcome {
            WalkOutcome::Entry(entry) => {
                if entry.kind.is_dir() || !matches(&entry.path, &ctx.filters) {
                    continue;
                }
                trace!("emit {}", entry.path.display());
                match deliver(&files, entry.path, ctx) {
                    Delivery::Sent => count += 1,
                    Delivery::Disconnected => {
                        debug!("walk: all receivers dropped after {count} paths, stopping");
                        break;
                    }
                    Delivery::Cancelled => return Err(StreamError::Cancelled),
                }
            }
            WalkOutcome::Err { source, path } => {
                debug!("walk: aborting after {count} paths: {source}");
                return Err(StreamError::Walk { path, source });
            }
        }
    }
    Ok(count)
}

/// Send every file under `root` that passes `filters` through `files`, in depth-first lexical
/// order, while the walk is running. A missing `root` is an empty input, not an error.
///
/// `files` is closed on every exit path. Returns the number of paths sent.
pub fn stream_files<F>(
    fs: &F,
    root: &Path,
    files: Sender<PathBuf>,
    filters: &[Filter],
) -> Result<usize, StreamError>
where
    F: Fs + ?Sized,
{
    stream_files_with(fs, root, files, &StreamContext::new(filters))
}

/// [`stream_files`] with link policy and cancellation from `ctx`.
pub fn stream_files_with<F>(
    fs: &F,
    root: &Path,
    files: Sender<PathBuf>,
    ctx: &StreamContext,
) -> Result<usize, StreamError>
where
    F: Fs + ?Sized,
{
    if !fs.exists(root).map_err(|source| StreamError::Walk {
        path: Some(root.to_path_buf()),
        source,
    })? {
        debug!("walk: {} does not exist, nothing to stream", root.display());
        return Ok(0);
    }
    let count = run_walk_loop(files, ctx, fs.walk(root, ctx.follow_links))?;
    debug!("walk: {} done, {count} paths sent", root.display());
    Ok(count)
}
