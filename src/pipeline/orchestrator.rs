use crossbeam_channel::Receiver;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::context::{CancelToken, StreamContext, StreamOpts, create_path_channel};
use super::walk::stream_files_with;
use crate::error::StreamError;
use crate::fs::Fs;

type WalkHandle = JoinHandle<Result<usize, StreamError>>;

/// Handle to a walk running on its own thread.
///
/// Iterating yields paths as the walk finds them and ends when the walk closes the channel.
/// Call [`FileStream::finish`] to get the walk's terminal result. Dropping an unfinished stream
/// cancels the walk.
pub struct FileStream {
    rx: Receiver<PathBuf>,
    walk_handle: Option<WalkHandle>,
    cancel: CancelToken,
}

impl FileStream {
    /// The path channel, for `select!` or for handing clones to several consumers.
    pub fn receiver(&self) -> &Receiver<PathBuf> {
        &self.rx
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Ask the walk to stop. It returns [`StreamError::Cancelled`] unless it already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drain whatever is left (discarding it), join the walk thread and return its result:
    /// the number of paths sent, or the error that ended the walk.
    pub fn finish(mut self) -> Result<usize, StreamError> {
        for _ in self.rx.iter() {}
        let Some(handle) = self.walk_handle.take() else {
            return Ok(0);
        };
        handle.join().map_err(|_| StreamError::Panicked)?
    }
}

impl Iterator for FileStream {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.rx.recv().ok()
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        if self.walk_handle.is_some() {
            self.cancel.cancel();
        }
    }
}

/// Start walking `root` on a dedicated thread. Paths arrive on the returned stream while the walk
/// is still running; the walk blocks when `opts.channel_cap` paths are waiting.
pub fn spawn_stream(fs: Arc<dyn Fs>, root: &Path, opts: &StreamOpts) -> FileStream {
    let (tx, rx) = create_path_channel(opts.channel_cap);
    let cancel = CancelToken::new();
    let ctx = StreamContext::from_opts(opts, cancel.clone());
    let root = root.to_path_buf();
    debug!(
        "stream: walking {} (cap {}, {} filters)",
        root.display(),
        opts.channel_cap,
        ctx.filters.len()
    );
    let walk_handle = thread::spawn(move || stream_files_with(fs.as_ref(), &root, tx, &ctx));
    FileStream {
        rx,
        walk_handle: Some(walk_handle),
        cancel,
    }
}

/// Collect every matching path under `root` via the streaming walk.
pub fn collect_files(
    fs: Arc<dyn Fs>,
    root: &Path,
    opts: &StreamOpts,
) -> Result<Vec<PathBuf>, StreamError> {
    let mut stream = spawn_stream(fs, root, opts);
    let files: Vec<PathBuf> = stream.by_ref().collect();
    debug!("stream: channel closed, {} paths collected", files.len());
    stream.finish()?;
    Ok(files)
}
