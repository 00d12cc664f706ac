//! Filesystem capabilities used by the walk and the output guard.
//!
//! Everything that touches disk goes through [`Fs`], so the same code runs against the host
//! ([`OsFs`]) or an in-memory tree ([`MemFs`]) in tests.

pub mod mem;
pub mod os;

pub use mem::{FsOp, MemFs};
pub use os::OsFs;

use std::io;
use std::path::{Path, PathBuf};

use crate::pipeline::walk::{DepthFirst, WalkOutcome};

/// What a path points at. Symlinks are reported as such (not followed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Dir,
    File,
    Symlink,
}

impl FileKind {
    pub fn is_dir(&self) -> bool {
        matches!(self, FileKind::Dir)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FileKind::File)
    }
}

impl From<std::fs::FileType> for FileKind {
    fn from(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            FileKind::Dir
        } else if ft.is_symlink() {
            FileKind::Symlink
        } else {
            FileKind::File
        }
    }
}

/// One child of a directory as returned by [`Fs::read_dir`], or one step of a walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl FsEntry {
    pub fn new(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Capability set shared by the walk and the output guard: stat, read-directory, remove, create.
///
/// Implementations must be usable from the walk thread, hence `Send + Sync`.
pub trait Fs: Send + Sync {
    /// Kind of `path` without following a trailing symlink. `NotFound` when absent.
    fn stat(&self, path: &Path) -> io::Result<FileKind>;

    /// Children of the directory at `path`, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    /// Remove the directory at `path` and everything below it.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a single non-directory entry.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate the file at `path`. The parent directory must exist.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Depth-first, pre-order traversal of `root` with children visited in file-name order.
    ///
    /// The default implementation is built on [`Fs::stat`] and [`Fs::read_dir`]. It never follows
    /// symlinks, so `_follow_links` is ignored; override when the backend has a native walker that
    /// can.
    fn walk<'a>(
        &'a self,
        root: &Path,
        _follow_links: bool,
    ) -> Box<dyn Iterator<Item = WalkOutcome> + 'a> {
        Box::new(DepthFirst::new(self, root))
    }

    /// True if `path` exists. Errors other than `NotFound` are returned.
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
