//! Error types for the walk and the output guard.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

fn at(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

/// Terminal error of one walk. At most one is produced per call.
#[derive(Error, Debug)]
pub enum StreamError {
    /// Stat or read-directory failure during traversal.
    #[error("walk failed{}: {source}", at(.path))]
    Walk {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("walk cancelled")]
    Cancelled,

    #[error("walk thread panicked")]
    Panicked,
}

impl StreamError {
    /// The underlying I/O error, untouched.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            StreamError::Walk { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Path the walk was visiting when it failed, when known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StreamError::Walk { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

/// Failure while preparing an output directory. Nothing is retried or rolled back.
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output path {} exists and is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error(
        "refusing to remove {}: not empty and no build marker found",
        .path.display()
    )]
    NotBuildOutput { path: PathBuf },

    #[error("refusing to remove {}: `..` segments are not accepted", .path.display())]
    ParentSegment { path: PathBuf },

    #[error(
        "refusing to remove {}: it may contain protected path {}",
        .path.display(),
        .protected.display()
    )]
    Protected { path: PathBuf, protected: PathBuf },
}

impl GuardError {
    /// The underlying I/O error, untouched.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            GuardError::Stat { source, .. }
            | GuardError::ReadDir { source, .. }
            | GuardError::Remove { source, .. }
            | GuardError::Create { source, .. } => Some(source),
            _ => None,
        }
    }
}
