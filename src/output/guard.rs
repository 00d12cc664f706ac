//! Output directory preparation: wipe the previous build's output before a new build writes.
//!
//! Per call the guard moves through `absent | present-empty | present-nonempty -> done`, or stops
//! at the first filesystem error. Errors are returned as-is; nothing is retried or rolled back.

use log::{debug, info};
use std::path::{Component, Path, PathBuf};

use crate::error::GuardError;
use crate::fs::Fs;
use crate::utils::config::PackagePaths;

/// When a non-empty output directory may be removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Remove whatever is there.
    #[default]
    Unconditional,
    /// Only remove a non-empty directory that carries the build marker file.
    RequireMarker,
}

/// What [`OutputGuard::prepare_output`] found and did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputState {
    /// Nothing at the path.
    Absent,
    /// An empty directory, now removed.
    RemovedEmpty,
    /// A populated directory, now removed with everything below it.
    RemovedTree,
}

pub struct OutputGuard<'a, F: Fs + ?Sized> {
    fs: &'a F,
    policy: RemovalPolicy,
    protected: Vec<PathBuf>,
}

impl<'a, F: Fs + ?Sized> OutputGuard<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self {
            fs,
            policy: RemovalPolicy::default(),
            protected: Vec::new(),
        }
    }

    pub fn policy(mut self, policy: RemovalPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Never remove `path` or any directory containing it (e.g. the content root).
    /// Comparison is lexical: `.` segments are ignored, `..` segments are refused, and a relative
    /// path is never compared against an absolute one. Resolve both sides first when they may
    /// be written differently.
    pub fn protect(mut self, path: impl Into<PathBuf>) -> Self {
        self.protected.push(path.into());
        self
    }

    /// Remove `dir` if it exists so the build starts from nothing. Absent is a no-op, so calling
    /// this twice in a row succeeds both times.
    pub fn prepare_output(&self, dir: &Path) -> Result<OutputState, GuardError> {
        self.check_protected(dir)?;

        let kind = match self.fs.stat(dir) {
            Ok(kind) => kind,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("output: {} absent, nothing to remove", dir.display());
                return Ok(OutputState::Absent);
            }
            Err(source) => {
                return Err(GuardError::Stat {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };
        if !kind.is_dir() {
            return Err(GuardError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let children = self
            .fs
            .read_dir(dir)
            .map_err(|source| GuardError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
        let state = if children.is_empty() {
            OutputState::RemovedEmpty
        } else {
            if self.policy == RemovalPolicy::RequireMarker
                && !children.iter().any(|c| c.path == marker_path(dir))
            {
                return Err(GuardError::NotBuildOutput {
                    path: dir.to_path_buf(),
                });
            }
            OutputState::RemovedTree
        };

        self.fs
            .remove_dir_all(dir)
            .map_err(|source| GuardError::Remove {
                path: dir.to_path_buf(),
                source,
            })?;
        info!(
            "Removed previous output at {} ({} entries at top level)",
            dir.display(),
            children.len()
        );
        Ok(state)
    }

    /// Fail if removing `dir` could take a protected path with it. Runs before any I/O.
    fn check_protected(&self, dir: &Path) -> Result<(), GuardError> {
        let clean_dir = lexical_clean(dir).ok_or_else(|| GuardError::ParentSegment {
            path: dir.to_path_buf(),
        })?;
        for protected in &self.protected {
            let refuse = || GuardError::Protected {
                path: dir.to_path_buf(),
                protected: protected.clone(),
            };
            let Some(clean_protected) = lexical_clean(protected) else {
                return Err(refuse());
            };
            if clean_protected.is_absolute() != clean_dir.is_absolute()
                || clean_protected.starts_with(&clean_dir)
            {
                return Err(refuse());
            }
        }
        Ok(())
    }

    /// Write the build marker into an existing `dir`, so a later
    /// [`RemovalPolicy::RequireMarker`] run recognises it as build output.
    pub fn mark_output(&self, dir: &Path) -> Result<(), GuardError> {
        let marker = marker_path(dir);
        self.fs
            .write(&marker, env!("CARGO_PKG_VERSION").as_bytes())
            .map_err(|source| GuardError::Create {
                path: marker,
                source,
            })
    }

    /// [`Self::prepare_output`], then create `dir` fresh and mark it as build output.
    pub fn recreate_output(&self, dir: &Path) -> Result<OutputState, GuardError> {
        let state = self.prepare_output(dir)?;
        self.fs
            .create_dir_all(dir)
            .map_err(|source| GuardError::Create {
                path: dir.to_path_buf(),
                source,
            })?;
        self.mark_output(dir)?;
        Ok(state)
    }
}

/// `path` without `.` segments. None if it has a `..` segment, whose target depends on symlinks
/// the guard cannot see.
fn lexical_clean(path: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => return None,
            other => clean.push(other),
        }
    }
    Some(clean)
}

/// Path of the build marker inside `dir`.
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(PackagePaths::get().marker_filename())
}

/// [`OutputGuard::prepare_output`] with the default (unconditional) policy.
pub fn prepare_output<F: Fs + ?Sized>(fs: &F, dir: &Path) -> Result<OutputState, GuardError> {
    OutputGuard::new(fs).prepare_output(dir)
}
