//! Host filesystem backend.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileKind, Fs, FsEntry};
use crate::pipeline::walk::WalkOutcome;

/// [`Fs`] over `std::fs`. Walks use walkdir sorted by file name.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFs;

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => {
            let kind = FileKind::from(entry.file_type());
            WalkOutcome::Entry(FsEntry::new(entry.into_path(), kind))
        }
        Err(err) => {
            let path = err.path().map(PathBuf::from);
            WalkOutcome::Err {
                source: io::Error::from(err),
                path,
            }
        }
    }
}

impl Fs for OsFs {
    fn stat(&self, path: &Path) -> io::Result<FileKind> {
        fs::symlink_metadata(path).map(|m| FileKind::from(m.file_type()))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        fs::read_dir(path)?
            .map(|res| -> io::Result<FsEntry> {
                let entry = res?;
                Ok(FsEntry::new(entry.path(), FileKind::from(entry.file_type()?)))
            })
            .collect()
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn walk<'a>(
        &'a self,
        root: &Path,
        follow_links: bool,
    ) -> Box<dyn Iterator<Item = WalkOutcome> + 'a> {
        Box::new(
            WalkDir::new(root)
                .follow_links(follow_links)
                .sort_by_file_name()
                .into_iter()
                .map(to_outcome_walkdir),
        )
    }
}
