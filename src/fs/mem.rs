//! In-memory [`Fs`] for tests and dry runs. Supports per-path fault injection so error paths
//! (permission denied, busy resources) can be exercised without touching the host.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{FileKind, Fs, FsEntry};

/// Operation a fault is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FsOp {
    Stat,
    ReadDir,
    Remove,
    Create,
    Write,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FsOp::Stat => "stat",
            FsOp::ReadDir => "read_dir",
            FsOp::Remove => "remove",
            FsOp::Create => "create",
            FsOp::Write => "write",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// Tree of directories and files keyed by path. Paths are taken as given (no canonicalization).
#[derive(Default)]
pub struct MemFs {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
    faults: Mutex<HashMap<(FsOp, PathBuf), io::ErrorKind>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a file, creating missing parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        let path = path.as_ref();
        {
            let mut nodes = self.lock_nodes();
            if let Some(parent) = path.parent() {
                insert_dirs(&mut nodes, parent);
            }
            nodes.insert(path.to_path_buf(), Node::File(contents.as_ref().to_vec()));
        }
        self
    }

    /// Builder: add a directory and its missing parents.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        insert_dirs(&mut self.lock_nodes(), path.as_ref());
        self
    }

    /// Make every future `op` on exactly `path` fail with `kind`.
    pub fn fail_on(&self, op: FsOp, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.lock_faults()
            .insert((op, path.as_ref().to_path_buf()), kind);
    }

    /// Remove a fault added with [`MemFs::fail_on`].
    pub fn clear_fault(&self, op: FsOp, path: impl AsRef<Path>) {
        self.lock_faults().remove(&(op, path.as_ref().to_path_buf()));
    }

    /// Contents of the file at `path`, if it is one.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock_nodes().get(path.as_ref()) {
            Some(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// Every path in the tree, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock_nodes().keys().cloned().collect()
    }

    fn lock_nodes(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_faults(&self) -> MutexGuard<'_, HashMap<(FsOp, PathBuf), io::ErrorKind>> {
        self.faults.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_fault(&self, op: FsOp, path: &Path) -> io::Result<()> {
        match self.lock_faults().get(&(op, path.to_path_buf())) {
            Some(kind) => Err(io::Error::new(
                *kind,
                format!("{op} {}: simulated failure", path.display()),
            )),
            None => Ok(()),
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

fn not_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotADirectory,
        format!("{}: not a directory", path.display()),
    )
}

/// Insert `path` and every ancestor as a directory. Existing entries are left alone.
fn insert_dirs(nodes: &mut BTreeMap<PathBuf, Node>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        nodes
            .entry(ancestor.to_path_buf())
            .or_insert(Node::Dir);
    }
}

impl Fs for MemFs {
    fn stat(&self, path: &Path) -> io::Result<FileKind> {
        self.check_fault(FsOp::Stat, path)?;
        match self.lock_nodes().get(path) {
            Some(Node::Dir) => Ok(FileKind::Dir),
            Some(Node::File(_)) => Ok(FileKind::File),
            None => Err(not_found(path)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        self.check_fault(FsOp::ReadDir, path)?;
        let nodes = self.lock_nodes();
        match nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(not_a_directory(path)),
            None => return Err(not_found(path)),
        }
        Ok(nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, node)| {
                let kind = match node {
                    Node::Dir => FileKind::Dir,
                    Node::File(_) => FileKind::File,
                };
                FsEntry::new(p.clone(), kind)
            })
            .collect())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_fault(FsOp::Remove, path)?;
        let mut nodes = self.lock_nodes();
        match nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(not_a_directory(path)),
            None => return Err(not_found(path)),
        }
        nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check_fault(FsOp::Remove, path)?;
        let mut nodes = self.lock_nodes();
        match nodes.get(path) {
            Some(Node::File(_)) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{}: is a directory", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_fault(FsOp::Create, path)?;
        let mut nodes = self.lock_nodes();
        for ancestor in path.ancestors() {
            if let Some(Node::File(_)) = nodes.get(ancestor) {
                return Err(not_a_directory(ancestor));
            }
        }
        insert_dirs(&mut nodes, path);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.check_fault(FsOp::Write, path)?;
        let mut nodes = self.lock_nodes();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            match nodes.get(parent) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(not_a_directory(parent)),
                None => return Err(not_found(parent)),
            }
        }
        if let Some(Node::Dir) = nodes.get(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{}: is a directory", path.display()),
            ));
        }
        nodes.insert(path.to_path_buf(), Node::File(contents.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_dir_lists_direct_children_only() {
        let fs = MemFs::new()
            .with_file("site/a.md", "a")
            .with_file("site/sub/b.md", "b");
        let mut children: Vec<PathBuf> = fs
            .read_dir(Path::new("site"))
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        children.sort();
        assert_eq!(
            children,
            vec![PathBuf::from("site/a.md"), PathBuf::from("site/sub")]
        );
    }

    #[test]
    fn remove_dir_all_drops_subtree_but_not_siblings() {
        let fs = MemFs::new()
            .with_file("out/x.html", "x")
            .with_file("out2/y.html", "y");
        fs.remove_dir_all(Path::new("out")).unwrap();
        assert_eq!(
            fs.paths(),
            vec![PathBuf::from("out2"), PathBuf::from("out2/y.html")]
        );
    }

    #[test]
    fn write_requires_parent() {
        let fs = MemFs::new();
        let err = fs.write(Path::new("missing/f"), b"").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn fault_applies_to_one_op() {
        let fs = MemFs::new().with_dir("d");
        fs.fail_on(FsOp::ReadDir, "d", io::ErrorKind::PermissionDenied);
        assert_eq!(fs.stat(Path::new("d")).unwrap(), FileKind::Dir);
        assert_eq!(
            fs.read_dir(Path::new("d")).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
        fs.clear_fault(FsOp::ReadDir, "d");
        assert!(fs.read_dir(Path::new("d")).unwrap().is_empty());
    }
}
