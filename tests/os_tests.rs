//! Host filesystem tests on temporary directories.

use anyhow::Result;
use crossbeam_channel::unbounded;
use sitewalk::engine::{canonicalize_paths, resolve_path};
use sitewalk::fs::{MemFs, OsFs};
use sitewalk::{
    GuardError, OutputGuard, OutputState, RemovalPolicy, StreamOpts, collect_files,
    prepare_output, stream_files,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, rel: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, rel)?;
    Ok(())
}

fn content_tree() -> Result<TempDir> {
    let tmp = TempDir::new()?;
    for rel in [
        "content/b.md",
        "content/a/z.md",
        "content/a.md",
        "content/c/d.md",
        "content/c/_draft.md",
        "content/notes.txt",
    ] {
        write(tmp.path(), rel)?;
    }
    Ok(tmp)
}

#[test]
fn test_os_walk_order_and_filters() -> Result<()> {
    let tmp = content_tree()?;
    let root = tmp.path().join("content");
    let got = collect_files(Arc::new(OsFs), &root, &StreamOpts::content())?;
    let rel: Vec<PathBuf> = got
        .iter()
        .map(|p| p.strip_prefix(tmp.path()).map(Path::to_path_buf))
        .collect::<Result<_, _>>()?;
    assert_eq!(
        rel,
        vec![
            PathBuf::from("content/a/z.md"),
            PathBuf::from("content/a.md"),
            PathBuf::from("content/b.md"),
            PathBuf::from("content/c/d.md"),
        ]
    );
    Ok(())
}

#[test]
fn test_os_and_mem_backends_agree() -> Result<()> {
    let tmp = content_tree()?;
    let mem = MemFs::new()
        .with_file("content/b.md", "")
        .with_file("content/a/z.md", "")
        .with_file("content/a.md", "")
        .with_file("content/c/d.md", "")
        .with_file("content/c/_draft.md", "")
        .with_file("content/notes.txt", "");

    let (tx, rx) = unbounded();
    stream_files(&OsFs, &tmp.path().join("content"), tx, &[])?;
    let from_os: Vec<PathBuf> = rx
        .iter()
        .filter_map(|p| p.strip_prefix(tmp.path()).ok().map(Path::to_path_buf))
        .collect();

    let (tx, rx) = unbounded();
    stream_files(&mem, Path::new("content"), tx, &[])?;
    let from_mem: Vec<PathBuf> = rx.iter().collect();

    assert_eq!(from_os, from_mem);
    Ok(())
}

#[test]
fn test_os_missing_root() -> Result<()> {
    let tmp = TempDir::new()?;
    let got = collect_files(
        Arc::new(OsFs),
        &tmp.path().join("missing"),
        &StreamOpts::content(),
    )?;
    assert!(got.is_empty());
    Ok(())
}

#[test]
fn test_os_guard_removes_previous_output() -> Result<()> {
    let tmp = TempDir::new()?;
    let out = tmp.path().join("out");
    write(tmp.path(), "out/x.html")?;
    write(tmp.path(), "out/blog/post.html")?;

    assert_eq!(prepare_output(&OsFs, &out)?, OutputState::RemovedTree);
    assert!(!out.exists());
    assert_eq!(prepare_output(&OsFs, &out)?, OutputState::Absent);

    fs::create_dir_all(&out)?;
    fs::write(out.join("index.html"), "fresh")?;
    assert_eq!(fs::read_to_string(out.join("index.html"))?, "fresh");
    Ok(())
}

#[test]
fn test_os_guard_require_marker() -> Result<()> {
    let tmp = TempDir::new()?;
    let docs = tmp.path().join("docs");
    write(tmp.path(), "docs/keep.md")?;
    let guard = OutputGuard::new(&OsFs).policy(RemovalPolicy::RequireMarker);
    assert!(guard.prepare_output(&docs).is_err());
    assert!(docs.join("keep.md").exists());

    let out = tmp.path().join("public");
    guard.recreate_output(&out)?;
    write(tmp.path(), "public/index.html")?;
    assert_eq!(guard.recreate_output(&out)?, OutputState::RemovedTree);
    assert!(!out.join("index.html").exists());
    Ok(())
}

#[test]
fn test_os_guard_refuses_parent_spelled_with_dotdot() -> Result<()> {
    let tmp = TempDir::new()?;
    write(tmp.path(), "site/content/post.md")?;
    let site = tmp.path().join("site");
    let guard = OutputGuard::new(&OsFs).protect(&site);

    let err = guard.recreate_output(&site.join("..")).unwrap_err();
    assert!(matches!(err, GuardError::ParentSegment { .. }));
    assert!(site.join("content/post.md").exists());
    Ok(())
}

#[test]
fn test_os_resolved_paths_catch_other_spellings() -> Result<()> {
    let tmp = TempDir::new()?;
    write(tmp.path(), "site/content/post.md")?;
    let site = tmp.path().join("site");

    let (content, out) = canonicalize_paths(&site, &site.join(".."))?;
    assert_eq!(out, tmp.path().canonicalize()?);
    let err = OutputGuard::new(&OsFs)
        .protect(content)
        .recreate_output(&out)
        .unwrap_err();
    assert!(matches!(err, GuardError::Protected { .. }));
    assert!(site.join("content/post.md").exists());
    Ok(())
}

#[test]
fn test_os_resolve_path_relative_becomes_absolute() -> Result<()> {
    let cwd = std::env::current_dir()?.canonicalize()?;
    assert_eq!(resolve_path(Path::new("."))?, cwd);
    assert_eq!(
        resolve_path(Path::new("not-there-yet/public"))?,
        cwd.join("not-there-yet/public")
    );
    Ok(())
}

#[test]
fn test_os_resolve_path_keeps_missing_tail() -> Result<()> {
    let tmp = TempDir::new()?;
    let resolved = resolve_path(&tmp.path().join("new/out"))?;
    assert_eq!(resolved, tmp.path().canonicalize()?.join("new/out"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_os_walk_error_keeps_path() -> Result<()> {
    use sitewalk::StreamError;
    use sitewalk::pipeline::{StreamContext, stream_files_with};
    use std::io;

    let tmp = TempDir::new()?;
    write(tmp.path(), "content/a.md")?;
    write(tmp.path(), "content/z.md")?;
    let root = tmp.path().join("content");
    let dangling = root.join("dangling");
    std::os::unix::fs::symlink(tmp.path().join("missing-target"), &dangling)?;

    let ctx = StreamContext {
        follow_links: true,
        ..StreamContext::default()
    };
    let (tx, rx) = unbounded();
    let res = stream_files_with(&OsFs, &root, tx, &ctx);
    let got: Vec<PathBuf> = rx.iter().collect();

    assert_eq!(got, vec![root.join("a.md")]);
    let err = res.unwrap_err();
    assert!(matches!(err, StreamError::Walk { .. }));
    assert_eq!(err.path(), Some(dangling.as_path()));
    assert_eq!(
        err.io_error().map(io::Error::kind),
        Some(io::ErrorKind::NotFound)
    );
    Ok(())
}
