//! Path display and resolution helpers for the CLI.

use anyhow::{Context, Result, bail};
use std::path::{Component, Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Path as printed by `--list`: relative to `base` when possible, forward slashes.
pub fn display_path(path: &Path, base: &Path) -> String {
    let rel = match path_relative_to(path, base) {
        Some(rel) if !rel.as_os_str().is_empty() => rel,
        _ => path.to_path_buf(),
    };
    rel.to_string_lossy().replace('\\', "/")
}

/// Resolve `path` against the host filesystem: canonicalize its nearest existing ancestor and
/// re-append the rest. Components past that ancestor are kept as written, so a `..` there stays
/// visible to the output guard.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let mut existing: Vec<Component> = path.components().collect();
    let mut rest: Vec<Component> = Vec::new();
    loop {
        let candidate: PathBuf = if existing.is_empty() {
            PathBuf::from(".")
        } else {
            existing.iter().collect()
        };
        if let Ok(canonical) = candidate.canonicalize() {
            return Ok(rest.iter().rev().fold(canonical, |acc, c| acc.join(c)));
        }
        match existing.pop() {
            Some(c) => rest.push(c),
            None => bail!("cannot resolve {}", path.display()),
        }
    }
}

/// Resolve the content root and the output directory so the guard compares like with like.
pub fn canonicalize_paths(content_dir: &Path, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let content = resolve_path(content_dir)
        .with_context(|| format!("resolve content dir {}", content_dir.display()))?;
    let out = resolve_path(out_dir)
        .with_context(|| format!("resolve output dir {}", out_dir.display()))?;
    Ok((content, out))
}
