//! Path predicates applied to every non-directory entry of a walk.
//!
//! A path is streamed only if every [`Filter`] in the chain returns true. Filters must be pure and
//! total: anything they cannot decide (no file name, undecodable name) counts as a rejection.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::utils::config::{DEFAULT_EXTENSION, PRIVATE_PREFIX};

type Predicate = dyn Fn(&Path) -> bool + Send + Sync;

/// Shareable path predicate. Cloning is cheap.
#[derive(Clone)]
pub struct Filter {
    name: &'static str,
    pred: Arc<Predicate>,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.name).finish()
    }
}

impl Filter {
    /// Wrap an arbitrary predicate.
    pub fn new<F>(pred: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self {
            name: "custom",
            pred: Arc::new(pred),
        }
    }

    /// Passes paths whose extension is `ext` (leading dot optional, case-sensitive).
    pub fn extension(ext: &str) -> Self {
        Self::extensions([ext])
    }

    /// Passes paths whose extension is any of `exts`.
    pub fn extensions<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exts: Vec<String> = exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .collect();
        Self {
            name: "extension",
            pred: Arc::new(move |path: &Path| has_extension(path, &exts)),
        }
    }

    /// Rejects paths whose base name starts with `marker`, at any depth.
    pub fn no_prefix(marker: char) -> Self {
        Self {
            name: "no_prefix",
            pred: Arc::new(move |path: &Path| !has_name_prefix(path, marker)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, path: &Path) -> bool {
        (self.pred)(path)
    }
}

/// Only lets Markdown files pass.
pub fn markdown_only() -> Filter {
    Filter::extension(DEFAULT_EXTENSION)
}

/// Rejects files whose name starts with an underscore.
pub fn no_underscores() -> Filter {
    Filter::no_prefix(PRIVATE_PREFIX)
}

/// True iff every filter passes `path`. Empty chain passes everything.
pub fn matches(path: &Path, filters: &[Filter]) -> bool {
    filters.iter().all(|f| f.matches(path))
}

fn has_extension(path: &Path, exts: &[String]) -> bool {
    match path.extension() {
        Some(ext) => exts.iter().any(|e| ext == OsStr::new(e)),
        None => false,
    }
}

/// `None` name or non-UTF-8 name: undecidable, reported as prefixed so the file is rejected.
fn has_name_prefix(path: &Path, marker: char) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.starts_with(marker),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_accepts_dotted_and_bare() {
        assert!(Filter::extension(".md").matches(Path::new("a/b.md")));
        assert!(Filter::extension("md").matches(Path::new("a/b.md")));
        assert!(!Filter::extension("md").matches(Path::new("a/b.MD")));
    }

    #[test]
    fn undecidable_paths_are_rejected() {
        assert!(!markdown_only().matches(Path::new("..")));
        assert!(!no_underscores().matches(Path::new("..")));
        assert!(!markdown_only().matches(Path::new("README")));
    }

    #[test]
    fn debug_shows_filter_name() {
        assert_eq!(format!("{:?}", no_underscores()), "Filter(\"no_prefix\")");
    }
}
