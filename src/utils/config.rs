//! Application configuration constants.
//! Names and tuning in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    marker_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                marker_filename: format!(".{pkg}-output"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory config file read by the CLI.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// File written into a freshly created output directory to mark it as build output.
    pub fn marker_filename(&self) -> &str {
        &self.marker_filename
    }
}

// ---- Content filters ----

/// Extension of content files when none is configured.
pub const DEFAULT_EXTENSION: &str = "md";

/// Leading character of private (never published) content files.
pub const PRIVATE_PREFIX: char = '_';

// ---- Streaming channel ----

/// Path channel capacity.
pub struct StreamingChannelCap;

impl StreamingChannelCap {
    /// Enough for the walk to run ahead of a slow consumer without holding the whole tree.
    pub const DEFAULT: usize = 1024;
    /// Upper bound accepted from config or CLI.
    pub const MAX: usize = 1_000_000;
}

/// How often a walk blocked on a full channel re-checks its cancel token.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);
