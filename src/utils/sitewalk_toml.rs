//! Load `.sitewalk.toml` from the content directory (CLI only). Lib callers pass options directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub(crate) struct SitewalkToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    out: Option<String>,
    extensions: Option<Vec<String>>,
    include_private: Option<bool>,
    private_prefix: Option<char>,
    follow_links: Option<bool>,
    channel_cap: Option<usize>,
    require_marker: Option<bool>,
    list: Option<bool>,
    verbose: Option<bool>,
}

/// Load the config file from `dir`. `Ok(None)` if missing or unreadable; `Err` carries a message
/// for a malformed file so the caller can warn once logging is up.
pub(crate) fn load_sitewalk_toml(dir: &Path) -> Result<Option<SitewalkToml>, String> {
    let path = dir.join(PackagePaths::get().config_filename());
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    parse_sitewalk_toml(&s)
        .map(Some)
        .map_err(|e| format!("{}: {}", path.display(), e))
}

pub(crate) fn parse_sitewalk_toml(s: &str) -> Result<SitewalkToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($set:expr, $opts:expr, $set_field:ident => $opts_field:ident) => {
        if let Some(v) = $set.$set_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
/// A relative `out` is resolved against the content directory.
pub(crate) fn apply_file_to_opts(file: &SitewalkToml, opts: &mut Opts) {
    let set = &file.settings;
    if let Some(ref p) = set.out {
        opts.out_dir = Some(opts.content_dir.join(PathBuf::from(p)));
    }
    apply_file_opt!(set, opts, extensions => extensions);
    apply_file_opt!(set, opts, include_private => include_private);
    apply_file_opt!(set, opts, private_prefix => private_prefix);
    apply_file_opt!(set, opts, follow_links => follow_links);
    apply_file_opt!(set, opts, channel_cap => channel_cap);
    apply_file_opt!(set, opts, require_marker => require_marker);
    apply_file_opt!(set, opts, list => list_paths);
    apply_file_opt!(set, opts, verbose => verbose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let file = parse_sitewalk_toml(
            r#"
            [settings]
            out = "public"
            extensions = ["md", "markdown"]
            include_private = true
            channel_cap = 8
            "#,
        )
        .unwrap();
        let mut opts = Opts {
            content_dir: PathBuf::from("site"),
            ..Opts::default()
        };
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.out_dir, Some(PathBuf::from("site/public")));
        assert_eq!(opts.extensions, vec!["md", "markdown"]);
        assert!(opts.include_private);
        assert_eq!(opts.channel_cap, 8);
        assert!(!opts.follow_links);
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let file = parse_sitewalk_toml("").unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.extensions, vec!["md"]);
        assert_eq!(opts.out_dir, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_sitewalk_toml("[settings]\nchannel_cap = \"lots\"").is_err());
    }
}
