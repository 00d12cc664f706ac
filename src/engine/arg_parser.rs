use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Streaming content discovery for static site builds.
#[derive(Clone, Parser)]
#[command(name = "sitewalk")]
#[command(about = "Stream content files from DIR; optionally wipe and recreate the output directory first.")]
pub struct Cli {
    /// Content directory to walk. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Output directory to remove and recreate before streaming.
    #[arg(long, short = 'o', value_name = "OUT")]
    pub out: Option<PathBuf>,

    /// Content file extensions. Can specify multiple: -e md markdown
    #[arg(long, short = 'e', num_args = 1..)]
    pub ext: Vec<String>,

    /// Also stream private files (names starting with `_`).
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub include_private: Option<bool>,

    /// Only remove a populated output directory if a previous run marked it.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub require_marker: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Path channel capacity (how far the walk may run ahead of the consumer).
    #[arg(long, short = 'c', value_parser = clap::value_parser!(usize))]
    pub channel_cap: Option<usize>,

    /// List each streamed path, relative to DIR.
    #[arg(long, short = 'l', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub list: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
