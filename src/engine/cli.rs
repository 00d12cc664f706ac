//! CLI command handler: prepare output (when asked), then stream content paths.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::progress::{create_counter, refresh_bar, update_progress_bar};
use crate::engine::tools::{canonicalize_paths, display_path};
use crate::fs::OsFs;
use crate::output::{OutputGuard, OutputState};
use crate::pipeline::{StreamOpts, spawn_stream};
use crate::utils::setup_logging;
use crate::utils::sitewalk_toml::{apply_file_to_opts, load_sitewalk_toml};

/// Overwrite opts field from CLI when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults, then `.sitewalk.toml` in DIR, then CLI flags.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts {
        content_dir: cli.dir.clone(),
        ..Opts::default()
    };
    let file = load_sitewalk_toml(&cli.dir);
    if let Ok(Some(ref file)) = file {
        apply_file_to_opts(file, &mut opts);
    }
    if let Some(ref out) = cli.out {
        opts.out_dir = Some(out.clone());
    }
    if !cli.ext.is_empty() {
        opts.extensions = cli.ext.clone();
    }
    apply_cli_opt!(cli, opts, include_private => include_private);
    apply_cli_opt!(cli, opts, require_marker => require_marker);
    apply_cli_opt!(cli, opts, follow_links => follow_links);
    apply_cli_opt!(cli, opts, channel_cap => channel_cap);
    apply_cli_opt!(cli, opts, list => list_paths);
    apply_cli_opt!(cli, opts, verbose => verbose);
    setup_logging(opts.verbose);
    match file {
        Ok(Some(_)) => debug!("Loaded config from {}", cli.dir.display()),
        Ok(None) => {}
        Err(msg) => warn!("{}; ignoring config file", msg),
    }
    opts
}

fn prepare_output_dir(opts: &Opts) -> Result<()> {
    let Some(ref out) = opts.out_dir else {
        return Ok(());
    };
    let (content, resolved_out) = canonicalize_paths(&opts.content_dir, out)?;
    let out = resolved_out.as_path();
    debug!(
        "Output {} (content {} protected)",
        out.display(),
        content.display()
    );
    let guard = OutputGuard::new(&OsFs)
        .policy(opts.removal_policy())
        .protect(content);
    let state = guard
        .recreate_output(out)
        .with_context(|| format!("prepare output directory {}", out.display()))?;
    match state {
        OutputState::Absent => debug!("Created output directory {}", out.display()),
        OutputState::RemovedEmpty | OutputState::RemovedTree => {
            debug!("Recreated output directory {}", out.display())
        }
    }
    Ok(())
}

/// Prepare the output directory if one is configured, then stream content paths until the walk
/// finishes, fails, or Ctrl+C cancels it.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    prepare_output_dir(&opts)?;

    let stream_opts = StreamOpts::from(&opts);
    let mut stream = spawn_stream(Arc::new(OsFs), &opts.content_dir, &stream_opts);

    let cancel = stream.cancel_token();
    ctrlc::set_handler(move || cancel.cancel()).context("set Ctrl+C handler")?;

    let counter = (opts.verbose && !opts.list_paths).then(|| {
        let bar = create_counter("Discovering");
        refresh_bar(&bar);
        bar
    });

    let mut seen = 0_usize;
    for path in stream.by_ref() {
        seen += 1;
        if opts.list_paths {
            println!("{}", display_path(&path, &opts.content_dir));
        }
        if let Some(ref bar) = counter {
            update_progress_bar(bar, 1);
        }
    }
    if counter.is_some() {
        eprintln!();
    }

    let sent = stream
        .finish()
        .with_context(|| format!("stream content from {}", opts.content_dir.display()))?;
    if sent != seen {
        warn!("Walk sent {} paths but {} were received", sent, seen);
    }
    info!(
        "Found {} content files in {}",
        seen,
        opts.content_dir.display()
    );
    Ok(())
}
