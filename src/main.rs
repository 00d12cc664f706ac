//! sitewalk CLI: stream content files; optionally wipe and recreate the output directory first.

use anyhow::Result;
use clap::Parser;
use sitewalk::engine::arg_parser::Cli;
use sitewalk::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
