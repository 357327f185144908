mod cli;
mod error;
mod export;
mod graph_builder;
mod pipeline;
mod report;
mod row_filter;
mod similarity;
mod table;
mod threshold;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::cli::Args;
use crate::export::export;
use crate::report::{log_report, write_json};
use crate::table::read_table;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let start = Instant::now();

    info!("Reading file {}", args.filename_in.display());
    let rows = read_table(&args.filename_in)
        .with_context(|| format!("reading {}", args.filename_in.display()))?;

    let (graph, report) = pipeline::run(&rows, &args.pipeline_config())
        .context("building similarity graph")?;
    log_report(&report);

    let format = args.output_format();
    export(&graph, &args.filename_out, format)
        .with_context(|| format!("writing {}", args.filename_out.display()))?;
    info!(
        "Writing completed. Output file is {} ({:?})",
        args.filename_out.display(),
        format
    );

    if let Some(path) = &args.report {
        write_json(&report, path).with_context(|| format!("writing {}", path.display()))?;
        info!("Run report written to {}", path.display());
    }

    info!("Finished in {:.4} seconds", start.elapsed().as_secs_f64());
    Ok(())
}
