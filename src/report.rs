use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::similarity::Measure;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StageTimings {
    pub filter_ms: f64,
    pub similarity_ms: f64,
    pub threshold_ms: f64,
    pub assemble_ms: f64,
}

/// Counts and timings of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub measure: Measure,
    pub rows_read: usize,
    pub rows_retained: usize,
    pub rows_dropped: usize,
    pub sample_columns: usize,
    pub pair_count: usize,
    pub threshold: f64,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub timings: StageTimings,
}

const RULE: &str = "-----------------------------------------------------";

pub fn log_report(report: &PipelineReport) {
    info!("{}", RULE);
    info!(
        "Kept {} of {} rows ({} dropped), {} samples each.",
        report.rows_retained, report.rows_read, report.rows_dropped, report.sample_columns
    );
    info!("Similarity measure: {}", report.measure);
    info!("We have {} pairs of adjacencies.", report.pair_count);
    info!("The threshold of similarity is {}", report.threshold);
    info!(
        "Graph generated. There are {} vertices and {} edges.",
        report.vertex_count, report.edge_count
    );
    info!(
        "Stage timings (ms): filter {:.3}, similarity {:.3}, threshold {:.3}, assemble {:.3}",
        report.timings.filter_ms,
        report.timings.similarity_ms,
        report.timings.threshold_ms,
        report.timings.assemble_ms
    );
}

pub fn write_json(report: &PipelineReport, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, report)?;
    out.flush()?;
    Ok(())
}
