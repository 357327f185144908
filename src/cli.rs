use std::path::PathBuf;

use clap::Parser;

use crate::export::OutputFormat;
use crate::pipeline::PipelineConfig;
use crate::similarity::Measure;

/// Build a similarity network from a CSV matrix (rows = entities, columns = samples).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// File name of input csv
    pub filename_in: PathBuf,

    /// File name of output graph
    pub filename_out: PathBuf,

    /// Ratio of bad entries tolerated per row
    #[arg(short = 't', long = "toleratio", default_value_t = 0.1)]
    pub toleratio: f64,

    /// Top fraction of pairs kept as edges
    #[arg(short, long, default_value_t = 0.1)]
    pub edge_ratio: f64,

    /// Similarity measure: PCC or Euclid
    #[arg(short, long, default_value = "PCC")]
    pub sim_meas: Measure,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Args {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            tolerance: self.toleratio,
            edge_ratio: self.edge_ratio,
            measure: self.sim_meas,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
            .unwrap_or_else(|| OutputFormat::from_path(&self.filename_out))
    }
}
