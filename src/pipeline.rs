use std::time::Instant;

use log::debug;

use crate::error::{GraphError, Result};
use crate::graph_builder::{assemble, SimilarityGraph};
use crate::report::{PipelineReport, StageTimings};
use crate::row_filter::filter_rows;
use crate::similarity::{compute_similarities, Measure};
use crate::table::RawRow;
use crate::threshold::threshold;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub tolerance: f64,
    pub edge_ratio: f64,
    pub measure: Measure,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            tolerance: 0.1,
            edge_ratio: 0.1,
            measure: Measure::Pearson,
        }
    }
}

fn millis(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Turn a raw table into a similarity graph.
///
/// Any error aborts the whole run; no partial graph is returned.
pub fn run(rows: &[RawRow], config: &PipelineConfig) -> Result<(SimilarityGraph, PipelineReport)> {
    let start = Instant::now();
    let filtered = filter_rows(rows, config.tolerance)?;
    let filter_ms = millis(start);
    debug!("sample columns: {}", filtered.header[1..].join(", "));

    let matrix = filtered.matrix;
    if matrix.n_rows() < 2 {
        return Err(GraphError::InsufficientData {
            retained: matrix.n_rows(),
        });
    }

    let start = Instant::now();
    let scores = compute_similarities(&matrix, config.measure);
    let similarity_ms = millis(start);

    let start = Instant::now();
    let cutoff = threshold(scores.scores(), config.edge_ratio)?;
    let threshold_ms = millis(start);

    let start = Instant::now();
    let graph = assemble(matrix.labels(), &scores, cutoff)?;
    let assemble_ms = millis(start);

    let report = PipelineReport {
        measure: config.measure,
        rows_read: filtered.rows_read,
        rows_retained: matrix.n_rows(),
        rows_dropped: filtered.rows_dropped,
        sample_columns: matrix.n_samples(),
        pair_count: scores.scores().len(),
        threshold: cutoff,
        vertex_count: graph.node_count(),
        edge_count: graph.edge_count(),
        timings: StageTimings {
            filter_ms,
            similarity_ms,
            threshold_ms,
            assemble_ms,
        },
    };
    Ok((graph, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::NodeIndex;

    use crate::table::read_table;

    fn table(rows: &[&[&str]]) -> Vec<RawRow> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn config(tolerance: f64, edge_ratio: f64, measure: Measure) -> PipelineConfig {
        PipelineConfig {
            tolerance,
            edge_ratio,
            measure,
        }
    }

    #[test]
    fn test_three_gene_scenario() {
        let rows = table(&[
            &["id", "s1", "s2"],
            &["g1", "1", "2"],
            &["g2", "2", "4"],
            &["g3", "10", "0.1"],
        ]);
        let (graph, report) = run(&rows, &config(0.5, 0.34, Measure::Pearson)).unwrap();

        assert_eq!(report.rows_retained, 3);
        assert_eq!(report.pair_count, 3);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(NodeIndex::new(0), NodeIndex::new(1)));
    }

    #[test]
    fn test_constant_rows_score_zero() {
        let rows = table(&[&["id", "a", "b", "c"], &["g1", "1", "1", "1"], &["g2", "1", "1", "1"]]);
        for edge_ratio in [0.1, 0.5, 1.0] {
            let (graph, report) = run(&rows, &config(0.1, edge_ratio, Measure::Pearson)).unwrap();
            assert_eq!(report.threshold, 0.0);
            assert_eq!(graph.node_count(), 2);
            assert_eq!(graph.edge_count(), 0);
        }
    }

    #[test]
    fn test_full_edge_ratio_drops_minimum() {
        let rows = table(&[
            &["id", "a", "b"],
            &["g1", "1", "1"],
            &["g2", "2", "2"],
            &["g3", "4", "4"],
            &["g4", "8", "8"],
        ]);
        let (graph, report) = run(&rows, &config(0.1, 1.0, Measure::InverseEuclidean)).unwrap();
        // the single farthest pair (g1, g4) sits at the threshold
        assert_eq!(report.pair_count, 6);
        assert_eq!(graph.edge_count(), 5);
        assert!(!graph.contains_edge(NodeIndex::new(0), NodeIndex::new(3)));
    }

    #[test]
    fn test_edge_count_monotone() {
        let rows = read_table("data/sample_expression.csv").unwrap();
        for measure in [Measure::Pearson, Measure::InverseEuclidean] {
            let mut last = 0;
            for step in 1..=10 {
                let cfg = config(0.1, step as f64 / 10.0, measure);
                let (graph, _) = run(&rows, &cfg).unwrap();
                assert!(graph.edge_count() >= last);
                last = graph.edge_count();
            }
        }
    }

    #[test]
    fn test_sample_file() {
        let rows = read_table("data/sample_expression.csv").unwrap();
        let (graph, report) = run(&rows, &PipelineConfig::default()).unwrap();

        assert_eq!(report.rows_read, 7);
        assert_eq!(report.rows_retained, 5);
        assert_eq!(report.rows_dropped, 2);
        assert_eq!(report.sample_columns, 5);
        assert_eq!(report.pair_count, 10);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph[NodeIndex::new(3)], "ENSG0006");

        // ten pairs at ratio 0.1 put the cutoff on the largest score
        let filtered = filter_rows(&rows, 0.1).unwrap();
        let scores = compute_similarities(&filtered.matrix, Measure::Pearson);
        let max = scores
            .scores()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.threshold, max);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(report.edge_count, 0);
    }

    #[test]
    fn test_insufficient_data() {
        let rows = table(&[&["id", "a"], &["g1", "1"], &["g2", "0"]]);
        match run(&rows, &PipelineConfig::default()) {
            Err(GraphError::InsufficientData { retained }) => assert_eq!(retained, 1),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_input_aborts() {
        let rows = table(&[&["id", "a", "b"], &["g1", "1", "2"], &["g2", "1", "2", "3"]]);
        assert!(matches!(
            run(&rows, &PipelineConfig::default()),
            Err(GraphError::MalformedInput { row: 2, .. })
        ));
    }
}
