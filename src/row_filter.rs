use log::debug;

use crate::error::{GraphError, Result};
use crate::table::RawRow;

/// Rectangular numeric matrix of the rows that passed the quality filter.
///
/// Values live in one row-major buffer; `labels[i]` names row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanMatrix {
    labels: Vec<String>,
    values: Vec<f64>,
    n_samples: usize,
}

impl CleanMatrix {
    pub fn new(labels: Vec<String>, values: Vec<f64>, n_samples: usize) -> Result<Self> {
        if values.len() != labels.len() * n_samples {
            return Err(GraphError::DimensionMismatch {
                labels: labels.len(),
                dimension: values.len() / n_samples.max(1),
            });
        }
        Ok(CleanMatrix {
            labels,
            values,
            n_samples,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n_samples..(i + 1) * self.n_samples]
    }
}

/// Result of one filtering pass over a raw table.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub header: RawRow,
    pub matrix: CleanMatrix,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Parse one sample cell. Returns the value used for computation and whether
/// the cell counts against the row's tolerance.
///
/// Unparseable, non-finite and zero cells are all bad; the first two become 0.0.
fn parse_cell(cell: &str) -> (f64, bool) {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => (v, v == 0.0),
        _ => (0.0, true),
    }
}

/// Keep the rows whose bad-cell count is at most `tolerance * sample_columns`.
///
/// Row 0 is the header: it is never filtered and never becomes a vertex.
pub fn filter_rows(rows: &[RawRow], tolerance: f64) -> Result<FilterOutcome> {
    if !(0.0..=1.0).contains(&tolerance) {
        return Err(GraphError::InvalidParameter {
            name: "tolerance ratio",
            value: tolerance,
            expected: "a value in [0, 1]",
        });
    }

    let header = rows.first().ok_or_else(|| GraphError::MalformedInput {
        row: 0,
        reason: "input table is empty".to_string(),
    })?;
    let width = header.len();
    if width < 2 {
        return Err(GraphError::MalformedInput {
            row: 0,
            reason: "header has no sample columns".to_string(),
        });
    }
    let n_samples = width - 1;
    let max_bad = tolerance * n_samples as f64;

    let mut labels = Vec::new();
    let mut values = Vec::new();
    let mut parsed = Vec::with_capacity(n_samples);

    for (row_no, row) in rows.iter().enumerate().skip(1) {
        if row.len() != width {
            return Err(GraphError::MalformedInput {
                row: row_no,
                reason: format!("expected {} cells, found {}", width, row.len()),
            });
        }

        parsed.clear();
        let mut bad = 0usize;
        for cell in &row[1..] {
            let (v, is_bad) = parse_cell(cell);
            if is_bad {
                bad += 1;
            }
            parsed.push(v);
        }

        if bad as f64 <= max_bad {
            labels.push(row[0].clone());
            values.extend_from_slice(&parsed);
        } else {
            debug!("dropping row {} ({}): {} bad cells", row_no, row[0], bad);
        }
    }

    let rows_read = rows.len() - 1;
    let rows_dropped = rows_read - labels.len();
    let matrix = CleanMatrix::new(labels, values, n_samples)?;

    Ok(FilterOutcome {
        header: header.clone(),
        matrix,
        rows_read,
        rows_dropped,
    })
}
