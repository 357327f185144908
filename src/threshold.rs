use log::debug;

use crate::error::{GraphError, Result};

/// Cutoff such that roughly the top `edge_ratio` fraction of scores lie strictly above it.
///
/// The scores are sorted ascending (stable) and the value at
/// `floor(total * (1 - edge_ratio))` is taken, clamped to the last index.
/// Edges use a strict `>` comparison, so ties at the cutoff are all dropped
/// and the realised edge count can fall short of `edge_ratio * total`.
pub fn threshold(scores: &[f64], edge_ratio: f64) -> Result<f64> {
    if !(edge_ratio > 0.0 && edge_ratio <= 1.0) {
        return Err(GraphError::InvalidParameter {
            name: "edge ratio",
            value: edge_ratio,
            expected: "a value in (0, 1]",
        });
    }

    let total = scores.len();
    if total == 0 {
        return Err(GraphError::InsufficientData { retained: 0 });
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let index = ((total as f64 * (1.0 - edge_ratio)).floor() as usize).min(total - 1);
    debug!("threshold index {} of {} sorted scores", index, total);
    Ok(sorted[index])
}
