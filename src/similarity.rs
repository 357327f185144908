use std::fmt;
use std::str::FromStr;

use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::row_filter::CleanMatrix;

/// Pairwise similarity measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Measure {
    /// Pearson correlation coefficient, in [-1, 1].
    #[serde(rename = "PCC")]
    Pearson,
    /// `1 / (1 + ||a - b||)`, in (0, 1].
    #[serde(rename = "Euclid")]
    InverseEuclidean,
}

#[derive(Debug, Error)]
#[error("unknown similarity measure '{0}' (expected PCC or Euclid)")]
pub struct UnknownMeasure(String);

impl Measure {
    pub fn name(self) -> &'static str {
        match self {
            Measure::Pearson => "PCC",
            Measure::InverseEuclidean => "Euclid",
        }
    }

    pub fn score_fn(self) -> fn(&[f64], &[f64]) -> f64 {
        match self {
            Measure::Pearson => pearson,
            Measure::InverseEuclidean => inverse_euclidean,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = UnknownMeasure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PCC" => Ok(Measure::Pearson),
            "Euclid" => Ok(Measure::InverseEuclidean),
            other => Err(UnknownMeasure(other.to_string())),
        }
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&x| x == values[0])
}

/// Pearson correlation. A pair where either side has zero variance scores 0.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    // constants like 0.1 leave a rounding residue in the variance term
    if is_constant(a) || is_constant(b) {
        return 0.0;
    }

    let m = a.len() as f64;
    let (mut sum_a, mut sum_b) = (0.0, 0.0);
    let (mut sq_a, mut sq_b) = (0.0, 0.0);
    let mut product = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        sum_a += x;
        sum_b += y;
        sq_a += x * x;
        sq_b += y * y;
        product += x * y;
    }

    let numerator = product - sum_a * sum_b / m;
    let denominator = ((sq_a - sum_a * sum_a / m) * (sq_b - sum_b * sum_b / m)).sqrt();
    // rounding can push the variance product slightly negative, giving NaN
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn inverse_euclidean(a: &[f64], b: &[f64]) -> f64 {
    let dist = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt();
    1.0 / (1.0 + dist)
}

/// Upper triangle of a symmetric `n x n` score matrix, without the diagonal.
///
/// Pair `(i, j)` with `i < j` is stored at its rank in row-major order, so
/// row `i` owns the contiguous slice of its `n - 1 - i` partners.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    n: usize,
    scores: Vec<f64>,
}

impl ScoreMatrix {
    pub fn pair_count(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }

    #[cfg(test)]
    pub fn from_scores(n: usize, scores: Vec<f64>) -> Self {
        assert_eq!(scores.len(), Self::pair_count(n));
        ScoreMatrix { n, scores }
    }

    pub fn dimension(&self) -> usize {
        self.n
    }

    /// All scores, flattened in pair-rank order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    fn rank(&self, i: usize, j: usize) -> usize {
        i * self.n - i * (i + 1) / 2 + (j - i - 1)
    }

    /// Score of the unordered pair `{i, j}`; `None` on the diagonal or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        if lo == hi || hi >= self.n {
            return None;
        }
        Some(self.scores[self.rank(lo, hi)])
    }
}

/// Score every unordered pair of rows.
///
/// Rows are scored in parallel, each writing only to its own slice of the
/// preallocated buffer; each score comes from the same pure function either
/// way, so the output does not depend on scheduling.
pub fn compute_similarities(matrix: &CleanMatrix, measure: Measure) -> ScoreMatrix {
    let n = matrix.n_rows();
    let mut scores = vec![0.0; ScoreMatrix::pair_count(n)];
    let score = measure.score_fn();

    let mut segments: Vec<(usize, &mut [f64])> = Vec::with_capacity(n);
    let mut rest: &mut [f64] = &mut scores;
    for i in 0..n {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(n - 1 - i);
        segments.push((i, head));
        rest = tail;
    }

    segments.into_par_iter().for_each(|(i, out)| {
        let a = matrix.row(i);
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = score(a, matrix.row(i + 1 + k));
        }
    });

    debug!("computed {} {} scores over {} rows", scores.len(), measure, n);
    ScoreMatrix { n, scores }
}
