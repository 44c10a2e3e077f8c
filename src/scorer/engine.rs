use super::Problem;
use crate::error::{GfResult, GridError};
use crate::geometry::DistanceMetric;
use crate::grid::{Layout, Pos};

/// Positions of every code in the layout. A symbol may occupy several cells.
pub fn occurrences(layout: &Layout, code_count: usize) -> Vec<Vec<Pos>> {
    let mut table: Vec<Vec<Pos>> = vec![Vec::new(); code_count];
    for (i, &code) in layout.cells().iter().enumerate() {
        if let Some(slot) = table.get_mut(code as usize) {
            slot.push(layout.pos(i));
        }
    }
    table
}

/// Minimum distance per retained bigram, aligned with `problem.bigrams.probs`.
pub fn distance_vector(
    problem: &Problem,
    layout: &Layout,
    metric: &DistanceMetric,
) -> GfResult<Vec<f64>> {
    let occ = occurrences(layout, problem.alphabet.len());
    let empty: &[Pos] = &[];

    let mut dists = Vec::with_capacity(problem.bigrams.pairs.len());
    for &(first, second) in &problem.bigrams.pairs {
        let from = occ.get(first as usize).map(Vec::as_slice).unwrap_or(empty);
        let to = occ.get(second as usize).map(Vec::as_slice).unwrap_or(empty);

        let missing = if from.is_empty() {
            Some(first)
        } else if to.is_empty() {
            Some(second)
        } else {
            None
        };
        if let Some(code) = missing {
            return Err(GridError::MissingSymbol {
                symbol: problem.alphabet.name(code).to_string(),
            });
        }

        let mut best = f64::INFINITY;
        for &p1 in from {
            for &p2 in to {
                let d = metric.distance(p1, p2);
                if d < best {
                    best = d;
                }
            }
        }
        dists.push(best);
    }
    Ok(dists)
}

#[inline(always)]
pub fn weighted_average(probs: &[f64], dists: &[f64]) -> f64 {
    probs.iter().zip(dists).map(|(p, d)| p * d).sum()
}
