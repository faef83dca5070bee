//! Score fusion and novelty thresholding.

use ndarray::{Array2, ArrayView1, Zip};

use crate::constants::NEW_INDIVIDUAL;
use crate::engine::similarity::argmax;

/// `alpha * global + (1 - alpha) * local`, elementwise.
///
/// Columns the local matcher never scored hold zero in `local` and therefore
/// keep `alpha * global`.
pub fn fuse(global: &Array2<f32>, local: &Array2<f32>, alpha: f32) -> Array2<f32> {
    let mut fused = Array2::zeros(global.raw_dim());
    Zip::from(&mut fused)
        .and(global)
        .and(local)
        .for_each(|f, &g, &l| *f = alpha * g + (1.0 - alpha) * l);
    fused
}

/// Outcome of thresholding one fused row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Gallery index with the highest fused score.
    pub index: usize,
    /// That score.
    pub score: f32,
    /// Whether the score fell below the threshold.
    pub is_new: bool,
}

/// Pick the best gallery column of a fused row.
///
/// Scores strictly below `threshold` are novel; a score equal to the
/// threshold is a match. Returns `None` for an empty row.
pub fn decide(row: ArrayView1<'_, f32>, threshold: f32) -> Option<Decision> {
    argmax(row).map(|(index, score)| Decision {
        index,
        score,
        is_new: score < threshold,
    })
}

/// Label for a decision given the gallery labels.
pub fn decision_label<'a>(decision: &Decision, labels: &'a [String]) -> &'a str {
    if decision.is_new {
        NEW_INDIVIDUAL
    } else {
        labels
            .get(decision.index)
            .map_or(NEW_INDIVIDUAL, String::as_str)
    }
}
