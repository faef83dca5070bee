//! Local keypoint matching.
//!
//! The keypoint matcher runs outside this crate. It scores a single query
//! image against an ordered candidate set; the engine calls it once per query
//! with that query's shortlist.

mod precomputed;

pub use precomputed::PrecomputedLocalMatcher;

use ndarray::{Array1, Array2};

use crate::dataset::ImageRecord;
use crate::error::{Error, Result};

/// Scores returned by a local matcher.
///
/// Matchers may answer with a single `1 x K` row or a flat `K` vector.
/// [`LocalScores::into_scores`] is the only place either form is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalScores {
    /// One row per query; exactly one row is accepted.
    Row(Array2<f32>),
    /// One score per candidate.
    Flat(Array1<f32>),
}

impl LocalScores {
    /// Scores in candidate order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocalScoreShape`] unless the scores are a `1 x expected`
    /// row or a flat vector of length `expected`.
    pub fn into_scores(self, query_id: &str, expected: usize) -> Result<Vec<f32>> {
        let shape_error = |actual: String| Error::LocalScoreShape {
            query_id: query_id.to_string(),
            expected,
            actual,
        };

        match self {
            Self::Row(row) => {
                let (rows, cols) = row.dim();
                if rows != 1 || cols != expected {
                    return Err(shape_error(format!("a {rows}x{cols} matrix")));
                }
                Ok(row.iter().copied().collect())
            }
            Self::Flat(flat) => {
                if flat.len() != expected {
                    return Err(shape_error(format!("{} scores", flat.len())));
                }
                Ok(flat.to_vec())
            }
        }
    }
}

/// Scores a query against an ordered set of gallery candidates.
///
/// Implementations must be shareable across threads; the engine may evaluate
/// several shortlists concurrently.
pub trait LocalMatcher: Send + Sync {
    /// Match quality of `query` against each of `candidates`, in order.
    fn score(&self, query: &ImageRecord, candidates: &[&ImageRecord]) -> Result<LocalScores>;
}

/// Local matcher that contributes nothing.
///
/// Used when the fused score relies on the global similarity alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLocalMatcher;

impl LocalMatcher for DisabledLocalMatcher {
    fn score(&self, _query: &ImageRecord, candidates: &[&ImageRecord]) -> Result<LocalScores> {
        Ok(LocalScores::Flat(Array1::zeros(candidates.len())))
    }
}
