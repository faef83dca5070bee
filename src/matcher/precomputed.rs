//! Local matcher backed by a precomputed pair table.

use std::collections::HashMap;
use std::path::Path;

use ndarray::Array1;
use serde::Deserialize;
use tracing::debug;

use crate::dataset::ImageRecord;
use crate::error::{Error, Result};
use crate::matcher::{LocalMatcher, LocalScores};

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct PairRow {
    query_id: String,
    database_id: String,
    score: f32,
}

/// Local scores keyed by `(query_id, database_id)`.
///
/// Pairs absent from the table had no keypoint correspondences and score zero.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedLocalMatcher {
    scores: HashMap<(String, String), f32>,
}

impl PrecomputedLocalMatcher {
    /// Load a pair table with header `query_id,database_id,score`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed, a score is not finite,
    /// or a pair is listed twice.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Error::LocalScoresRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut scores = HashMap::new();
        for (line_num, result) in reader.deserialize::<PairRow>().enumerate() {
            let row = result.map_err(|e| Error::LocalScoresRead {
                path: path.to_path_buf(),
                source: e,
            })?;

            if !row.score.is_finite() {
                return Err(Error::InvalidLocalScores {
                    path: path.to_path_buf(),
                    message: format!("line {}: score must be finite", line_num + 2),
                });
            }

            let key = (row.query_id, row.database_id);
            if scores.contains_key(&key) {
                return Err(Error::InvalidLocalScores {
                    path: path.to_path_buf(),
                    message: format!(
                        "line {}: duplicate pair ({}, {})",
                        line_num + 2,
                        key.0,
                        key.1
                    ),
                });
            }
            scores.insert(key, row.score);
        }

        debug!("Loaded {} local score pairs from {}", scores.len(), path.display());
        Ok(Self { scores })
    }

    /// Build a matcher from in-memory pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ((String, String), f32)>,
    {
        Self {
            scores: pairs.into_iter().collect(),
        }
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no pairs are stored.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn lookup(&self, query_id: &str, database_id: &str) -> f32 {
        self.scores
            .get(&(query_id.to_string(), database_id.to_string()))
            .copied()
            .unwrap_or(0.0)
    }
}

impl LocalMatcher for PrecomputedLocalMatcher {
    fn score(&self, query: &ImageRecord, candidates: &[&ImageRecord]) -> Result<LocalScores> {
        let scores = candidates
            .iter()
            .map(|c| self.lookup(&query.image_id, &c.image_id))
            .collect::<Array1<f32>>();
        Ok(LocalScores::Flat(scores))
    }
}
