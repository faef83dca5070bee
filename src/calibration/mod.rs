//! Score calibration on a held-out subset of the database.
//!
//! Global and local scores live on different scales. A calibrator per score
//! source maps raw values to the empirical probability that a pair shows the
//! same individual, fitted on every ordered pair of calibration images.

mod isotonic;

pub use isotonic::IsotonicCalibrator;

use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::dataset::{Dataset, ImageRecord};
use crate::error::{Error, Result};
use crate::matcher::LocalMatcher;

/// Maps a raw score onto a calibrated scale.
pub trait ScoreCalibrator: Send + Sync {
    /// Calibrated value of `score`.
    fn calibrate(&self, score: f32) -> f32;
}

/// Fitted calibrators for both score sources.
///
/// A source without a calibrator passes scores through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    /// Calibrator for global cosine similarities.
    pub global: Option<IsotonicCalibrator>,
    /// Calibrator for local matcher scores.
    pub local: Option<IsotonicCalibrator>,
}

impl Calibration {
    /// Whether at least one source is calibrated.
    pub fn is_active(&self) -> bool {
        self.global.is_some() || self.local.is_some()
    }

    /// Calibrate a global similarity.
    pub fn global_score(&self, score: f32) -> f32 {
        self.global.as_ref().map_or(score, |c| c.calibrate(score))
    }

    /// Calibrate a local matcher score.
    pub fn local_score(&self, score: f32) -> f32 {
        self.local.as_ref().map_or(score, |c| c.calibrate(score))
    }
}

/// Pairwise scores and same-individual targets collected for fitting.
#[derive(Debug, Clone, Default)]
pub struct CalibrationSamples {
    /// `(global similarity, target)` per ordered pair.
    pub global: Vec<(f32, f32)>,
    /// `(local score, target)` per ordered pair.
    pub local: Vec<(f32, f32)>,
}

/// Score every ordered pair of distinct calibration records.
///
/// `embeddings` must be row-normalized and aligned with `records`. Pairs whose
/// identities are both known and equal get target `1.0`, all others `0.0`.
pub fn collect_samples(
    records: &Dataset,
    embeddings: &Array2<f32>,
    matcher: &dyn LocalMatcher,
) -> Result<CalibrationSamples> {
    if embeddings.nrows() != records.len() {
        return Err(Error::RowCountMismatch {
            records: records.len(),
            rows: embeddings.nrows(),
        });
    }

    let similarity = embeddings.dot(&embeddings.t());
    let mut samples = CalibrationSamples::default();

    for (i, query) in records.iter().enumerate() {
        let others: Vec<usize> = (0..records.len()).filter(|&j| j != i).collect();
        if others.is_empty() {
            continue;
        }
        let candidates: Vec<&ImageRecord> =
            others.iter().filter_map(|&j| records.get(j)).collect();

        let local = matcher
            .score(query, &candidates)?
            .into_scores(&query.image_id, candidates.len())?;

        for ((&j, candidate), local_score) in others.iter().zip(&candidates).zip(local) {
            let target = match (&query.identity, &candidate.identity) {
                (Some(a), Some(b)) if a == b => 1.0,
                _ => 0.0,
            };
            samples.global.push((similarity[[i, j]], target));
            samples.local.push((local_score, target));
        }
    }

    Ok(samples)
}

/// Fit calibrators on the calibration subset.
///
/// A source whose samples cannot support a fit is left uncalibrated with a
/// warning.
pub fn fit_calibration(
    records: &Dataset,
    embeddings: &Array2<f32>,
    matcher: &dyn LocalMatcher,
) -> Result<Calibration> {
    let samples = collect_samples(records, embeddings, matcher)?;
    let positives = samples.global.iter().filter(|(_, y)| *y > 0.5).count();
    debug!(
        "Calibration: {} pairs ({} same-individual) from {} records",
        samples.global.len(),
        positives,
        records.len()
    );

    let global = IsotonicCalibrator::fit(&samples.global);
    if global.is_none() {
        warn!("Global scores cannot be calibrated (need both classes and two distinct scores)");
    }
    let local = IsotonicCalibrator::fit(&samples.local);
    if local.is_none() {
        warn!("Local scores cannot be calibrated (need both classes and two distinct scores)");
    }

    let calibration = Calibration { global, local };
    if calibration.is_active() {
        info!(
            "Calibration fitted on {} records (global: {}, local: {})",
            records.len(),
            calibration.global.is_some(),
            calibration.local.is_some()
        );
    }
    Ok(calibration)
}
