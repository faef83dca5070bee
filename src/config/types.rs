//! Configuration type definitions.

use crate::constants::{
    DEFAULT_ALPHA, DEFAULT_CALIBRATION_SIZE, DEFAULT_MAX_PARALLEL, DEFAULT_OUTPUT_FILE,
    DEFAULT_SHORTLIST_SIZE, DEFAULT_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input file locations.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Retrieval and fusion settings.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Score calibration settings.
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input file locations.
///
/// Every path can be overridden on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Metadata CSV listing database and query images.
    pub metadata: Option<PathBuf>,

    /// Embedding table produced by the global descriptor.
    pub embeddings: Option<PathBuf>,

    /// Pairwise local matcher scores.
    pub local_scores: Option<PathBuf>,
}

/// Retrieval and fusion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Weight of the global similarity in the fused score.
    pub alpha: f32,

    /// Number of gallery candidates re-scored by the local matcher.
    pub shortlist_size: usize,

    /// Fused scores below this value yield `new_individual`.
    pub threshold: f32,

    /// Pull each query toward its nearest gallery neighbour before re-scoring.
    pub query_expansion: bool,

    /// Maximum number of concurrent shortlist evaluations.
    pub max_parallel: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            threshold: DEFAULT_THRESHOLD,
            query_expansion: true,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }
}

/// Score calibration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Map raw scores through fitted calibrators before fusion.
    pub enabled: bool,

    /// Number of leading database records used for fitting.
    pub size: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_CALIBRATION_SIZE,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Submission file path.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_config_default_values() {
        let matching = MatchingConfig::default();
        assert_eq!(matching.alpha, 0.7);
        assert_eq!(matching.shortlist_size, 25);
        assert_eq!(matching.threshold, 0.35);
        assert!(matching.query_expansion);
        assert_eq!(matching.max_parallel, 1);
    }

    #[test]
    fn test_calibration_disabled_by_default() {
        let calibration = CalibrationConfig::default();
        assert!(!calibration.enabled);
        assert_eq!(calibration.size, 100);
    }

    #[test]
    fn test_output_default_path() {
        assert_eq!(
            OutputConfig::default().path,
            PathBuf::from("sample_submission.csv")
        );
    }
}
