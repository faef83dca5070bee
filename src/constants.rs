//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "wildreid";

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Label emitted for queries without a confident gallery match.
pub const NEW_INDIVIDUAL: &str = "new_individual";

/// Label shown for records without an identity.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Default weight of the global similarity in the fused score.
///
/// The local score receives `1 - DEFAULT_ALPHA`.
pub const DEFAULT_ALPHA: f32 = 0.7;

/// Default number of gallery candidates re-scored by the local matcher.
pub const DEFAULT_SHORTLIST_SIZE: usize = 25;

/// Default novelty threshold on the fused score.
pub const DEFAULT_THRESHOLD: f32 = 0.35;

/// Default number of database records held out for score calibration.
pub const DEFAULT_CALIBRATION_SIZE: usize = 100;

/// Default number of concurrent shortlist evaluations.
///
/// One means strictly sequential local re-scoring.
pub const DEFAULT_MAX_PARALLEL: usize = 1;

/// Default submission file name.
pub const DEFAULT_OUTPUT_FILE: &str = "sample_submission.csv";

/// Norm below which a vector is treated as zero and left unnormalized.
pub const NORM_EPSILON: f32 = 1e-12;

/// Score bounds for alpha and threshold values.
pub mod score {
    /// Minimum valid score value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid score value.
    pub const MAX: f32 = 1.0;
}

/// Metadata CSV column values.
pub mod metadata {
    /// Split value for gallery records.
    pub const SPLIT_DATABASE: &str = "database";
    /// Split value for query records.
    pub const SPLIT_QUERY: &str = "query";
}

/// Species group names as they appear in the metadata `dataset` column.
pub mod species {
    /// Eurasian lynx.
    pub const LYNX: &str = "LynxID2025";
    /// Salamanders.
    pub const SALAMANDER: &str = "SalamanderID2025";
    /// Sea turtles.
    pub const SEA_TURTLE: &str = "SeaTurtleID2022";
}

/// Preprocessing parameters applied upstream of feature extraction.
pub mod preprocess {
    /// Target length of the longest image side in pixels.
    pub const LONGEST_SIDE: u32 = 384;
    /// Gamma applied to lynx images.
    pub const LYNX_GAMMA: f32 = 0.8;
    /// CLAHE clip limit.
    pub const CLAHE_CLIP_LIMIT: f32 = 2.0;
    /// CLAHE tile grid size (tiles per side).
    pub const CLAHE_TILE_GRID: u32 = 8;
    /// Gaussian blur kernel size for salamander images.
    pub const BLUR_KERNEL: u32 = 5;
    /// Gaussian blur sigma for salamander images.
    pub const BLUR_SIGMA: f32 = 1.0;
    /// Rotation for salamanders photographed facing left, in degrees.
    pub const ROTATE_LEFT_DEGREES: i32 = 90;
    /// Rotation for salamanders photographed facing right, in degrees.
    pub const ROTATE_RIGHT_DEGREES: i32 = -90;
}
