//! Configuration validation.

use crate::config::{CalibrationConfig, Config, MatchingConfig};
use crate::constants::score;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_matching(&config.matching)?;
    validate_calibration(&config.calibration)?;
    Ok(())
}

/// Validate retrieval and fusion settings.
///
/// Also applied to the final settings after CLI overrides are merged.
pub fn validate_matching(matching: &MatchingConfig) -> Result<()> {
    if !(score::MIN..=score::MAX).contains(&matching.alpha) {
        return Err(Error::ConfigValidation {
            message: format!(
                "alpha must be between {} and {}, got {}",
                score::MIN,
                score::MAX,
                matching.alpha
            ),
        });
    }

    if !(score::MIN..=score::MAX).contains(&matching.threshold) {
        return Err(Error::ConfigValidation {
            message: format!(
                "threshold must be between {} and {}, got {}",
                score::MIN,
                score::MAX,
                matching.threshold
            ),
        });
    }

    if matching.shortlist_size == 0 {
        return Err(Error::ConfigValidation {
            message: "shortlist_size must be at least 1".to_string(),
        });
    }

    if matching.max_parallel == 0 {
        return Err(Error::ConfigValidation {
            message: "max_parallel must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate calibration settings.
fn validate_calibration(calibration: &CalibrationConfig) -> Result<()> {
    // A single record has no pairs to fit on
    if calibration.enabled && calibration.size < 2 {
        return Err(Error::ConfigValidation {
            message: format!(
                "calibration size must be at least 2 when calibration is enabled, got {}",
                calibration.size
            ),
        });
    }

    Ok(())
}
