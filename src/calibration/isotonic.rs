//! Isotonic regression by pool-adjacent-violators.

use crate::calibration::ScoreCalibrator;

/// Monotone non-decreasing map from raw score to match probability.
///
/// Evaluated by linear interpolation between fitted knots and clamped to the
/// first and last knot outside the fitted range.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotonicCalibrator {
    knots_x: Vec<f32>,
    knots_y: Vec<f32>,
}

struct Block {
    sum: f64,
    weight: f64,
    len: usize,
}

impl Block {
    fn mean(&self) -> f64 {
        self.sum / self.weight
    }
}

impl IsotonicCalibrator {
    /// Fit on `(score, target)` samples.
    ///
    /// Non-finite samples are ignored. Returns `None` when fewer than two
    /// distinct scores remain or every target is identical.
    #[allow(clippy::float_cmp)]
    pub fn fit(samples: &[(f32, f32)]) -> Option<Self> {
        let mut points: Vec<(f32, f32)> = samples
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let first_target = points.first()?.1;
        if points.iter().all(|&(_, y)| y == first_target) {
            return None;
        }

        // Collapse equal scores into one weighted point
        let mut knots_x: Vec<f32> = Vec::new();
        let mut blocks: Vec<Block> = Vec::new();
        for (x, y) in points {
            if knots_x.last() == Some(&x) {
                if let Some(block) = blocks.last_mut() {
                    block.sum += f64::from(y);
                    block.weight += 1.0;
                }
            } else {
                knots_x.push(x);
                blocks.push(Block {
                    sum: f64::from(y),
                    weight: 1.0,
                    len: 1,
                });
            }
        }

        if knots_x.len() < 2 {
            return None;
        }

        let mut pooled: Vec<Block> = Vec::with_capacity(blocks.len());
        for block in blocks {
            pooled.push(block);
            while pooled.len() >= 2 {
                let n = pooled.len();
                if pooled[n - 2].mean() <= pooled[n - 1].mean() {
                    break;
                }
                let Some(last) = pooled.pop() else { break };
                if let Some(prev) = pooled.last_mut() {
                    prev.sum += last.sum;
                    prev.weight += last.weight;
                    prev.len += last.len;
                }
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let knots_y = pooled
            .iter()
            .flat_map(|b| std::iter::repeat_n(b.mean() as f32, b.len))
            .collect();

        Some(Self { knots_x, knots_y })
    }

    /// Number of fitted knots.
    pub fn len(&self) -> usize {
        self.knots_x.len()
    }

    /// Whether no knots were fitted.
    pub fn is_empty(&self) -> bool {
        self.knots_x.is_empty()
    }
}

impl ScoreCalibrator for IsotonicCalibrator {
    fn calibrate(&self, score: f32) -> f32 {
        let (Some(&x_first), Some(&x_last)) = (self.knots_x.first(), self.knots_x.last()) else {
            return score;
        };
        if score <= x_first {
            return self.knots_y[0];
        }
        if score >= x_last {
            return self.knots_y[self.knots_y.len() - 1];
        }

        let hi = self.knots_x.partition_point(|&x| x <= score);
        let lo = hi - 1;
        let (x0, x1) = (self.knots_x[lo], self.knots_x[hi]);
        let (y0, y1) = (self.knots_y[lo], self.knots_y[hi]);
        let t = (score - x0) / (x1 - x0);
        t.mul_add(y1 - y0, y0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fit_already_monotone() {
        let cal = IsotonicCalibrator::fit(&[(0.1, 0.0), (0.5, 0.0), (0.9, 1.0)]).unwrap();
        assert_eq!(cal.calibrate(0.1), 0.0);
        assert_eq!(cal.calibrate(0.9), 1.0);
        // Halfway between 0.5 and 0.9
        assert!((cal.calibrate(0.7) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fit_pools_violators() {
        // 0.4 -> 1, 0.6 -> 0 violates monotonicity and pools to 0.5
        let cal =
            IsotonicCalibrator::fit(&[(0.2, 0.0), (0.4, 1.0), (0.6, 0.0), (0.8, 1.0)]).unwrap();
        assert_eq!(cal.calibrate(0.2), 0.0);
        assert!((cal.calibrate(0.4) - 0.5).abs() < 1e-6);
        assert!((cal.calibrate(0.6) - 0.5).abs() < 1e-6);
        assert_eq!(cal.calibrate(0.8), 1.0);
    }

    #[test]
    fn test_fit_averages_duplicate_scores() {
        let cal = IsotonicCalibrator::fit(&[(0.5, 0.0), (0.5, 1.0), (0.9, 1.0)]).unwrap();
        assert_eq!(cal.len(), 2);
        assert!((cal.calibrate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_outside_range() {
        let cal = IsotonicCalibrator::fit(&[(0.2, 0.0), (0.8, 1.0)]).unwrap();
        assert_eq!(cal.calibrate(-1.0), 0.0);
        assert_eq!(cal.calibrate(5.0), 1.0);
    }

    #[test]
    fn test_single_class_not_fitted() {
        assert!(IsotonicCalibrator::fit(&[(0.1, 1.0), (0.9, 1.0)]).is_none());
    }

    #[test]
    fn test_single_distinct_score_not_fitted() {
        assert!(IsotonicCalibrator::fit(&[(0.5, 0.0), (0.5, 1.0)]).is_none());
    }

    #[test]
    fn test_empty_not_fitted() {
        assert!(IsotonicCalibrator::fit(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_calibration_is_monotone(
            samples in prop::collection::vec((-1.0_f32..1.0, prop::bool::ANY), 2..64),
            a in -1.5_f32..1.5,
            b in -1.5_f32..1.5,
        ) {
            let samples: Vec<(f32, f32)> = samples
                .into_iter()
                .map(|(x, same)| (x, if same { 1.0 } else { 0.0 }))
                .collect();
            if let Some(cal) = IsotonicCalibrator::fit(&samples) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(cal.calibrate(lo) <= cal.calibrate(hi) + 1e-6);
                prop_assert!((0.0..=1.0).contains(&cal.calibrate(lo)));
            }
        }
    }
}
