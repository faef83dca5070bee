//! Species groups and their preprocessing strategies.
//!
//! Images are preprocessed upstream of feature extraction. The policy is a
//! fixed mapping from species group (and, for salamanders, orientation) to an
//! ordered list of steps, resolved once per record.

use crate::constants::{preprocess, species};
use crate::dataset::Orientation;

/// Species group a record originates from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpeciesTag {
    /// `LynxID2025`.
    Lynx,
    /// `SalamanderID2025`.
    Salamander,
    /// `SeaTurtleID2022`.
    SeaTurtle,
    /// Any other group, kept by name.
    Other(String),
}

impl SpeciesTag {
    /// Parse a metadata `dataset` value. Unknown names become [`SpeciesTag::Other`].
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            species::LYNX => Self::Lynx,
            species::SALAMANDER => Self::Salamander,
            species::SEA_TURTLE => Self::SeaTurtle,
            other => Self::Other(other.to_string()),
        }
    }

    /// Name as it appears in the metadata.
    pub fn name(&self) -> &str {
        match self {
            Self::Lynx => species::LYNX,
            Self::Salamander => species::SALAMANDER,
            Self::SeaTurtle => species::SEA_TURTLE,
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for SpeciesTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One image transformation applied before feature extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreprocessStep {
    /// Bilinear resize so the longest side has this many pixels.
    ResizeLongestSide(u32),
    /// Rotate by the given number of degrees (counter-clockwise positive).
    Rotate(i32),
    /// Gamma correction.
    Gamma(f32),
    /// Contrast limited adaptive histogram equalization on luminance.
    Clahe {
        /// Contrast clip limit.
        clip_limit: f32,
        /// Tiles per side.
        tile_grid: u32,
    },
    /// Gaussian smoothing.
    GaussianBlur {
        /// Square kernel size.
        kernel: u32,
        /// Standard deviation.
        sigma: f32,
    },
}

impl std::fmt::Display for PreprocessStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResizeLongestSide(side) => write!(f, "resize(longest={side})"),
            Self::Rotate(degrees) => write!(f, "rotate({degrees})"),
            Self::Gamma(gamma) => write!(f, "gamma({gamma})"),
            Self::Clahe {
                clip_limit,
                tile_grid,
            } => write!(f, "clahe(clip={clip_limit}, tiles={tile_grid}x{tile_grid})"),
            Self::GaussianBlur { kernel, sigma } => {
                write!(f, "blur({kernel}x{kernel}, sigma={sigma})")
            }
        }
    }
}

/// Ordered preprocessing steps for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessPlan {
    steps: Vec<PreprocessStep>,
}

impl PreprocessPlan {
    /// Resolve the plan for a species group and orientation.
    pub fn resolve(species: &SpeciesTag, orientation: Orientation) -> Self {
        let clahe = PreprocessStep::Clahe {
            clip_limit: preprocess::CLAHE_CLIP_LIMIT,
            tile_grid: preprocess::CLAHE_TILE_GRID,
        };

        let mut steps = vec![PreprocessStep::ResizeLongestSide(preprocess::LONGEST_SIDE)];
        match species {
            SpeciesTag::Lynx => {
                steps.push(PreprocessStep::Gamma(preprocess::LYNX_GAMMA));
                steps.push(clahe);
            }
            SpeciesTag::Salamander => {
                match orientation {
                    Orientation::Left => {
                        steps.push(PreprocessStep::Rotate(preprocess::ROTATE_LEFT_DEGREES));
                    }
                    Orientation::Right => {
                        steps.push(PreprocessStep::Rotate(preprocess::ROTATE_RIGHT_DEGREES));
                    }
                    Orientation::Top => {}
                }
                steps.push(PreprocessStep::GaussianBlur {
                    kernel: preprocess::BLUR_KERNEL,
                    sigma: preprocess::BLUR_SIGMA,
                });
            }
            SpeciesTag::SeaTurtle => steps.push(clahe),
            SpeciesTag::Other(_) => {}
        }

        Self { steps }
    }

    /// Steps in application order.
    pub fn steps(&self) -> &[PreprocessStep] {
        &self.steps
    }
}

impl std::fmt::Display for PreprocessPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
