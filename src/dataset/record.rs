//! Typed image records.

use crate::constants::{UNKNOWN_IDENTITY, metadata};
use crate::dataset::SpeciesTag;

/// Which side of the matching problem a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// Labeled gallery image.
    Database,
    /// Unlabeled image to identify.
    Query,
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database => write!(f, "{}", metadata::SPLIT_DATABASE),
            Self::Query => write!(f, "{}", metadata::SPLIT_QUERY),
        }
    }
}

impl std::str::FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            metadata::SPLIT_DATABASE => Ok(Self::Database),
            metadata::SPLIT_QUERY => Ok(Self::Query),
            other => Err(format!("unknown split: {other}")),
        }
    }
}

/// Direction the animal faces in the photograph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Dorsal view, already aligned.
    #[default]
    Top,
    /// Facing left.
    Left,
    /// Facing right.
    Right,
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "top" => Ok(Self::Top),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown orientation: {other}")),
        }
    }
}

/// A single image listed in the metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Stable image identifier used in the submission.
    pub image_id: String,
    /// Individual identity, present for gallery images.
    pub identity: Option<String>,
    /// Image path relative to the dataset root.
    pub path: String,
    /// Database or query.
    pub split: Split,
    /// Originating species group.
    pub species: SpeciesTag,
    /// Facing direction, `Top` when not recorded.
    pub orientation: Orientation,
}

impl ImageRecord {
    /// Identity label, or `unknown` when the record is unlabeled.
    pub fn label(&self) -> &str {
        self.identity.as_deref().unwrap_or(UNKNOWN_IDENTITY)
    }
}
