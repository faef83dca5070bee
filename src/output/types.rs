//! Output type definitions.

use crate::constants::NEW_INDIVIDUAL;

/// Identity decision for a single query image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Query image identifier.
    pub image_id: String,
    /// Matched gallery identity, or `new_individual`.
    pub identity: String,
    /// Best fused score for this query.
    pub score: f32,
    /// Species dataset the query belongs to.
    pub species: String,
}

impl Prediction {
    /// Whether the query was declared a previously unseen individual.
    pub fn is_new_individual(&self) -> bool {
        self.identity == NEW_INDIVIDUAL
    }
}
