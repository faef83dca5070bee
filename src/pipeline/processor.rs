//! Single species group processing.

use crate::dataset::{Dataset, SpeciesTag};
use crate::embedding::{FeatureExtractor, extract_normalized};
use crate::engine::RetrievalEngine;
use crate::error::Result;
use crate::matcher::LocalMatcher;
use crate::output::Prediction;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of identifying one species group.
#[derive(Debug, Clone)]
pub struct GroupResult {
    /// One prediction per query, in query order.
    pub predictions: Vec<Prediction>,
    /// Queries predicted as previously unseen.
    pub new_individuals: usize,
    /// Wall-clock processing time in seconds.
    pub duration_secs: f64,
}

/// Identify every query of one species group.
///
/// # Arguments
///
/// * `species` - Species the group belongs to
/// * `queries` - Query records of that species
/// * `engine` - Engine holding the shared gallery
/// * `extractor` - Source of query embeddings
/// * `matcher` - Local matcher for shortlist re-scoring
/// * `progress_enabled` - Whether to show a per-query progress bar
pub fn process_group(
    species: &SpeciesTag,
    queries: &Dataset,
    engine: &RetrievalEngine,
    extractor: &dyn FeatureExtractor,
    matcher: &dyn LocalMatcher,
    progress_enabled: bool,
) -> Result<GroupResult> {
    use crate::output::progress;

    let start_time = Instant::now();

    if queries.is_empty() {
        debug!("No queries for {species}");
        return Ok(GroupResult {
            predictions: Vec::new(),
            new_individuals: 0,
            duration_secs: start_time.elapsed().as_secs_f64(),
        });
    }
    if engine.gallery().is_empty() {
        warn!(
            "Gallery is empty, skipping {} queries for {species}",
            queries.len()
        );
        return Ok(GroupResult {
            predictions: Vec::new(),
            new_individuals: 0,
            duration_secs: start_time.elapsed().as_secs_f64(),
        });
    }

    info!("Processing {species}: {} queries", queries.len());

    let embeddings = extract_normalized(extractor, queries)?;
    debug!(
        "Extracted {}x{} query embeddings for {species}",
        embeddings.nrows(),
        embeddings.ncols()
    );

    let guard = progress::ProgressGuard::new(
        progress::create_query_progress(queries.len(), species.name(), progress_enabled),
        "Matching complete",
    );
    let predictions = engine.identify(queries, &embeddings, matcher, guard.get())?;
    drop(guard);

    let new_individuals = predictions
        .iter()
        .filter(|p| p.is_new_individual())
        .count();
    let duration_secs = start_time.elapsed().as_secs_f64();

    info!(
        "{species}: {} predictions, {} new individuals ({:.2}s)",
        predictions.len(),
        new_individuals,
        duration_secs
    );

    Ok(GroupResult {
        predictions,
        new_individuals,
        duration_secs,
    })
}
