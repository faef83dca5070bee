//! Retrieval and fusion engine.
//!
//! For one species group of queries the engine runs global retrieval against
//! the whole gallery, optionally expands each query toward its nearest
//! neighbour, re-scores a shortlist with a local matcher, fuses both scores
//! and thresholds the result into identities.

pub mod fusion;
pub mod shortlist;
pub mod similarity;

use indicatif::ProgressBar;
use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

use crate::calibration::Calibration;
use crate::config::{MatchingConfig, validate_matching};
use crate::dataset::{Dataset, ImageRecord};
use crate::error::{Error, Result};
use crate::matcher::LocalMatcher;
use crate::output::Prediction;
use crate::output::progress::inc_progress;

/// Settings that drive a single retrieval run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Weight of the global score in the fused score.
    pub alpha: f32,
    /// Number of candidates passed to the local matcher.
    pub shortlist_size: usize,
    /// Fused scores below this are new individuals.
    pub threshold: f32,
    /// Expand queries toward their nearest gallery neighbour.
    pub query_expansion: bool,
    /// Concurrent local matcher calls. `1` runs sequentially.
    pub max_parallel: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&MatchingConfig::default())
    }
}

impl From<&MatchingConfig> for EngineConfig {
    fn from(matching: &MatchingConfig) -> Self {
        Self {
            alpha: matching.alpha,
            shortlist_size: matching.shortlist_size,
            threshold: matching.threshold,
            query_expansion: matching.query_expansion,
            max_parallel: matching.max_parallel,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        validate_matching(&MatchingConfig {
            alpha: self.alpha,
            shortlist_size: self.shortlist_size,
            threshold: self.threshold,
            query_expansion: self.query_expansion,
            max_parallel: self.max_parallel,
        })
    }
}

/// Labeled database images with their normalized embeddings.
#[derive(Debug, Clone)]
pub struct Gallery {
    records: Dataset,
    embeddings: Array2<f32>,
    labels: Vec<String>,
}

impl Gallery {
    /// Pair gallery records with their embedding rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowCountMismatch`] if the row count differs from the
    /// record count.
    pub fn new(records: Dataset, embeddings: Array2<f32>) -> Result<Self> {
        if embeddings.nrows() != records.len() {
            return Err(Error::RowCountMismatch {
                records: records.len(),
                rows: embeddings.nrows(),
            });
        }
        let labels = records.labels();
        Ok(Self {
            records,
            embeddings,
            labels,
        })
    }

    /// Number of gallery images.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the gallery has no images.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.embeddings.ncols()
    }

    /// Gallery records.
    pub fn records(&self) -> &Dataset {
        &self.records
    }

    /// Gallery embeddings, one row per record.
    pub fn embeddings(&self) -> &Array2<f32> {
        &self.embeddings
    }

    /// Identity labels in gallery order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Every intermediate score of one group, kept for inspection.
#[derive(Debug, Clone)]
pub struct GroupScores {
    /// Similarity of the unexpanded queries.
    pub initial: Array2<f32>,
    /// Similarity used for shortlisting and fusion, after expansion.
    pub global: Array2<f32>,
    /// Shortlisted gallery indices per query, best first.
    pub shortlists: Vec<Vec<usize>>,
    /// Local scores; zero outside each query's shortlist.
    pub local: Array2<f32>,
    /// Fused scores.
    pub fused: Array2<f32>,
}

/// Matches query groups against a fixed gallery.
#[derive(Debug)]
pub struct RetrievalEngine {
    config: EngineConfig,
    gallery: Gallery,
    calibration: Option<Calibration>,
    pool: Option<rayon::ThreadPool>,
}

impl RetrievalEngine {
    /// Create an engine over `gallery`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are out of range or the worker pool
    /// cannot be built.
    pub fn new(config: EngineConfig, gallery: Gallery) -> Result<Self> {
        config.validate()?;

        let pool = if config.max_parallel > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_parallel)
                .thread_name(|i| format!("local-match-{i}"))
                .build()
                .map_err(|source| Error::ThreadPool { source })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            config,
            gallery,
            calibration: None,
            pool,
        })
    }

    /// Apply fitted calibrators to global and local scores before fusion.
    #[must_use]
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration.is_active().then_some(calibration);
        self
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The gallery queries are matched against.
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Compute every score for one group of queries.
    ///
    /// `query_embeddings` must be row-normalized and aligned with `queries`.
    ///
    /// # Errors
    ///
    /// Returns an error on a row count or dimension mismatch, or when the
    /// local matcher fails or returns scores of the wrong shape.
    pub fn score_group(
        &self,
        queries: &Dataset,
        query_embeddings: &Array2<f32>,
        matcher: &dyn LocalMatcher,
        progress: Option<&ProgressBar>,
    ) -> Result<GroupScores> {
        if query_embeddings.nrows() != queries.len() {
            return Err(Error::RowCountMismatch {
                records: queries.len(),
                rows: query_embeddings.nrows(),
            });
        }
        if self.gallery.is_empty() {
            let empty = Array2::<f32>::zeros((queries.len(), 0));
            return Ok(GroupScores {
                initial: empty.clone(),
                global: empty.clone(),
                shortlists: vec![Vec::new(); queries.len()],
                local: empty.clone(),
                fused: empty,
            });
        }
        if query_embeddings.ncols() != self.gallery.dim() {
            return Err(Error::DimensionMismatch {
                gallery: self.gallery.dim(),
                query: query_embeddings.ncols(),
            });
        }

        let gallery = self.gallery.embeddings();
        let initial = similarity::cosine_similarity(query_embeddings, gallery);

        let global = if self.config.query_expansion {
            let nearest = similarity::argmax_rows(&initial);
            let expanded = similarity::expand_queries(query_embeddings, gallery, &nearest);
            similarity::cosine_similarity(&expanded, gallery)
        } else {
            initial.clone()
        };

        let shortlists = shortlist::shortlists(&global, self.config.shortlist_size);
        let local_rows = self.rescore(queries, &shortlists, matcher, progress)?;

        let mut local = Array2::<f32>::zeros(global.raw_dim());
        for (i, (shortlist, scores)) in shortlists.iter().zip(&local_rows).enumerate() {
            for (&j, &score) in shortlist.iter().zip(scores) {
                local[[i, j]] = self.calibrated_local(score);
            }
        }

        let fused = match &self.calibration {
            Some(calibration) => {
                let calibrated = global.mapv(|s| calibration.global_score(s));
                fusion::fuse(&calibrated, &local, self.config.alpha)
            }
            None => fusion::fuse(&global, &local, self.config.alpha),
        };

        Ok(GroupScores {
            initial,
            global,
            shortlists,
            local,
            fused,
        })
    }

    /// Threshold fused scores into one prediction per query.
    pub fn predict(&self, queries: &Dataset, scores: &GroupScores) -> Vec<Prediction> {
        queries
            .iter()
            .zip(scores.fused.rows())
            .filter_map(|(query, row)| {
                let decision = fusion::decide(row, self.config.threshold)?;
                Some(Prediction {
                    image_id: query.image_id.clone(),
                    identity: fusion::decision_label(&decision, self.gallery.labels()).to_string(),
                    score: decision.score,
                    species: query.species.name().to_string(),
                })
            })
            .collect()
    }

    /// Identify every query in a group.
    ///
    /// An empty gallery or an empty group yields no predictions.
    ///
    /// # Errors
    ///
    /// See [`RetrievalEngine::score_group`].
    pub fn identify(
        &self,
        queries: &Dataset,
        query_embeddings: &Array2<f32>,
        matcher: &dyn LocalMatcher,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<Prediction>> {
        if queries.is_empty() || self.gallery.is_empty() {
            return Ok(Vec::new());
        }
        let scores = self.score_group(queries, query_embeddings, matcher, progress)?;
        Ok(self.predict(queries, &scores))
    }

    /// Local scores for each query's shortlist, in query order.
    fn rescore(
        &self,
        queries: &Dataset,
        shortlists: &[Vec<usize>],
        matcher: &dyn LocalMatcher,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<Vec<f32>>> {
        let score_one = |query: &ImageRecord, shortlist: &[usize]| {
            let result = self.score_shortlist(query, shortlist, matcher);
            inc_progress(progress);
            result
        };

        match &self.pool {
            Some(pool) => {
                debug!(
                    "Local matching {} queries on {} threads",
                    queries.len(),
                    pool.current_num_threads()
                );
                pool.install(|| {
                    queries
                        .records()
                        .par_iter()
                        .zip(shortlists.par_iter())
                        .map(|(query, shortlist)| score_one(query, shortlist))
                        .collect()
                })
            }
            None => queries
                .iter()
                .zip(shortlists)
                .map(|(query, shortlist)| score_one(query, shortlist))
                .collect(),
        }
    }

    fn score_shortlist(
        &self,
        query: &ImageRecord,
        shortlist: &[usize],
        matcher: &dyn LocalMatcher,
    ) -> Result<Vec<f32>> {
        if shortlist.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.gallery.records();
        let candidates: Vec<&ImageRecord> =
            shortlist.iter().filter_map(|&j| records.get(j)).collect();
        matcher
            .score(query, &candidates)?
            .into_scores(&query.image_id, shortlist.len())
    }

    fn calibrated_local(&self, score: f32) -> f32 {
        self.calibration
            .as_ref()
            .map_or(score, |c| c.local_score(score))
    }
}
