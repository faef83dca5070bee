//! Global descriptor embeddings.
//!
//! The descriptor network runs outside this crate. Its output is read from an
//! embedding table and served through the [`FeatureExtractor`] trait so the
//! retrieval engine never depends on where vectors come from.

mod store;

pub use store::EmbeddingStore;

use ndarray::Array2;

use crate::constants::NORM_EPSILON;
use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// Produces one embedding row per record.
pub trait FeatureExtractor {
    /// Embeddings for `dataset`, one row per record in the same order.
    ///
    /// Rows are not required to be normalized.
    fn extract(&self, dataset: &Dataset) -> Result<Array2<f32>>;
}

/// Feature extractor backed by a precomputed [`EmbeddingStore`].
#[derive(Debug, Clone, Copy)]
pub struct PrecomputedExtractor<'a> {
    store: &'a EmbeddingStore,
}

impl<'a> PrecomputedExtractor<'a> {
    /// Serve embeddings from `store`.
    pub fn new(store: &'a EmbeddingStore) -> Self {
        Self { store }
    }
}

impl FeatureExtractor for PrecomputedExtractor<'_> {
    fn extract(&self, dataset: &Dataset) -> Result<Array2<f32>> {
        let mut matrix = Array2::zeros((dataset.len(), self.store.dim()));
        for (mut row, record) in matrix.rows_mut().into_iter().zip(dataset.iter()) {
            let vector = self
                .store
                .get(&record.image_id)
                .ok_or_else(|| Error::EmbeddingMissing {
                    image_id: record.image_id.clone(),
                })?;
            row.assign(&vector);
        }
        Ok(matrix)
    }
}

/// L2-normalize every row in place.
///
/// Rows with a norm below [`NORM_EPSILON`] are left unchanged.
pub fn normalize_rows(matrix: &mut Array2<f32>) {
    for mut row in matrix.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > NORM_EPSILON {
            row.mapv_inplace(|x| x / norm);
        }
    }
}

/// Extract embeddings for `dataset` and normalize them.
pub fn extract_normalized(
    extractor: &dyn FeatureExtractor,
    dataset: &Dataset,
) -> Result<Array2<f32>> {
    let mut matrix = extractor.extract(dataset)?;
    if matrix.nrows() != dataset.len() {
        return Err(Error::RowCountMismatch {
            records: dataset.len(),
            rows: matrix.nrows(),
        });
    }
    normalize_rows(&mut matrix);
    Ok(matrix)
}
