//! Embedding tables produced by an external descriptor network.

use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// Embeddings keyed by image identifier.
///
/// Loaded from a headerless CSV where each row is
/// `image_id,v0,v1,...,v{d-1}`. All rows share one dimension.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    index: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl EmbeddingStore {
    /// Load an embedding table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed, is empty, contains a
    /// non-numeric or non-finite component, mixes dimensions, or repeats an
    /// identifier.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::EmbeddingRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut ids = Vec::new();
        let mut values = Vec::new();
        let mut dim: Option<usize> = None;

        for (line_num, result) in reader.records().enumerate() {
            let record = result.map_err(|e| Error::EmbeddingRead {
                path: path.to_path_buf(),
                source: e,
            })?;

            let invalid = |message: String| Error::InvalidEmbeddings {
                path: path.to_path_buf(),
                message: format!("line {}: {message}", line_num + 1),
            };

            let mut fields = record.iter();
            let image_id = fields
                .next()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| invalid("missing image_id".to_string()))?
                .to_string();

            let row_start = values.len();
            for field in fields {
                let value: f32 = field
                    .parse()
                    .map_err(|_| invalid(format!("'{field}' is not a valid number")))?;
                if !value.is_finite() {
                    return Err(invalid(format!(
                        "non-finite component '{field}' for '{image_id}'"
                    )));
                }
                values.push(value);
            }

            let row_dim = values.len() - row_start;
            if row_dim == 0 {
                return Err(invalid(format!("no components for '{image_id}'")));
            }
            match dim {
                None => dim = Some(row_dim),
                Some(expected) if expected != row_dim => {
                    return Err(invalid(format!(
                        "'{image_id}' has {row_dim} components, expected {expected}"
                    )));
                }
                Some(_) => {}
            }

            ids.push(image_id);
        }

        let Some(dim) = dim else {
            return Err(Error::InvalidEmbeddings {
                path: path.to_path_buf(),
                message: "file contains no embeddings".to_string(),
            });
        };

        let store = Self::from_rows(ids, values, dim).map_err(|e| match e {
            Error::DuplicateImageId { image_id, .. } => Error::DuplicateImageId {
                path: path.to_path_buf(),
                image_id,
            },
            other => other,
        })?;

        debug!(
            "Loaded {} embeddings of dimension {} from {}",
            store.len(),
            store.dim(),
            path.display()
        );
        Ok(store)
    }

    /// Build a store from identifiers and row-major values.
    pub fn from_rows(ids: Vec<String>, values: Vec<f32>, dim: usize) -> Result<Self> {
        let rows = ids.len();
        let vectors = Array2::from_shape_vec((rows, dim), values).map_err(|e| Error::Internal {
            message: format!("embedding buffer does not match {rows}x{dim}: {e}"),
        })?;

        let mut index = HashMap::with_capacity(rows);
        for (row, id) in ids.into_iter().enumerate() {
            if index.insert(id.clone(), row).is_some() {
                return Err(Error::DuplicateImageId {
                    path: std::path::PathBuf::new(),
                    image_id: id,
                });
            }
        }

        Ok(Self { index, vectors })
    }

    /// Number of stored embeddings.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    /// Whether an embedding exists for `image_id`.
    pub fn contains(&self, image_id: &str) -> bool {
        self.index.contains_key(image_id)
    }

    /// Embedding for `image_id`.
    pub fn get(&self, image_id: &str) -> Option<ArrayView1<'_, f32>> {
        self.index.get(image_id).map(|&row| self.vectors.row(row))
    }

    /// Records of `dataset` that have an embedding.
    ///
    /// Each record without one is skipped with a warning.
    pub fn retain_available(&self, dataset: &Dataset) -> Dataset {
        let available = dataset.filter(|r| self.contains(&r.image_id));
        if available.len() < dataset.len() {
            for record in dataset.iter().filter(|r| !self.contains(&r.image_id)) {
                warn!(
                    "Skipping {} ({}): no embedding available",
                    record.image_id, record.path
                );
            }
        }
        available
    }
}
