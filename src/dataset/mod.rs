//! Image metadata and immutable dataset views.

mod loader;
mod record;
mod species;

pub use loader::load_metadata;
pub use record::{ImageRecord, Orientation, Split};
pub use species::{PreprocessPlan, PreprocessStep, SpeciesTag};

/// An ordered, immutable collection of image records.
///
/// Subsetting operations return new datasets; record order is preserved and
/// defines the row order of any embedding matrix built from the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ImageRecord>,
}

impl Dataset {
    /// Create a dataset from records in the given order.
    pub fn new(records: Vec<ImageRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in order.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Record at `index`.
    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    /// Iterate over records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ImageRecord> {
        self.records.iter()
    }

    /// Records matching `predicate`, in order.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&ImageRecord) -> bool,
    {
        Self::new(self.records.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Records at `indices`, in the order given. Out-of-range indices are skipped.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self::new(
            indices
                .iter()
                .filter_map(|&i| self.records.get(i).cloned())
                .collect(),
        )
    }

    /// The first `n` records.
    pub fn take(&self, n: usize) -> Self {
        Self::new(self.records.iter().take(n).cloned().collect())
    }

    /// Records belonging to `split`.
    pub fn split(&self, split: Split) -> Self {
        self.filter(|r| r.split == split)
    }

    /// Records belonging to `species`.
    pub fn by_species(&self, species: &SpeciesTag) -> Self {
        self.filter(|r| &r.species == species)
    }

    /// Distinct species groups in order of first appearance.
    pub fn species_groups(&self) -> Vec<SpeciesTag> {
        let mut groups: Vec<SpeciesTag> = Vec::new();
        for record in &self.records {
            if !groups.contains(&record.species) {
                groups.push(record.species.clone());
            }
        }
        groups
    }

    /// Image identifiers in order.
    pub fn image_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.image_id.as_str()).collect()
    }

    /// Identity labels in order, `unknown` for unlabeled records.
    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.label().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a ImageRecord;
    type IntoIter = std::slice::Iter<'a, ImageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
