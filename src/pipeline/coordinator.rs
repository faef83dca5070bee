//! Partitioning of the dataset into gallery, calibration and query groups.

use crate::dataset::{Dataset, SpeciesTag, Split};
use tracing::debug;

/// Database and query halves of a dataset.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Labeled gallery records.
    pub database: Dataset,
    /// Records to identify.
    pub queries: Dataset,
}

/// Split a dataset into database and query records, keeping file order.
pub fn partition(dataset: &Dataset) -> Partition {
    let partition = Partition {
        database: dataset.split(Split::Database),
        queries: dataset.split(Split::Query),
    };
    debug!(
        "Partitioned {} records into {} database and {} query",
        dataset.len(),
        partition.database.len(),
        partition.queries.len()
    );
    partition
}

/// Group queries by species, in order of first appearance.
pub fn group_queries(queries: &Dataset) -> Vec<(SpeciesTag, Dataset)> {
    queries
        .species_groups()
        .into_iter()
        .map(|species| {
            let group = queries.by_species(&species);
            (species, group)
        })
        .collect()
}

/// Leading database records used to fit score calibration.
pub fn calibration_subset(database: &Dataset, size: usize) -> Dataset {
    database.take(size)
}
