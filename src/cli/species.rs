//! Species group summary.

use crate::dataset::{Dataset, PreprocessPlan, SpeciesTag, Split};
use std::collections::HashSet;
use std::fmt::Write;

/// Counts and preprocessing for one species group.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSummary {
    /// Species group.
    pub species: SpeciesTag,
    /// Gallery images.
    pub database: usize,
    /// Query images.
    pub queries: usize,
    /// Distinct known identities in the gallery.
    pub identities: usize,
    /// Distinct preprocessing plans, in order of first use.
    pub plans: Vec<PreprocessPlan>,
}

/// Summarize every species group in first-appearance order.
pub fn summarize_species(dataset: &Dataset) -> Vec<SpeciesSummary> {
    dataset
        .species_groups()
        .into_iter()
        .map(|species| {
            let group = dataset.by_species(&species);
            let database = group.split(Split::Database);
            let identities: HashSet<&str> = database
                .iter()
                .filter_map(|r| r.identity.as_deref())
                .collect();

            let mut plans: Vec<PreprocessPlan> = Vec::new();
            for record in &group {
                let plan = PreprocessPlan::resolve(&species, record.orientation);
                if !plans.contains(&plan) {
                    plans.push(plan);
                }
            }

            SpeciesSummary {
                database: database.len(),
                queries: group.len() - database.len(),
                identities: identities.len(),
                plans,
                species,
            }
        })
        .collect()
}

/// Render summaries as a plain-text report.
pub fn format_species_summary(summaries: &[SpeciesSummary]) -> String {
    let mut out = String::new();
    if summaries.is_empty() {
        out.push_str("No species groups found.\n");
        return out;
    }

    for summary in summaries {
        let _ = writeln!(out, "{}", summary.species);
        let _ = writeln!(
            out,
            "  database: {} images, {} identities",
            summary.database, summary.identities
        );
        let _ = writeln!(out, "  queries:  {} images", summary.queries);
        for plan in &summary.plans {
            let _ = writeln!(out, "  preprocess: {plan}");
        }
    }
    out
}
