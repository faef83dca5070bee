//! Global similarity search and query expansion.

use ndarray::{Array2, ArrayView1};

use crate::embedding::normalize_rows;

/// Similarity of every query row against every gallery row.
///
/// Both inputs are expected to be row-normalized, making this the cosine
/// similarity.
pub fn cosine_similarity(queries: &Array2<f32>, gallery: &Array2<f32>) -> Array2<f32> {
    queries.dot(&gallery.t())
}

/// Index and value of the largest entry. The first maximum wins.
///
/// NaN entries are ignored. Returns `None` for an empty or all-NaN row.
pub fn argmax(row: ArrayView1<'_, f32>) -> Option<(usize, f32)> {
    row.iter()
        .copied()
        .enumerate()
        .fold(None, |best, (j, value)| match best {
            _ if value.is_nan() => best,
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((j, value)),
        })
}

/// Column of the largest entry of each row.
pub fn argmax_rows(matrix: &Array2<f32>) -> Vec<usize> {
    matrix
        .rows()
        .into_iter()
        .map(|row| argmax(row).map_or(0, |(j, _)| j))
        .collect()
}

/// Pull each query toward its nearest gallery neighbour.
///
/// Row `i` becomes `normalize(queries[i] + gallery[nearest[i]])`.
pub fn expand_queries(
    queries: &Array2<f32>,
    gallery: &Array2<f32>,
    nearest: &[usize],
) -> Array2<f32> {
    let mut expanded = queries.clone();
    for (mut row, &j) in expanded.rows_mut().into_iter().zip(nearest) {
        row += &gallery.row(j);
    }
    normalize_rows(&mut expanded);
    expanded
}
