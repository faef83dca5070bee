//! Shortlist selection for local re-scoring.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView1};

/// The `k` columns with the largest values, best first.
///
/// Uses a stable descending sort over the whole row, so on exact ties the
/// lower index comes first. NaN entries sort last. Returns every column when
/// `k` exceeds the row length.
pub fn shortlist_row(row: ArrayView1<'_, f32>, k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by(|&a, &b| descending(row[a], row[b]));
    order.truncate(k.min(row.len()));
    order
}

/// Larger values first. `-0.0` and `0.0` compare equal.
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

/// Shortlist for every row of `similarity`.
pub fn shortlists(similarity: &Array2<f32>, k: usize) -> Vec<Vec<usize>> {
    similarity
        .rows()
        .into_iter()
        .map(|row| shortlist_row(row, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_shortlist_descending() {
        let row = array![0.1_f32, 0.7, 0.3, 0.9];
        assert_eq!(shortlist_row(row.view(), 3), vec![3, 1, 2]);
    }

    #[test]
    fn test_shortlist_ties_prefer_lower_index() {
        let row = array![0.5_f32, 0.2, 0.5, 0.5];
        assert_eq!(shortlist_row(row.view(), 2), vec![0, 2]);
    }

    #[test]
    fn test_shortlist_signed_zeros_keep_index_order() {
        let row = array![-0.0_f32, 0.0, -0.5];
        assert_eq!(shortlist_row(row.view(), 2), vec![0, 1]);
    }

    #[test]
    fn test_shortlist_nan_sorts_last() {
        let row = array![f32::NAN, 0.2_f32, 0.4];
        assert_eq!(shortlist_row(row.view(), 3), vec![2, 1, 0]);
    }

    #[test]
    fn test_shortlist_clamps_to_gallery_size() {
        let row = array![0.5_f32, 0.2];
        assert_eq!(shortlist_row(row.view(), 25), vec![0, 1]);
    }

    #[test]
    fn test_shortlists_per_row() {
        let sim = array![[0.1_f32, 0.9, 0.5], [0.8, 0.0, 0.3]];
        assert_eq!(shortlists(&sim, 2), vec![vec![1, 2], vec![0, 2]]);
    }

    proptest! {
        #[test]
        fn prop_shortlist_size_is_min_of_k_and_gallery(
            row in prop::collection::vec(-1.0_f32..1.0, 0..40),
            k in 1_usize..50,
        ) {
            let n = row.len();
            let row = ndarray::Array1::from(row);
            let shortlist = shortlist_row(row.view(), k);

            prop_assert_eq!(shortlist.len(), k.min(n));
            // Every excluded column scores no higher than the last included one
            if let Some(&last) = shortlist.last() {
                for j in (0..n).filter(|j| !shortlist.contains(j)) {
                    prop_assert!(row[j] <= row[last]);
                }
            }
        }
    }
}
