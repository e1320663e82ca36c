//! Subgroup partitioning of an observation series.
//!
//! Splits an ordered series into consecutive batches of a target size `k`.
//! Every batch has exactly `k` values except possibly the last, which holds
//! the remaining `n mod k` values. Chart calculators keep that short tail
//! subgroup; it is never dropped or padded.

use std::iter::FusedIterator;
use std::slice::Chunks;

use crate::error::{Result, SpcError};

/// Lazy iterator over the subgroups of a series.
///
/// Produced by [`partition`]. Yields borrowed slices in series order and is
/// consumed once.
#[derive(Debug, Clone)]
pub struct Subgroups<'a> {
    chunks: Chunks<'a, f64>,
}

impl<'a> Iterator for Subgroups<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Subgroups<'_> {}

impl FusedIterator for Subgroups<'_> {}

/// Partition `series` into consecutive subgroups of size `k`.
///
/// # Errors
///
/// [`SpcError::InvalidArgument`] if `k < 1`.
///
/// # Examples
///
/// ```
/// use spc_engine::spc::partition;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let groups: Vec<&[f64]> = partition(&data, 2).unwrap().collect();
/// assert_eq!(groups, vec![&[1.0, 2.0][..], &[3.0, 4.0][..], &[5.0][..]]);
/// ```
pub fn partition(series: &[f64], k: usize) -> Result<Subgroups<'_>> {
    if k < 1 {
        return Err(SpcError::InvalidArgument(format!(
            "subgroup size must be >= 1, got {k}"
        )));
    }
    Ok(Subgroups {
        chunks: series.chunks(k),
    })
}

/// Number of subgroups [`partition`] yields for `n` values: `ceil(n / k)`.
///
/// Returns 0 when `k == 0`.
pub fn subgroup_count(n: usize, k: usize) -> usize {
    if k == 0 {
        return 0;
    }
    n.div_ceil(k)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn concatenation_reconstructs_series(
            data in proptest::collection::vec(-1e3_f64..1e3, 0..=60),
            k in 1_usize..=12,
        ) {
            let rebuilt: Vec<f64> = partition(&data, k)
                .unwrap()
                .flat_map(|g| g.iter().copied())
                .collect();
            prop_assert_eq!(rebuilt, data);
        }

        #[test]
        fn count_is_ceil_and_only_tail_is_short(
            data in proptest::collection::vec(-1e3_f64..1e3, 0..=60),
            k in 1_usize..=12,
        ) {
            let groups: Vec<&[f64]> = partition(&data, k).unwrap().collect();
            prop_assert_eq!(groups.len(), data.len().div_ceil(k));
            prop_assert_eq!(groups.len(), subgroup_count(data.len(), k));
            if let Some((last, head)) = groups.split_last() {
                prop_assert!(head.iter().all(|g| g.len() == k));
                let expected_tail = if data.len() % k == 0 { k } else { data.len() % k };
                prop_assert_eq!(last.len(), expected_tail);
            }
        }
    }
}
