//! Brute-force two-nearest-neighbor descriptor matching.
//!
//! The query set is the candidate tile and the reference set is the scene:
//! each tile descriptor looks for its two closest scene descriptors. Search
//! is exhaustive, so results are exact and independent of thread count.

pub mod ratio;
mod top_two;

pub use ratio::{count_good_matches, good_matches, is_distinctive, DEFAULT_RATIO};
pub use top_two::Neighbor;

use crate::feature::{Descriptor, DescriptorSet};
use crate::kernel::squared_l2;
use crate::trace::{trace_event, trace_span};
use top_two::TopTwo;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The two closest reference descriptors for one query descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborPair {
    /// Index of the query descriptor.
    pub query: usize,
    pub nearest: Neighbor,
    /// Absent when the reference set holds a single descriptor.
    pub second: Option<Neighbor>,
}

fn nearest_two(query_idx: usize, desc: &Descriptor, reference: &DescriptorSet) -> Option<NeighborPair> {
    let mut top = TopTwo::new();
    for (idx, candidate) in reference.iter().enumerate() {
        top.push(idx, squared_l2(desc, candidate));
    }
    let (nearest, second) = top.finish()?;
    Some(NeighborPair {
        query: query_idx,
        nearest,
        second,
    })
}

/// Finds the two nearest reference descriptors for every query descriptor.
///
/// Returns one pair per query descriptor, in query order, or nothing when the
/// reference set is empty.
pub fn match_top_two(query: &DescriptorSet, reference: &DescriptorSet) -> Vec<NeighborPair> {
    if reference.is_empty() {
        return Vec::new();
    }
    let _span = trace_span!("match_top_two", query = query.len(), reference = reference.len())
        .entered();

    let pairs: Vec<NeighborPair> = query
        .iter()
        .enumerate()
        .filter_map(|(idx, desc)| nearest_two(idx, desc, reference))
        .collect();

    trace_event!("match_pairs", count = pairs.len());
    pairs
}

/// Parallel variant of [`match_top_two`] with identical output.
#[cfg(feature = "rayon")]
pub fn match_top_two_par(query: &DescriptorSet, reference: &DescriptorSet) -> Vec<NeighborPair> {
    if reference.is_empty() {
        return Vec::new();
    }
    let _span = trace_span!("match_top_two_par", query = query.len(), reference = reference.len())
        .entered();

    query
        .as_slice()
        .par_iter()
        .enumerate()
        .filter_map(|(idx, desc)| nearest_two(idx, desc, reference))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::match_top_two;
    use crate::feature::{Descriptor, DescriptorSet, DESCRIPTOR_LEN};

    fn axis(i: usize, scale: f32) -> Descriptor {
        let mut d = [0.0f32; DESCRIPTOR_LEN];
        d[i] = scale;
        d
    }

    #[test]
    fn empty_reference_yields_no_pairs() {
        let query = DescriptorSet::new(vec![axis(0, 1.0)]);
        assert!(match_top_two(&query, &DescriptorSet::default()).is_empty());
    }

    #[test]
    fn single_reference_has_no_second_neighbor() {
        let query = DescriptorSet::new(vec![axis(0, 1.0), axis(1, 1.0)]);
        let reference = DescriptorSet::new(vec![axis(0, 1.0)]);
        let pairs = match_top_two(&query, &reference);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.second.is_none()));
        assert_eq!(pairs[0].nearest.distance, 0.0);
    }

    #[test]
    fn finds_nearest_and_second_by_l2() {
        let query = DescriptorSet::new(vec![axis(0, 1.0)]);
        let reference = DescriptorSet::new(vec![axis(1, 1.0), axis(0, 0.9), axis(0, 3.0)]);
        let pairs = match_top_two(&query, &reference);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].query, 0);
        assert_eq!(pairs[0].nearest.index, 1);
        assert!((pairs[0].nearest.distance - 0.1).abs() < 1e-5);
        let second = pairs[0].second.unwrap();
        assert_eq!(second.index, 0);
        assert!((second.distance - 2.0f32.sqrt()).abs() < 1e-5);
    }
}
