//! Distinctiveness (ratio) test over neighbor pairs.

use crate::matcher::NeighborPair;

/// Ratio threshold used when none is configured.
pub const DEFAULT_RATIO: f32 = 0.7;

/// True when the pair has a second neighbor and the nearest one is clearly
/// closer: `nearest < ratio * second`.
#[inline]
pub fn is_distinctive(pair: &NeighborPair, ratio: f32) -> bool {
    match pair.second {
        Some(second) => pair.nearest.distance < ratio * second.distance,
        None => false,
    }
}

/// Counts the pairs that pass the ratio test.
pub fn count_good_matches(pairs: &[NeighborPair], ratio: f32) -> usize {
    pairs.iter().filter(|pair| is_distinctive(pair, ratio)).count()
}

/// Returns the pairs that pass the ratio test, in input order.
pub fn good_matches(pairs: &[NeighborPair], ratio: f32) -> Vec<NeighborPair> {
    pairs
        .iter()
        .filter(|pair| is_distinctive(pair, ratio))
        .copied()
        .collect()
}
