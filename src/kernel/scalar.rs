//! Scalar reference kernel.

use crate::feature::Descriptor;
use crate::kernel::DistanceKernel;

/// Plain loop over all descriptor lanes.
pub struct ScalarL2;

impl DistanceKernel for ScalarL2 {
    #[inline]
    fn squared_distance(a: &Descriptor, b: &Descriptor) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarL2;
    use crate::feature::DESCRIPTOR_LEN;
    use crate::kernel::DistanceKernel;

    #[test]
    fn squared_distance_matches_hand_computation() {
        let mut a = [0.0f32; DESCRIPTOR_LEN];
        let mut b = [0.0f32; DESCRIPTOR_LEN];
        a[0] = 3.0;
        b[127] = 4.0;
        assert!((ScalarL2::squared_distance(&a, &b) - 25.0).abs() < 1e-6);
        assert_eq!(ScalarL2::squared_distance(&a, &a), 0.0);
    }
}
