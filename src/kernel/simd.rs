//! SIMD distance kernel using the `wide` crate.
//!
//! Descriptors are processed 8 lanes at a time with `f32x8`; the descriptor
//! length is a multiple of the lane count so there is no scalar tail.

use crate::feature::{Descriptor, DESCRIPTOR_LEN};
use crate::kernel::DistanceKernel;
use wide::f32x8;

const LANES: usize = 8;
const _: () = assert!(DESCRIPTOR_LEN % LANES == 0);

/// Load 8 f32 values into f32x8.
#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of f32x8.
#[inline]
fn hsum(v: f32x8) -> f32 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3] + arr[4] + arr[5] + arr[6] + arr[7]
}

/// Vectorized squared L2 distance.
pub struct SimdL2;

impl DistanceKernel for SimdL2 {
    #[inline]
    fn squared_distance(a: &Descriptor, b: &Descriptor) -> f32 {
        let mut acc = f32x8::ZERO;
        for (ca, cb) in a.chunks_exact(LANES).zip(b.chunks_exact(LANES)) {
            let d = load_f32x8(ca) - load_f32x8(cb);
            acc = acc + d * d;
        }
        hsum(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::SimdL2;
    use crate::feature::DESCRIPTOR_LEN;
    use crate::kernel::scalar::ScalarL2;
    use crate::kernel::DistanceKernel;

    #[test]
    fn simd_matches_scalar() {
        let mut a = [0.0f32; DESCRIPTOR_LEN];
        let mut b = [0.0f32; DESCRIPTOR_LEN];
        for i in 0..DESCRIPTOR_LEN {
            a[i] = (i as f32 * 0.37).sin();
            b[i] = (i as f32 * 0.11).cos();
        }
        let s = ScalarL2::squared_distance(&a, &b);
        let v = SimdL2::squared_distance(&a, &b);
        assert!((s - v).abs() < 1e-4 * s.max(1.0));
    }
}
