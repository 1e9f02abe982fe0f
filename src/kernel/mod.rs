//! Descriptor distance kernels.
//!
//! Matching only ever needs squared Euclidean distances between two
//! [`Descriptor`]s; the square root is taken once per reported neighbor.
//! The scalar kernel is the reference; the `simd` feature swaps in a `wide`
//! implementation for the default kernel.

use crate::feature::Descriptor;

/// Kernel trait for descriptor distances.
pub trait DistanceKernel {
    /// Squared L2 distance between two descriptors.
    fn squared_distance(a: &Descriptor, b: &Descriptor) -> f32;
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(not(feature = "simd"))]
pub use scalar::ScalarL2 as DefaultL2;
#[cfg(feature = "simd")]
pub use simd::SimdL2 as DefaultL2;

/// Squared L2 distance using the default kernel for this build.
#[inline]
pub fn squared_l2(a: &Descriptor, b: &Descriptor) -> f32 {
    <DefaultL2 as DistanceKernel>::squared_distance(a, b)
}
