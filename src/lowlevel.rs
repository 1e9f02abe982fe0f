//! Building blocks for custom feature pipelines.
//!
//! These expose the per-level stages of [`GradientExtractor`] and the
//! distance kernels behind the matcher. Most users should prefer
//! [`Ranker`] and [`match_top_two`].
//!
//! [`GradientExtractor`]: crate::GradientExtractor
//! [`Ranker`]: crate::Ranker
//! [`match_top_two`]: crate::match_top_two

pub use crate::feature::describe::{describe_at, intensity_centroid_angle};
pub use crate::feature::detect::{local_maxima, suppress_corners, Corner, CornerParams};
pub use crate::feature::plane::FloatPlane;
pub use crate::kernel::scalar::ScalarL2;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::SimdL2;
pub use crate::kernel::{squared_l2, DefaultL2, DistanceKernel};
pub use crate::matcher::{good_matches, is_distinctive};
