//! tilematch recognizes which reference tile appears in a scene image.
//!
//! Every image goes through the same local-feature pipeline: Harris corners
//! on a box-filter pyramid, intensity-centroid orientation and 128-value
//! gradient-histogram descriptors. Each candidate tile is matched against
//! the scene with exact two-nearest-neighbor search, matches are kept only
//! when they pass the ratio test, and the tile with the most good matches
//! wins. Optional features add parallelism (`rayon`), a SIMD distance kernel
//! (`simd`), image decoding plus a directory source (`image-io`) and
//! `tracing` instrumentation.

pub mod diag;
pub mod feature;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod matcher;
pub mod rank;
#[cfg(feature = "image-io")]
pub mod source;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::pyramid::ImagePyramid;
pub use crate::image::{ImageView, OwnedImage};
pub use util::{TileMatchError, TileMatchResult};

pub use diag::{Diagnostic, DiagnosticSink, Level, NullSink, RecordingSink, SkipReason};
pub use feature::{
    Descriptor, DescriptorSet, ExtractConfig, FeatureExtractor, GradientExtractor, Keypoint,
    DESCRIPTOR_LEN,
};
#[cfg(feature = "rayon")]
pub use matcher::match_top_two_par;
pub use matcher::{count_good_matches, match_top_two, Neighbor, NeighborPair, DEFAULT_RATIO};
pub use rank::{
    Candidate, MatchOutcome, RankConfig, RankReport, Ranker, INVALID_SCENE, NOT_FOUND,
};
#[cfg(feature = "image-io")]
pub use source::{find_best_tile, TileDirectory};
