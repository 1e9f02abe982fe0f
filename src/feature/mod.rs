//! Keypoint detection and descriptor extraction.
//!
//! [`FeatureExtractor`] is the seam the ranker depends on. The default
//! implementation, [`GradientExtractor`], detects Harris corners on every
//! level of a box-filter pyramid, orients them by intensity centroid and
//! describes them with 128-bin gradient histograms. Extraction is
//! deterministic for a fixed image and configuration.

pub mod describe;
pub mod detect;
pub mod plane;

use crate::image::pyramid::ImagePyramid;
use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};
use crate::util::{TileMatchError, TileMatchResult};
use describe::{describe_at, intensity_centroid_angle};
use detect::{local_maxima, suppress_corners, CornerParams};
use plane::FloatPlane;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Number of values in a descriptor.
pub const DESCRIPTOR_LEN: usize = 128;

/// Fixed-length, L2-normalized local appearance vector.
pub type Descriptor = [f32; DESCRIPTOR_LEN];

/// Half-width of the structure tensor window used for Harris responses.
const HARRIS_WINDOW_RADIUS: usize = 2;

/// Detected feature location in base-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Pyramid scale factor (`2^level`).
    pub scale: f32,
    /// Orientation in radians.
    pub angle: f32,
    pub response: f32,
}

/// Ordered descriptors belonging to one image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescriptorSet {
    descriptors: Vec<Descriptor>,
}

impl DescriptorSet {
    pub fn new(descriptors: Vec<Descriptor>) -> Self {
        Self { descriptors }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn as_slice(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor> {
        self.descriptors.iter()
    }

    pub fn into_vec(self) -> Vec<Descriptor> {
        self.descriptors
    }
}

impl From<Vec<Descriptor>> for DescriptorSet {
    fn from(descriptors: Vec<Descriptor>) -> Self {
        Self::new(descriptors)
    }
}

impl FromIterator<Descriptor> for DescriptorSet {
    fn from_iter<I: IntoIterator<Item = Descriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Produces the descriptor set for a grayscale image.
///
/// Implementations must be deterministic. An image without usable texture
/// yields an empty set rather than an error; errors are reserved for inputs
/// the implementation cannot process at all.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, image: ImageView<'_, u8>) -> TileMatchResult<DescriptorSet>;
}

/// Configuration for [`GradientExtractor`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfig {
    /// Maximum pyramid levels, including the base image.
    pub octaves: usize,
    /// Pixels closer than this to a level's edge never become keypoints.
    pub border: usize,
    /// Harris sensitivity `k`.
    pub harris_k: f32,
    /// Absolute response floor.
    pub min_response: f32,
    /// Response floor relative to the strongest corner of the level.
    pub relative_threshold: f32,
    /// Chebyshev radius for corner suppression.
    pub nms_radius: usize,
    /// Cap on keypoints kept per pyramid level.
    pub max_features_per_level: usize,
    /// Disc radius for the intensity-centroid orientation.
    pub orientation_radius: usize,
    /// Process pyramid levels in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            border: 8,
            harris_k: 0.04,
            min_response: 1e-4,
            relative_threshold: 0.01,
            nms_radius: 2,
            max_features_per_level: 500,
            orientation_radius: 7,
            parallel: false,
        }
    }
}

impl ExtractConfig {
    /// Checks that every parameter is in range.
    pub fn validate(&self) -> TileMatchResult<()> {
        if self.octaves == 0 {
            return Err(TileMatchError::InvalidConfig("octaves must be at least 1"));
        }
        if self.border == 0 {
            return Err(TileMatchError::InvalidConfig("border must be at least 1"));
        }
        if !(self.harris_k > 0.0 && self.harris_k < 0.25) {
            return Err(TileMatchError::InvalidConfig("harris_k must be in (0, 0.25)"));
        }
        if self.min_response.is_nan() || self.min_response < 0.0 {
            return Err(TileMatchError::InvalidConfig("min_response must be non-negative"));
        }
        if !(0.0..1.0).contains(&self.relative_threshold) {
            return Err(TileMatchError::InvalidConfig(
                "relative_threshold must be in [0, 1)",
            ));
        }
        if self.max_features_per_level == 0 {
            return Err(TileMatchError::InvalidConfig(
                "max_features_per_level must be at least 1",
            ));
        }
        if self.orientation_radius == 0 {
            return Err(TileMatchError::InvalidConfig(
                "orientation_radius must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Harris + gradient-histogram extractor.
#[derive(Clone, Debug, Default)]
pub struct GradientExtractor {
    cfg: ExtractConfig,
}

impl GradientExtractor {
    pub fn new(cfg: ExtractConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.cfg
    }

    /// Detects keypoints and computes their descriptors in one pass.
    ///
    /// Keypoints whose patch has no gradient energy are dropped, so both
    /// vectors always have the same length.
    pub fn detect_and_describe(
        &self,
        image: ImageView<'_, u8>,
    ) -> TileMatchResult<(Vec<Keypoint>, Vec<Descriptor>)> {
        let _span = trace_span!(
            "extract",
            width = image.width(),
            height = image.height()
        )
        .entered();

        let min_side = 2 * self.cfg.border + 1;
        let pyramid = ImagePyramid::build_u8(image, self.cfg.octaves, min_side)?;
        let levels: Vec<(usize, ImageView<'_, u8>)> = pyramid
            .levels()
            .iter()
            .map(|level| level.view())
            .enumerate()
            .collect();

        #[cfg(feature = "rayon")]
        let per_level: Vec<Vec<(Keypoint, Descriptor)>> = if self.cfg.parallel {
            levels
                .par_iter()
                .map(|&(idx, view)| self.extract_level(view, idx))
                .collect()
        } else {
            levels
                .iter()
                .map(|&(idx, view)| self.extract_level(view, idx))
                .collect()
        };
        #[cfg(not(feature = "rayon"))]
        let per_level: Vec<Vec<(Keypoint, Descriptor)>> = levels
            .iter()
            .map(|&(idx, view)| self.extract_level(view, idx))
            .collect();

        let mut keypoints = Vec::new();
        let mut descriptors = Vec::new();
        for (kp, desc) in per_level.into_iter().flatten() {
            keypoints.push(kp);
            descriptors.push(desc);
        }

        trace_event!(
            "extract_done",
            levels = pyramid.len(),
            keypoints = keypoints.len()
        );
        Ok((keypoints, descriptors))
    }

    fn extract_level(&self, view: ImageView<'_, u8>, level: usize) -> Vec<(Keypoint, Descriptor)> {
        let smoothed = FloatPlane::from_view(view).blur_binomial();
        let response = smoothed.harris_response(self.cfg.harris_k, HARRIS_WINDOW_RADIUS);
        let mut corners = local_maxima(
            &response,
            CornerParams {
                border: self.cfg.border,
                min_response: self.cfg.min_response,
                relative_threshold: self.cfg.relative_threshold,
            },
        );
        let kept = suppress_corners(
            &mut corners,
            self.cfg.nms_radius,
            self.cfg.max_features_per_level,
        );

        let scale = (1usize << level) as f32;
        kept.into_iter()
            .filter_map(|corner| {
                let angle =
                    intensity_centroid_angle(&smoothed, corner.x, corner.y, self.cfg.orientation_radius);
                let desc = describe_at(&smoothed, corner.x as f32, corner.y as f32, angle)?;
                let keypoint = Keypoint {
                    x: (corner.x as f32 + 0.5) * scale - 0.5,
                    y: (corner.y as f32 + 0.5) * scale - 0.5,
                    scale,
                    angle,
                    response: corner.response,
                };
                Some((keypoint, desc))
            })
            .collect()
    }
}

impl FeatureExtractor for GradientExtractor {
    fn extract(&self, image: ImageView<'_, u8>) -> TileMatchResult<DescriptorSet> {
        let (_, descriptors) = self.detect_and_describe(image)?;
        Ok(DescriptorSet::new(descriptors))
    }
}
