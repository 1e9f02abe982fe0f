//! Image pyramid construction for grayscale `u8` images.
//!
//! Downsampling uses a 2x2 box filter with integer rounding:
//! `dst = ((a + b + c + d) + 2) / 4`. Level `i` has scale `2^i` relative to
//! the base image, which is what the extractor uses to map keypoints back.

use crate::image::{ImageView, OwnedImage};
use crate::util::{TileMatchError, TileMatchResult};

/// Owned image pyramid built from a base level.
#[derive(Debug)]
pub struct ImagePyramid {
    levels: Vec<OwnedImage>,
}

impl ImagePyramid {
    /// Builds a pyramid from a base grayscale view.
    ///
    /// `max_levels` is clamped to at least 1 so the base level is always
    /// present. Downsampling stops early once the next level would be smaller
    /// than `min_side` pixels in either dimension.
    pub fn build_u8(
        base: ImageView<'_, u8>,
        max_levels: usize,
        min_side: usize,
    ) -> TileMatchResult<Self> {
        let max_levels = max_levels.max(1);
        let mut levels = vec![OwnedImage::from_view(base)?];

        while levels.len() < max_levels {
            let Some(prev) = levels.last() else {
                break;
            };
            let src = prev.view();
            let dst_width = src.width() / 2;
            let dst_height = src.height() / 2;
            if dst_width == 0 || dst_height == 0 || dst_width < min_side || dst_height < min_side
            {
                break;
            }

            let mut dst = vec![0u8; dst_width * dst_height];
            for y in 0..dst_height {
                let (Some(row0), Some(row1)) = (src.row(y * 2), src.row(y * 2 + 1)) else {
                    return Err(TileMatchError::BufferTooSmall {
                        needed: (y * 2 + 2).saturating_mul(src.stride()),
                        got: src.as_slice().len(),
                    });
                };
                let out = &mut dst[y * dst_width..(y + 1) * dst_width];
                for (x, px) in out.iter_mut().enumerate() {
                    let sum = u16::from(row0[2 * x])
                        + u16::from(row0[2 * x + 1])
                        + u16::from(row1[2 * x])
                        + u16::from(row1[2 * x + 1]);
                    *px = ((sum + 2) / 4) as u8;
                }
            }

            levels.push(OwnedImage::new(dst, dst_width, dst_height)?);
        }

        Ok(Self { levels })
    }

    /// Returns all pyramid levels (level 0 is the base resolution).
    pub fn levels(&self) -> &[OwnedImage] {
        &self.levels
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|level| level.view())
    }

    /// Returns the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; a pyramid holds at least its base level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
