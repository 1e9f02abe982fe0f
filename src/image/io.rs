//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Every decoded image is
//! converted to 8-bit luma, matching what the extractor consumes.

use crate::image::{ImageView, OwnedImage};
use crate::util::{TileMatchError, TileMatchResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> TileMatchResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> TileMatchResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> TileMatchResult<OwnedImage> {
    owned_from_gray_image(&img.to_luma8())
}

/// Loads an image from disk and converts it to a grayscale owned image.
///
/// Files that cannot be opened, are not a supported format, or decode to a
/// zero-sized image all produce an error.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> TileMatchResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| TileMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}
