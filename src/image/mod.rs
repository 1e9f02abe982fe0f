//! Grayscale pixel buffers.
//!
//! `OwnedImage` is the decoded single-channel buffer handed to the pipeline;
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. Both types reject
//! zero-sized images, which is how an empty scene is detected.

use crate::util::{TileMatchError, TileMatchResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod pyramid;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> TileMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> TileMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(TileMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy view of a sub-region of this image.
    ///
    /// Handy for cutting tiles out of a scene when building fixtures.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> TileMatchResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(TileMatchError::InvalidDimensions { width, height });
        }

        let out_of_bounds = TileMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(TileMatchError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(TileMatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

impl ImageView<'_, u8> {
    /// Copies the visible pixels into a contiguous owned image.
    pub fn to_owned_image(&self) -> TileMatchResult<OwnedImage> {
        OwnedImage::from_view(*self)
    }
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> TileMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(TileMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(TileMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(TileMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(TileMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> TileMatchResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            let row = view.row(y).ok_or(TileMatchError::BufferTooSmall {
                needed: (y + 1).saturating_mul(view.stride()),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> TileMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(TileMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(TileMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(TileMatchError::InvalidDimensions { width, height })
}
