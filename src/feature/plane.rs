//! Floating-point image planes used by the detector and descriptor.
//!
//! Samples are stored as `f32` in `[0, 1]`. All accessors clamp coordinates
//! to the image so that filters and rotated patches never index out of
//! bounds near the borders.

use crate::image::ImageView;

/// Contiguous row-major `f32` plane.
#[derive(Clone, Debug)]
pub struct FloatPlane {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl FloatPlane {
    /// Creates a zero-filled plane.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Converts an 8-bit view into a plane scaled to `[0, 1]`.
    pub fn from_view(view: ImageView<'_, u8>) -> Self {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            if let Some(row) = view.row(y) {
                data.extend(row.iter().map(|&v| f32::from(v) / 255.0));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at `(x, y)`; callers guarantee the coordinate is in bounds.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    /// Value at a signed coordinate, clamped to the nearest edge pixel.
    #[inline]
    pub fn at_clamped(&self, x: isize, y: isize) -> f32 {
        let xx = x.clamp(0, self.width as isize - 1) as usize;
        let yy = y.clamp(0, self.height as isize - 1) as usize;
        self.at(xx, yy)
    }

    /// Bilinear sample at a subpixel location, clamped at the borders.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);

        let x0 = x.floor();
        let y0 = y.floor();
        let dx = x - x0;
        let dy = y - y0;
        let x0i = x0 as usize;
        let y0i = y0 as usize;
        let x1i = (x0i + 1).min(self.width - 1);
        let y1i = (y0i + 1).min(self.height - 1);

        let top = self.at(x0i, y0i) * (1.0 - dx) + self.at(x1i, y0i) * dx;
        let bottom = self.at(x0i, y1i) * (1.0 - dx) + self.at(x1i, y1i) * dx;
        top * (1.0 - dy) + bottom * dy
    }

    /// Separable `[1, 4, 6, 4, 1] / 16` smoothing.
    pub fn blur_binomial(&self) -> Self {
        const TAPS: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

        let mut horizontal = Self::zeros(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = 0.0f32;
                for (k, tap) in TAPS.iter().enumerate() {
                    acc += tap * self.at_clamped(x as isize + k as isize - 2, y as isize);
                }
                horizontal.set(x, y, acc);
            }
        }

        let mut out = Self::zeros(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = 0.0f32;
                for (k, tap) in TAPS.iter().enumerate() {
                    acc += tap * horizontal.at_clamped(x as isize, y as isize + k as isize - 2);
                }
                out.set(x, y, acc);
            }
        }
        out
    }

    /// Sobel derivatives `(gx, gy)`.
    pub fn sobel(&self) -> (Self, Self) {
        let mut gx = Self::zeros(self.width, self.height);
        let mut gy = Self::zeros(self.width, self.height);
        for y in 0..self.height {
            let yi = y as isize;
            for x in 0..self.width {
                let xi = x as isize;
                let p = |dx: isize, dy: isize| self.at_clamped(xi + dx, yi + dy);
                let right = p(1, -1) + 2.0 * p(1, 0) + p(1, 1);
                let left = p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1);
                let below = p(-1, 1) + 2.0 * p(0, 1) + p(1, 1);
                let above = p(-1, -1) + 2.0 * p(0, -1) + p(1, -1);
                gx.set(x, y, right - left);
                gy.set(x, y, below - above);
            }
        }
        (gx, gy)
    }

    /// Harris corner response `det(M) - k * trace(M)^2` over a square window.
    ///
    /// `M` is the structure tensor summed over `(2 * radius + 1)^2` pixels.
    pub fn harris_response(&self, k: f32, radius: usize) -> Self {
        let (gx, gy) = self.sobel();
        let r = radius as isize;
        let mut out = Self::zeros(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let (mut sxx, mut syy, mut sxy) = (0.0f32, 0.0f32, 0.0f32);
                for dy in -r..=r {
                    for dx in -r..=r {
                        let ix = gx.at_clamped(x as isize + dx, y as isize + dy);
                        let iy = gy.at_clamped(x as isize + dx, y as isize + dy);
                        sxx += ix * ix;
                        syy += iy * iy;
                        sxy += ix * iy;
                    }
                }
                let det = sxx * syy - sxy * sxy;
                let trace = sxx + syy;
                out.set(x, y, det - k * trace * trace);
            }
        }
        out
    }
}
