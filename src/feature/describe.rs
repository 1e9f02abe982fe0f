//! Keypoint orientation and gradient-histogram descriptors.
//!
//! A descriptor is built from a 16x16 grid sampled around the keypoint in a
//! frame rotated by the keypoint angle. The grid is split into 4x4 cells and
//! each cell accumulates an 8-bin histogram of gradient orientations weighted
//! by magnitude and a Gaussian window, giving 128 values.

use crate::feature::plane::FloatPlane;
use crate::feature::{Descriptor, DESCRIPTOR_LEN};
use crate::util::math::{gaussian_weight, normalize_l2, wrap_tau};
use std::f32::consts::TAU;

const GRID: usize = 16;
const CELLS: usize = 4;
const BINS: usize = 8;
const CELL_SIZE: usize = GRID / CELLS;
/// Sampled side including the one-sample ring used for central differences.
const PADDED: usize = GRID + 2;
const WINDOW_SIGMA: f32 = GRID as f32 / 2.0;
/// Histogram entries are clipped here before renormalizing.
const CLIP: f32 = 0.2;
/// Gradients below this are interpolation noise, not structure.
const MIN_ENERGY: f32 = 1e-6;

/// Intensity-centroid orientation (radians) over a disc of `radius`.
pub fn intensity_centroid_angle(plane: &FloatPlane, x: usize, y: usize, radius: usize) -> f32 {
    let r = radius as isize;
    let r_sq = r * r;
    let (cx, cy) = (x as isize, y as isize);
    let mut m10 = 0.0f32;
    let mut m01 = 0.0f32;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r_sq {
                continue;
            }
            let value = plane.at_clamped(cx + dx, cy + dy);
            m10 += dx as f32 * value;
            m01 += dy as f32 * value;
        }
    }
    m01.atan2(m10)
}

/// Computes the descriptor for a keypoint at `(x, y)` with orientation `angle`.
///
/// Returns `None` when the rotated patch carries no gradient energy.
pub fn describe_at(plane: &FloatPlane, x: f32, y: f32, angle: f32) -> Option<Descriptor> {
    let (s, c) = angle.sin_cos();
    let half = (PADDED as f32 - 1.0) / 2.0;

    let mut samples = [[0.0f32; PADDED]; PADDED];
    for (i, row) in samples.iter_mut().enumerate() {
        let v = i as f32 - half;
        for (j, sample) in row.iter_mut().enumerate() {
            let u = j as f32 - half;
            let px = x + c * u - s * v;
            let py = y + s * u + c * v;
            *sample = plane.sample_bilinear(px, py);
        }
    }

    let mut desc = [0.0f32; DESCRIPTOR_LEN];
    for i in 1..=GRID {
        let v = i as f32 - half;
        let cell_y = (i - 1) / CELL_SIZE;
        for j in 1..=GRID {
            let u = j as f32 - half;
            let cell_x = (j - 1) / CELL_SIZE;

            let gx = 0.5 * (samples[i][j + 1] - samples[i][j - 1]);
            let gy = 0.5 * (samples[i + 1][j] - samples[i - 1][j]);
            let magnitude = (gx * gx + gy * gy).sqrt();
            if magnitude < MIN_ENERGY {
                continue;
            }
            let weight = magnitude * gaussian_weight(u * u + v * v, WINDOW_SIGMA);

            let bin_pos = wrap_tau(gy.atan2(gx)) / TAU * BINS as f32;
            let bin_lo = (bin_pos.floor() as usize) % BINS;
            let bin_hi = (bin_lo + 1) % BINS;
            let frac = bin_pos - bin_pos.floor();

            let base = (cell_y * CELLS + cell_x) * BINS;
            desc[base + bin_lo] += weight * (1.0 - frac);
            desc[base + bin_hi] += weight * frac;
        }
    }

    if normalize_l2(&mut desc) <= MIN_ENERGY {
        return None;
    }
    for value in desc.iter_mut() {
        *value = value.min(CLIP);
    }
    normalize_l2(&mut desc);
    Some(desc)
}
