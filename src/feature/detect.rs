//! Harris corner detection with greedy non-maximum suppression.

use crate::feature::plane::FloatPlane;
use std::cmp::Ordering;

/// Corner candidate in level coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    /// X coordinate (column) at the pyramid level.
    pub x: usize,
    /// Y coordinate (row) at the pyramid level.
    pub y: usize,
    /// Harris response at the corner.
    pub response: f32,
}

fn corner_cmp_desc(a: &Corner, b: &Corner) -> Ordering {
    b.response
        .total_cmp(&a.response)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Thresholds applied to the response map.
#[derive(Clone, Copy, Debug)]
pub struct CornerParams {
    /// Pixels closer than this to any edge are ignored.
    pub border: usize,
    /// Absolute minimum response.
    pub min_response: f32,
    /// Minimum response as a fraction of the strongest response in the map.
    pub relative_threshold: f32,
}

/// Collects strict 3x3 local maxima of `response` that pass the thresholds.
///
/// Output is in raster order.
pub fn local_maxima(response: &FloatPlane, params: CornerParams) -> Vec<Corner> {
    let width = response.width();
    let height = response.height();
    let border = params.border.max(1);
    if width <= 2 * border || height <= 2 * border {
        return Vec::new();
    }

    let peak = response
        .data()
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    let threshold = params.min_response.max(params.relative_threshold * peak);

    let mut corners = Vec::new();
    for y in border..height - border {
        for x in border..width - border {
            let value = response.at(x, y);
            if value <= threshold {
                continue;
            }
            let mut is_max = true;
            'window: for dy in 0..3 {
                for dx in 0..3 {
                    if dx == 1 && dy == 1 {
                        continue;
                    }
                    if response.at(x + dx - 1, y + dy - 1) >= value {
                        is_max = false;
                        break 'window;
                    }
                }
            }
            if is_max {
                corners.push(Corner {
                    x,
                    y,
                    response: value,
                });
            }
        }
    }
    corners
}

/// Greedy suppression using Chebyshev distance.
///
/// Corners are sorted by descending response (ties broken by row, then
/// column) and kept if they are farther than `radius` from all previously
/// kept corners. At most `limit` corners are returned.
pub fn suppress_corners(corners: &mut [Corner], radius: usize, limit: usize) -> Vec<Corner> {
    corners.sort_by(corner_cmp_desc);
    let mut kept: Vec<Corner> = Vec::with_capacity(limit.min(corners.len()));

    'outer: for corner in corners.iter().copied() {
        if kept.len() >= limit {
            break;
        }
        if radius > 0 {
            for other in kept.iter() {
                let dx = corner.x.abs_diff(other.x);
                let dy = corner.y.abs_diff(other.y);
                if dx.max(dy) <= radius {
                    continue 'outer;
                }
            }
        }
        kept.push(corner);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::{local_maxima, suppress_corners, Corner, CornerParams};
    use crate::feature::plane::FloatPlane;
    use crate::image::ImageView;

    const PARAMS: CornerParams = CornerParams {
        border: 1,
        min_response: 0.0,
        relative_threshold: 0.0,
    };

    fn corner(x: usize, y: usize, response: f32) -> Corner {
        Corner { x, y, response }
    }

    #[test]
    fn local_maxima_finds_isolated_peak() {
        let mut data = vec![0u8; 25];
        data[2 * 5 + 2] = 200;
        let plane = FloatPlane::from_view(ImageView::from_slice(&data, 5, 5).unwrap());
        let found = local_maxima(&plane, PARAMS);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].x, found[0].y), (2, 2));
    }

    #[test]
    fn local_maxima_rejects_plateaus() {
        let plane = FloatPlane::from_view(ImageView::from_slice(&[9u8; 25], 5, 5).unwrap());
        assert!(local_maxima(&plane, PARAMS).is_empty());
    }

    #[test]
    fn suppression_keeps_strongest_and_respects_limit() {
        let mut corners = vec![
            corner(10, 10, 1.0),
            corner(11, 10, 2.0),
            corner(30, 30, 0.5),
            corner(50, 50, 0.25),
        ];
        let kept = suppress_corners(&mut corners, 2, 2);
        assert_eq!(kept, vec![corner(11, 10, 2.0), corner(30, 30, 0.5)]);
    }

    #[test]
    fn suppression_breaks_ties_in_raster_order() {
        let mut corners = vec![corner(5, 9, 1.0), corner(7, 3, 1.0), corner(2, 3, 1.0)];
        let kept = suppress_corners(&mut corners, 0, 10);
        assert_eq!(
            kept,
            vec![corner(2, 3, 1.0), corner(7, 3, 1.0), corner(5, 9, 1.0)]
        );
    }
}
