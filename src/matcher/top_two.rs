//! Two-nearest-neighbor tracking.

/// Reference descriptor found near a query descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Index into the reference set.
    pub index: usize,
    /// Euclidean distance to the query descriptor.
    pub distance: f32,
}

/// Keeps the two smallest squared distances seen so far.
///
/// Candidates must be pushed in ascending index order; an equal distance
/// never displaces an earlier entry, so ties resolve to the lower index.
#[derive(Debug, Default)]
pub(crate) struct TopTwo {
    best: Option<(usize, f32)>,
    second: Option<(usize, f32)>,
}

impl TopTwo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Offers a reference index with its squared distance.
    pub(crate) fn push(&mut self, index: usize, dist_sq: f32) {
        match self.best {
            Some((_, best)) if dist_sq >= best => match self.second {
                Some((_, second)) if dist_sq >= second => {}
                _ => self.second = Some((index, dist_sq)),
            },
            _ => {
                self.second = self.best;
                self.best = Some((index, dist_sq));
            }
        }
    }

    /// Returns `(nearest, second)` with distances converted to L2.
    pub(crate) fn finish(self) -> Option<(Neighbor, Option<Neighbor>)> {
        let to_neighbor = |(index, dist_sq): (usize, f32)| Neighbor {
            index,
            distance: dist_sq.sqrt(),
        };
        let nearest = self.best.map(to_neighbor)?;
        Some((nearest, self.second.map(to_neighbor)))
    }
}

#[cfg(test)]
mod tests {
    use super::TopTwo;

    #[test]
    fn keeps_two_smallest_in_order() {
        let mut top = TopTwo::new();
        for (idx, d) in [9.0f32, 4.0, 16.0, 1.0, 25.0].iter().enumerate() {
            top.push(idx, *d);
        }
        let (nearest, second) = top.finish().unwrap();
        assert_eq!(nearest.index, 3);
        assert!((nearest.distance - 1.0).abs() < 1e-6);
        let second = second.unwrap();
        assert_eq!(second.index, 1);
        assert!((second.distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn ties_keep_lower_index() {
        let mut top = TopTwo::new();
        top.push(0, 4.0);
        top.push(1, 4.0);
        top.push(2, 4.0);
        let (nearest, second) = top.finish().unwrap();
        assert_eq!(nearest.index, 0);
        assert_eq!(second.unwrap().index, 1);
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(TopTwo::new().finish().is_none());

        let mut top = TopTwo::new();
        top.push(7, 0.0);
        let (nearest, second) = top.finish().unwrap();
        assert_eq!(nearest.index, 7);
        assert!(second.is_none());
    }
}
