use super::*;

/// The points a beam went through, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    points: Vec<Point>,
}

impl Trace {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A trace containing only `seed`.
    #[inline]
    #[must_use]
    pub fn seeded(seed: impl Into<Point>) -> Self {
        Self {
            points: vec![seed.into()],
        }
    }

    /// Forgets every point, and starts over from `seed`.
    #[inline]
    pub fn reseed(&mut self, seed: impl Into<Point>) {
        self.points.clear();
        self.points.push(seed.into());
    }

    #[inline]
    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[inline]
    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for Trace {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// Checks if adding `pt` to `path` makes it retrace one of its own segments.
///
/// Returns the index of the first point of the segment that is travelled again,
/// comparing points with a tolerance of `e`.
#[inline]
#[must_use]
pub fn loop_index(path: &[Point], pt: &Point, e: Float) -> Option<usize> {
    path.split_last().and_then(|(last_pt, points)| {
        points.windows(2).enumerate().find_map(|(i, window)| {
            let [this_pt, next_pt] = window else {
                // because window.len() is always 2
                unreachable!()
            };
            ((last_pt - this_pt).norm() <= e && (pt - next_pt).norm() <= e).then_some(i)
        })
    })
}
