use nalgebra::Unit;

use super::*;

/// A straight side of an element, from `p1` to `p2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub p1: Point,
    pub p2: Point,
}

impl Edge {
    #[inline]
    #[must_use]
    pub fn new(p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Self {
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn vector(&self) -> Vector {
        self.p2 - self.p1
    }

    /// The edge vector, rotated a quarter turn clockwise.
    ///
    /// For edges of a counter-clockwise outline, this points outwards.
    #[inline]
    #[must_use]
    pub fn normal(&self) -> Vector {
        let v = self.vector();
        Vector::new(v.y, -v.x)
    }

    /// The normalized [`Self::normal`], `None` if this edge has zero length.
    #[inline]
    #[must_use]
    pub fn unit_normal(&self) -> Option<Unit<Vector>> {
        Unit::try_new(self.normal(), 0.0)
    }
}

/// The closest edge found by a [`HitCtx`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeHit {
    /// Fraction of the step at which the edge is reached.
    pub t: Float,
    pub edge: Edge,
}

impl EdgeHit {
    /// `true` if the edge is reached before the end of the step.
    #[inline]
    #[must_use]
    pub fn within_step(&self) -> bool {
        self.t <= 1.0
    }
}

/// Keeps track of the earliest edge crossed by a point moving from `origin` by `step`.
///
/// Edges are fed to [`Self::add_edge`], in any order, and the one with the smallest
/// hit time is retained. An edge only counts if it is approached from outside, and
/// if the end of the step projects within the edge's span.
#[derive(Clone, Debug, PartialEq)]
pub struct HitCtx {
    origin: Point,
    step: Vector,
    closest: Option<EdgeHit>,
}

impl HitCtx {
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Point>, step: impl Into<Vector>) -> Self {
        Self {
            origin: origin.into(),
            step: step.into(),
            closest: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> &Point {
        &self.origin
    }

    #[inline]
    #[must_use]
    pub const fn step(&self) -> &Vector {
        &self.step
    }

    /// Returns the fraction of the step at which `edge` is crossed, if it qualifies as a hit.
    #[must_use]
    pub fn hit_time(&self, edge: &Edge) -> Option<Float> {
        let v = edge.vector();
        let len = v.norm();

        if len == 0.0 {
            return None;
        }

        let along = (self.origin + self.step - edge.p1).dot(&v) / len;
        if !(0.0..=len).contains(&along) {
            return None;
        }

        let n = edge.normal();
        let num = n.dot(&(edge.p1 - self.origin));
        if num >= 0.0 {
            return None;
        }

        let den = n.dot(&self.step);
        if den == 0.0 {
            return None;
        }

        let t = num / den;
        (t.is_finite() && t > EPS).then_some(t)
    }

    /// Considers `edge` as a hit candidate.
    ///
    /// Returns `true` if it is now the closest edge. Ties keep the edge added first.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let Some(t) = self.hit_time(&edge) else {
            return false;
        };

        if self.closest.as_ref().map_or(true, |hit| t < hit.t) {
            self.closest = Some(EdgeHit { t, edge });
            true
        } else {
            false
        }
    }

    #[inline]
    #[must_use]
    pub const fn closest(&self) -> Option<&EdgeHit> {
        self.closest.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn into_closest(self) -> Option<EdgeHit> {
        self.closest
    }
}

/// The earliest of `edges` crossed by a point moving from `origin` by `step`, if any.
///
/// The hit time is not bounded above, use [`EdgeHit::within_step`] to check
/// whether the edge is reached during this step.
#[must_use]
pub fn earliest_hit(
    origin: impl Into<Point>,
    step: impl Into<Vector>,
    edges: impl IntoIterator<Item = Edge>,
) -> Option<EdgeHit> {
    let mut ctx = HitCtx::new(origin, step);
    edges.into_iter().for_each(|edge| {
        ctx.add_edge(edge);
    });
    ctx.into_closest()
}
