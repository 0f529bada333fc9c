use super::*;

/// Number of points sampled along each lens face, at `t = 0, 0.1, ..., 1`.
pub const CURVE_SAMPLES: usize = 11;

/// A polyline approximation of a quadratic Bezier curve.
pub type Curve = [Point; CURVE_SAMPLES];

/// Evaluates the quadratic Bezier curve from `start` to `end`, pulled towards `ctrl`, at `t`.
#[inline]
#[must_use]
pub fn quadratic_bezier(start: &Point, ctrl: &Point, end: &Point, t: Float) -> Point {
    let s = 1.0 - t;
    Point::from(start.coords * (s * s) + ctrl.coords * (2.0 * t * s) + end.coords * (t * t))
}

/// Samples the quadratic Bezier curve from `start` to `end` at [`CURVE_SAMPLES`]
/// evenly spaced parameters.
///
/// The first and last samples are exactly `start` and `end`.
#[must_use]
pub fn sample_quadratic(start: &Point, ctrl: &Point, end: &Point) -> Curve {
    let last = (CURVE_SAMPLES - 1) as Float;
    core::array::from_fn(|i| quadratic_bezier(start, ctrl, end, i as Float / last))
}

/// The two curved faces of a lens, in the lens' local frame.
///
/// The right face runs from the bottom right corner to the top right one, the left
/// face from the top left corner to the bottom left one, so that walking
/// `bl -> br -> right -> tr -> tl -> left` traces the outline counter-clockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct LensFaces {
    pub left: Curve,
    pub right: Curve,
}

impl LensFaces {
    /// Faces bulging outwards, each pulled towards its own control point.
    #[must_use]
    pub fn convex(corners: &[Point; 4], left_ctrl: &Point, right_ctrl: &Point) -> Self {
        let [bl, br, tr, tl] = corners;
        Self {
            left: sample_quadratic(tl, left_ctrl, bl),
            right: sample_quadratic(br, right_ctrl, tr),
        }
    }

    /// Faces curving inwards, both pulled towards `center`.
    #[must_use]
    pub fn concave(corners: &[Point; 4], center: &Point) -> Self {
        let [bl, br, tr, tl] = corners;
        Self {
            left: sample_quadratic(tl, center, bl),
            right: sample_quadratic(br, center, tr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corners(hw: Float, hh: Float) -> [Point; 4] {
        [
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ]
    }

    #[test]
    fn convex_faces_start_and_end_on_corners() {
        let c = corners(5.0, 30.0);
        let faces = LensFaces::convex(&c, &Point::new(-15.0, 0.0), &Point::new(15.0, 0.0));

        assert_eq!(faces.right[0], c[1]);
        assert_eq!(faces.right[CURVE_SAMPLES - 1], c[2]);
        assert_eq!(faces.left[0], c[3]);
        assert_eq!(faces.left[CURVE_SAMPLES - 1], c[0]);
    }

    #[test]
    fn concave_faces_start_and_end_on_corners() {
        let c = corners(10.0, 30.0);
        let faces = LensFaces::concave(&c, &Point::origin());

        assert_eq!(faces.right[0], c[1]);
        assert_eq!(faces.right[CURVE_SAMPLES - 1], c[2]);
        assert_eq!(faces.left[0], c[3]);
        assert_eq!(faces.left[CURVE_SAMPLES - 1], c[0]);
    }

    #[test]
    fn convex_bulges_out_and_concave_caves_in() {
        let convex = LensFaces::convex(
            &corners(5.0, 30.0),
            &Point::new(-15.0, 0.0),
            &Point::new(15.0, 0.0),
        );
        // midpoint of a quadratic is halfway between the chord midpoint and the control point
        assert_relative_eq!(convex.right[5], Point::new(10.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(convex.left[5], Point::new(-10.0, 0.0), epsilon = 1e-12);

        let concave = LensFaces::concave(&corners(10.0, 30.0), &Point::origin());
        assert_relative_eq!(concave.right[5], Point::new(5.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(concave.left[5], Point::new(-5.0, 0.0), epsilon = 1e-12);
    }
}
