use nalgebra::Rotation2;

use super::*;

/// Rotates `v` counter-clockwise by `degrees`.
#[inline]
#[must_use]
pub fn rotate_vector(v: &Vector, degrees: Float) -> Vector {
    Rotation2::new(degrees.to_radians()) * v
}

/// Maps a point given in an element's local frame to the scene.
///
/// The point is first rotated about the local origin by `rotation` degrees,
/// then translated by `center`.
#[inline]
#[must_use]
pub fn world_point(local: &Point, center: &Point, rotation: Float) -> Point {
    center + rotate_vector(&local.coords, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quarter_turn_is_counter_clockwise() {
        let p = world_point(&Point::new(1.0, 0.0), &Point::origin(), 90.0);
        assert_relative_eq!(p, Point::new(0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn translation_after_rotation() {
        let p = world_point(&Point::new(5.0, 30.0), &Point::new(100.0, 300.0), 180.0);
        assert_relative_eq!(p, Point::new(95.0, 270.0), epsilon = 1e-9);
    }

    #[test]
    fn rotations_accumulate() {
        let local = Point::new(-5.0, 30.0);
        let center = Point::new(12.0, -7.0);

        for (r1, r2) in [(10.0, 35.0), (45.0, 45.0), (-120.0, 300.0), (359.0, 2.0)] {
            let twice = center + rotate_vector(&rotate_vector(&local.coords, r1), r2);
            let once = world_point(&local, &center, r1 + r2);
            assert_relative_eq!(twice, once, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_rotation_is_translation() {
        let p = world_point(&Point::new(3.0, 4.0), &Point::new(1.0, 1.0), 0.0);
        assert_eq!(p, Point::new(4.0, 5.0));
    }
}
