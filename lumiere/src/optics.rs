use nalgebra::Unit;

use super::*;

/// Refractive index of the medium beams travel through between elements.
pub const AMBIENT_INDEX: Float = 1.0;

/// Reflects `v` with respect to the line whose normal is `normal`.
///
/// Orthogonal symmetries preserve norms, so `v`'s length is unchanged.
#[inline]
#[must_use]
pub fn reflect(v: &Vector, normal: &Unit<Vector>) -> Vector {
    let n = normal.as_ref();
    v - n * (2.0 * v.dot(n))
}

/// The angle (in radians, in `[0, pi/2]`) between `dir` and the line carried by `normal`.
#[inline]
#[must_use]
pub fn incidence_angle(dir: &Unit<Vector>, normal: &Unit<Vector>) -> Float {
    dir.dot(normal.as_ref()).abs().min(1.0).acos()
}

/// The outcome of a beam reaching the boundary between two media.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Refraction {
    /// The beam crosses the boundary, in this new direction.
    Transmitted(Unit<Vector>),
    /// The refraction angle doesn't exist, the beam is reflected instead.
    TotalInternalReflection(Unit<Vector>),
}

impl Refraction {
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> &Unit<Vector> {
        match self {
            Self::Transmitted(dir) | Self::TotalInternalReflection(dir) => dir,
        }
    }
}

/// Applies Snell's law to a beam moving along `dir`, leaving a medium of index `n1`
/// for one of index `n2` through a boundary whose normal is `normal`.
///
/// `normal` may point to either side of the boundary.
#[must_use]
pub fn refract(dir: &Unit<Vector>, normal: &Unit<Vector>, n1: Float, n2: Float) -> Refraction {
    // orient the normal against the incoming beam
    let (n, cos_i) = {
        let c = dir.dot(normal.as_ref());
        if c > 0.0 {
            (-normal.into_inner(), c)
        } else {
            (normal.into_inner(), -c)
        }
    };

    let eta = n1 / n2;
    let sin_t_sq = eta * eta * (1.0 - cos_i * cos_i);

    if sin_t_sq > 1.0 {
        let reflected = reflect(dir.as_ref(), normal);
        return Refraction::TotalInternalReflection(Unit::new_normalize(reflected));
    }

    let cos_t = (1.0 - sin_t_sq).sqrt();
    let transmitted = dir.as_ref() * eta + n * (eta * cos_i - cos_t);

    Refraction::Transmitted(Unit::new_normalize(transmitted))
}
