use nalgebra::Unit;

use super::*;

/// Whether a beam still moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BeamState {
    #[default]
    Traveling,
    /// The beam reached a light source or the scene's bounds, and stays there.
    Terminated,
}

/// A point of light, moving through the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Beam {
    /// `None` until the beam is placed in the scene.
    pub(crate) position: Option<Point>,
    /// Unit length, or zero once terminated.
    pub(crate) direction: Vector,
    pub(crate) trace: Trace,
    pub(crate) state: BeamState,
}

impl Beam {
    /// A beam at `origin`, heading in the direction of `dir`.
    ///
    /// Returns `None` if `dir` is zero.
    #[inline]
    #[must_use]
    pub fn try_new(origin: impl Into<Point>, dir: impl Into<Vector>) -> Option<Self> {
        Unit::try_new(dir.into(), 0.0).map(|dir| Self::new_unit_dir(origin, dir))
    }

    /// # Panics
    ///
    /// if `dir` is zero
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Point>, dir: impl Into<Vector>) -> Self {
        Self::try_new(origin, dir).expect("direction must not be zero")
    }

    #[inline]
    #[must_use]
    pub fn new_unit_dir(origin: impl Into<Point>, dir: Unit<Vector>) -> Self {
        let origin = origin.into();
        Self {
            position: Some(origin),
            direction: dir.into_inner(),
            trace: Trace::seeded(origin),
            state: BeamState::Traveling,
        }
    }

    /// A beam that hasn't been placed yet. It doesn't move until it is [reseeded](Self::reseed).
    #[inline]
    #[must_use]
    pub fn unplaced(dir: Unit<Vector>) -> Self {
        Self {
            position: None,
            direction: dir.into_inner(),
            trace: Trace::new(),
            state: BeamState::Traveling,
        }
    }

    /// Moves this beam to `origin`, heading along `dir`, and restarts its trace there.
    #[inline]
    pub fn reseed(&mut self, origin: impl Into<Point>, dir: Unit<Vector>) {
        let origin = origin.into();
        self.position = Some(origin);
        self.direction = dir.into_inner();
        self.trace.reseed(origin);
        self.state = BeamState::Traveling;
    }

    /// Takes this beam out of the scene, keeping `dir` for when it is placed again.
    #[inline]
    pub fn unplace(&mut self, dir: Unit<Vector>) {
        self.position = None;
        self.direction = dir.into_inner();
        self.trace.clear();
        self.state = BeamState::Traveling;
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Option<&Point> {
        self.position.as_ref()
    }

    /// The distance covered in one frame, per unit of step factor.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> &Vector {
        &self.direction
    }

    #[inline]
    #[must_use]
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> BeamState {
        self.state
    }

    /// `true` if this beam won't move when stepped.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.position.is_none()
            || self.state == BeamState::Terminated
            || self.direction == Vector::zeros()
    }

    /// Moves forward by `step`, recording the new position.
    pub(crate) fn advance(&mut self, step: &Vector) {
        if let Some(p) = self.position.as_mut() {
            *p += step;
            self.trace.push(*p);
        }
    }

    /// Stops this beam for good.
    pub(crate) fn terminate(&mut self) {
        self.direction = Vector::zeros();
        self.state = BeamState::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Beam::try_new([0.0, 0.0], [0.0, 0.0]).is_none());
    }

    #[test]
    fn direction_is_normalized() {
        let beam = Beam::new([1.0, 1.0], [3.0, 4.0]);
        assert_eq!(beam.direction(), &Vector::new(0.6, 0.8));
        assert_eq!(beam.trace().points(), &[Point::new(1.0, 1.0)]);
        assert!(!beam.is_idle());
    }

    #[test]
    fn unplaced_beams_are_idle() {
        let mut beam = Beam::unplaced(Vector::x_axis());
        assert!(beam.is_idle());
        assert!(beam.trace().is_empty());

        beam.reseed([4.0, 2.0], Vector::y_axis());
        assert!(!beam.is_idle());
        assert_eq!(beam.position(), Some(&Point::new(4.0, 2.0)));
        assert_eq!(beam.trace().len(), 1);
    }

    #[test]
    fn terminated_beams_are_idle() {
        let mut beam = Beam::new([0.0, 0.0], [1.0, 0.0]);
        beam.advance(&Vector::new(2.0, 0.0));
        beam.terminate();

        assert!(beam.is_idle());
        assert_eq!(beam.direction(), &Vector::zeros());
        assert_eq!(beam.state(), BeamState::Terminated);
        assert_eq!(beam.trace().points(), &[Point::origin(), Point::new(2.0, 0.0)]);
    }
}
