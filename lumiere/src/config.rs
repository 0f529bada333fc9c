use super::*;

/// An axis-aligned rectangle enclosing the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Returns `None` if `min` isn't strictly below and left of `max`.
    #[inline]
    #[must_use]
    pub fn try_new(min: impl Into<Point>, max: impl Into<Point>) -> Option<Self> {
        let (min, max) = (min.into(), max.into());
        (min.x < max.x && min.y < max.y).then_some(Self { min, max })
    }

    /// # Panics
    ///
    /// if `min` isn't strictly below and left of `max`
    #[inline]
    #[must_use]
    pub fn new(min: impl Into<Point>, max: impl Into<Point>) -> Self {
        Self::try_new(min, max).expect("bounds must have a positive area")
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// The fraction of `step` after which a point starting at `origin` leaves these bounds,
    /// if it does so before the end of the step.
    ///
    /// Points already outside leave immediately (`Some(0.0)`).
    #[must_use]
    pub fn exit_time(&self, origin: &Point, step: &Vector) -> Option<Float> {
        if !self.contains(origin) {
            return Some(0.0);
        }

        let axis = |p: Float, s: Float, lo: Float, hi: Float| {
            if s > 0.0 {
                (hi - p) / s
            } else if s < 0.0 {
                (lo - p) / s
            } else {
                Float::INFINITY
            }
        };

        let t = axis(origin.x, step.x, self.min.x, self.max.x)
            .min(axis(origin.y, step.y, self.min.y, self.max.y));

        (t <= 1.0).then_some(t)
    }
}

/// Tunables of a [`Simulation`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Rate at which a [`Scheduler`] advances the simulation.
    pub frames_per_second: u32,
    /// Distance a beam travels in one frame.
    pub step_factor: Float,
    /// Refractive index of lens material.
    pub lens_index: Float,
    /// Number of beams emitted by the light source.
    pub beam_count: usize,
    /// Angle, in degrees, between consecutive emitted beams.
    pub beam_spread_degrees: Float,
    /// Maximum number of mirror reflections a beam may undergo in one frame.
    pub max_bounces_per_frame: usize,
    /// Beams leaving these bounds stop where they cross them.
    pub bounds: Option<Bounds>,
    /// When `false`, frames go by without beams moving.
    pub enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            step_factor: 128.0,
            lens_index: 1.5,
            beam_count: 2,
            beam_spread_degrees: 0.0,
            max_bounces_per_frame: 32,
            bounds: None,
            enabled: true,
        }
    }
}

impl SimConfig {
    /// Replaces unusable values with their defaults.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let default = Self::default();

        if self.frames_per_second == 0 {
            log::warn!("frames_per_second must be positive, using {}", default.frames_per_second);
            self.frames_per_second = default.frames_per_second;
        }

        if !(self.step_factor.is_finite() && self.step_factor > 0.0) {
            log::warn!(
                "invalid step_factor {}, using {}",
                self.step_factor,
                default.step_factor
            );
            self.step_factor = default.step_factor;
        }

        if !(self.lens_index.is_finite() && self.lens_index > 0.0) {
            log::warn!(
                "invalid lens_index {}, using {}",
                self.lens_index,
                default.lens_index
            );
            self.lens_index = default.lens_index;
        }

        if self.beam_count == 0 {
            log::warn!("beam_count must be positive, using 1");
            self.beam_count = 1;
        }

        if !self.beam_spread_degrees.is_finite() {
            log::warn!("invalid beam_spread_degrees, using 0");
            self.beam_spread_degrees = 0.0;
        }

        if self.max_bounces_per_frame == 0 {
            log::warn!("max_bounces_per_frame must be positive, using 1");
            self.max_bounces_per_frame = 1;
        }

        self
    }
}
