use nalgebra::Unit;

use super::*;

/// What a single call to [`Simulation::tick`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Index of the frame that just ran, starting at 0.
    pub frame: u64,
    /// Number of queued edits that changed the scene before the frame ran.
    pub edits_applied: usize,
    /// Whether the beams were re-seeded before the frame ran.
    pub beams_reset: bool,
    /// One outcome per beam, in order.
    pub outcomes: Vec<FrameOutcome>,
}

impl FrameReport {
    /// `true` if no beam moved during this frame.
    #[inline]
    #[must_use]
    pub fn is_still(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| *outcome == FrameOutcome::Idle)
    }
}

/// A scene, the beams going through it, and the settings driving them.
///
/// Changes to the scene are [queued](Self::queue), and only take effect at the
/// start of the next [frame](Self::tick), so a frame always runs against a
/// scene that doesn't change under it.
#[derive(Clone, Debug)]
pub struct Simulation {
    scene: Scene,
    beams: Vec<Beam>,
    config: SimConfig,
    pending: Vec<SceneEdit>,
    frame: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl Simulation {
    /// An empty simulation. Its beams wait for a light source to be placed.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self::with_scene(config, Scene::new())
    }

    /// A simulation over `scene`, with beams seeded from its light source, if any.
    #[must_use]
    pub fn with_scene(config: SimConfig, scene: Scene) -> Self {
        let mut sim = Self {
            scene,
            beams: Vec::new(),
            config: config.validated(),
            pending: Vec::new(),
            frame: 0,
        };
        sim.reset_beams();
        sim
    }

    /// Replaces the seeded beams with `beams`.
    ///
    /// They are kept until the next scene change re-seeds them.
    #[must_use]
    pub fn with_beams(mut self, beams: impl IntoIterator<Item = Beam>) -> Self {
        self.beams = beams.into_iter().collect();
        self
    }

    #[inline]
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    #[must_use]
    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of frames run so far.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Edits waiting for the next frame.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[SceneEdit] {
        &self.pending
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Schedules `edit` to be applied at the start of the next frame.
    #[inline]
    pub fn queue(&mut self, edit: SceneEdit) {
        self.pending.push(edit);
    }

    /// Puts every beam back on the light source, pointing away from it, and
    /// clears their traces.
    ///
    /// Without a light source, beams are taken out of the scene, pointing right.
    /// Beams are spread evenly around the emission direction,
    /// `beam_spread_degrees` apart.
    pub fn reset_beams(&mut self) {
        let count = self.config.beam_count;
        let spread = self.config.beam_spread_degrees;
        let emission = self.scene.emission();

        self.beams
            .resize_with(count, || Beam::unplaced(Vector::x_axis()));

        for (i, beam) in self.beams.iter_mut().enumerate() {
            let offset = (i as Float - (count - 1) as Float / 2.0) * spread;

            match emission {
                Some((origin, dir)) => {
                    beam.reseed(origin, Unit::new_normalize(rotate_vector(&dir, offset)));
                }
                None => beam.unplace(Unit::new_normalize(rotate_vector(&Vector::x_axis(), offset))),
            }
        }

        match emission {
            Some((origin, dir)) => log::debug!(
                "reset {count} beams at {origin} heading ({}, {})",
                dir.x,
                dir.y
            ),
            None => log::debug!("no light source, {count} beams unplaced"),
        }
    }

    /// Applies queued edits, then moves every beam forward by one step.
    pub fn tick(&mut self) -> FrameReport {
        let mut edits_applied = 0;
        for edit in self.pending.drain(..) {
            log::debug!("applying {edit:?}");
            if self.scene.apply(edit) {
                edits_applied += 1;
            }
        }

        let beams_reset = edits_applied > 0;
        if beams_reset {
            self.reset_beams();
        }

        let integrator = Integrator::new(&self.scene, &self.config);
        let outcomes = self
            .beams
            .iter_mut()
            .map(|beam| integrator.step(beam))
            .collect();

        let frame = self.frame;
        self.frame += 1;

        FrameReport {
            frame,
            edits_applied,
            beams_reset,
            outcomes,
        }
    }
}
