use nalgebra::Unit;

use super::*;

/// How a beam responds to reaching an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// Stop on the surface.
    Absorb,
    /// Bounce off the surface and keep going with the rest of the step.
    Reflect,
    /// Bend through the surface.
    Refract,
    /// Carry on as if nothing was there.
    PassThrough,
}

impl From<ElementKind> for Reaction {
    #[inline]
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::LightSource => Self::Absorb,
            ElementKind::Mirror => Self::Reflect,
            ElementKind::ConvexLens | ElementKind::ConcaveLens => Self::Refract,
            // prisms don't bend light yet
            ElementKind::Prism => Self::PassThrough,
        }
    }
}

/// What happened to a beam during one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The beam didn't move.
    Idle,
    /// The beam covered its whole step, after bouncing off mirrors `bounces` times.
    Moved { bounces: usize },
    /// The beam reached a light source and stopped.
    Absorbed { bounces: usize },
    /// The beam crossed the scene's bounds and stopped.
    LeftBounds { bounces: usize },
    /// The beam went through a lens surface and changed direction.
    Refracted { bounces: usize },
    /// The beam was reflected off a lens surface instead of going through.
    TotallyReflected { bounces: usize },
    /// The beam crossed an element it doesn't interact with.
    PassedThrough { bounces: usize },
    /// The beam bounced as many times as allowed in one frame, and stopped
    /// where the last bounce left it.
    BounceLimit,
}

impl FrameOutcome {
    /// `true` if the beam won't move anymore.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Absorbed { .. } | Self::LeftBounds { .. })
    }
}

/// Advances beams through a scene, one frame at a time.
#[derive(Clone, Copy, Debug)]
pub struct Integrator<'a> {
    scene: &'a Scene,
    config: &'a SimConfig,
}

impl<'a> Integrator<'a> {
    #[inline]
    #[must_use]
    pub const fn new(scene: &'a Scene, config: &'a SimConfig) -> Self {
        Self { scene, config }
    }

    /// Moves `beam` forward by one frame.
    ///
    /// Mirror reflections are resolved within the frame, using whatever remains
    /// of the step after each bounce. Reaching a light source or leaving the
    /// bounds ends the beam's travel. Reaching a lens moves the beam by its
    /// whole step, then bends its direction, ending the frame.
    pub fn step(&self, beam: &mut Beam) -> FrameOutcome {
        if !self.config.enabled || beam.is_idle() {
            return FrameOutcome::Idle;
        }

        // fraction of the frame's distance still to cover
        let mut reach = self.config.step_factor;
        let mut bounces = 0;

        loop {
            let Some(&origin) = beam.position() else {
                return FrameOutcome::Idle;
            };

            let step = beam.direction * reach;

            let hit = self
                .scene
                .earliest_hit(&origin, &step)
                .filter(|hit| hit.t <= 1.0);

            let exit = self
                .config
                .bounds
                .as_ref()
                .and_then(|bounds| bounds.exit_time(&origin, &step));

            let hit = match (hit, exit) {
                (Some(hit), Some(exit)) if exit < hit.t => None,
                (hit, _) => hit,
            };

            let Some(hit) = hit else {
                if let Some(exit) = exit {
                    beam.advance(&(step * exit));
                    beam.terminate();
                    log::trace!("beam left the scene at {origin}");
                    return FrameOutcome::LeftBounds { bounces };
                }

                beam.advance(&step);
                return FrameOutcome::Moved { bounces };
            };

            log::trace!(
                "beam at {origin} reaches {} #{} (t = {})",
                hit.kind,
                hit.index,
                hit.t
            );

            match Reaction::from(hit.kind) {
                Reaction::Reflect => {
                    if bounces >= self.config.max_bounces_per_frame {
                        log::warn!(
                            "beam bounced {bounces} times in one frame, holding it at {origin}"
                        );
                        return FrameOutcome::BounceLimit;
                    }

                    let Some(normal) = hit.edge.unit_normal() else {
                        // degenerate edges are never hit
                        beam.advance(&step);
                        return FrameOutcome::Moved { bounces };
                    };

                    beam.advance(&(step * hit.t));
                    beam.direction = Unit::new_normalize(reflect(&beam.direction, &normal)).into_inner();
                    reach -= reach * hit.t;
                    bounces += 1;

                    if reach <= 0.0 {
                        return FrameOutcome::Moved { bounces };
                    }
                }
                Reaction::Absorb => {
                    beam.advance(&(step * hit.t));
                    beam.terminate();
                    return FrameOutcome::Absorbed { bounces };
                }
                Reaction::Refract => {
                    beam.advance(&step);

                    let (Some(normal), Some(dir)) =
                        (hit.edge.unit_normal(), Unit::try_new(beam.direction, 0.0))
                    else {
                        return FrameOutcome::Moved { bounces };
                    };

                    return match refract(&dir, &normal, AMBIENT_INDEX, self.config.lens_index) {
                        Refraction::Transmitted(out) => {
                            beam.direction = out.into_inner();
                            FrameOutcome::Refracted { bounces }
                        }
                        Refraction::TotalInternalReflection(out) => {
                            log::warn!(
                                "no refraction angle at {} #{}, reflecting instead",
                                hit.kind,
                                hit.index
                            );
                            beam.direction = out.into_inner();
                            FrameOutcome::TotallyReflected { bounces }
                        }
                    };
                }
                Reaction::PassThrough => {
                    beam.advance(&step);
                    return FrameOutcome::PassedThrough { bounces };
                }
            }
        }
    }
}
