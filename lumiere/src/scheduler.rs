use core::cell::Cell;
use std::time::{Duration, Instant};

use super::*;

/// A monotonic source of time.
pub trait Clock {
    /// Time elapsed since some fixed instant.
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall clock time, measured from the clock's creation.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Runs frames of a [`Simulation`] at a fixed rate, as time goes by on a [`Clock`].
#[derive(Clone, Debug)]
pub struct Scheduler<C> {
    clock: C,
    frame_duration: Duration,
    /// Time at which the last counted frame was due.
    last: Duration,
    max_catch_up: u32,
}

impl<C: Clock> Scheduler<C> {
    /// Frames running late by more than this many are dropped, by default.
    pub const DEFAULT_MAX_CATCH_UP: u32 = 4;

    #[must_use]
    pub fn new(clock: C, frames_per_second: u32) -> Self {
        let frame_duration =
            (Duration::from_secs(1) / frames_per_second.max(1)).max(Duration::from_nanos(1));
        let last = clock.now();

        Self {
            clock,
            frame_duration,
            last,
            max_catch_up: Self::DEFAULT_MAX_CATCH_UP,
        }
    }

    /// Sets the most frames a single poll will ever ask for.
    #[inline]
    #[must_use]
    pub fn with_max_catch_up(mut self, frames: u32) -> Self {
        self.max_catch_up = frames.max(1);
        self
    }

    #[inline]
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    #[must_use]
    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Number of frames that became due since the last call.
    ///
    /// If more than the catch up limit are due, the extra ones are dropped.
    pub fn due_frames(&mut self) -> u32 {
        let now = self.clock.now();
        let due = now.saturating_sub(self.last).as_nanos() / self.frame_duration.as_nanos();

        match u32::try_from(due) {
            Ok(due) if due <= self.max_catch_up => {
                self.last += self.frame_duration * due;
                due
            }
            _ => {
                log::debug!(
                    "{due} frames due, running {} and dropping the rest",
                    self.max_catch_up
                );
                self.last = now;
                self.max_catch_up
            }
        }
    }

    /// Runs every frame of `sim` that is due, returning how many ran.
    pub fn pump(&mut self, sim: &mut Simulation) -> u32 {
        let due = self.due_frames();
        for _ in 0..due {
            sim.tick();
        }
        due
    }
}
