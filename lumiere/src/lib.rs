//! Stepwise light beam simulation through a 2D scene of rotatable optical elements.
//!
//! Every frame, each [`Beam`] is advanced by a fixed step. If that step crosses
//! the surface of an [`OpticalElement`], the beam reacts according to the kind of
//! element it struck: it bounces off mirrors, bends through lenses, and stops on
//! the light source that emitted it.

pub use either;
pub use nalgebra;

use nalgebra::{Point2, Vector2};

mod beam;
mod config;
mod curve;
mod element;
mod intersect;
mod optics;
mod scene;
mod scheduler;
mod sim;
mod step;
mod trace;
mod transform;

pub use beam::*;
pub use config::*;
pub use curve::*;
pub use element::*;
pub use intersect::*;
pub use optics::*;
pub use scene::*;
pub use scheduler::*;
pub use sim::*;
pub use step::*;
pub use trace::*;
pub use transform::*;

pub type Float = f64;

/// A position in the scene.
pub type Point = Point2<Float>;

/// A displacement in the scene.
pub type Vector = Vector2<Float>;

/// Hits closer than this (as a fraction of a step) are discarded, so that a beam
/// resting on a surface it just bounced off doesn't strike it again.
pub const EPS: Float = Float::EPSILON * 64.0;
