use lumiere::*;

use core::iter;
use lumiere::nalgebra::Unit;
pub use rand;

/// Width of the area random scenes are generated in.
pub const SCENE_WIDTH: Float = 1280.0;
/// Height of the area random scenes are generated in.
pub const SCENE_HEIGHT: Float = 720.0;

/// Keeps element centers this far from the edges of the scene area.
const MARGIN: Float = 50.0;

pub trait Random: Sized {
    /// A random value drawn from `rng`. Generation retries until it succeeds.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for ElementKind {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl Random for OpticalElement {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        random_element(ElementKind::random(rng), rng)
    }
}

impl Random for Beam {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let origin = rand_point(rng, &scene_min(), &scene_max());
        Self::new_unit_dir(origin, rand_unit_vector(rng))
    }
}

/// The whole area random scenes are generated in.
pub fn scene_area() -> Bounds {
    Bounds::new(Point::origin(), [SCENE_WIDTH, SCENE_HEIGHT])
}

fn scene_min() -> Point {
    Point::new(MARGIN, MARGIN)
}

fn scene_max() -> Point {
    Point::new(SCENE_WIDTH - MARGIN, SCENE_HEIGHT - MARGIN)
}

/// An element of `kind` somewhere in the scene area, turned by a random angle.
pub fn random_element(kind: ElementKind, rng: &mut (impl rand::Rng + ?Sized)) -> OpticalElement {
    let center = rand_point(rng, &scene_min(), &scene_max());
    let rotation = rng.gen_range(0.0..360.0);

    OpticalElement::footprint(kind, center).with_rotation(rotation)
}

/// A light source, followed by `num_elements` other elements.
pub fn random_scene(num_elements: usize, rng: &mut (impl rand::Rng + ?Sized)) -> Scene {
    let passive: Vec<ElementKind> = ElementKind::ALL
        .into_iter()
        .filter(|kind| *kind != ElementKind::LightSource)
        .collect();

    let light_source = random_element(ElementKind::LightSource, rng);

    iter::once(light_source)
        .chain(
            iter::repeat_with(|| {
                let kind = passive[rng.gen_range(0..passive.len())];
                random_element(kind, rng)
            })
            .take(num_elements),
        )
        .collect()
}

/// A point with coordinates uniformly distributed between those of `min` and `max`.
pub fn rand_point(rng: &mut (impl rand::Rng + ?Sized), min: &Point, max: &Point) -> Point {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly
    let unit = Vector::from_fn(|_, _| rng.gen::<Float>());
    Point::from(min.coords + (max - min).component_mul(&unit))
}

/// A direction, uniformly distributed around the unit circle.
pub fn rand_unit_vector(rng: &mut (impl rand::Rng + ?Sized)) -> Unit<Vector> {
    loop {
        let v = Vector::from_fn(|_, _| rng.gen::<Float>() - 0.5);
        // only keep points inside the disk
        if v.norm_squared() > 0.25 {
            continue;
        }
        if let Some(dir) = Unit::try_new(v, Float::EPSILON * 8.0) {
            break dir;
        }
    }
}
