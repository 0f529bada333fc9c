use approx::assert_relative_eq;
use lumiere::{
    incidence_angle, rotate_vector, Beam, BeamState, Bounds, ElementKind, Float, FrameOutcome,
    OpticalElement, Point, Scene, SceneEdit, SimConfig, Simulation, Vector,
};
use nalgebra::Unit;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene_of(elements: impl IntoIterator<Item = OpticalElement>) -> Scene {
    elements.into_iter().collect()
}

#[test]
fn lone_light_source_shoots_to_the_boundary() {
    init_logger();

    let mut scene = Scene::new();
    scene.place(ElementKind::LightSource, [100.0, 100.0]);

    let config = SimConfig {
        step_factor: 2000.0,
        beam_count: 1,
        bounds: Some(Bounds::new([0.0, 0.0], [1280.0, 720.0])),
        ..SimConfig::default()
    };
    let mut sim = Simulation::with_scene(config, scene);

    let report = sim.tick();
    assert_eq!(report.outcomes, [FrameOutcome::LeftBounds { bounces: 0 }]);

    let beam = &sim.beams()[0];
    let points = beam.trace().points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0], Point::new(125.0, 100.0));
    assert_relative_eq!(points[1], Point::new(1280.0, 100.0), epsilon = 1e-9);
    assert_eq!(beam.direction(), &Vector::zeros());
    assert_eq!(beam.state(), BeamState::Terminated);

    // nothing moves afterwards
    assert!(sim.tick().is_still());
    assert_eq!(sim.beams()[0].trace().len(), 2);
}

#[test]
fn tilted_mirror_turns_the_beam_once() {
    init_logger();

    let mirror = OpticalElement::footprint(ElementKind::Mirror, [100.0, 300.0]).with_rotation(45.0);
    let mut sim = Simulation::with_scene(SimConfig::default(), scene_of([mirror]))
        .with_beams([Beam::new([0.0, 300.0], [1.0, 0.0])]);

    let bounces: usize = (0..10)
        .map(|_| match sim.tick().outcomes[..] {
            [FrameOutcome::Moved { bounces }] => bounces,
            ref other => panic!("unexpected outcome {other:?}"),
        })
        .sum();
    assert_eq!(bounces, 1);

    let incoming = Vector::new(1.0, 0.0);
    let outgoing = *sim.beams()[0].direction();
    assert_relative_eq!(outgoing, Vector::new(0.0, -1.0), epsilon = 1e-9);

    // the mirror's left side faces down and to the left
    let normal = rotate_vector(&Vector::new(-1.0, 0.0), 45.0);
    assert_relative_eq!(incoming.dot(&normal), -outgoing.dot(&normal), epsilon = 1e-9);

    // the bounce happened on the surface, then the beam went straight down
    let points = sim.beams()[0].trace().points();
    assert_relative_eq!(points[1].y, 300.0, epsilon = 1e-9);
    assert!(points[1].x > 90.0 && points[1].x < 95.0);
    assert!(points[2..].iter().all(|p| (p.x - points[1].x).abs() < 1e-9));
}

#[test]
fn beams_do_not_interfere() {
    init_logger();

    let scene = scene_of([
        OpticalElement::footprint(ElementKind::Mirror, [400.0, 300.0]).with_rotation(30.0),
        OpticalElement::footprint(ElementKind::ConvexLens, [200.0, 100.0]),
        OpticalElement::footprint(ElementKind::Prism, [600.0, 500.0]),
    ]);
    let config = SimConfig {
        step_factor: 16.0,
        ..SimConfig::default()
    };

    let a = Beam::new([0.0, 300.0], [1.0, 0.0]);
    let b = Beam::new([0.0, 300.0], [1.0, 0.02]);

    let mut together = Simulation::with_scene(config.clone(), scene.clone())
        .with_beams([a.clone(), b.clone()]);
    let mut alone_a = Simulation::with_scene(config.clone(), scene.clone()).with_beams([a]);
    let mut alone_b = Simulation::with_scene(config, scene).with_beams([b]);

    for _ in 0..100 {
        together.tick();
        alone_a.tick();
        alone_b.tick();
    }

    assert_eq!(together.beams()[0], alone_a.beams()[0]);
    assert_eq!(together.beams()[1], alone_b.beams()[0]);
    assert_ne!(together.beams()[0].trace(), together.beams()[1].trace());
}

#[test]
fn lens_reflects_when_refraction_is_impossible() {
    init_logger();

    // light going into a less refractive medium at 45 degrees can't get through
    let config = SimConfig {
        step_factor: 10.0,
        lens_index: 0.5,
        ..SimConfig::default()
    };
    let lens = OpticalElement::footprint(ElementKind::ConvexLens, [100.0, 0.0]);
    let mut sim = Simulation::with_scene(config, scene_of([lens]))
        .with_beams([Beam::new([97.0, -35.0], [1.0, 1.0])]);

    let report = sim.tick();
    assert_eq!(
        report.outcomes,
        [FrameOutcome::TotallyReflected { bounces: 0 }]
    );

    let beam = &sim.beams()[0];
    let direction = *beam.direction();
    assert!(direction.iter().all(|c| c.is_finite()));
    assert_relative_eq!(direction.norm(), 1.0, epsilon = 1e-12);
    // bounced off the flat bottom of the lens
    assert_relative_eq!(
        direction,
        Vector::new(1.0, -1.0).normalize(),
        epsilon = 1e-9
    );
}

#[test]
fn light_source_absorbs_incoming_beams() {
    init_logger();

    let mut scene = Scene::new();
    scene.place(ElementKind::LightSource, [300.0, 200.0]);
    let mut sim = Simulation::with_scene(SimConfig::default(), scene)
        .with_beams([Beam::new([0.0, 200.0], [1.0, 0.0])]);

    let mut frames = 0;
    while !matches!(
        sim.tick().outcomes[..],
        [FrameOutcome::Absorbed { .. }]
    ) {
        frames += 1;
        assert!(frames < 10, "beam never reached the light source");
    }

    let beam = &sim.beams()[0];
    assert_eq!(beam.direction(), &Vector::zeros());
    assert_relative_eq!(
        beam.trace().last().unwrap(),
        &Point::new(275.0, 200.0),
        epsilon = 1e-9
    );
}

#[test]
fn mirrors_reflect_at_equal_angles() {
    init_logger();

    let mut rng = StdRng::seed_from_u64(0x6c756d);
    let config = SimConfig {
        step_factor: 100.0,
        ..SimConfig::default()
    };

    for _ in 0..200 {
        let center = Point::new(rng.gen_range(200.0..1000.0), rng.gen_range(100.0..600.0));
        let rotation: Float = rng.gen_range(-60.0..60.0);

        let mirror = OpticalElement::footprint(ElementKind::Mirror, center).with_rotation(rotation);
        let mut sim = Simulation::with_scene(config.clone(), scene_of([mirror]))
            .with_beams([Beam::new(center - Vector::new(100.0, 0.0), [1.0, 0.0])]);

        assert_eq!(sim.tick().outcomes, [FrameOutcome::Moved { bounces: 1 }]);

        let normal = Unit::new_normalize(rotate_vector(&Vector::new(-1.0, 0.0), rotation));
        let incoming = Unit::new_normalize(Vector::new(1.0, 0.0));
        let outgoing = Unit::new_normalize(*sim.beams()[0].direction());

        assert_relative_eq!(
            incidence_angle(&incoming, &normal),
            incidence_angle(&outgoing, &normal),
            epsilon = 1e-9
        );
        // same side of the normal, opposite sides of the surface
        assert!(outgoing.dot(normal.as_ref()) > 0.0);
    }
}

#[test]
fn queued_light_source_moves_restart_every_trace() {
    init_logger();

    let mut sim = Simulation::new(SimConfig {
        step_factor: 5.0,
        ..SimConfig::default()
    });
    sim.queue(SceneEdit::Place {
        kind: ElementKind::LightSource,
        anchor: Point::new(50.0, 50.0),
    });
    for _ in 0..4 {
        sim.tick();
    }
    assert!(sim.beams().iter().all(|beam| beam.trace().len() == 5));

    sim.queue(SceneEdit::MoveLightSource {
        anchor: Point::new(50.0, 400.0),
    });
    sim.tick();

    for beam in sim.beams() {
        assert_eq!(
            beam.trace().points(),
            &[Point::new(75.0, 400.0), Point::new(80.0, 400.0)]
        );
    }
}
