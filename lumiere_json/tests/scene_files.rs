use std::{fs, path::PathBuf};

use lumiere::{ElementKind, FrameOutcome, Point, SceneEdit, SimConfig, Simulation, Vector};
use lumiere_json::*;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lumiere_json_{}_{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

const MIRROR_SCENE: &str = r#"{
    "config": { "step_factor": 64, "beam_count": 3 },
    "elements": [
        { "kind": "mirror", "center": [100, 300], "rotation": 45 },
        { "kind": "concave_lens", "center": [600, 300] }
    ],
    "beams": [ { "origin": [0, 300], "direction": [2, 0] } ]
}"#;

#[test]
fn loads_a_scene_file() {
    let path = temp_file("mirror.json", MIRROR_SCENE);
    let sim = load_simulation(&path).unwrap();
    fs::remove_file(path).unwrap();

    assert_eq!(sim.config().step_factor, 64.0);
    assert_eq!(sim.config().beam_count, 3);
    assert_eq!(sim.config().lens_index, 1.5);

    let elements = sim.scene().elements();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].kind(), ElementKind::Mirror);
    assert_eq!(elements[0].rotation(), 45.0);
    assert_eq!(elements[1].kind(), ElementKind::ConcaveLens);
    assert_eq!(elements[1].center(), &Point::new(600.0, 300.0));

    // explicit beams replace the emitted ones
    assert_eq!(sim.beams().len(), 1);
    assert_eq!(sim.beams()[0].position(), Some(&Point::new(0.0, 300.0)));
    assert_eq!(sim.beams()[0].direction(), &Vector::new(1.0, 0.0));
}

#[test]
fn beams_default_to_the_light_source() {
    let json = serde_json::json!({
        "elements": [ { "kind": "light_source", "center": [100, 100] } ]
    });
    let sim = deserialize_simulation(&json).unwrap();

    assert_eq!(sim.config(), &SimConfig::default());
    assert_eq!(sim.beams().len(), 2);
    for beam in sim.beams() {
        assert_eq!(beam.position(), Some(&Point::new(125.0, 100.0)));
    }
}

#[test]
fn reports_what_is_wrong() {
    let unknown = serde_json::json!({ "elements": [ { "kind": "laser", "center": [0, 0] } ] });
    assert!(matches!(
        deserialize_simulation(&unknown),
        Err(SceneFileError::UnknownKind(kind)) if kind == "laser"
    ));

    let no_elements = serde_json::json!({ "beams": [] });
    assert!(matches!(
        deserialize_simulation(&no_elements),
        Err(SceneFileError::MissingField("elements"))
    ));

    let no_center = serde_json::json!({ "elements": [ { "kind": "mirror" } ] });
    assert!(matches!(
        deserialize_simulation(&no_center),
        Err(SceneFileError::MissingField("center"))
    ));

    let bad_step = serde_json::json!({ "config": { "step_factor": -2 }, "elements": [] });
    assert!(matches!(
        deserialize_simulation(&bad_step),
        Err(SceneFileError::InvalidConfig(_))
    ));

    let still_beam = serde_json::json!({
        "elements": [],
        "beams": [ { "origin": [0, 0], "direction": [0, 0] } ]
    });
    assert!(matches!(
        deserialize_simulation(&still_beam),
        Err(SceneFileError::InvalidField { field: "direction", .. })
    ));
}

#[test]
fn file_errors() {
    let missing = std::env::temp_dir().join("lumiere_json_this_file_does_not_exist.json");
    assert!(matches!(load_simulation(missing), Err(SceneFileError::Io(_))));

    let path = temp_file("broken.json", "{ \"elements\": [");
    let result = load_simulation(&path);
    fs::remove_file(path).unwrap();
    assert!(matches!(result, Err(SceneFileError::Json(_))));
}

#[test]
fn saved_simulations_load_back() {
    let mut sim = Simulation::new(SimConfig {
        step_factor: 32.0,
        ..SimConfig::default()
    });
    sim.queue(SceneEdit::Place {
        kind: ElementKind::LightSource,
        anchor: Point::new(200.0, 200.0),
    });
    sim.queue(SceneEdit::Place {
        kind: ElementKind::ConvexLens,
        anchor: Point::new(500.0, 200.0),
    });
    sim.queue(SceneEdit::Rotate {
        index: 1,
        delta_degrees: 15.0,
    });
    sim.tick();

    let path = std::env::temp_dir().join(format!("lumiere_json_{}_saved.json", std::process::id()));
    save_simulation(&path, &sim).unwrap();
    let loaded = load_simulation(&path).unwrap();
    fs::remove_file(path).unwrap();

    assert_eq!(loaded.config(), sim.config());
    assert_eq!(loaded.scene(), sim.scene());
    assert_eq!(loaded.beams().len(), sim.beams().len());
    for (loaded, beam) in loaded.beams().iter().zip(sim.beams()) {
        assert_eq!(loaded.position(), beam.position());
    }
}

#[test]
fn traces_after_a_run() {
    let json = serde_json::json!({
        "config": { "step_factor": 10 },
        "elements": [],
        "beams": [
            { "origin": [0, 0], "direction": [1, 0] },
            { "origin": [0, 5], "direction": [0, 1] }
        ]
    });
    let mut sim = deserialize_simulation(&json).unwrap();
    for _ in 0..2 {
        assert_eq!(
            sim.tick().outcomes,
            [FrameOutcome::Moved { bounces: 0 }; 2]
        );
    }

    assert_eq!(
        serialize_traces(sim.beams()),
        serde_json::json!([
            [[0.0, 0.0], [10.0, 0.0], [20.0, 0.0]],
            [[0.0, 5.0], [0.0, 15.0], [0.0, 25.0]]
        ])
    );
}
