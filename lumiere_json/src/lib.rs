//! JSON scene files for [`lumiere`] simulations.
//!
//! A scene file looks like this:
//!
//! ```json
//! {
//!     "config": { "step_factor": 128.0, "lens_index": 1.5 },
//!     "elements": [
//!         { "kind": "light_source", "center": [100, 100] },
//!         { "kind": "mirror", "center": [100, 300], "rotation": 45 }
//!     ],
//!     "beams": [ { "origin": [0, 300], "direction": [1, 0] } ]
//! }
//! ```
//!
//! `config` may be partial or missing, missing values take their defaults.
//! Without `beams`, beams are emitted from the light source.

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use lumiere::*;

mod error;

pub use error::*;
pub use serde_json;

use serde_json::Value;

/// Reads exactly `D` numbers from `json_array`.
pub fn json_array_to_float_array<const D: usize>(json_array: &[Value]) -> Option<[Float; D]> {
    let array: &[Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }
    Some(coords)
}

fn coords_field(json: &Value, field: &'static str) -> SceneFileResult<[Float; 2]> {
    json.get(field)
        .ok_or(SceneFileError::MissingField(field))?
        .as_array()
        .and_then(|array| json_array_to_float_array(array))
        .ok_or_else(|| SceneFileError::invalid(field, "expected an array of 2 numbers"))
}

/// Reads the point stored in `json[field]`.
pub fn point_field(json: &Value, field: &'static str) -> SceneFileResult<Point> {
    coords_field(json, field).map(Point::from)
}

/// Reads the vector stored in `json[field]`.
pub fn vector_field(json: &Value, field: &'static str) -> SceneFileResult<Vector> {
    coords_field(json, field).map(Vector::from)
}

/// `json[field]`, unless it's missing or `null`.
fn optional<'a>(json: &'a Value, field: &str) -> Option<&'a Value> {
    json.get(field).filter(|value| !value.is_null())
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &Value,
    field: &'static str,
    map: impl FnMut(&Value) -> SceneFileResult<T>,
) -> SceneFileResult<C> {
    json.as_array()
        .ok_or_else(|| SceneFileError::invalid(field, "expected an array"))?
        .iter()
        .map(map)
        .collect()
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> Value {
        Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for Arc<T> {
    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}

impl<'a, T: JsonSer + ?Sized> JsonSer for &'a T {
    fn to_json(&self) -> Value {
        (*self).to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &Value) -> SceneFileResult<Self>
    where
        Self: Sized;
}

impl JsonSer for Point {
    fn to_json(&self) -> Value {
        serde_json::json!([self.x, self.y])
    }
}

impl JsonSer for Trace {
    /// An array of `[x, y]` points.
    fn to_json(&self) -> Value {
        self.points().to_json()
    }
}

impl JsonDes for Trace {
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        map_json_array::<Vec<_>, _>(json, "trace", |point| {
            point
                .as_array()
                .and_then(|array| json_array_to_float_array(array))
                .map(Point::from)
                .ok_or_else(|| SceneFileError::invalid("trace", "expected arrays of 2 numbers"))
        })
        .map(Trace::from)
    }
}

impl JsonSer for ElementKind {
    fn to_json(&self) -> Value {
        Value::from(self.name())
    }
}

impl JsonDes for ElementKind {
    /// One of `"light_source"`, `"mirror"`, `"prism"`, `"convex_lens"` or `"concave_lens"`.
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        let name = json
            .as_str()
            .ok_or_else(|| SceneFileError::invalid("kind", "expected a string"))?;

        ElementKind::from_name(name).ok_or_else(|| SceneFileError::UnknownKind(name.into()))
    }
}

impl JsonSer for OpticalElement {
    /// Serialize an element into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> Value {
        serde_json::json!({
            "kind": self.kind().to_json(),
            "center": self.center().to_json(),
            "rotation": self.rotation(),
        })
    }
}

impl JsonDes for OpticalElement {
    /// Deserialize an element, with its kind's default footprint, from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "kind": "mirror",
    ///     "center": [100., 300.],
    ///     "rotation": 45., // (degrees, counter-clockwise, optional)
    /// }
    /// ```
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        let kind = json.get("kind").ok_or(SceneFileError::MissingField("kind"))?;
        let kind = ElementKind::from_json(kind)?;

        let center = point_field(json, "center")?;

        let rotation = optional(json, "rotation")
            .map(|rotation| {
                rotation
                    .as_f64()
                    .filter(|r| r.is_finite())
                    .ok_or_else(|| SceneFileError::invalid("rotation", "expected a number"))
            })
            .transpose()?
            .unwrap_or(0.0);

        Ok(Self::footprint(kind, center).with_rotation(rotation))
    }
}

impl JsonSer for Beam {
    /// Serialize a beam into a JSON object.
    ///
    /// The origin is `null` if the beam hasn't been placed.
    fn to_json(&self) -> Value {
        serde_json::json!({
            "origin": self.position().map(JsonSer::to_json),
            "direction": self.direction().as_slice(),
        })
    }
}

impl JsonDes for Beam {
    /// Deserialize a new beam from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "origin": [0., 300.],
    ///     "direction": [1., 0.], // (must have at least one non-zero value)
    /// }
    /// ```
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        let origin = point_field(json, "origin")?;
        let direction = vector_field(json, "direction")?;

        Beam::try_new(origin, direction)
            .ok_or_else(|| SceneFileError::invalid("direction", "must not be zero"))
    }
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        map_json_array(json, "array", T::from_json)
    }
}

impl JsonSer for Bounds {
    fn to_json(&self) -> Value {
        serde_json::json!({
            "min": self.min.to_json(),
            "max": self.max.to_json(),
        })
    }
}

impl JsonDes for Bounds {
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        let min = point_field(json, "min")?;
        let max = point_field(json, "max")?;

        Bounds::try_new(min, max).ok_or_else(|| {
            SceneFileError::InvalidConfig(format!(
                "bounds from {min} to {max} don't enclose any area"
            ))
        })
    }
}

const CONFIG_FIELDS: [&str; 8] = [
    "frames_per_second",
    "step_factor",
    "lens_index",
    "beam_count",
    "beam_spread_degrees",
    "max_bounces_per_frame",
    "bounds",
    "enabled",
];

fn float_setting(json: &Value, field: &'static str) -> SceneFileResult<Option<Float>> {
    optional(json, field)
        .map(|value| {
            value
                .as_f64()
                .ok_or_else(|| SceneFileError::invalid(field, "expected a number"))
        })
        .transpose()
}

fn count_setting(json: &Value, field: &'static str) -> SceneFileResult<Option<u64>> {
    optional(json, field)
        .map(|value| {
            value
                .as_u64()
                .ok_or_else(|| SceneFileError::invalid(field, "expected a non-negative integer"))
        })
        .transpose()
}

fn positive(field: &str, value: Float) -> SceneFileResult<Float> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SceneFileError::InvalidConfig(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

fn nonzero(field: &str, count: u64) -> SceneFileResult<u64> {
    if count == 0 {
        Err(SceneFileError::InvalidConfig(format!("{field} must not be 0")))
    } else {
        Ok(count)
    }
}

fn narrow<T: TryFrom<u64>>(field: &str, count: u64) -> SceneFileResult<T> {
    T::try_from(count)
        .map_err(|_| SceneFileError::InvalidConfig(format!("{field} is too large: {count}")))
}

impl JsonSer for SimConfig {
    fn to_json(&self) -> Value {
        serde_json::json!({
            "frames_per_second": self.frames_per_second,
            "step_factor": self.step_factor,
            "lens_index": self.lens_index,
            "beam_count": self.beam_count,
            "beam_spread_degrees": self.beam_spread_degrees,
            "max_bounces_per_frame": self.max_bounces_per_frame,
            "bounds": self.bounds.as_ref().map(JsonSer::to_json),
            "enabled": self.enabled,
        })
    }
}

impl JsonDes for SimConfig {
    /// Deserialize settings from a JSON object. Any of them may be left out, they
    /// then take their default value.
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| SceneFileError::invalid("config", "expected an object"))?;

        for key in object.keys() {
            if !CONFIG_FIELDS.contains(&key.as_str()) {
                log::warn!("ignoring unknown setting \"{key}\"");
            }
        }

        let mut config = SimConfig::default();

        if let Some(fps) = count_setting(json, "frames_per_second")? {
            config.frames_per_second =
                narrow("frames_per_second", nonzero("frames_per_second", fps)?)?;
        }

        if let Some(step_factor) = float_setting(json, "step_factor")? {
            config.step_factor = positive("step_factor", step_factor)?;
        }

        if let Some(lens_index) = float_setting(json, "lens_index")? {
            config.lens_index = positive("lens_index", lens_index)?;
        }

        if let Some(count) = count_setting(json, "beam_count")? {
            config.beam_count = narrow("beam_count", nonzero("beam_count", count)?)?;
        }

        if let Some(spread) = float_setting(json, "beam_spread_degrees")? {
            if !spread.is_finite() {
                return Err(SceneFileError::InvalidConfig(format!(
                    "beam_spread_degrees must be finite, got {spread}"
                )));
            }
            config.beam_spread_degrees = spread;
        }

        if let Some(max) = count_setting(json, "max_bounces_per_frame")? {
            config.max_bounces_per_frame =
                narrow("max_bounces_per_frame", nonzero("max_bounces_per_frame", max)?)?;
        }

        config.bounds = optional(json, "bounds").map(Bounds::from_json).transpose()?;

        if let Some(enabled) = optional(json, "enabled") {
            config.enabled = enabled
                .as_bool()
                .ok_or_else(|| SceneFileError::invalid("enabled", "expected a boolean"))?;
        }

        Ok(config)
    }
}

impl JsonSer for Scene {
    fn to_json(&self) -> Value {
        self.snapshot().to_json()
    }
}

impl JsonDes for Scene {
    fn from_json(json: &Value) -> SceneFileResult<Self> {
        let elements: Vec<OpticalElement> =
            map_json_array(json, "elements", OpticalElement::from_json)?;

        let light_sources = elements
            .iter()
            .filter(|e| e.kind() == ElementKind::LightSource)
            .count();
        if light_sources > 1 {
            log::warn!("{light_sources} light sources in the scene, only the first one emits");
        }

        Ok(Scene::from(elements))
    }
}

/// Serialize settings and elements into a JSON object, without any beams.
pub fn serialize_scene(config: &SimConfig, scene: &Scene) -> Value {
    serde_json::json!({
        "config": config.to_json(),
        "elements": scene.to_json(),
    })
}

/// Serialize a simulation's settings, elements and beams into a JSON object.
///
/// Beams that aren't moving are left out. If none are moving, the `beams` field
/// is left out, so that beams are emitted from the light source once deserialized.
pub fn serialize_simulation(sim: &Simulation) -> Value {
    let beams: Vec<&Beam> = sim.beams().iter().filter(|beam| !beam.is_idle()).collect();

    let mut json = serialize_scene(sim.config(), sim.scene());

    if !beams.is_empty() {
        json["beams"] = beams.to_json();
    }

    json
}

/// Deserialize a simulation from a JSON object, in the format described in the
/// [crate level documentation](crate).
pub fn deserialize_simulation(json: &Value) -> SceneFileResult<Simulation> {
    let config = optional(json, "config")
        .map(SimConfig::from_json)
        .transpose()?
        .unwrap_or_default();

    let elements = json
        .get("elements")
        .ok_or(SceneFileError::MissingField("elements"))?;
    let scene = Scene::from_json(elements)?;

    let sim = Simulation::with_scene(config, scene);

    Ok(match optional(json, "beams") {
        Some(beams) => {
            sim.with_beams(map_json_array::<Vec<_>, _>(beams, "beams", Beam::from_json)?)
        }
        None => sim,
    })
}

/// The traces of `beams`, as an array of arrays of `[x, y]` points.
pub fn serialize_traces<'a>(beams: impl IntoIterator<Item = &'a Beam>) -> Value {
    Value::Array(beams.into_iter().map(|beam| beam.trace().to_json()).collect())
}

/// Reads the simulation stored in the JSON file at `path`.
pub fn load_simulation(path: impl AsRef<Path>) -> SceneFileResult<Simulation> {
    let path = path.as_ref();
    let json: Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let sim = deserialize_simulation(&json)?;

    log::debug!(
        "loaded {} elements and {} beams from {}",
        sim.scene().len(),
        sim.beams().len(),
        path.display()
    );

    Ok(sim)
}

/// Writes `sim` to a JSON file at `path`, replacing it if it exists.
pub fn save_simulation(path: impl AsRef<Path>, sim: &Simulation) -> SceneFileResult<()> {
    serde_json::to_writer_pretty(File::create(path)?, &serialize_simulation(sim))?;
    Ok(())
}
