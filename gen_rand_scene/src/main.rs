use std::{env, error::Error, fs::File};

use lumiere::SimConfig;
use lumiere_json::{serde_json, serialize_scene};
use lumiere_random::{
    rand::{rngs::StdRng, SeedableRng},
    random_scene, scene_area,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("please provide a path to serialize the scene json data")?;

    let num_elements = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(12);

    let mut rng = match args.next().and_then(|arg| arg.parse().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let config = SimConfig {
        bounds: Some(scene_area()),
        ..SimConfig::default()
    };
    let scene = random_scene(num_elements, &mut rng);

    serde_json::to_writer_pretty(File::create(&file_path)?, &serialize_scene(&config, &scene))?;

    log::info!("wrote {} elements to {file_path}", scene.len());

    Ok(())
}
