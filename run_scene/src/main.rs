use std::{error::Error, io, thread};

use lumiere::{loop_index, Beam, Float, FrameOutcome, Scheduler, Simulation, SystemClock};
use lumiere_json::{load_simulation, serde_json, serialize_traces};

const DEFAULT_MAX_FRAMES: u64 = 600;

/// Distance under which two trace points are considered the same.
const LOOP_TOLERANCE: Float = 1e-6;

/// `true` if the last point of `beam`'s trace retraces an earlier segment.
fn is_looping(beam: &Beam) -> bool {
    beam.trace()
        .points()
        .split_last()
        .is_some_and(|(last, path)| loop_index(path, last, LOOP_TOLERANCE).is_some())
}

/// Runs `sim` until no beam moves, every moving beam is stuck in a loop, or
/// `max_frames` frames have run.
fn run(sim: &mut Simulation, max_frames: u64, realtime: bool) {
    let mut scheduler = Scheduler::new(SystemClock::new(), sim.config().frames_per_second);
    let mut looping = vec![false; sim.beams().len()];
    let mut due = 0;

    while sim.frame() < max_frames {
        if realtime {
            if due == 0 {
                due = scheduler.due_frames();
            }
            if due == 0 {
                thread::sleep(scheduler.frame_duration() / 4);
                continue;
            }
            due -= 1;
        }

        let report = sim.tick();
        if report.is_still() {
            log::info!("every beam stopped after {} frames", sim.frame());
            return;
        }

        looping.resize(sim.beams().len(), false);
        let beams = sim.beams().iter().zip(&report.outcomes);
        for (flag, (beam, outcome)) in looping.iter_mut().zip(beams) {
            if *outcome != FrameOutcome::Idle && !*flag && is_looping(beam) {
                log::info!("beam loops from frame {}", report.frame);
                *flag = true;
            }
        }

        let all_looping = sim
            .beams()
            .iter()
            .zip(&looping)
            .all(|(beam, flag)| beam.is_idle() || *flag);
        if all_looping {
            log::info!("every moving beam is looping after {} frames", sim.frame());
            return;
        }
    }

    log::info!("stopped after {max_frames} frames");
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("expected a file path as a first argument.")?;

    let mut max_frames = DEFAULT_MAX_FRAMES;
    let mut realtime = false;

    for arg in args {
        if arg == "--realtime" {
            realtime = true;
        } else {
            max_frames = arg
                .parse()
                .map_err(|_| format!("expected a number of frames, got \"{arg}\""))?;
        }
    }

    let mut sim = load_simulation(&file_path)?;
    log::info!(
        "loaded {file_path}: {} elements, {} beams",
        sim.scene().len(),
        sim.beams().len()
    );

    run(&mut sim, max_frames, realtime);

    serde_json::to_writer_pretty(io::stdout().lock(), &serialize_traces(sim.beams()))?;
    println!();

    Ok(())
}
