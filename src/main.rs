//! Donut Chomp headless runner
//!
//! Plays a session against the headless host with a scripted mouth that
//! chases the lowest falling donut.
//!
//! Usage: `donut-chomp [config.json] [seed]`

use glam::Vec2;

use donut_chomp::host::FaceTracker;
use donut_chomp::sim::GamePhase;
use donut_chomp::{Controller, GameConfig, HeadlessHost};

/// Simulated frame length (~60 fps)
const FRAME_MS: u64 = 16;
/// Session length cap
const MAX_SESSION_MS: u64 = 60_000;
/// How far the mouth moves per frame (scene units)
const MOUTH_SPEED: f32 = 0.012;
/// Mouth opens when a donut is this close
const BITE_RANGE: f32 = 0.08;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(&path).unwrap_or_else(|e| {
            log::error!("{e}");
            std::process::exit(1);
        }),
        None => GameConfig::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);

    log::info!("Donut Chomp (headless) starting with seed {}", seed);

    let host = HeadlessHost::with_scene(&config.scene, config.pool_size);
    let mut controller = match Controller::new(host, config, seed) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Setup failed: {e}");
            std::process::exit(1);
        }
    };

    controller.host_mut().set_faces(1);
    controller.host_mut().set_mouth(Vec2::new(0.0, -0.3), 0.0);
    let mut elapsed = 0;
    while elapsed < MAX_SESSION_MS && controller.phase() != GamePhase::Ended {
        chase(controller.host_mut());
        controller.run_frames(1, FRAME_MS);
        elapsed += FRAME_MS;
    }

    let state = controller.state();
    log::info!(
        "Session over after {} ms: phase {:?}, score {}, {} of {} donuts eaten",
        elapsed,
        state.phase,
        state.score,
        state.bites,
        state.spawned
    );
    println!("score: {}", state.score);
}

/// Steer the mouth toward the lowest visible falling donut; open it when in reach
fn chase(host: &mut HeadlessHost) {
    let mouth = host.mouth_center();
    let target = host
        .falls()
        .iter()
        .filter_map(|f| host.element(f.element))
        .filter(|e| !e.hidden)
        .map(|e| e.pos)
        .min_by(|a, b| a.y.total_cmp(&b.y));

    let Some(target) = target else {
        host.set_mouth(mouth, 0.0);
        return;
    };

    let next = mouth + (target - mouth).clamp_length_max(MOUTH_SPEED);
    // Close after every attempt so the next one is a fresh edge
    let was_open = host.mouth_openness() > 0.0;
    let openness = if next.distance(target) <= BITE_RANGE && !was_open {
        0.8
    } else {
        0.0
    };
    host.set_mouth(next, openness);
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
