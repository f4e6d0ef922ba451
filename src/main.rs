use particle_life_engine::{SimConfig, Simulation};
use std::time::{Duration, Instant};

// Headless runner: steps a seeded simulation and reports throughput.
// Usage: particle-life-engine [seed] [steps]
fn main() {
    env_logger::init();

    let config = SimConfig::load().expect("failed to load settings.toml");
    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let steps: u64 = std::env::args()
        .nth(2)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(600);

    let mut simulation = Simulation::new(config, seed).expect("invalid configuration");
    log::info!(
        "running {} particles for {} steps (seed {})",
        simulation.particles().len(),
        steps,
        seed
    );

    let started = Instant::now();
    let mut window_start = Instant::now();
    let mut window_steps = 0u32;

    for _ in 0..steps {
        simulation.step();
        window_steps += 1;

        let elapsed = window_start.elapsed();
        if elapsed >= Duration::from_millis(500) {
            log::info!(
                "{:.1} steps/s",
                window_steps as f64 / elapsed.as_secs_f64()
            );
            window_start = Instant::now();
            window_steps = 0;
        }
    }

    let total = started.elapsed().as_secs_f64();
    let mean_speed = if simulation.particles().is_empty() {
        0.0
    } else {
        simulation
            .particles()
            .velocities
            .iter()
            .map(|v| v.norm())
            .sum::<f64>()
            / simulation.particles().len() as f64
    };
    log::info!(
        "finished {steps} steps in {total:.2}s ({:.1} steps/s), mean speed {mean_speed:.3}",
        steps as f64 / total
    );
}
