use crate::config::SimConfig;
use crate::particles::ParticleStore;
use nalgebra::Vector2;
use rayon::prelude::*;

/// Advances velocity and position for every particle from its accumulated
/// force: a semi-implicit Euler step with the damping folded into one
/// multiplicative friction factor, a hard speed clamp, and a toroidal wrap.
///
/// Caller guarantee: `max_speed * dt` stays well below `map_size / 2`, or
/// the next step's shortest-vector correction breaks down.
pub fn integrate(particles: &mut ParticleStore, forces: &[Vector2<f64>], config: &SimConfig) {
    debug_assert_eq!(forces.len(), particles.len());

    let dt = config.dt;
    let friction = config.friction;
    let max_speed = config.max_speed;
    let max_speed_sq = max_speed * max_speed;
    let map_size = config.map_size;

    particles
        .positions
        .par_iter_mut()
        .zip(particles.velocities.par_iter_mut())
        .zip(forces.par_iter())
        .for_each(|((position, velocity), force)| {
            *velocity = (*velocity + force * dt) * friction;

            // The repulsion ramp is unbounded as dist -> 0; the clamp keeps
            // that energy from blowing up the integration.
            let speed_sq = velocity.norm_squared();
            if speed_sq > max_speed_sq {
                *velocity *= max_speed / speed_sq.sqrt();
            }

            *position += *velocity * dt;
            position.x = position.x.rem_euclid(map_size);
            position.y = position.y.rem_euclid(map_size);
        });
}
