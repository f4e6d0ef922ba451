use crate::config::SimConfig;
use crate::grid::SpatialGrid;
use crate::matrix::InteractionMatrix;
use crate::particles::ParticleStore;
use nalgebra::Vector2;
use rayon::prelude::*;

/// Below this squared distance two particles are treated as coincident and
/// contribute no force; the direction would be undefined.
const MIN_DISTANCE_SQ: f64 = 1e-12;

/// Signed force magnitude for a pair `dist` apart with coefficient `alpha`.
///
/// Piecewise: a linear ramp from `alpha` at zero distance down to 0 at
/// `min_radius`, then a sine hill that is 0 at both `min_radius` and
/// `max_radius` and peaks at the midpoint, then 0. The sine profile is
/// preferred over a triangular one for the smoother motion it produces.
pub fn force_magnitude(dist: f64, min_radius: f64, max_radius: f64, alpha: f64) -> f64 {
    if dist < min_radius {
        alpha * (1.0 - dist / min_radius)
    } else if dist < max_radius {
        let normalized = (dist - min_radius) / (max_radius - min_radius);
        alpha * (std::f64::consts::PI * normalized).sin()
    } else {
        0.0
    }
}

/// Accumulates the net interaction force on every particle into `forces`.
///
/// Reads the rebuilt grid and the store only; each particle's slot is
/// written exactly once, so the loop parallelizes over chunks of the output
/// buffer with no shared mutable state. Results are independent of chunk
/// count and scheduling.
pub fn accumulate(
    grid: &SpatialGrid,
    particles: &ParticleStore,
    matrix: &InteractionMatrix,
    config: &SimConfig,
    forces: &mut [Vector2<f64>],
) {
    debug_assert_eq!(forces.len(), particles.len());
    if particles.is_empty() {
        return;
    }

    let chunk_size = (particles.len() / num_cpus::get()).max(1);
    forces
        .par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_index, chunk)| {
            let start = chunk_index * chunk_size;
            for (local, slot) in chunk.iter_mut().enumerate() {
                *slot = net_force(start + local, grid, particles, matrix, config);
            }
        });
}

fn net_force(
    index: usize,
    grid: &SpatialGrid,
    particles: &ParticleStore,
    matrix: &InteractionMatrix,
    config: &SimConfig,
) -> Vector2<f64> {
    let min_radius = config.min_radius;
    let max_radius = config.max_radius;
    let cutoff_sq = max_radius * max_radius + config.range_epsilon;
    let map_size = config.map_size;
    let half_map = map_size * 0.5;

    let position = particles.positions[index];
    let own_type = particles.type_ids[index] as usize;
    let mut total = Vector2::zeros();

    let mut visit_cell = |cell: u32| {
        for j in grid.cell_span(cell) {
            if j == index {
                continue;
            }

            let mut delta = particles.positions[j] - position;
            // Shortest vector on the torus, per axis.
            if delta.x > half_map {
                delta.x -= map_size;
            } else if delta.x < -half_map {
                delta.x += map_size;
            }
            if delta.y > half_map {
                delta.y -= map_size;
            } else if delta.y < -half_map {
                delta.y += map_size;
            }

            let distance_sq = delta.norm_squared();
            if distance_sq > cutoff_sq || distance_sq < MIN_DISTANCE_SQ {
                continue;
            }

            let distance = distance_sq.sqrt();
            let alpha = matrix.get(particles.type_ids[j] as usize, own_type);
            let magnitude = force_magnitude(distance, min_radius, max_radius, alpha);
            total += delta * (magnitude / distance);
        }
    };

    let dim = grid.dim();
    if dim >= 3 {
        let cell = grid.cell_of(index);
        let cx = (cell % dim) as i32;
        let cy = (cell / dim) as i32;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let ncx = (cx + dx).rem_euclid(dim as i32) as u32;
                let ncy = (cy + dy).rem_euclid(dim as i32) as u32;
                visit_cell(ncy * dim + ncx);
            }
        }
    } else {
        // On a 1- or 2-wide lattice the 3x3 block would alias cells and
        // count pairs twice; every cell is within range, so scan each once.
        for cell in 0..grid.cell_count() {
            visit_cell(cell);
        }
    }

    total
}
