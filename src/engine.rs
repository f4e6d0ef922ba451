use crate::config::{ConfigError, SimConfig};
use crate::forces;
use crate::grid::SpatialGrid;
use crate::integrator;
use crate::matrix::InteractionMatrix;
use crate::particles::{ParticleStore, Position};
use nalgebra::Vector2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Read-only view of the particle state after a step.
///
/// Borrowed from the engine: the next `step()` reorders the underlying
/// arrays in place, so the borrow checker retires a snapshot before the
/// state it points at can change.
pub struct StepSnapshot<'a> {
    pub positions: &'a [Position],
    pub types: &'a [u32],
}

/// The simulation engine: owns the particle state, the interaction matrix,
/// the spatial grid and the force buffer, and advances them in lock-step.
///
/// Construction validates the configuration and seeds the first run, so a
/// `Simulation` value is always in a steppable state.
pub struct Simulation {
    config: SimConfig,
    matrix: InteractionMatrix,
    particles: ParticleStore,
    grid: SpatialGrid,
    forces: Vec<Vector2<f64>>,
}

impl Simulation {
    /// Validates `config` and deterministically initializes the run from
    /// `seed`. A rejected configuration produces no engine state at all.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = SpatialGrid::new(config.map_size, config.cell_size);
        let mut simulation = Self {
            matrix: InteractionMatrix::zero(config.num_types),
            particles: ParticleStore::default(),
            grid,
            forces: Vec::new(),
            config,
        };
        simulation.reset(seed);
        Ok(simulation)
    }

    /// Re-seeds the run in place: a fresh generator draws the interaction
    /// matrix first, then the particle set, so identical seeds produce
    /// bit-identical state.
    pub fn reset(&mut self, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.matrix = InteractionMatrix::from_rng(self.config.num_types, &mut rng);
        self.particles = ParticleStore::from_rng(
            self.config.particle_count,
            self.config.map_size,
            self.config.num_types,
            &mut rng,
        );
        self.forces.clear();
        self.forces.resize(self.particles.len(), Vector2::zeros());
        log::debug!(
            "reset: seed={seed}, particles={}, types={}",
            self.particles.len(),
            self.config.num_types
        );
    }

    /// Advances exactly one tick: grid rebuild, then force accumulation,
    /// then integration, each phase completing before the next starts.
    pub fn step(&mut self) -> StepSnapshot<'_> {
        self.grid.rebuild(&mut self.particles);
        forces::accumulate(
            &self.grid,
            &self.particles,
            &self.matrix,
            &self.config,
            &mut self.forces,
        );
        integrator::integrate(&mut self.particles, &self.forces, &self.config);

        StepSnapshot {
            positions: &self.particles.positions,
            types: &self.particles.type_ids,
        }
    }

    /// Replaces the interaction matrix, e.g. with a crafted scenario table.
    pub fn set_matrix(&mut self, matrix: InteractionMatrix) -> Result<(), ConfigError> {
        if matrix.size() != self.config.num_types {
            return Err(ConfigError::InvalidConfig(
                "interaction matrix size must match num_types",
            ));
        }
        self.matrix = matrix;
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }
}
