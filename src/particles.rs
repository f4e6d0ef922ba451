use nalgebra::Vector2;
use rand::rngs::SmallRng;
use rand::Rng;

pub type Position = Vector2<f64>;
pub type Velocity = Vector2<f64>;

/// Index-parallel particle storage (structure of arrays).
///
/// `positions`, `velocities` and `type_ids` always describe the same
/// particle at the same index. The spatial sort permutes all three together
/// via [`ParticleStore::reorder`], so an index is only meaningful until the
/// next grid rebuild.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    /// Particle positions, each coordinate in `[0, map_size)`
    pub positions: Vec<Position>,
    /// Particle velocities, bounded by the configured speed ceiling
    pub velocities: Vec<Velocity>,
    /// Particle types, values in `[0, num_types)`
    pub type_ids: Vec<u32>,

    // Scratch buffers reused by reorder so the per-step sort allocates
    // nothing in steady state.
    pub(crate) scratch_positions: Vec<Position>,
    pub(crate) scratch_velocities: Vec<Velocity>,
    pub(crate) scratch_types: Vec<u32>,
}

impl ParticleStore {
    /// Seeds `count` particles: positions uniform over the domain,
    /// velocities zero, types uniform over `[0, num_types)`.
    pub fn from_rng(count: usize, map_size: f64, num_types: usize, rng: &mut SmallRng) -> Self {
        let mut positions = Vec::with_capacity(count);
        for _ in 0..count {
            let x = rng.gen_range(0.0..map_size);
            let y = rng.gen_range(0.0..map_size);
            positions.push(Position::new(x, y));
        }
        let velocities = vec![Velocity::zeros(); count];
        let type_ids = (0..count)
            .map(|_| rng.gen_range(0..num_types as u32))
            .collect();

        Self {
            positions,
            velocities,
            type_ids,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Applies the permutation `order` to all three arrays at once:
    /// the particle at slot `k` afterwards is the one that was at
    /// `order[k]` before.
    pub fn reorder(&mut self, order: &[u32]) {
        debug_assert_eq!(order.len(), self.len());

        self.scratch_positions.clear();
        self.scratch_positions
            .extend(order.iter().map(|&from| self.positions[from as usize]));
        std::mem::swap(&mut self.positions, &mut self.scratch_positions);

        self.scratch_velocities.clear();
        self.scratch_velocities
            .extend(order.iter().map(|&from| self.velocities[from as usize]));
        std::mem::swap(&mut self.velocities, &mut self.scratch_velocities);

        self.scratch_types.clear();
        self.scratch_types
            .extend(order.iter().map(|&from| self.type_ids[from as usize]));
        std::mem::swap(&mut self.type_ids, &mut self.scratch_types);
    }
}
