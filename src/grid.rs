use crate::particles::{ParticleStore, Position};
use std::ops::Range;

/// Uniform square grid tiling the toroidal domain.
///
/// `rebuild` bucket-sorts the particle store so that every cell's particles
/// are contiguous, then describes each cell by an `[offset, offset + count)`
/// span into the reordered arrays. The sort is a counting sort over cell
/// ids, O(N + cells) per step.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    grid_dim: u32,
    /// Cell id of each particle, index-parallel with the store
    cell_of: Vec<u32>,
    /// Particles per cell
    counts: Vec<u32>,
    /// Exclusive prefix sum of `counts`
    offsets: Vec<u32>,

    // Per-rebuild scratch: scatter cursors, the permutation, and a spare
    // cell buffer so steady-state rebuilds allocate nothing.
    cursor: Vec<u32>,
    order: Vec<u32>,
    scratch_cells: Vec<u32>,
}

impl SpatialGrid {
    /// Builds an empty grid covering a `map_size` x `map_size` torus.
    /// Assumes a validated configuration (`cell_size >= max_radius > 0`).
    pub fn new(map_size: f64, cell_size: f64) -> Self {
        let grid_dim = (map_size / cell_size).ceil() as u32;
        let cell_count = (grid_dim * grid_dim) as usize;
        Self {
            cell_size,
            grid_dim,
            cell_of: Vec::new(),
            counts: vec![0; cell_count],
            offsets: vec![0; cell_count],
            cursor: vec![0; cell_count],
            order: Vec::new(),
            scratch_cells: Vec::new(),
        }
    }

    pub fn dim(&self) -> u32 {
        self.grid_dim
    }

    pub fn cell_count(&self) -> u32 {
        self.grid_dim * self.grid_dim
    }

    /// Cell id for a wrapped position. The `min` guard mirrors the float
    /// edge where `x / cell_size` rounds up to the grid dimension.
    pub fn cell_index(&self, position: &Position) -> u32 {
        let cx = ((position.x / self.cell_size).floor() as u32).min(self.grid_dim - 1);
        let cy = ((position.y / self.cell_size).floor() as u32).min(self.grid_dim - 1);
        cy * self.grid_dim + cx
    }

    /// Cell id of the particle currently stored at `index`. Only valid
    /// between a rebuild and the next one.
    pub fn cell_of(&self, index: usize) -> u32 {
        self.cell_of[index]
    }

    /// Index range of the particles bucketed into `cell`.
    pub fn cell_span(&self, cell: u32) -> Range<usize> {
        let start = self.offsets[cell as usize] as usize;
        start..start + self.counts[cell as usize] as usize
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Re-buckets every particle. Side effect: the store's arrays are
    /// permuted in place, so particle indices do not survive a rebuild.
    pub fn rebuild(&mut self, particles: &mut ParticleStore) {
        let n = particles.len();

        let mut cells = std::mem::take(&mut self.cell_of);
        cells.clear();
        cells.extend(particles.positions.iter().map(|p| self.cell_index(p)));
        self.cell_of = cells;

        self.counts.fill(0);
        for &cell in &self.cell_of {
            self.counts[cell as usize] += 1;
        }

        let mut running = 0u32;
        for (offset, &count) in self.offsets.iter_mut().zip(&self.counts) {
            *offset = running;
            running += count;
        }

        // Scatter: each particle claims the next free slot of its cell.
        self.cursor.copy_from_slice(&self.offsets);
        self.order.clear();
        self.order.resize(n, 0);
        for (index, &cell) in self.cell_of.iter().enumerate() {
            let slot = self.cursor[cell as usize] as usize;
            self.order[slot] = index as u32;
            self.cursor[cell as usize] += 1;
        }

        particles.reorder(&self.order);

        self.scratch_cells.clear();
        self.scratch_cells
            .extend(self.order.iter().map(|&from| self.cell_of[from as usize]));
        std::mem::swap(&mut self.cell_of, &mut self.scratch_cells);
    }
}
