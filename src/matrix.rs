use rand::rngs::SmallRng;
use rand::Rng;

/// Coefficients are drawn uniformly from (-1, 1) and scaled to this bound.
const COEFFICIENT_SCALE: f64 = 1.5;

/// Square table of per-type-pair interaction coefficients.
///
/// Row index is the influencing type, column index the influenced type. The
/// table is deliberately not symmetric: `get(a, b) != get(b, a)` produces
/// non-reciprocal chase/flee behavior between types `a` and `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    data: Vec<f64>,
    size: usize,
}

impl InteractionMatrix {
    /// An all-zero matrix; no type exerts any force on any other.
    pub fn zero(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Draws every coefficient from the given generator.
    pub fn from_rng(size: usize, rng: &mut SmallRng) -> Self {
        let mut matrix = Self::zero(size);
        matrix.randomize(rng);
        matrix
    }

    pub fn randomize(&mut self, rng: &mut SmallRng) {
        for value in &mut self.data {
            *value = rng.gen_range(-1.0..1.0) * COEFFICIENT_SCALE;
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Coefficient applied to a particle of type `influenced` by a neighbor
    /// of type `influencer`.
    pub fn get(&self, influencer: usize, influenced: usize) -> f64 {
        self.data[influencer * self.size + influenced]
    }

    pub fn set(&mut self, influencer: usize, influenced: usize, value: f64) {
        self.data[influencer * self.size + influenced] = value;
    }
}
