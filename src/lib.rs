//! Particle life simulation engine: typed point particles on a 2-D torus,
//! an asymmetric pairwise force law, uniform-grid neighbor lookup, and
//! friction-damped Euler integration. Rendering and input handling live in
//! the consumers of this crate; the engine only turns a configuration and a
//! seed into per-step particle snapshots.

pub mod config;
pub mod engine;
pub mod forces;
pub mod grid;
pub mod integrator;
pub mod matrix;
pub mod particles;

pub use config::{ConfigError, SimConfig};
pub use engine::{Simulation, StepSnapshot};
pub use grid::SpatialGrid;
pub use matrix::InteractionMatrix;
pub use particles::{ParticleStore, Position, Velocity};
