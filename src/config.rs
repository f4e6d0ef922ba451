use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised when simulation parameters fail validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Indicates a parameter value the engine cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Static parameters for one simulation run.
///
/// Validated once up front; a `Simulation` can only be built from a config
/// that passed [`SimConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Number of particles in the simulation
    pub particle_count: usize,
    /// Edge length of the square toroidal domain
    pub map_size: f64,
    /// Number of distinct particle types
    pub num_types: usize,
    /// Distance below which the linear repulsion/attraction ramp applies
    pub min_radius: f64,
    /// Distance beyond which particles no longer interact
    pub max_radius: f64,
    /// Edge length of one spatial grid cell; must cover `max_radius`
    pub cell_size: f64,
    /// Multiplicative per-tick velocity damping factor
    pub friction: f64,
    /// Integration time step
    pub dt: f64,
    /// Speed ceiling applied after each integration step
    pub max_speed: f64,
    /// Additive slack on the squared-distance interaction cutoff
    pub range_epsilon: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 20_000,
            map_size: 400.0,
            num_types: 6,
            min_radius: 3.0,
            max_radius: 21.0,
            cell_size: 21.0,
            friction: 0.4,
            dt: 0.1,
            max_speed: 10.0,
            range_epsilon: 1.0,
        }
    }
}

impl SimConfig {
    const SETTINGS_FILE: &'static str = "settings.toml";

    /// Loads the config from `settings.toml`, or returns the defaults if the
    /// file doesn't exist. The loaded config is validated before use.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(Self::SETTINGS_FILE).exists() {
            let contents = fs::read_to_string(Self::SETTINGS_FILE)?;
            let config: SimConfig = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks every precondition the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size <= 0.0 {
            return Err(ConfigError::InvalidConfig("map_size must be positive"));
        }
        if self.num_types < 1 {
            return Err(ConfigError::InvalidConfig("num_types must be at least 1"));
        }
        if self.min_radius < 0.0 {
            return Err(ConfigError::InvalidConfig("min_radius must not be negative"));
        }
        if self.min_radius >= self.max_radius {
            return Err(ConfigError::InvalidConfig(
                "min_radius must be smaller than max_radius",
            ));
        }
        // The 3x3 neighborhood search only sees adjacent cells; a cell must
        // therefore cover the full interaction radius.
        if self.cell_size < self.max_radius {
            return Err(ConfigError::InvalidConfig(
                "cell_size must be at least max_radius",
            ));
        }
        if self.friction <= 0.0 {
            return Err(ConfigError::InvalidConfig("friction must be positive"));
        }
        if self.dt <= 0.0 {
            return Err(ConfigError::InvalidConfig("dt must be positive"));
        }
        if self.max_speed <= 0.0 {
            return Err(ConfigError::InvalidConfig("max_speed must be positive"));
        }
        if self.range_epsilon < 0.0 {
            return Err(ConfigError::InvalidConfig(
                "range_epsilon must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().expect("default config");
    }

    #[test]
    fn rejects_undersized_cells() {
        let config = SimConfig {
            cell_size: 10.0,
            max_radius: 21.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_radii() {
        let config = SimConfig {
            min_radius: 21.0,
            max_radius: 3.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_scalars() {
        for mutate in [
            (|c: &mut SimConfig| c.map_size = 0.0) as fn(&mut SimConfig),
            |c| c.num_types = 0,
            |c| c.friction = 0.0,
            |c| c.dt = -0.1,
            |c| c.max_speed = 0.0,
            |c| c.range_epsilon = -1.0,
        ] {
            let mut config = SimConfig::default();
            mutate(&mut config);
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn zero_particles_is_a_valid_config() {
        let config = SimConfig {
            particle_count: 0,
            ..SimConfig::default()
        };
        config.validate().expect("empty runs are quiescent, not invalid");
    }
}
