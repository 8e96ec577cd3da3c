//! Engine tunables, loadable from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! behaviour documented on the engines. A file only needs the keys it changes:
//!
//! ```toml
//! [fast]
//! correction_steps = 1
//!
//! [reference]
//! tolerance = 1e-14
//! max_iterations = 50
//!
//! [parallel]
//! enabled = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest number of Newton corrections the fast engine will apply.
pub const MAX_CORRECTION_STEPS: usize = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FastConfig {
    /// Newton corrections applied to interior estimates of large orders (1 or 2).
    /// Roots evaluated with the recurrence always take the maximum.
    pub correction_steps: usize,
}

impl Default for FastConfig {
    fn default() -> Self {
        Self {
            correction_steps: MAX_CORRECTION_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Newton stops once the magnitude of an update falls below this.
    pub tolerance: f64,
    /// Iterations allowed per node before reporting a convergence failure.
    pub max_iterations: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-15,
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    pub enabled: bool,
    /// Below this many half-rule roots the loop stays on the calling thread.
    pub min_roots: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_roots: 64,
        }
    }
}

impl ParallelConfig {
    pub fn should_parallelize(&self, roots: usize) -> bool {
        self.enabled && roots >= self.min_roots
    }
}

/// Top-level configuration shared by the CLI and the engines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuadratureConfig {
    pub fast: FastConfig,
    pub reference: ReferenceConfig,
    pub parallel: ParallelConfig,
}

impl QuadratureConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: QuadratureConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every field against the range the engines can honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CORRECTION_STEPS).contains(&self.fast.correction_steps) {
            return Err(ConfigError::Invalid {
                field: "fast.correction_steps",
                reason: format!(
                    "must be between 1 and {MAX_CORRECTION_STEPS}, got {}",
                    self.fast.correction_steps
                ),
            });
        }
        let tolerance = self.reference.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "reference.tolerance",
                reason: format!("must be finite and positive, got {tolerance}"),
            });
        }
        if self.reference.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "reference.max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
