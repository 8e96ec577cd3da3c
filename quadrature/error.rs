use crate::config::ConfigError;
use thiserror::Error;

/// A comprehensive error type for rule generation.
#[derive(Error, Debug)]
pub enum QuadratureError {
    #[error("Quadrature order must be a positive integer, but was {0}.")]
    InvalidArgument(i64),

    #[error("Node index {index} is out of range for a {order}-point rule (expected 1..={order}).")]
    IndexOutOfRange { order: usize, index: usize },

    #[error(
        "Newton iteration for node {index} of the {order}-point rule did not converge after {iterations} iterations (last update {last_update:e})."
    )]
    ConvergenceFailure {
        order: usize,
        index: usize,
        iterations: usize,
        last_update: f64,
    },

    #[error("Internal error: assembled rule violates an invariant: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl QuadratureError {
    /// True for the errors a caller can trigger with bad input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            QuadratureError::InvalidArgument(_) | QuadratureError::IndexOutOfRange { .. }
        )
    }
}
