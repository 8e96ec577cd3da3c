#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(unused_variables)]

//! Gauss-Legendre quadrature rules on `[-1, 1]`.
//!
//! Two engines produce the same [`QuadratureRule`]:
//!
//! - [`FastRootEngine`] computes every node from an asymptotic estimate plus a fixed
//!   number of Newton corrections in the angular coordinate, in `O(n)` total.
//! - [`ReferenceRootEngine`] runs classic Newton iteration in `x` on the three-term
//!   recurrence, in `O(n^2)`. It is the baseline the fast engine is measured against.
//!
//! ```no_run
//! let rule = fastgl::compute_fast(1000)?;
//! let integral: f64 = rule
//!     .pairs()
//!     .map(|p| p.weight * (3.0 * p.node).cos())
//!     .sum();
//! # Ok::<(), fastgl::QuadratureError>(())
//! ```

pub mod assembly;
pub mod bessel;
pub mod config;
pub mod error;
pub mod fast;
pub mod legendre;
pub mod reference;
pub mod types;

pub use config::{ConfigError, QuadratureConfig};
pub use error::QuadratureError;
pub use fast::{FastRootEngine, compute_fast};
pub use reference::{ReferenceRootEngine, compute_reference};
pub use types::{NodeWeight, Order, QuadratureRule};
