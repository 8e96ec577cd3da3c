//! Reference engine: classic Newton iteration in `x` on the three-term recurrence.
//!
//! Every node costs `O(n)` per iteration, so a full rule is `O(n^2)`. It exists to be
//! the independent baseline the fast engine is checked and benchmarked against, and
//! intentionally keeps the textbook form with no endpoint treatment.

use crate::assembly::assemble_rule;
use crate::config::{QuadratureConfig, ReferenceConfig};
use crate::error::QuadratureError;
use crate::legendre::eval_x;
use crate::types::{Order, QuadratureRule, RootEstimate};
use rayon::prelude::*;
use std::f64::consts::PI;

/// Computes Gauss-Legendre rules by iterating Newton to a tolerance.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRootEngine {
    config: QuadratureConfig,
}

impl ReferenceRootEngine {
    /// Creates an engine after checking the configuration.
    pub fn new(config: QuadratureConfig) -> Result<Self, QuadratureError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Computes the full `order`-point rule.
    ///
    /// Fails with `ConvergenceFailure` if any root does not settle within the
    /// configured iteration budget.
    pub fn compute(&self, order: i64) -> Result<QuadratureRule, QuadratureError> {
        let order = Order::new(order)?;
        if order.get() == 1 {
            return Ok(QuadratureRule::single_point());
        }

        let n = order.get();
        let half = order.half();
        let settings = self.config.reference;
        let estimates: Vec<RootEstimate> = if self.config.parallel.should_parallelize(half) {
            (1..=half)
                .into_par_iter()
                .map(|k| newton_root(n, k, &settings))
                .collect::<Result<_, _>>()?
        } else {
            (1..=half)
                .map(|k| newton_root(n, k, &settings))
                .collect::<Result<_, _>>()?
        };

        log::debug!("reference engine: order {order}, {half} roots converged");
        assemble_rule(order, estimates)
    }
}

/// Newton iteration for root `k` of `P_n`, starting from Tricomi's `cos(pi (k - 1/4) / (n + 1/2))`.
fn newton_root(
    n: usize,
    k: usize,
    settings: &ReferenceConfig,
) -> Result<RootEstimate, QuadratureError> {
    let mut x = (PI * (k as f64 - 0.25) / (n as f64 + 0.5)).cos();
    let mut last_update = f64::INFINITY;

    for iteration in 1..=settings.max_iterations {
        let (p, dp) = eval_x(n, x);
        let update = p / dp;
        x -= update;
        last_update = update.abs();
        if last_update < settings.tolerance {
            let (_, dp) = eval_x(n, x);
            let weight = 2.0 / ((1.0 - x) * (1.0 + x) * dp * dp);
            log::trace!("reference engine: root {k} of {n} after {iteration} iterations");
            return Ok(RootEstimate {
                index: k,
                node: x,
                weight,
            });
        }
    }

    log::warn!(
        "reference engine: root {k} of order {n} did not converge in {} iterations (last update {last_update:e})",
        settings.max_iterations
    );
    Err(QuadratureError::ConvergenceFailure {
        order: n,
        index: k,
        iterations: settings.max_iterations,
        last_update,
    })
}

/// Computes the `order`-point rule with the reference engine and default configuration.
pub fn compute_reference(order: i64) -> Result<QuadratureRule, QuadratureError> {
    ReferenceRootEngine::default().compute(order)
}
