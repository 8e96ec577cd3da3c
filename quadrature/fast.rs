//! Fast Gauss-Legendre rules in effectively linear time.
//!
//! # Method
//!
//! Every node is handled in the angular coordinate `x = cos(theta)` until the last
//! moment. For index `k` (counting from the node nearest `x = 1`):
//!
//! 1. An initial angle comes from the Bessel-zero asymptotics of Legendre zeros,
//!    `theta = psi + (psi cot psi - 1) / (8 psi rho^2)` with `psi = j_{0,k} / rho`
//!    and `rho = n + 1/2`. The error is `O(rho^-4)`, which is already close to double
//!    precision for large `n`.
//! 2. A fixed number of Newton steps in `theta` removes what is left. Roots on the
//!    recurrence (small orders and the boundary zone) always take two: there the
//!    estimate can be off by `1e-4`, and one quadratic step leaves `1e-8`. Interior
//!    roots of large orders start within `O(rho^-4)` and take the configured count
//!    (two by default, one is enough).
//! 3. The weight is `2 / (dP_n/dtheta)^2`. This is the usual
//!    `2 / ((1 - x^2) P_n'(x)^2)` without ever forming `1 - x^2`, which loses all of
//!    its digits next to the endpoints.
//!
//! # Cost
//!
//! Newton needs `P_n` and its derivative. Near the endpoints (`n sin(theta)` small)
//! they come from the angular difference recurrence, `O(n)` per call. Everywhere else
//! the Stieltjes series gives them in a bounded number of terms. Only a fixed number
//! of roots ever sit in the boundary zone, so a full rule costs `O(n)`.
//!
//! There is no tolerance loop: the number of corrections is fixed, so the engine
//! always terminates and has no convergence failure to report.

use crate::assembly::assemble_rule;
use crate::bessel::j0_zero;
use crate::config::{MAX_CORRECTION_STEPS, QuadratureConfig};
use crate::error::QuadratureError;
use crate::legendre::{StieltjesSeries, eval_angular};
use crate::types::{NodeWeight, Order, QuadratureRule, RootEstimate};
use rayon::prelude::*;

/// Orders below this use the recurrence for every root.
const ASYMPTOTIC_MIN_ORDER: usize = 100;

/// Roots with `n sin(theta)` below this are evaluated with the recurrence.
const BOUNDARY_ZONE: f64 = 30.0;

/// Which evaluation kernel a root was refined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kernel {
    Recurrence,
    Series,
}

/// Per-order state shared by every index of one rule.
#[derive(Debug, Clone, Copy)]
struct FastPlan {
    n: usize,
    rho: f64,
    series_steps: usize,
    series: Option<StieltjesSeries>,
}

impl FastPlan {
    fn new(order: Order, series_steps: usize) -> Self {
        let n = order.get();
        let series = (n >= ASYMPTOTIC_MIN_ORDER).then(|| StieltjesSeries::new(n));
        Self {
            n,
            rho: n as f64 + 0.5,
            series_steps,
            series,
        }
    }

    fn initial_angle(&self, k: usize) -> f64 {
        let psi = j0_zero(k) / self.rho;
        let (s, c) = psi.sin_cos();
        psi + (psi * c / s - 1.0) / (8.0 * psi * self.rho * self.rho)
    }

    fn kernel_for(&self, theta: f64) -> Kernel {
        match self.series {
            Some(_) if self.n as f64 * theta.sin() >= BOUNDARY_ZONE => Kernel::Series,
            _ => Kernel::Recurrence,
        }
    }

    #[inline]
    fn eval(&self, kernel: Kernel, theta: f64) -> (f64, f64) {
        match (kernel, &self.series) {
            (Kernel::Series, Some(series)) => series.eval(theta),
            _ => eval_angular(self.n, theta),
        }
    }

    /// Node and weight for 1-based index `k <= ceil(n/2)`.
    fn root(&self, k: usize) -> (RootEstimate, Kernel) {
        let mut theta = self.initial_angle(k);
        let kernel = self.kernel_for(theta);
        let steps = match kernel {
            Kernel::Recurrence => MAX_CORRECTION_STEPS,
            Kernel::Series => self.series_steps,
        };
        for _ in 0..steps {
            let (p, dp) = self.eval(kernel, theta);
            theta -= p / dp;
        }
        let (_, dp) = self.eval(kernel, theta);
        (RootEstimate::from_angle(k, theta, 2.0 / (dp * dp)), kernel)
    }
}

/// Computes Gauss-Legendre rules from asymptotic estimates plus fixed corrections.
#[derive(Debug, Clone, Default)]
pub struct FastRootEngine {
    config: QuadratureConfig,
}

impl FastRootEngine {
    /// Creates an engine after checking the configuration.
    pub fn new(config: QuadratureConfig) -> Result<Self, QuadratureError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Computes the full `order`-point rule.
    pub fn compute(&self, order: i64) -> Result<QuadratureRule, QuadratureError> {
        let order = Order::new(order)?;
        if order.get() == 1 {
            return Ok(QuadratureRule::single_point());
        }

        let plan = FastPlan::new(order, self.config.fast.correction_steps);
        let half = order.half();
        let roots: Vec<(RootEstimate, Kernel)> =
            if self.config.parallel.should_parallelize(half) {
                (1..=half).into_par_iter().map(|k| plan.root(k)).collect()
            } else {
                (1..=half).map(|k| plan.root(k)).collect()
            };

        let boundary = roots
            .iter()
            .filter(|(_, kernel)| *kernel == Kernel::Recurrence)
            .count();
        log::debug!(
            "fast engine: order {order}, {half} roots, {boundary} on the recurrence, {} on the series",
            half - boundary
        );

        let estimates = roots.into_iter().map(|(estimate, _)| estimate).collect();
        assemble_rule(order, estimates)
    }

    /// Computes a single node/weight pair without building the rule.
    ///
    /// `index` is 1-based in ascending node order, so `pair(n, i)` equals entry `i - 1`
    /// of `compute(n)` bit for bit. Setting up the order costs `O(n)` once; the
    /// pair itself is `O(1)` away from the endpoints.
    pub fn pair(&self, order: i64, index: usize) -> Result<NodeWeight, QuadratureError> {
        let order = Order::new(order)?;
        let n = order.get();
        if index == 0 || index > n {
            return Err(QuadratureError::IndexOutOfRange { order: n, index });
        }
        if n == 1 {
            return Ok(NodeWeight {
                node: 0.0,
                weight: 2.0,
            });
        }

        let position = index - 1;
        let plan = FastPlan::new(order, self.config.fast.correction_steps);
        let (estimate, mirrored) = if position < n / 2 {
            (plan.root(position + 1).0, true)
        } else {
            (plan.root(n - position).0, false)
        };

        let node = if order.is_odd() && position == n / 2 {
            0.0
        } else if mirrored {
            -estimate.node
        } else {
            estimate.node
        };
        log::trace!("fast engine: pair {index} of order {n} at {node}");
        Ok(NodeWeight {
            node,
            weight: estimate.weight,
        })
    }
}

/// Computes the `order`-point rule with the fast engine and default configuration.
pub fn compute_fast(order: i64) -> Result<QuadratureRule, QuadratureError> {
    FastRootEngine::default().compute(order)
}
