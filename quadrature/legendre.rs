//! Evaluation kernels for the Legendre polynomial P_n.
//!
//! Three ways of getting P_n and its derivative at a point, each matched to a caller:
//!
//! - [`eval_x`] runs the textbook three-term recurrence in `x`. It is what the
//!   reference engine uses and deliberately carries no endpoint treatment.
//! - [`eval_angular`] runs the same recurrence rewritten for `x = cos(theta)`. It
//!   tracks the differences `P_j - P_{j-1}` and uses `x - 1 = -2 sin^2(theta/2)`,
//!   so nothing cancels as `theta -> 0`. It returns `dP_n/dtheta` directly.
//! - [`StieltjesSeries`] sums the large-n asymptotic expansion of `P_n(cos theta)`.
//!   Each evaluation costs a bounded number of terms instead of `O(n)`, which is
//!   what keeps the fast engine linear. It is only valid away from the endpoints.
//!
//! The angular kernels return `(P_n(cos theta), dP_n/dtheta)`. Since
//! `dP_n/dtheta = -sin(theta) P_n'(x)`, the Gauss weight is `2 / (dP_n/dtheta)^2`.

use std::f64::consts::{FRAC_PI_2, PI};

/// Value and x-derivative of P_n at `x`, for `n >= 1`.
///
/// The derivative comes from `(x^2 - 1) P_n' = n (x P_n - P_{n-1})`, so it is only
/// meaningful strictly inside (-1, 1).
pub fn eval_x(n: usize, x: f64) -> (f64, f64) {
    debug_assert!(n >= 1);
    let mut p_prev = 1.0; // P_0
    let mut p = x; // P_1
    for j in 1..n {
        let jf = j as f64;
        // (j+1) P_{j+1} = (2j+1) x P_j - j P_{j-1}
        let p_next = ((2.0 * jf + 1.0) * x * p - jf * p_prev) / (jf + 1.0);
        p_prev = p;
        p = p_next;
    }
    let dp = n as f64 * (x * p - p_prev) / ((x - 1.0) * (x + 1.0));
    (p, dp)
}

/// Value and theta-derivative of `P_n(cos theta)`, for `n >= 1` and `0 < theta < pi`.
///
/// With `D_j = P_j - P_{j-1}` the recurrence becomes
/// `(j+1) D_{j+1} = (2j+1)(x-1) P_j + j D_j` and `P_{j+1} = P_j + D_{j+1}`.
pub fn eval_angular(n: usize, theta: f64) -> (f64, f64) {
    debug_assert!(n >= 1);
    let half_sin = (0.5 * theta).sin();
    let x_minus_one = -2.0 * half_sin * half_sin;
    let mut p = 1.0 + x_minus_one; // P_1
    let mut d = x_minus_one; // P_1 - P_0
    for j in 1..n {
        let jf = j as f64;
        d = ((2.0 * jf + 1.0) * x_minus_one * p + jf * d) / (jf + 1.0);
        p += d;
    }
    // dP/dtheta = n (x P_n - P_{n-1}) / sin(theta) = n ((x-1) P_n + D_n) / sin(theta)
    let dp = n as f64 * (x_minus_one * p + d) / theta.sin();
    (p, dp)
}

/// Upper bound on the number of series terms summed per evaluation.
const STIELTJES_MAX_TERMS: usize = 40;

/// Terms whose amplitude falls below this fraction of the leading one are dropped.
const STIELTJES_CUTOFF: f64 = 1e-17;

/// The Stieltjes expansion
///
/// `P_n(cos t) = C_n sum_m h_m cos((n+m+1/2) t - (m+1/2) pi/2) / (2 sin t)^(m+1/2)`
///
/// with `C_n = (4/pi) prod_{j=1..n} j/(j+1/2)`, `h_0 = 1` and
/// `h_{m+1} = h_m (m+1/2)^2 / ((m+1)(n+m+3/2))`.
///
/// The constant is computed once per order; evaluations are then `O(1)`. Accuracy
/// depends on `n sin(t)`: the ratio of consecutive terms is roughly
/// `(m+1/2) / (2 n sin t)`, so callers keep to `n sin(t)` of a few tens or more.
#[derive(Debug, Clone, Copy)]
pub struct StieltjesSeries {
    n: usize,
    scale: f64,
}

impl StieltjesSeries {
    pub fn new(n: usize) -> Self {
        let product = (1..=n).fold(1.0_f64, |acc, j| {
            let jf = j as f64;
            acc * (jf / (jf + 0.5))
        });
        Self {
            n,
            scale: 4.0 / PI * product,
        }
    }

    /// `(P_n(cos theta), dP_n/dtheta)` from the truncated series.
    pub fn eval(&self, theta: f64) -> (f64, f64) {
        let nf = self.n as f64;
        let rho = nf + 0.5;
        let (s, c) = theta.sin_cos();
        let two_sin = 2.0 * s;
        let cot = c / s;

        let leading = 1.0 / two_sin.sqrt();
        let mut amplitude = leading;
        let mut value = 0.0;
        let mut slope = 0.0;

        for m in 0..STIELTJES_MAX_TERMS {
            let mf = m as f64;
            let frequency = rho + mf;
            let phase = frequency * theta - (mf + 0.5) * FRAC_PI_2;
            let (sin_phase, cos_phase) = phase.sin_cos();

            value += amplitude * cos_phase;
            slope -= amplitude * (frequency * sin_phase + (mf + 0.5) * cot * cos_phase);

            let half = mf + 0.5;
            amplitude *= half * half / ((mf + 1.0) * (nf + mf + 1.5) * two_sin);
            if amplitude < STIELTJES_CUTOFF * leading {
                break;
            }
        }

        (self.scale * value, self.scale * slope)
    }
}
