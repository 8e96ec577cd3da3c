//! Shared assembly of a full rule from the half computed by an engine.
//!
//! Both engines hand over `ceil(n/2)` estimates for the non-negative side. This module
//! mirrors them into ascending order and checks every rule invariant, so the two
//! engines can only differ in the numbers they compute, never in the shape of what
//! they return.

use crate::error::QuadratureError;
use crate::types::{Order, QuadratureRule, RootEstimate};
use itertools::Itertools;
use ndarray::Array1;

/// Allowed distance of the weight sum from 2 before a rule is rejected.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-11;

/// Mirrors the half-rule into a full ascending rule and validates it.
///
/// Estimate `k` (1-based, largest node first) is written to slot `n - k` and its
/// reflection to slot `k - 1`. For odd `n` the middle estimate lands on a single slot
/// and its node is forced to exactly `0.0`, which is the true root and the only value
/// that satisfies exact symmetry.
pub fn assemble_rule(
    order: Order,
    estimates: Vec<RootEstimate>,
) -> Result<QuadratureRule, QuadratureError> {
    let n = order.get();
    if estimates.len() != order.half() {
        return Err(QuadratureError::InvariantViolation(format!(
            "expected {} half-rule estimates for order {n}, got {}",
            order.half(),
            estimates.len()
        )));
    }

    let mut nodes = Array1::<f64>::zeros(n);
    let mut weights = Array1::<f64>::zeros(n);
    let mut filled = vec![false; n];

    for estimate in estimates {
        let k = estimate.index;
        if k == 0 || k > order.half() {
            return Err(QuadratureError::InvariantViolation(format!(
                "estimate index {k} outside 1..={}",
                order.half()
            )));
        }
        let upper = n - k;
        let lower = k - 1;
        if filled[upper] {
            return Err(QuadratureError::InvariantViolation(format!(
                "estimate index {k} produced twice"
            )));
        }

        if upper == lower {
            nodes[upper] = 0.0;
            weights[upper] = estimate.weight;
        } else {
            nodes[upper] = estimate.node;
            nodes[lower] = -estimate.node;
            weights[upper] = estimate.weight;
            weights[lower] = estimate.weight;
            filled[lower] = true;
        }
        filled[upper] = true;
    }

    let rule = QuadratureRule::from_parts(order, nodes, weights);
    validate_rule(&rule)?;
    Ok(rule)
}

/// Checks the structural and numerical invariants every rule must satisfy.
pub fn validate_rule(rule: &QuadratureRule) -> Result<(), QuadratureError> {
    let n = rule.order();
    let nodes = rule.nodes();
    let weights = rule.weights();

    if nodes.len() != n || weights.len() != n {
        return Err(QuadratureError::InvariantViolation(format!(
            "order {n} but {} nodes and {} weights",
            nodes.len(),
            weights.len()
        )));
    }

    if let Some((i, &x)) = nodes
        .iter()
        .enumerate()
        .find(|&(_, &x)| !(x > -1.0 && x < 1.0))
    {
        return Err(QuadratureError::InvariantViolation(format!(
            "node {i} = {x} is not inside (-1, 1)"
        )));
    }

    if let Some((i, &w)) = weights
        .iter()
        .enumerate()
        .find(|&(_, &w)| !(w.is_finite() && w > 0.0))
    {
        return Err(QuadratureError::InvariantViolation(format!(
            "weight {i} = {w} is not finite and positive"
        )));
    }

    if let Some((i, (a, b))) = nodes
        .iter()
        .tuple_windows()
        .enumerate()
        .find(|(_, (a, b))| a >= b)
    {
        return Err(QuadratureError::InvariantViolation(format!(
            "nodes {i} and {} are not strictly increasing ({a} >= {b})",
            i + 1
        )));
    }

    for k in 0..n / 2 {
        let mirror = n - 1 - k;
        if nodes[k] != -nodes[mirror] || weights[k] != weights[mirror] {
            return Err(QuadratureError::InvariantViolation(format!(
                "slots {k} and {mirror} are not mirror images"
            )));
        }
    }

    let sum = rule.weight_sum();
    if (sum - 2.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(QuadratureError::InvariantViolation(format!(
            "weights sum to {sum}, expected 2"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(n: i64) -> Order {
        Order::new(n).unwrap()
    }

    #[test]
    fn mirrors_even_order() {
        // Two-point rule: nodes at +-1/sqrt(3), unit weights.
        let x = 1.0 / 3.0_f64.sqrt();
        let rule = assemble_rule(
            order(2),
            vec![RootEstimate {
                index: 1,
                node: x,
                weight: 1.0,
            }],
        )
        .unwrap();
        assert_eq!(rule.nodes().to_vec(), vec![-x, x]);
        assert_eq!(rule.weights().to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn odd_order_middle_node_is_exact_zero() {
        let x = (0.6_f64).sqrt();
        // The middle estimate carries cos(pi/2), which is not exactly zero.
        let estimates = vec![
            RootEstimate {
                index: 2,
                node: std::f64::consts::FRAC_PI_2.cos(),
                weight: 8.0 / 9.0,
            },
            RootEstimate {
                index: 1,
                node: x,
                weight: 5.0 / 9.0,
            },
        ];
        let rule = assemble_rule(order(3), estimates).unwrap();
        assert_eq!(rule.nodes()[1], 0.0);
        assert_eq!(rule.nodes()[0], -x);
        assert_eq!(rule.nodes()[2], x);
    }

    #[test]
    fn rejects_wrong_estimate_count() {
        let err = assemble_rule(order(4), vec![]).unwrap_err();
        assert!(matches!(err, QuadratureError::InvariantViolation(_)));
    }

    #[test]
    fn rejects_duplicate_index() {
        let estimate = RootEstimate {
            index: 1,
            node: 0.8611363115940526,
            weight: 0.3478548451374538,
        };
        let err = assemble_rule(order(4), vec![estimate, estimate]).unwrap_err();
        assert!(matches!(err, QuadratureError::InvariantViolation(msg) if msg.contains("twice")));
    }

    #[test]
    fn rejects_bad_weight_sum() {
        let x = 1.0 / 3.0_f64.sqrt();
        let err = assemble_rule(
            order(2),
            vec![RootEstimate {
                index: 1,
                node: x,
                weight: 0.9,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, QuadratureError::InvariantViolation(msg) if msg.contains("sum")));
    }

    #[test]
    fn rejects_out_of_order_nodes() {
        // Index 1 must be the largest node; swapping the estimates breaks ordering.
        let estimates = vec![
            RootEstimate {
                index: 1,
                node: 0.3399810435848563,
                weight: 0.6521451548625461,
            },
            RootEstimate {
                index: 2,
                node: 0.8611363115940526,
                weight: 0.3478548451374538,
            },
        ];
        let err = assemble_rule(order(4), estimates).unwrap_err();
        assert!(
            matches!(err, QuadratureError::InvariantViolation(msg) if msg.contains("increasing"))
        );
    }

    #[test]
    fn rejects_node_on_boundary() {
        let err = assemble_rule(
            order(2),
            vec![RootEstimate {
                index: 1,
                node: 1.0,
                weight: 1.0,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, QuadratureError::InvariantViolation(msg) if msg.contains("(-1, 1)")));
    }
}
