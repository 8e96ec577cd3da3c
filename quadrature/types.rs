// ========================================================================================
//
//                       CORE DATA TYPES FOR THE FASTGL ENGINES
//
// ========================================================================================
//
// Types shared across the engine boundary: the validated order, the per-index working
// value handed from an engine to assembly, and the finished rule. Engine-private
// helpers stay in their own files.

use crate::error::QuadratureError;
use ndarray::Array1;
use serde::Serialize;

// ========================================================================================
//                                   VALIDATED ORDER
// ========================================================================================

/// A quadrature order that is known to be a positive integer.
///
/// `Order::new` is the only place an `InvalidArgument` originates, so both engines
/// reject bad input identically and before any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Order(usize);

impl Order {
    pub fn new(order: i64) -> Result<Self, QuadratureError> {
        if order < 1 {
            return Err(QuadratureError::InvalidArgument(order));
        }
        usize::try_from(order)
            .map(Order)
            .map_err(|_| QuadratureError::InvalidArgument(order))
    }

    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of indices computed explicitly; the rest follow by symmetry.
    #[inline(always)]
    pub const fn half(self) -> usize {
        self.0.div_ceil(2)
    }

    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ========================================================================================
//                                PER-INDEX WORKING VALUE
// ========================================================================================

/// One computed root on the non-negative side of the interval.
///
/// `index` is 1-based and counts from the node closest to `x = 1`, so index 1 is the
/// largest node. Only indices `1..=ceil(n/2)` are ever produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate {
    pub index: usize,
    pub node: f64,
    pub weight: f64,
}

impl RootEstimate {
    /// Builds an estimate from the angular coordinate, `x = cos(theta)`.
    #[inline]
    pub fn from_angle(index: usize, theta: f64, weight: f64) -> Self {
        Self {
            index,
            node: theta.cos(),
            weight,
        }
    }
}

// ========================================================================================
//                                   THE FINISHED RULE
// ========================================================================================

/// A single node and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NodeWeight {
    pub node: f64,
    pub weight: f64,
}

/// An n-point Gauss-Legendre rule on `[-1, 1]`.
///
/// Nodes are strictly increasing, weights are positive, and the rule is exactly
/// symmetric: `nodes[k] == -nodes[n - 1 - k]` and `weights[k] == weights[n - 1 - k]`.
/// Instances only come out of the assembly step, which checks all of this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadratureRule {
    order: usize,
    nodes: Array1<f64>,
    weights: Array1<f64>,
}

impl QuadratureRule {
    pub(crate) fn from_parts(order: Order, nodes: Array1<f64>, weights: Array1<f64>) -> Self {
        Self {
            order: order.get(),
            nodes,
            weights,
        }
    }

    /// The rule for `n = 1`.
    pub(crate) fn single_point() -> Self {
        Self {
            order: 1,
            nodes: Array1::from_elem(1, 0.0),
            weights: Array1::from_elem(1, 2.0),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn nodes(&self) -> &Array1<f64> {
        &self.nodes
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.sum()
    }

    /// Node/weight pairs in ascending node order.
    pub fn pairs(&self) -> impl ExactSizeIterator<Item = NodeWeight> + '_ {
        self.nodes
            .iter()
            .zip(self.weights.iter())
            .map(|(&node, &weight)| NodeWeight { node, weight })
    }

    pub fn into_arrays(self) -> (Array1<f64>, Array1<f64>) {
        (self.nodes, self.weights)
    }

    pub fn into_vecs(self) -> (Vec<f64>, Vec<f64>) {
        (self.nodes.to_vec(), self.weights.to_vec())
    }
}
