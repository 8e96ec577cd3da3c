use approx::assert_abs_diff_eq;
use fastgl::{FastRootEngine, QuadratureRule, compute_fast, compute_reference};

/// Orders at which the two engines must agree to `1e-14` element-wise.
const AGREEMENT_ORDERS: [i64; 12] = [
    4, 8, 16, 32, 64, 1000, 1024, 2048, 4096, 8192, 10000, 16384,
];

/// Exact rules for small orders as (node, weight) on the non-negative side.
fn closed_form(n: usize) -> Vec<(f64, f64)> {
    match n {
        2 => vec![(1.0 / 3.0_f64.sqrt(), 1.0)],
        3 => vec![(0.0, 8.0 / 9.0), ((3.0_f64 / 5.0).sqrt(), 5.0 / 9.0)],
        4 => {
            let r = 2.0 / 7.0 * (6.0_f64 / 5.0).sqrt();
            let s = 30.0_f64.sqrt();
            vec![
                ((3.0 / 7.0 - r).sqrt(), (18.0 + s) / 36.0),
                ((3.0 / 7.0 + r).sqrt(), (18.0 - s) / 36.0),
            ]
        }
        5 => {
            let r = 2.0 * (10.0_f64 / 7.0).sqrt();
            let s = 70.0_f64.sqrt();
            vec![
                (0.0, 128.0 / 225.0),
                ((5.0 - r).sqrt() / 3.0, (322.0 + 13.0 * s) / 900.0),
                ((5.0 + r).sqrt() / 3.0, (322.0 - 13.0 * s) / 900.0),
            ]
        }
        _ => unreachable!("no closed form tabulated for n = {n}"),
    }
}

fn assert_matches_closed_form(rule: &QuadratureRule) {
    let n = rule.order();
    let upper: Vec<(f64, f64)> = rule.pairs().skip(n / 2).map(|p| (p.node, p.weight)).collect();
    let expected = closed_form(n);
    assert_eq!(upper.len(), expected.len());
    for ((node, weight), (exact_node, exact_weight)) in upper.into_iter().zip(expected) {
        assert_abs_diff_eq!(node, exact_node, epsilon = 5e-15);
        assert_abs_diff_eq!(weight, exact_weight, epsilon = 5e-15);
    }
}

#[test]
fn fast_engine_matches_closed_forms() {
    for n in 2..=5 {
        assert_matches_closed_form(&compute_fast(n).unwrap());
    }
}

#[test]
fn reference_engine_matches_closed_forms() {
    for n in 2..=5 {
        assert_matches_closed_form(&compute_reference(n).unwrap());
    }
}

#[test]
fn rules_integrate_polynomials_exactly() {
    // An n-point rule is exact up to degree 2n - 1.
    for n in [2_usize, 3, 6, 11, 20] {
        for rule in [compute_fast(n as i64), compute_reference(n as i64)] {
            let rule = rule.unwrap();
            for degree in 0..2 * n {
                let quadrature: f64 = rule
                    .pairs()
                    .map(|p| p.weight * p.node.powi(degree as i32))
                    .sum();
                let exact = if degree % 2 == 0 {
                    2.0 / (degree as f64 + 1.0)
                } else {
                    0.0
                };
                assert_abs_diff_eq!(quadrature, exact, epsilon = 1e-13);
            }
        }
    }
}

#[test]
fn engines_agree_to_near_machine_precision() {
    for n in AGREEMENT_ORDERS {
        let fast = compute_fast(n).unwrap();
        let reference = compute_reference(n).unwrap();

        let node_error = fast
            .nodes()
            .iter()
            .zip(reference.nodes().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        let weight_error = fast
            .weights()
            .iter()
            .zip(reference.weights().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);

        assert!(node_error <= 1e-14, "n={n}: max node difference {node_error:e}");
        assert!(weight_error <= 1e-14, "n={n}: max weight difference {weight_error:e}");
    }
}

/// High-precision values `(k, node, weight)` for selected roots, with `k = 1` the
/// largest node. They come from 40-digit Newton iteration on the recurrence and
/// cover the endpoint, both sides of the boundary zone seam (`k = 9, 10`) and,
/// for n = 1000, the smallest positive node.
const ORDER_1000: [(usize, f64, f64); 7] = [
    (1, 0.9999971112980755105698763, 0.000007413338416432071517476832),
    (2, 0.9999847796329174183242981, 0.00001725676977373923011776458),
    (3, 0.9999625941483601532694611, 0.00002711460656520585698640452),
    (9, 0.9996224557554706442517927, 0.00008626190132806907932339119),
    (10, 0.9995312659933240084975233, 0.00009611747354547056604160744),
    (11, 0.9994302211236081140050035, 0.00010597210009901709716043),
    (500, 0.001570010480083193829005023, 0.003140018380182867786995939),
];

const ORDER_16384: [(usize, f64, f64); 7] = [
    (1, 0.9999999892286341837259549, 2.76428030277638781755629e-8),
    (2, 0.9999999432463155819676496, 6.434718267197287727766607e-8),
    (3, 0.999999860520596623880373, 0.0000001011059091242652310539133),
    (9, 0.9999985921288219163585996, 0.0000003216927838714604485338625),
    (10, 0.9999982520536292310592855, 0.0000003584576010243790949054788),
    (11, 0.9999978752136217651140639, 0.0000003952224125633083020332948),
    (8192, 0.00009587087330447833679901784, 0.0001917417460215095342273537),
];

fn assert_matches_high_precision(rule: &QuadratureRule, expected: &[(usize, f64, f64)]) {
    let n = rule.order();
    for &(k, node, weight) in expected {
        let position = n - k;
        assert_abs_diff_eq!(rule.nodes()[position], node, epsilon = 1e-14);
        assert_abs_diff_eq!(rule.weights()[position], weight, epsilon = 1e-14);
        // The mirror image carries the same values with the node negated.
        assert_eq!(rule.nodes()[k - 1], -rule.nodes()[position]);
    }
}

#[test]
fn both_engines_match_high_precision_values() {
    for (n, expected) in [(1000_i64, &ORDER_1000[..]), (16384, &ORDER_16384[..])] {
        assert_matches_high_precision(&compute_fast(n).unwrap(), expected);
        assert_matches_high_precision(&compute_reference(n).unwrap(), expected);
    }
}

#[test]
fn single_pairs_match_high_precision_values() {
    let engine = FastRootEngine::default();
    for &(k, node, weight) in &ORDER_16384 {
        let pair = engine.pair(16384, 16384 - k + 1).unwrap();
        assert_abs_diff_eq!(pair.node, node, epsilon = 1e-14);
        assert_abs_diff_eq!(pair.weight, weight, epsilon = 1e-14);
    }
}

#[test]
fn large_rule_integrates_an_oscillatory_function() {
    // integral of cos(50 x) over [-1, 1] is 2 sin(50) / 50.
    let rule = compute_fast(10_000).unwrap();
    let quadrature: f64 = rule.pairs().map(|p| p.weight * (50.0 * p.node).cos()).sum();
    assert_abs_diff_eq!(quadrature, 2.0 * 50.0_f64.sin() / 50.0, epsilon = 1e-13);
}

#[test]
fn endpoint_weights_keep_relative_accuracy() {
    // The weight next to x = 1 is of order 1/n^2. Forming 1 - x^2 there would cost
    // about half the digits, so compare relative rather than absolute error.
    let n = 16384;
    let fast = compute_fast(n).unwrap();
    let reference = compute_reference(n).unwrap();
    let last = n as usize - 1;
    let fast_weight = fast.weights()[last];
    let reference_weight = reference.weights()[last];
    assert!(fast_weight > 0.0 && fast_weight < 1e-6);
    assert!(
        ((fast_weight - reference_weight) / reference_weight).abs() < 1e-6,
        "{fast_weight:e} vs {reference_weight:e}"
    );
}
