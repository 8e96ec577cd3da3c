//! Zeros of the Bessel function J0.
//!
//! Legendre zeros approach `j_{0,k} / (n + 1/2)` in the angular coordinate, so the
//! fast engine needs `j_{0,k}` for every index it computes. The first twenty are
//! tabulated; beyond that McMahon's expansion is already accurate to a few ulps.

use std::f64::consts::PI;

/// j_{0,k} for k = 1..=20.
const J0_ZEROS: [f64; 20] = [
    2.404_825_557_695_773,
    5.520_078_110_286_311,
    8.653_727_912_911_013,
    11.791_534_439_014_281,
    14.930_917_708_487_787,
    18.071_063_967_910_924,
    21.211_636_629_879_26,
    24.352_471_530_749_302,
    27.493_479_132_040_253,
    30.634_606_468_431_976,
    33.775_820_213_573_57,
    36.917_098_353_664_045,
    40.058_425_764_628_24,
    43.199_791_713_176_73,
    46.341_188_371_661_815,
    49.482_609_897_397_815,
    52.624_051_841_115,
    55.765_510_755_019_98,
    58.906_983_926_080_94,
    62.048_469_190_227_166,
];

/// The k-th positive zero of J0, 1-based.
pub fn j0_zero(k: usize) -> f64 {
    debug_assert!(k >= 1, "Bessel zeros are indexed from 1");
    if k <= J0_ZEROS.len() {
        return J0_ZEROS[k - 1];
    }
    mcmahon(k)
}

/// McMahon's large-k expansion of j_{0,k} in powers of 1/beta, beta = (k - 1/4) pi.
fn mcmahon(k: usize) -> f64 {
    let beta = (k as f64 - 0.25) * PI;
    let b = 1.0 / (8.0 * beta);
    let b2 = b * b;
    // Coefficients of b, b^3, b^5, b^7 for order zero.
    beta + b
        * (1.0
            + b2 * (-124.0 / 3.0
                + b2 * (120_928.0 / 15.0 + b2 * (-401_743_168.0 / 105.0))))
}
