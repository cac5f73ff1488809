use std::f64::consts::SQRT_2;

use crate::mod_type::ModType;
use crate::vector_ops::db_to_linear;

/// Gaussian tail probability Q(x) = 0.5 * erfc(x / sqrt(2))
pub fn q_function(x: f64) -> f64 {
    0.5 * erfc_approx(x / SQRT_2)
}

/// Complementary error function (Abramowitz & Stegun 7.1.26, |error| < 1.5e-7)
fn erfc_approx(x: f64) -> f64 {
    if x < 0.0 {
        return 2.0 - erfc_approx(-x);
    }

    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    poly * (-x * x).exp()
}

/// Approximate AWGN bit error rate for `mod_type` at a per-symbol SNR (Es/N0) in dB.
///
/// 16/64-QAM use the nearest-neighbour Gray approximation
/// `(4/k)(1 - 1/sqrt(M)) Q(sqrt(3 snr / (M - 1)))`. The QPSK table
/// is not Gray coded, so its rate is computed exactly per axis: each axis
/// decision fails with `p = Q(sqrt(snr))`. The first bit follows the Q sign
/// and the second bit is the XOR of both signs, so it flips whenever exactly
/// one axis fails.
pub fn theoretical_ber(mod_type: ModType, snr_db: f64) -> f64 {
    let snr = db_to_linear(snr_db);

    match mod_type {
        ModType::Qpsk => {
            let p = q_function(snr.sqrt());
            (p + 2.0 * p * (1.0 - p)) / 2.0
        }
        ModType::Qam16 | ModType::Qam64 => {
            let m = mod_type.order() as f64;
            let k = mod_type.bits_per_symbol() as f64;
            let arg = (3.0 * snr / (m - 1.0)).sqrt();
            ((4.0 / k) * (1.0 - 1.0 / m.sqrt()) * q_function(arg)).min(0.5)
        }
    }
}
