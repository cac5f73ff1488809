//! Numeric precision of constellation coordinates.
//!
//! Every component is generic over `T: IqFloat`. `f32` is the working precision
//! of the BER pipeline; `f64` is available for callers that want more headroom.

use std::fmt::{Debug, Display};

use num_complex::Complex;
use num_traits::Float;
use rand::rngs::StdRng;

use crate::vector_simd;

pub trait IqFloat: Float + Debug + Display + Default + Send + Sync + 'static {
    /// Lossless for f64, rounding for f32
    fn from_f64(value: f64) -> Self;

    fn as_f64(self) -> f64;

    /// Batched AWGN kernel (8 symbols per step). Falls back to the scalar
    /// kernel when the `simd` feature is disabled.
    fn add_awgn_batched(symbols: &mut [Complex<Self>], sigma: f64, rng: &mut StdRng);
}

impl IqFloat for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }

    fn add_awgn_batched(symbols: &mut [Complex<f32>], sigma: f64, rng: &mut StdRng) {
        vector_simd::add_awgn_f32(symbols, sigma as f32, rng);
    }
}

impl IqFloat for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }

    fn add_awgn_batched(symbols: &mut [Complex<f64>], sigma: f64, rng: &mut StdRng) {
        vector_simd::add_awgn_f64(symbols, sigma, rng);
    }
}
