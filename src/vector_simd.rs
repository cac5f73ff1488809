//! Batched AWGN kernels.
//!
//! Symbols are split into I and Q lanes and processed 8 at a time. Noise is
//! drawn per symbol, I then Q, in the sample precision. The output is
//! statistically equivalent to the scalar path but not bit-identical.

use num_complex::Complex;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

/// Number of symbols processed per SIMD step
pub const LANES: usize = 8;

/// Add N(0, sigma) noise to each I and Q component, 8 symbols per step
///
/// # Arguments
/// * `symbols` - Symbols to corrupt in place
/// * `sigma` - Standard deviation of each component
/// * `rng` - Generator the normal draws are taken from
#[cfg(feature = "simd")]
pub fn add_awgn_f32(symbols: &mut [Complex<f32>], sigma: f32, rng: &mut StdRng) {
    use wide::f32x8;

    let sigma_v = f32x8::splat(sigma);
    let mut chunks = symbols.chunks_exact_mut(LANES);

    for chunk in &mut chunks {
        let mut re = [0.0f32; LANES];
        let mut im = [0.0f32; LANES];
        let mut noise_re = [0.0f32; LANES];
        let mut noise_im = [0.0f32; LANES];

        for (j, s) in chunk.iter().enumerate() {
            re[j] = s.re;
            im[j] = s.im;
            noise_re[j] = StandardNormal.sample(rng);
            noise_im[j] = StandardNormal.sample(rng);
        }

        let out_re = (f32x8::from(re) + f32x8::from(noise_re) * sigma_v).to_array();
        let out_im = (f32x8::from(im) + f32x8::from(noise_im) * sigma_v).to_array();

        for (j, s) in chunk.iter_mut().enumerate() {
            s.re = out_re[j];
            s.im = out_im[j];
        }
    }

    // Handle remaining symbols
    for s in chunks.into_remainder() {
        let n_re: f32 = StandardNormal.sample(rng);
        let n_im: f32 = StandardNormal.sample(rng);
        s.re += n_re * sigma;
        s.im += n_im * sigma;
    }
}

/// f64 variant: each 8-symbol step is two f64x4 halves per axis
#[cfg(feature = "simd")]
pub fn add_awgn_f64(symbols: &mut [Complex<f64>], sigma: f64, rng: &mut StdRng) {
    use wide::f64x4;

    let sigma_v = f64x4::splat(sigma);
    let mut chunks = symbols.chunks_exact_mut(LANES);

    for chunk in &mut chunks {
        let mut re = [[0.0f64; 4]; 2];
        let mut im = [[0.0f64; 4]; 2];
        let mut noise_re = [[0.0f64; 4]; 2];
        let mut noise_im = [[0.0f64; 4]; 2];

        for (j, s) in chunk.iter().enumerate() {
            let (half, k) = (j / 4, j % 4);
            re[half][k] = s.re;
            im[half][k] = s.im;
            noise_re[half][k] = StandardNormal.sample(rng);
            noise_im[half][k] = StandardNormal.sample(rng);
        }

        for half in 0..2 {
            let r = (f64x4::from(re[half]) + f64x4::from(noise_re[half]) * sigma_v).to_array();
            let i = (f64x4::from(im[half]) + f64x4::from(noise_im[half]) * sigma_v).to_array();
            for k in 0..4 {
                chunk[half * 4 + k].re = r[k];
                chunk[half * 4 + k].im = i[k];
            }
        }
    }

    for s in chunks.into_remainder() {
        let n_re: f64 = StandardNormal.sample(rng);
        let n_im: f64 = StandardNormal.sample(rng);
        s.re += n_re * sigma;
        s.im += n_im * sigma;
    }
}

#[cfg(not(feature = "simd"))]
pub fn add_awgn_f32(symbols: &mut [Complex<f32>], sigma: f32, rng: &mut StdRng) {
    for s in symbols.iter_mut() {
        let n_re: f32 = StandardNormal.sample(rng);
        let n_im: f32 = StandardNormal.sample(rng);
        s.re += n_re * sigma;
        s.im += n_im * sigma;
    }
}

#[cfg(not(feature = "simd"))]
pub fn add_awgn_f64(symbols: &mut [Complex<f64>], sigma: f64, rng: &mut StdRng) {
    for s in symbols.iter_mut() {
        let n_re: f64 = StandardNormal.sample(rng);
        let n_im: f64 = StandardNormal.sample(rng);
        s.re += n_re * sigma;
        s.im += n_im * sigma;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn component_variance(symbols: &[Complex<f32>]) -> (f64, f64) {
        let n = symbols.len() as f64;
        let var_re = symbols.iter().map(|s| (s.re as f64).powi(2)).sum::<f64>() / n;
        let var_im = symbols.iter().map(|s| (s.im as f64).powi(2)).sum::<f64>() / n;
        (var_re, var_im)
    }

    #[test]
    fn test_f32_kernel_variance() {
        let mut rng = StdRng::seed_from_u64(7);
        // 20003 is deliberately not a multiple of LANES
        let mut symbols = vec![Complex::new(0.0f32, 0.0); 20003];
        add_awgn_f32(&mut symbols, 0.5, &mut rng);

        let (var_re, var_im) = component_variance(&symbols);
        assert!((var_re - 0.25).abs() < 0.02, "I variance {}", var_re);
        assert!((var_im - 0.25).abs() < 0.02, "Q variance {}", var_im);
    }

    #[test]
    fn test_f64_kernel_zero_sigma_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let original: Vec<Complex<f64>> = (0..19).map(|k| Complex::new(k as f64, -(k as f64))).collect();
        let mut symbols = original.clone();
        add_awgn_f64(&mut symbols, 0.0, &mut rng);
        assert_eq!(symbols, original);
    }

    #[test]
    fn test_tail_symbols_are_corrupted() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut symbols = vec![Complex::new(1.0f32, 1.0); LANES + 3];
        add_awgn_f32(&mut symbols, 1.0, &mut rng);
        for s in &symbols[LANES..] {
            assert!(s.re != 1.0 || s.im != 1.0);
        }
    }
}
