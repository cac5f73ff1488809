use num_complex::Complex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use tracing::warn;

use crate::sample::IqFloat;
use crate::vector_ops::{db_to_linear, mean_power};

/// How noise is added to a block of symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseStrategy {
    /// One symbol at a time
    Scalar,
    /// 8 symbols per step using `wide` lanes (needs the `simd` feature)
    Simd,
}

impl NoiseStrategy {
    /// `Simd` when compiled with the `simd` feature, otherwise `Scalar`
    pub fn detect() -> Self {
        if cfg!(feature = "simd") {
            NoiseStrategy::Simd
        } else {
            NoiseStrategy::Scalar
        }
    }
}

impl Default for NoiseStrategy {
    fn default() -> Self {
        Self::detect()
    }
}

/// Additive White Gaussian Noise channel calibrated to a target SNR.
///
/// The SNR is relative to the measured average power of each input block:
/// noise_power = signal_power / 10^(snr_db/10), split evenly between I and Q,
/// so each component is N(0, sigma) with sigma = sqrt(noise_power/2).
///
/// The generator state is private to the instance; consecutive calls draw
/// fresh noise.
#[derive(Debug)]
pub struct NoiseChannel {
    snr_db: f64,
    strategy: NoiseStrategy,
    rng: StdRng,
}

impl NoiseChannel {
    /// Create a channel from a seed (reproducible)
    ///
    /// # Arguments
    /// * `snr_db` - Target SNR in dB, relative to the power of each input block
    /// * `seed` - RNG seed for reproducibility
    pub fn new_from_seed(snr_db: f64, seed: u64) -> Self {
        NoiseChannel {
            snr_db,
            strategy: NoiseStrategy::detect(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a channel from system entropy (non-reproducible)
    ///
    /// # Arguments
    /// * `snr_db` - Target SNR in dB, relative to the power of each input block
    pub fn new_from_entropy(snr_db: f64) -> Self {
        NoiseChannel {
            snr_db,
            strategy: NoiseStrategy::detect(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Select the noise kernel. Requesting `Simd` without the `simd` feature
    /// keeps the batched layout but runs scalar arithmetic.
    pub fn with_strategy(mut self, strategy: NoiseStrategy) -> Self {
        if strategy == NoiseStrategy::Simd && !cfg!(feature = "simd") {
            warn!("SIMD noise requested but the `simd` feature is disabled; using scalar lanes");
        }
        self.strategy = strategy;
        self
    }

    pub fn snr_db(&self) -> f64 {
        self.snr_db
    }

    pub fn strategy(&self) -> NoiseStrategy {
        self.strategy
    }

    /// Per-component standard deviation for a block of the given power
    pub fn sigma_for(&self, signal_power: f64) -> f64 {
        let noise_power = signal_power / db_to_linear(self.snr_db);
        (noise_power / 2.0).sqrt()
    }

    /// Return a noisy copy of `symbols`
    pub fn add_noise<T: IqFloat>(&mut self, symbols: &[Complex<T>]) -> Vec<Complex<T>> {
        let mut noisy = Vec::with_capacity(symbols.len());
        self.add_noise_into(symbols, &mut noisy);
        noisy
    }

    /// Write a noisy copy of `symbols` into a caller-owned buffer (cleared first)
    pub fn add_noise_into<T: IqFloat>(&mut self, symbols: &[Complex<T>], out: &mut Vec<Complex<T>>) {
        out.clear();
        if symbols.is_empty() {
            return;
        }

        let sigma = self.sigma_for(mean_power(symbols));
        out.extend_from_slice(symbols);

        // Zero signal power or infinite SNR
        if sigma == 0.0 {
            return;
        }

        match self.strategy {
            NoiseStrategy::Simd => T::add_awgn_batched(out, sigma, &mut self.rng),
            NoiseStrategy::Scalar => {
                for s in out.iter_mut() {
                    let n_re: f64 = StandardNormal.sample(&mut self.rng);
                    let n_im: f64 = StandardNormal.sample(&mut self.rng);
                    s.re = s.re + T::from_f64(n_re * sigma);
                    s.im = s.im + T::from_f64(n_im * sigma);
                }
            }
        }
    }
}
