use std::marker::PhantomData;
use std::thread;
use std::time::Instant;

use num_complex::Complex;
use tracing::{debug, info, warn};

use super::accumulator::ErrorAccumulators;
use super::params::SimulationParams;
use crate::demodulator::Demodulator;
use crate::error::{Error, Result};
use crate::generate::{BitGenerator, NoiseChannel, NoiseStrategy};
use crate::mod_type::ModType;
use crate::modulator::Modulator;
use crate::sample::IqFloat;
use crate::vector_ops::count_bit_errors;

/// Measured BER at one SNR point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BerPoint {
    pub snr_db: f64,
    pub ber: f64,
    pub errors: u64,
    pub bits: u64,
}

/// Result of one modulation sweep, points in ascending SNR order
#[derive(Debug, Clone, PartialEq)]
pub struct BerCurve {
    pub mod_type: ModType,
    /// Trial length after padding to the symbol size
    pub bits_per_thread: usize,
    pub points: Vec<BerPoint>,
}

impl BerCurve {
    pub fn snr_db(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.snr_db).collect()
    }

    pub fn ber(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ber).collect()
    }
}

/// Per-worker scratch space, reused across trials
#[derive(Debug, Clone, Default)]
pub struct TrialBuffers<T> {
    pub bits: Vec<u8>,
    pub symbols: Vec<Complex<T>>,
    pub noisy: Vec<Complex<T>>,
    pub decided: Vec<u8>,
}

impl<T> TrialBuffers<T> {
    pub fn with_capacity(num_bits: usize, bits_per_symbol: usize) -> Self {
        let num_symbols = num_bits / bits_per_symbol;
        TrialBuffers {
            bits: Vec::with_capacity(num_bits),
            symbols: Vec::with_capacity(num_symbols),
            noisy: Vec::with_capacity(num_symbols),
            decided: Vec::with_capacity(num_bits),
        }
    }
}

/// Monte-Carlo BER estimator for one modulation order.
///
/// `run` spawns `num_threads` scoped workers. Every worker walks the full SNR
/// list and runs `iterations_per_snr` trials per point with its own modulator,
/// detector, bit generator and noise channel. Trial results go straight into
/// shared atomic counters, so workers never wait on each other.
#[derive(Debug, Clone)]
pub struct BerSimulator<T = f32> {
    mod_type: ModType,
    params: SimulationParams,
    strategy: NoiseStrategy,
    reuse_buffers: bool,
    _precision: PhantomData<T>,
}

impl<T: IqFloat> BerSimulator<T> {
    /// Validate `params` and pad the trial length to whole symbols
    ///
    /// # Arguments
    /// * `mod_type` - Modulation swept by every worker
    /// * `params` - Sweep bounds, worker count, trial length and optional seed;
    ///   `bits_per_thread` is rounded up to a multiple of the bits per symbol
    pub fn new(mod_type: ModType, params: SimulationParams) -> Result<Self> {
        params.validate()?;

        let bits_per_symbol = mod_type.bits_per_symbol();
        let padded = params.padded_for(bits_per_symbol);
        if padded.bits_per_thread != params.bits_per_thread {
            info!(
                "bits_per_thread padded from {} to {} for {}",
                params.bits_per_thread, padded.bits_per_thread, mod_type
            );
        }

        Ok(BerSimulator {
            mod_type,
            params: padded,
            strategy: NoiseStrategy::detect(),
            reuse_buffers: true,
            _precision: PhantomData,
        })
    }

    /// Select the noise kernel. `Simd` falls back to scalar arithmetic when
    /// the `simd` feature is compiled out.
    pub fn noise_strategy(mut self, strategy: NoiseStrategy) -> Self {
        self.strategy = if strategy == NoiseStrategy::Simd && !cfg!(feature = "simd") {
            warn!("SIMD noise requested but the `simd` feature is disabled; using scalar noise");
            NoiseStrategy::Scalar
        } else {
            strategy
        };
        self
    }

    /// Keep one set of trial buffers per worker (default) or allocate per trial
    pub fn reuse_buffers(mut self, reuse: bool) -> Self {
        self.reuse_buffers = reuse;
        self
    }

    pub fn mod_type(&self) -> ModType {
        self.mod_type
    }

    /// Parameters after padding
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn strategy(&self) -> NoiseStrategy {
        self.strategy
    }

    /// Run the sweep and block until every worker is done
    pub fn run(&self) -> Result<BerCurve> {
        let snr_points = self.params.snr_points();
        let accumulators = ErrorAccumulators::new(snr_points.len());
        let num_threads = self.params.num_threads;

        info!(
            mod_type = %self.mod_type,
            points = snr_points.len(),
            threads = num_threads,
            bits_per_thread = self.params.bits_per_thread,
            iterations = self.params.iterations_per_snr,
            strategy = ?self.strategy,
            "starting BER sweep"
        );
        let started = Instant::now();

        thread::scope(|s| -> Result<()> {
            let mut handles = Vec::with_capacity(num_threads);
            for t in 0..num_threads {
                let seed = self.params.worker_seed(t);
                let snr_points = &snr_points;
                let accumulators = &accumulators;
                let handle = thread::Builder::new()
                    .name(format!("ber-{}-{}", self.mod_type.name(), t))
                    .spawn_scoped(s, move || self.worker(t, seed, snr_points, accumulators))?;
                handles.push(handle);
            }

            for (t, handle) in handles.into_iter().enumerate() {
                handle.join().map_err(|_| Error::WorkerPanicked(t))??;
            }
            Ok(())
        })?;

        let points: Vec<BerPoint> = snr_points
            .iter()
            .enumerate()
            .map(|(i, &snr_db)| BerPoint {
                snr_db,
                ber: accumulators.ber(i),
                errors: accumulators.errors(i),
                bits: accumulators.bits(i),
            })
            .collect();

        for point in &points {
            debug!(
                "{} SNR={} dB: BER={:e} ({} / {})",
                self.mod_type, point.snr_db, point.ber, point.errors, point.bits
            );
        }
        info!(
            mod_type = %self.mod_type,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "BER sweep finished"
        );

        Ok(BerCurve {
            mod_type: self.mod_type,
            bits_per_thread: self.params.bits_per_thread,
            points,
        })
    }

    fn worker(
        &self,
        worker: usize,
        seed: u64,
        snr_points: &[f64],
        accumulators: &ErrorAccumulators,
    ) -> Result<()> {
        debug!(worker, seed, "worker started");

        let modulator = Modulator::<T>::new(self.mod_type);
        let demodulator = Demodulator::<T>::new(self.mod_type);
        let mut bit_gen = BitGenerator::new_from_seed(seed);

        let num_bits = self.params.bits_per_thread;
        let bits_per_symbol = self.mod_type.bits_per_symbol();
        let mut buffers = TrialBuffers::with_capacity(num_bits, bits_per_symbol);

        for (i, &snr_db) in snr_points.iter().enumerate() {
            let mut channel =
                NoiseChannel::new_from_seed(snr_db, bit_gen.next_seed()).with_strategy(self.strategy);

            for _ in 0..self.params.iterations_per_snr {
                if !self.reuse_buffers {
                    buffers = TrialBuffers::with_capacity(num_bits, bits_per_symbol);
                }

                bit_gen.fill_bits(num_bits, &mut buffers.bits);
                modulator.modulate_into(&buffers.bits, &mut buffers.symbols)?;
                channel.add_noise_into(&buffers.symbols, &mut buffers.noisy);
                demodulator.demodulate_hard_into(&buffers.noisy, &mut buffers.decided);

                let errors = count_bit_errors(&buffers.bits, &buffers.decided);
                accumulators.record(i, errors, buffers.bits.len() as u64);
            }
        }

        debug!(worker, "worker finished");
        Ok(())
    }
}
