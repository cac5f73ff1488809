use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Upper bound on the number of SNR points in one sweep
pub const MAX_SNR_POINTS: usize = 100_000;

/// Sweep configuration for one BER run.
///
/// Read-only once built. The pipeline works on a copy padded to the
/// modulation's bits-per-symbol (see [`SimulationParams::padded_for`]).
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub snr_start_db: f64,
    pub snr_end_db: f64,
    pub snr_step_db: f64,
    pub num_threads: usize,
    /// Bits generated per worker per trial
    pub bits_per_thread: usize,
    /// Trials per worker per SNR point
    pub iterations_per_snr: usize,
    /// Fixed base seed for worker generators; wall clock when `None`
    pub seed: Option<u64>,
}

impl SimulationParams {
    /// # Arguments
    /// * `snr_start_db` - First SNR point in dB
    /// * `snr_end_db` - Last SNR point in dB (inclusive when reached)
    /// * `snr_step_db` - Increment between points in dB
    /// * `num_threads` - Number of worker threads
    /// * `bits_per_thread` - Bits generated per worker per trial
    /// * `iterations_per_snr` - Trials per worker per SNR point
    pub fn new(
        snr_start_db: f64,
        snr_end_db: f64,
        snr_step_db: f64,
        num_threads: usize,
        bits_per_thread: usize,
        iterations_per_snr: usize,
    ) -> Self {
        SimulationParams {
            snr_start_db,
            snr_end_db,
            snr_step_db,
            num_threads,
            bits_per_thread,
            iterations_per_snr,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.snr_start_db.is_finite() || !self.snr_end_db.is_finite() {
            return Err(Error::Config(format!(
                "SNR bounds must be finite, got [{}, {}]",
                self.snr_start_db, self.snr_end_db
            )));
        }
        if !(self.snr_step_db.is_finite() && self.snr_step_db > 0.0) {
            return Err(Error::Config(format!(
                "snr_step must be a positive number, got {}",
                self.snr_step_db
            )));
        }
        if self.snr_start_db > self.snr_end_db {
            return Err(Error::Config(format!(
                "snr_start ({}) is greater than snr_end ({})",
                self.snr_start_db, self.snr_end_db
            )));
        }
        // Float spacing is widest at the bound with the largest magnitude
        if self.snr_start_db + self.snr_step_db <= self.snr_start_db
            || self.snr_end_db + self.snr_step_db <= self.snr_end_db
        {
            return Err(Error::Config(format!(
                "snr_step {} is too small to advance from {} to {}",
                self.snr_step_db, self.snr_start_db, self.snr_end_db
            )));
        }
        let span_steps = (self.snr_end_db - self.snr_start_db) / self.snr_step_db;
        if span_steps >= MAX_SNR_POINTS as f64 {
            return Err(Error::Config(format!(
                "sweep has more than {} SNR points (step {} over [{}, {}])",
                MAX_SNR_POINTS, self.snr_step_db, self.snr_start_db, self.snr_end_db
            )));
        }
        if self.num_threads == 0 {
            return Err(Error::Config("num_threads must be at least 1".into()));
        }
        if self.bits_per_thread == 0 {
            return Err(Error::Config("bits_per_thread must be at least 1".into()));
        }
        if self.iterations_per_snr == 0 {
            return Err(Error::Config("iterations_per_snr must be at least 1".into()));
        }
        Ok(())
    }

    /// SNR values of the sweep: start, start+step, ... while `<= end`.
    ///
    /// Accumulates the step in floating point with no tolerance, so an end
    /// value that is not hit exactly by the accumulated sum may be dropped.
    pub fn snr_points(&self) -> Vec<f64> {
        let mut points = Vec::new();
        if !(self.snr_step_db > 0.0) {
            return points;
        }

        let mut snr = self.snr_start_db;
        while snr <= self.snr_end_db && points.len() < MAX_SNR_POINTS {
            points.push(snr);
            let next = snr + self.snr_step_db;
            if next <= snr {
                break;
            }
            snr = next;
        }
        points
    }

    /// Copy with `bits_per_thread` rounded up to a multiple of `bits_per_symbol`
    pub fn padded_for(&self, bits_per_symbol: usize) -> Self {
        let rem = self.bits_per_thread % bits_per_symbol;
        let mut padded = self.clone();
        if rem != 0 {
            padded.bits_per_thread += bits_per_symbol - rem;
        }
        padded
    }

    /// Generator seed for worker `worker`: base seed (or wall-clock nanoseconds)
    /// plus the worker index.
    pub fn worker_seed(&self, worker: usize) -> u64 {
        let base = self.seed.unwrap_or_else(wall_clock_nanos);
        base.wrapping_add(worker as u64)
    }

    /// Bits every SNR point accumulates once the sweep completes
    pub fn bits_per_snr_point(&self) -> u64 {
        (self.num_threads * self.iterations_per_snr * self.bits_per_thread) as u64
    }
}

fn wall_clock_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
