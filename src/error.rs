//! Error types for the QAM link simulator.
//!
//! Configuration problems are fatal and reported before any sweep starts.
//! Invalid input is only reachable through direct API misuse (the BER pipeline
//! pads its trial length so it never triggers these).

use thiserror::Error;

/// Top-level error type for all fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Modulation order is not one of 4, 16 or 64
    #[error("unsupported modulation order {0}: only 4 (QPSK), 16 and 64 QAM are supported")]
    UnsupportedOrder(usize),

    /// Missing or malformed sweep / command-line configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A modulate/demodulate call received data it cannot process
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// A BER worker thread panicked before finishing its sweep
    #[error("BER worker {0} panicked")]
    WorkerPanicked(usize),

    /// Report / plot output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that should produce a usage message rather than a crash report.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::UnsupportedOrder(_))
    }
}

/// Input validation failures for a single modulator/detector call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("bit count {len} is not a multiple of {bits_per_symbol} bits per symbol")]
    BitCountNotMultiple { len: usize, bits_per_symbol: usize },

    #[error("bit at position {position} has value {value}, expected 0 or 1")]
    InvalidBitValue { position: usize, value: u8 },

    #[error("noise sigma must be finite and positive, got {0}")]
    InvalidSigma(f64),
}

/// Result alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_classification() {
        assert!(Error::Config("missing snr_step".into()).is_config());
        assert!(Error::UnsupportedOrder(32).is_config());
        assert!(!Error::WorkerPanicked(3).is_config());

        let err: Error = InvalidInput::BitCountNotMultiple { len: 5, bits_per_symbol: 4 }.into();
        assert!(!err.is_config());
        assert_eq!(
            err.to_string(),
            "invalid input: bit count 5 is not a multiple of 4 bits per symbol"
        );
    }
}
