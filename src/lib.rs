pub mod ber;
pub mod config;
pub mod constellation;
pub mod csv_writer;
pub mod demodulator;
pub mod error;
pub mod generate;
pub mod mod_type;
pub mod modulator;
pub mod sample;
pub mod symbol_maps;
pub mod vector_ops;
pub mod vector_simd;

#[cfg(feature = "plot")]
pub mod plot;

pub use ber::{BerCurve, BerPoint, BerSimulator, SimulationParams};
pub use constellation::Constellation;
pub use demodulator::Demodulator;
pub use error::{Error, InvalidInput, Result};
pub use generate::{BitGenerator, NoiseChannel, NoiseStrategy};
pub use mod_type::ModType;
pub use modulator::Modulator;
pub use sample::IqFloat;
