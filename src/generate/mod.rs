pub mod awgn;
pub mod random_bit_generator;

pub use awgn::{NoiseChannel, NoiseStrategy};
pub use random_bit_generator::BitGenerator;
