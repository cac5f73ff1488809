//! Monte-Carlo bit error rate estimation over an AWGN channel.

mod accumulator;
mod params;
mod simulator;
mod theory;

pub use accumulator::ErrorAccumulators;
pub use params::SimulationParams;
pub use simulator::{BerCurve, BerPoint, BerSimulator, TrialBuffers};
pub use theory::{q_function, theoretical_ber};
