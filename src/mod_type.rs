use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Enum representing the supported square QAM orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModType {
    Qpsk,
    Qam16,
    Qam64,
}

impl ModType {
    /// All supported modulation types, in sweep order
    pub const ALL: [ModType; 3] = [ModType::Qpsk, ModType::Qam16, ModType::Qam64];

    /// Build from a constellation size L
    pub fn from_order(order: usize) -> Result<Self> {
        match order {
            4 => Ok(ModType::Qpsk),
            16 => Ok(ModType::Qam16),
            64 => Ok(ModType::Qam64),
            other => Err(Error::UnsupportedOrder(other)),
        }
    }

    /// Number of constellation points
    pub fn order(&self) -> usize {
        match self {
            ModType::Qpsk => 4,
            ModType::Qam16 => 16,
            ModType::Qam64 => 64,
        }
    }

    /// log2(order)
    pub fn bits_per_symbol(&self) -> usize {
        match self {
            ModType::Qpsk => 2,
            ModType::Qam16 => 4,
            ModType::Qam64 => 6,
        }
    }

    /// Points per axis of the square grid (sqrt(order))
    pub fn side(&self) -> usize {
        match self {
            ModType::Qpsk => 2,
            ModType::Qam16 => 4,
            ModType::Qam64 => 8,
        }
    }

    /// Short lowercase name used for report file names
    pub fn name(&self) -> &'static str {
        match self {
            ModType::Qpsk => "qpsk",
            ModType::Qam16 => "qam16",
            ModType::Qam64 => "qam64",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            ModType::Qpsk => "QPSK",
            ModType::Qam16 => "16-QAM",
            ModType::Qam64 => "64-QAM",
        }
    }
}

impl fmt::Display for ModType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModType {
    type Err = Error;

    /// Case-insensitive; accepts "qpsk"/"4qam"/"4", "qam16"/"16qam"/"16", "qam64"/"64qam"/"64"
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "qpsk" | "4qam" | "qam4" | "4" => Ok(ModType::Qpsk),
            "16qam" | "qam16" | "16" => Ok(ModType::Qam16),
            "64qam" | "qam64" | "64" => Ok(ModType::Qam64),
            _ => Err(Error::Config(format!(
                "unknown modulation '{}': expected one of qpsk, qam16, qam64",
                s
            ))),
        }
    }
}
