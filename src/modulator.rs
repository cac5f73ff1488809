use num_complex::Complex;

use crate::constellation::Constellation;
use crate::error::{InvalidInput, Result};
use crate::mod_type::ModType;
use crate::sample::IqFloat;

/// Maps bit sequences onto constellation symbols.
///
/// Each group of `bits_per_symbol` bits is read as a big-endian index (first
/// bit most significant) into the constellation.
#[derive(Debug, Clone)]
pub struct Modulator<T> {
    constellation: Constellation<T>,
}

impl<T: IqFloat> Modulator<T> {
    /// Unit-spaced grid (scale factor 1)
    pub fn new(mod_type: ModType) -> Self {
        Self::with_scale(mod_type, T::one())
    }

    /// # Arguments
    /// * `mod_type` - Constellation order
    /// * `scale` - Factor applied to every PAM level (1/3 maps 16-QAM onto [-1, 1])
    pub fn with_scale(mod_type: ModType, scale: T) -> Self {
        Modulator {
            constellation: Constellation::new(mod_type, scale),
        }
    }

    pub fn from_constellation(constellation: Constellation<T>) -> Self {
        Modulator { constellation }
    }

    pub fn constellation(&self) -> &Constellation<T> {
        &self.constellation
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.constellation.bits_per_symbol()
    }

    pub fn average_power(&self) -> T {
        self.constellation.average_power()
    }

    /// Modulate `bits` into a freshly allocated symbol vector
    pub fn modulate(&self, bits: &[u8]) -> Result<Vec<Complex<T>>> {
        let mut symbols = Vec::with_capacity(bits.len() / self.bits_per_symbol());
        self.modulate_into(bits, &mut symbols)?;
        Ok(symbols)
    }

    /// Modulate into a caller-owned buffer. `out` is cleared first and is left
    /// empty if the input is rejected.
    pub fn modulate_into(&self, bits: &[u8], out: &mut Vec<Complex<T>>) -> Result<()> {
        out.clear();

        let bits_per_symbol = self.bits_per_symbol();
        if bits.len() % bits_per_symbol != 0 {
            return Err(InvalidInput::BitCountNotMultiple {
                len: bits.len(),
                bits_per_symbol,
            }
            .into());
        }
        if let Some(position) = bits.iter().position(|&b| b > 1) {
            return Err(InvalidInput::InvalidBitValue {
                position,
                value: bits[position],
            }
            .into());
        }

        out.reserve(bits.len() / bits_per_symbol);
        for group in bits.chunks_exact(bits_per_symbol) {
            let index = group
                .iter()
                .fold(0usize, |acc, &bit| (acc << 1) | bit as usize);
            out.push(self.constellation.point(index));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    #[test]
    fn test_qpsk_mapping() {
        let modulator = Modulator::<f32>::new(ModType::Qpsk);
        assert_eq!(modulator.modulate(&[0, 0]).unwrap(), vec![Complex::new(1.0, 1.0)]);
        assert_eq!(modulator.modulate(&[1, 1]).unwrap(), vec![Complex::new(1.0, -1.0)]);
        assert_eq!(
            modulator.modulate(&[0, 1, 1, 0]).unwrap(),
            vec![Complex::new(-1.0, 1.0), Complex::new(-1.0, -1.0)]
        );
    }

    #[test]
    fn test_qam16_scaled_mapping() {
        let modulator = Modulator::<f32>::with_scale(ModType::Qam16, 1.0 / 3.0);
        let symbols = modulator.modulate(&[0, 0, 0, 0]).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_relative_eq!(symbols[0].re, -1.0, epsilon = 1e-6);
        assert_relative_eq!(symbols[0].im, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_first_bit_is_msb() {
        let modulator = Modulator::<f64>::new(ModType::Qam64);
        // index 0b000010 -> (-7, -1); index 0b010000 -> I field 2 -> level 3 -> (-1, -7)
        let symbols = modulator.modulate(&[0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0]).unwrap();
        assert_eq!(symbols, vec![Complex::new(-7.0, -1.0), Complex::new(-1.0, -7.0)]);
    }

    #[test]
    fn test_empty_input() {
        let modulator = Modulator::<f32>::new(ModType::Qam64);
        assert!(modulator.modulate(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_partial_symbol() {
        let modulator = Modulator::<f32>::new(ModType::Qam16);
        let err = modulator.modulate(&[0, 1, 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::BitCountNotMultiple { len: 3, bits_per_symbol: 4 })
        ));
    }

    #[test]
    fn test_rejects_non_binary_values() {
        let modulator = Modulator::<f32>::new(ModType::Qpsk);
        let mut out = vec![Complex::new(9.0, 9.0)];
        let err = modulator.modulate_into(&[0, 1, 2, 0], &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::InvalidBitValue { position: 2, value: 2 })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_modulate_into_reuses_buffer() {
        let modulator = Modulator::<f32>::new(ModType::Qpsk);
        let mut out = Vec::with_capacity(16);
        modulator.modulate_into(&[1, 0, 1, 0], &mut out).unwrap();
        modulator.modulate_into(&[0, 0], &mut out).unwrap();
        assert_eq!(out, vec![Complex::new(1.0, 1.0)]);
        assert!(out.capacity() >= 16);
    }
}
