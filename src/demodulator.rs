use num_complex::Complex;

use crate::constellation::Constellation;
use crate::error::{InvalidInput, Result};
use crate::mod_type::ModType;
use crate::sample::IqFloat;

/// Nearest-point (maximum-likelihood) detector with max-log soft output.
#[derive(Debug, Clone)]
pub struct Demodulator<T> {
    constellation: Constellation<T>,
}

impl<T: IqFloat> Demodulator<T> {
    pub fn new(mod_type: ModType) -> Self {
        Self::with_scale(mod_type, T::one())
    }

    pub fn with_scale(mod_type: ModType, scale: T) -> Self {
        Demodulator {
            constellation: Constellation::new(mod_type, scale),
        }
    }

    pub fn from_constellation(constellation: Constellation<T>) -> Self {
        Demodulator { constellation }
    }

    pub fn constellation(&self) -> &Constellation<T> {
        &self.constellation
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.constellation.bits_per_symbol()
    }

    /// Index of the constellation point closest to `symbol`.
    ///
    /// Scans points in index order and only replaces the best candidate on a
    /// strictly smaller distance, so ties resolve to the lowest index.
    pub fn nearest_index(&self, symbol: &Complex<T>) -> usize {
        let mut best_idx = 0;
        let mut best_dist = self.constellation.distance_squared(symbol, 0);

        for idx in 1..self.constellation.order() {
            let dist = self.constellation.distance_squared(symbol, idx);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }

        best_idx
    }

    /// Hard decision: `symbols.len() * bits_per_symbol` bits
    pub fn demodulate_hard(&self, symbols: &[Complex<T>]) -> Vec<u8> {
        let mut bits = Vec::with_capacity(symbols.len() * self.bits_per_symbol());
        self.demodulate_hard_into(symbols, &mut bits);
        bits
    }

    /// Hard decision into a caller-owned buffer (cleared first)
    pub fn demodulate_hard_into(&self, symbols: &[Complex<T>], out: &mut Vec<u8>) {
        out.clear();
        out.reserve(symbols.len() * self.bits_per_symbol());

        for symbol in symbols {
            let idx = self.nearest_index(symbol);
            out.extend_from_slice(self.constellation.bit_pattern(idx));
        }
    }

    /// Max-log LLR for every bit of every symbol, in hard-decision bit order.
    ///
    /// `llr = (min_dist0 - min_dist1) / (2 * sigma^2)` where `min_distB` is the
    /// smallest squared distance to a point whose bit j equals B.
    ///
    /// With this numerator a received symbol close to a bit-1 point yields a
    /// positive value, i.e. the output is the max-log approximation of
    /// `ln(P(b=1) / P(b=0))`. Hard slicing is `llr > 0 => 1`. Consumers must use
    /// this orientation.
    pub fn demodulate_soft(&self, symbols: &[Complex<T>], sigma: T) -> Result<Vec<T>> {
        let sigma_f64 = sigma.as_f64();
        if !sigma_f64.is_finite() || sigma_f64 <= 0.0 {
            return Err(InvalidInput::InvalidSigma(sigma_f64).into());
        }

        let bits_per_symbol = self.bits_per_symbol();
        let denom = T::from_f64(2.0) * sigma * sigma;
        let mut llrs = Vec::with_capacity(symbols.len() * bits_per_symbol);
        let mut distances = vec![T::zero(); self.constellation.order()];

        for symbol in symbols {
            for (idx, dist) in distances.iter_mut().enumerate() {
                *dist = self.constellation.distance_squared(symbol, idx);
            }

            for j in 0..bits_per_symbol {
                let mut min_dist0 = T::infinity();
                let mut min_dist1 = T::infinity();

                for (idx, &dist) in distances.iter().enumerate() {
                    if self.constellation.bit_pattern(idx)[j] == 1 {
                        if dist < min_dist1 {
                            min_dist1 = dist;
                        }
                    } else if dist < min_dist0 {
                        min_dist0 = dist;
                    }
                }

                llrs.push((min_dist0 - min_dist1) / denom);
            }
        }

        Ok(llrs)
    }
}
