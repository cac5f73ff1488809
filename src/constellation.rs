use bimap::BiHashMap;
use num_complex::Complex;

use crate::error::Result;
use crate::mod_type::ModType;
use crate::sample::IqFloat;
use crate::symbol_maps;
use crate::vector_ops::mean_power;

/// Gray-coded square QAM constellation together with its bit-pattern table.
///
/// Point `k` carries bit pattern `k` written MSB first, so the table is a
/// bijection by construction. Points adjacent on the grid differ in exactly
/// one bit for 16- and 64-QAM. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Constellation<T> {
    mod_type: ModType,
    scale: T,
    points: Vec<Complex<T>>,
    bit_patterns: Vec<Vec<u8>>,
    grid: BiHashMap<usize, (usize, usize)>,
    average_power: T,
}

impl<T: IqFloat> Constellation<T> {
    /// Build the constellation with every coordinate multiplied by `scale`
    pub fn new(mod_type: ModType, scale: T) -> Self {
        let points = symbol_maps::gray_points(mod_type, scale);
        let bits_per_symbol = mod_type.bits_per_symbol();

        let bit_patterns = (0..mod_type.order())
            .map(|index| symbol_maps::index_bits(index, bits_per_symbol))
            .collect();

        let mut grid = BiHashMap::with_capacity(mod_type.order());
        for index in 0..mod_type.order() {
            grid.insert(index, symbol_maps::grid_position(mod_type, index));
        }

        let average_power = T::from_f64(mean_power(&points));

        Constellation {
            mod_type,
            scale,
            points,
            bit_patterns,
            grid,
            average_power,
        }
    }

    /// Build from a raw order L, rejecting anything but 4, 16 and 64
    pub fn from_order(order: usize, scale: T) -> Result<Self> {
        Ok(Self::new(ModType::from_order(order)?, scale))
    }

    /// Constellation scaled to unit average power
    pub fn normalized(mod_type: ModType) -> Self {
        let unit = Self::new(mod_type, T::one());
        Self::new(mod_type, T::one() / unit.average_power.sqrt())
    }

    pub fn mod_type(&self) -> ModType {
        self.mod_type
    }

    pub fn order(&self) -> usize {
        self.points.len()
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.mod_type.bits_per_symbol()
    }

    pub fn scale(&self) -> T {
        self.scale
    }

    pub fn points(&self) -> &[Complex<T>] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Complex<T> {
        self.points[index]
    }

    /// Bit patterns indexed by symbol index
    pub fn bit_patterns(&self) -> &[Vec<u8>] {
        &self.bit_patterns
    }

    pub fn bit_pattern(&self, index: usize) -> &[u8] {
        &self.bit_patterns[index]
    }

    /// Mean of I^2 + Q^2 over all points
    pub fn average_power(&self) -> T {
        self.average_power
    }

    /// (I level, Q level) of a symbol index on the PAM grid
    pub fn grid_position(&self, index: usize) -> Option<(usize, usize)> {
        self.grid.get_by_left(&index).copied()
    }

    /// Symbol index sitting at a PAM grid cell
    pub fn index_at(&self, i_level: usize, q_level: usize) -> Option<usize> {
        self.grid.get_by_right(&(i_level, q_level)).copied()
    }

    /// Squared Euclidean distance from `symbol` to point `index`
    pub fn distance_squared(&self, symbol: &Complex<T>, index: usize) -> T {
        (*symbol - self.points[index]).norm_sqr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hamming(a: &[u8], b: &[u8]) -> usize {
        a.iter().zip(b).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn test_average_power() {
        assert_relative_eq!(Constellation::<f64>::new(ModType::Qpsk, 1.0).average_power(), 2.0);
        assert_relative_eq!(Constellation::<f64>::new(ModType::Qam16, 1.0).average_power(), 10.0);
        assert_relative_eq!(Constellation::<f64>::new(ModType::Qam64, 1.0).average_power(), 42.0);
        assert_relative_eq!(Constellation::<f64>::new(ModType::Qam16, 0.5).average_power(), 2.5);
    }

    #[test]
    fn test_average_power_matches_block_power() {
        for mod_type in ModType::ALL {
            let c = Constellation::<f32>::new(mod_type, 0.7);
            assert_relative_eq!(c.average_power() as f64, mean_power(c.points()), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_normalized_has_unit_power() {
        for mod_type in ModType::ALL {
            let c = Constellation::<f32>::normalized(mod_type);
            assert_relative_eq!(c.average_power(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rejects_unsupported_order() {
        assert!(Constellation::<f32>::from_order(32, 1.0).is_err());
        assert!(Constellation::<f32>::from_order(8, 1.0).is_err());
        assert_eq!(Constellation::<f32>::from_order(64, 1.0).unwrap().order(), 64);
    }

    #[test]
    fn test_bit_patterns_bijective() {
        for mod_type in ModType::ALL {
            let c = Constellation::<f32>::new(mod_type, 1.0);
            let patterns = c.bit_patterns();
            assert_eq!(patterns.len(), mod_type.order());
            for (i, p) in patterns.iter().enumerate() {
                assert_eq!(p.len(), mod_type.bits_per_symbol());
                for q in &patterns[i + 1..] {
                    assert_ne!(p, q);
                }
            }
        }
    }

    #[test]
    fn test_points_symmetric_about_origin() {
        for mod_type in ModType::ALL {
            let c = Constellation::<f64>::new(mod_type, 1.0);
            for p in c.points() {
                assert!(c.points().contains(&-*p), "{} missing mirror of {}", mod_type, p);
            }
        }
    }

    #[test]
    fn test_gray_adjacency() {
        for mod_type in [ModType::Qam16, ModType::Qam64] {
            let c = Constellation::<f32>::new(mod_type, 1.0);
            let side = mod_type.side();
            for i in 0..side {
                for q in 0..side {
                    let here = c.index_at(i, q).unwrap();
                    if i + 1 < side {
                        let right = c.index_at(i + 1, q).unwrap();
                        assert_eq!(hamming(c.bit_pattern(here), c.bit_pattern(right)), 1);
                    }
                    if q + 1 < side {
                        let up = c.index_at(i, q + 1).unwrap();
                        assert_eq!(hamming(c.bit_pattern(here), c.bit_pattern(up)), 1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_grid_lookup_round_trip() {
        let c = Constellation::<f32>::new(ModType::Qam64, 1.0);
        for index in 0..64 {
            let (i, q) = c.grid_position(index).unwrap();
            assert_eq!(c.index_at(i, q), Some(index));
        }
        assert_eq!(c.grid_position(64), None);
        assert_eq!(c.index_at(8, 0), None);
    }
}
