//! Gray-coded square constellation layouts.
//!
//! A layout assigns every symbol index 0..L-1 to a grid position
//! `(i_level, q_level)`, where a level is an index into the per-axis PAM
//! alphabet (`-(side-1), ..., -1, 1, ..., side-1`). Coordinates are produced
//! separately so the same layout serves any scale and precision.

use num_complex::Complex;

use crate::mod_type::ModType;
use crate::sample::IqFloat;

/// Binary-reflected Gray code of `b`
pub fn gray_encode(b: usize) -> usize {
    b ^ (b >> 1)
}

/// Inverse Gray code: successive XOR-fold of the shifted value
pub fn gray_decode(mut g: usize) -> usize {
    let mut b = 0;
    while g != 0 {
        b ^= g;
        g >>= 1;
    }
    b
}

/// Per-axis amplitude alphabet, ascending (e.g. [-3, -1, 1, 3] for side 4)
pub fn pam_levels(side: usize) -> Vec<i32> {
    let side = side as i32;
    (0..side).map(|k| 2 * k - (side - 1)).collect()
}

/// QPSK walk around the square: 0 -> (+1,+1), 1 -> (-1,+1), 2 -> (-1,-1), 3 -> (+1,-1)
const QPSK_GRID: [(usize, usize); 4] = [(1, 1), (0, 1), (0, 0), (1, 0)];

/// Grid position (I level, Q level) of a symbol index.
///
/// The upper half of the index bits selects the I level and the lower half
/// the Q level. 16-QAM maps each 2-bit field with `g ^ (g >> 1)`, 64-QAM with
/// the XOR-fold inverse Gray code of each 3-bit field.
pub fn grid_position(mod_type: ModType, index: usize) -> (usize, usize) {
    match mod_type {
        ModType::Qpsk => QPSK_GRID[index & 0x03],
        ModType::Qam16 => {
            let upper = (index >> 2) & 0x03;
            let lower = index & 0x03;
            (gray_encode(upper), gray_encode(lower))
        }
        ModType::Qam64 => {
            let upper = (index >> 3) & 0x07;
            let lower = index & 0x07;
            (gray_decode(upper), gray_decode(lower))
        }
    }
}

/// Gray-coded constellation points for `mod_type`, every coordinate
/// multiplied by `scale`. Point `k` is the symbol for index `k`.
pub fn gray_points<T: IqFloat>(mod_type: ModType, scale: T) -> Vec<Complex<T>> {
    let levels = pam_levels(mod_type.side());

    (0..mod_type.order())
        .map(|index| {
            let (i_level, q_level) = grid_position(mod_type, index);
            let re = T::from_f64(levels[i_level] as f64) * scale;
            let im = T::from_f64(levels[q_level] as f64) * scale;
            Complex::new(re, im)
        })
        .collect()
}

/// Bit pattern of a symbol index, most significant bit first
pub fn index_bits(index: usize, bits_per_symbol: usize) -> Vec<u8> {
    (0..bits_per_symbol)
        .map(|j| ((index >> (bits_per_symbol - 1 - j)) & 1) as u8)
        .collect()
}
