use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Uniform random bit source.
///
/// Draws 64 bits at a time from the generator and hands them out from the
/// low end, so one `next_u64` call covers 64 output bits.
#[derive(Debug)]
pub struct BitGenerator {
    rng: StdRng,
    buffer: u64,
    bits_remaining: u8,
}

impl BitGenerator {
    pub fn new_from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            buffer: 0,
            bits_remaining: 0,
        }
    }

    pub fn new_from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            buffer: 0,
            bits_remaining: 0,
        }
    }

    // Get N bits (1-64) as a u64
    pub fn next_bits(&mut self, num_bits: u8) -> u64 {
        assert!(num_bits > 0 && num_bits <= 64, "num_bits must be 1-64");

        // Refill buffer if we don't have enough bits
        if self.bits_remaining < num_bits {
            self.buffer = self.rng.next_u64();
            self.bits_remaining = 64;
        }

        let mask = if num_bits == 64 {
            u64::MAX
        } else {
            (1u64 << num_bits) - 1
        };
        let result = self.buffer & mask;

        // u64 >> 64 overflows, so a full-width read just empties the buffer
        self.buffer = if num_bits == 64 { 0 } else { self.buffer >> num_bits };
        self.bits_remaining -= num_bits;

        result
    }

    pub fn next_bit(&mut self) -> u8 {
        self.next_bits(1) as u8
    }

    /// Replace the contents of `out` with `n` random 0/1 values.
    ///
    /// Produces the same stream as `n` calls to [`BitGenerator::next_bit`]:
    /// buffered bits are drained first, then whole 64-bit words are unpacked.
    pub fn fill_bits(&mut self, n: usize, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(n);

        let head = n.min(self.bits_remaining as usize);
        self.drain_buffer(head, out);

        let mut remaining = n - head;
        while remaining >= 64 {
            let word = self.next_bits(64);
            out.extend((0..64).map(|k| ((word >> k) & 1) as u8));
            remaining -= 64;
        }

        if remaining > 0 {
            self.buffer = self.rng.next_u64();
            self.bits_remaining = 64;
            self.drain_buffer(remaining, out);
        }
    }

    // Push `count` buffered bits, low end first
    fn drain_buffer(&mut self, count: usize, out: &mut Vec<u8>) {
        for _ in 0..count {
            out.push((self.buffer & 1) as u8);
            self.buffer >>= 1;
        }
        self.bits_remaining -= count as u8;
    }

    /// `n` random 0/1 values
    pub fn generate_bits(&mut self, n: usize) -> Vec<u8> {
        let mut bits = Vec::with_capacity(n);
        self.fill_bits(n, &mut bits);
        bits
    }

    /// Raw 64-bit draw, used to derive seeds for child generators
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_binary() {
        let mut generator = BitGenerator::new_from_entropy();
        let bits = generator.generate_bits(1000);
        assert_eq!(bits.len(), 1000);
        assert!(bits.iter().all(|&b| b <= 1));
    }

    #[test]
    fn test_roughly_balanced() {
        let mut generator = BitGenerator::new_from_seed(0);
        let bits = generator.generate_bits(100_000);
        let ones = bits.iter().filter(|&&b| b == 1).count() as f64;
        assert!((ones / 100_000.0 - 0.5).abs() < 0.01, "fraction of ones {}", ones / 100_000.0);
    }

    #[test]
    fn test_seed_reproducibility() {
        let mut a = BitGenerator::new_from_seed(99);
        let mut b = BitGenerator::new_from_seed(99);
        assert_eq!(a.generate_bits(257), b.generate_bits(257));
    }

    #[test]
    fn test_fill_bits_replaces_contents() {
        let mut generator = BitGenerator::new_from_seed(4);
        let mut out = vec![7u8; 10];
        generator.fill_bits(3, &mut out);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|&b| b <= 1));
    }

    #[test]
    fn test_fill_bits_matches_single_bit_stream() {
        let mut bulk = BitGenerator::new_from_seed(31);
        let mut single = BitGenerator::new_from_seed(31);

        // Leave a partly consumed buffer behind before each bulk fill
        for n in [5usize, 64, 200, 1, 130] {
            let _ = bulk.next_bits(3);
            let _ = single.next_bits(3);

            let mut out = Vec::new();
            bulk.fill_bits(n, &mut out);
            let expected: Vec<u8> = (0..n).map(|_| single.next_bit()).collect();
            assert_eq!(out, expected, "n = {}", n);
        }

        assert_eq!(bulk.next_bits(7), single.next_bits(7));
    }

    #[test]
    fn test_next_bits_width() {
        let mut generator = BitGenerator::new_from_seed(1);
        for _ in 0..100 {
            assert!(generator.next_bits(3) < 8);
        }
        let _ = generator.next_bits(64);
    }
}
