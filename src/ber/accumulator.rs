use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free error/bit counters, one pair per SNR point.
///
/// Workers only ever `fetch_add`; totals are read after all workers are joined.
#[derive(Debug)]
pub struct ErrorAccumulators {
    errors: Vec<AtomicU64>,
    bits: Vec<AtomicU64>,
}

impl ErrorAccumulators {
    pub fn new(num_points: usize) -> Self {
        ErrorAccumulators {
            errors: (0..num_points).map(|_| AtomicU64::new(0)).collect(),
            bits: (0..num_points).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add one trial's result to point `index`
    pub fn record(&self, index: usize, errors: u64, bits: u64) {
        self.bits[index].fetch_add(bits, Ordering::Relaxed);
        self.errors[index].fetch_add(errors, Ordering::Relaxed);
    }

    pub fn errors(&self, index: usize) -> u64 {
        self.errors[index].load(Ordering::Relaxed)
    }

    pub fn bits(&self, index: usize) -> u64 {
        self.bits[index].load(Ordering::Relaxed)
    }

    /// `errors / bits` for point `index`, 0 when no bits were recorded
    pub fn ber(&self, index: usize) -> f64 {
        let bits = self.bits(index);
        if bits == 0 {
            return 0.0;
        }
        self.errors(index) as f64 / bits as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_record_and_read() {
        let acc = ErrorAccumulators::new(3);
        assert_eq!(acc.len(), 3);
        acc.record(1, 5, 100);
        acc.record(1, 2, 100);

        assert_eq!(acc.errors(1), 7);
        assert_eq!(acc.bits(1), 200);
        assert_eq!(acc.ber(1), 0.035);
        assert_eq!(acc.ber(0), 0.0);
    }

    #[test]
    fn test_concurrent_adds_are_exact() {
        let acc = ErrorAccumulators::new(2);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..10_000 {
                        acc.record(0, 1, 4);
                        acc.record(1, 0, 2);
                    }
                });
            }
        });

        assert_eq!(acc.errors(0), 80_000);
        assert_eq!(acc.bits(0), 320_000);
        assert_eq!(acc.errors(1), 0);
        assert_eq!(acc.bits(1), 160_000);
    }
}
