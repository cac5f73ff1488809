use num_complex::Complex;

use crate::sample::IqFloat;

/// 10^(db/10)
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// 10*log10(linear)
pub fn linear_to_db(linear: f64) -> f64 {
    10.0 * linear.log10()
}

/// Mean of I^2 + Q^2, accumulated in f64. Zero for an empty slice.
pub fn mean_power<T: IqFloat>(symbols: &[Complex<T>]) -> f64 {
    if symbols.is_empty() {
        return 0.0;
    }

    let total: f64 = symbols
        .iter()
        .map(|s| {
            let re = s.re.as_f64();
            let im = s.im.as_f64();
            re * re + im * im
        })
        .sum();

    total / symbols.len() as f64
}

/// Number of positions where `a` and `b` differ (over the shorter length)
pub fn count_bit_errors(a: &[u8], b: &[u8]) -> u64 {
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_db_conversions() {
        assert_relative_eq!(db_to_linear(0.0), 1.0);
        assert_relative_eq!(db_to_linear(10.0), 10.0);
        assert_relative_eq!(db_to_linear(-3.0), 0.501187, epsilon = 1e-6);
        assert_relative_eq!(linear_to_db(db_to_linear(7.5)), 7.5, epsilon = 1e-12);
        assert_eq!(db_to_linear(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_mean_power() {
        let symbols = vec![Complex::new(1.0f32, 1.0), Complex::new(-3.0, 1.0)];
        assert_relative_eq!(mean_power(&symbols), 6.0);
        assert_eq!(mean_power::<f32>(&[]), 0.0);
    }

    #[test]
    fn test_count_bit_errors() {
        assert_eq!(count_bit_errors(&[0, 1, 1, 0], &[0, 1, 1, 0]), 0);
        assert_eq!(count_bit_errors(&[0, 1, 1, 0], &[1, 1, 0, 0]), 2);
    }
}
