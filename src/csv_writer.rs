use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::ber::BerCurve;

pub const HEADER: &str = "SNR_dB,BER";

/// Two-column `SNR_dB,BER` sink. The header is written on construction.
pub struct CsvWriter<W: Write> {
    writer: W,
    rows: usize,
}

impl CsvWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(BufWriter::new(file))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn from_writer(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", HEADER)?;
        Ok(CsvWriter { writer, rows: 0 })
    }

    pub fn write_row(&mut self, snr_db: f64, ber: f64) -> io::Result<()> {
        writeln!(self.writer, "{},{:e}", snr_db, ber)?;
        self.rows += 1;
        Ok(())
    }

    /// One row per point, in the curve's (ascending SNR) order
    pub fn write_curve(&mut self, curve: &BerCurve) -> io::Result<()> {
        for point in &curve.points {
            self.write_row(point.snr_db, point.ber)?;
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write `curve` to a new CSV file at `path`
pub fn write_curve_file(path: impl AsRef<Path>, curve: &BerCurve) -> io::Result<()> {
    let mut csv = CsvWriter::create(path)?;
    csv.write_curve(curve)?;
    csv.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::BerPoint;
    use crate::mod_type::ModType;

    fn curve() -> BerCurve {
        BerCurve {
            mod_type: ModType::Qpsk,
            bits_per_thread: 100,
            points: vec![
                BerPoint { snr_db: -1.0, ber: 0.25, errors: 50, bits: 200 },
                BerPoint { snr_db: 0.5, ber: 0.0, errors: 0, bits: 200 },
            ],
        }
    }

    #[test]
    fn test_header_only() {
        let csv = CsvWriter::from_writer(Vec::new()).unwrap();
        assert_eq!(csv.rows(), 0);
        let out = String::from_utf8(csv.finish().unwrap()).unwrap();
        assert_eq!(out, "SNR_dB,BER\n");
    }

    #[test]
    fn test_rows_in_order() {
        let mut csv = CsvWriter::from_writer(Vec::new()).unwrap();
        csv.write_curve(&curve()).unwrap();
        assert_eq!(csv.rows(), 2);

        let out = String::from_utf8(csv.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["SNR_dB,BER", "-1,2.5e-1", "0.5,0e0"]);
    }

    #[test]
    fn test_values_parse_back() {
        let mut csv = CsvWriter::from_writer(Vec::new()).unwrap();
        csv.write_row(3.0, 1.234e-5).unwrap();
        let out = String::from_utf8(csv.finish().unwrap()).unwrap();

        let row = out.lines().nth(1).unwrap();
        let fields: Vec<f64> = row.split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields, vec![3.0, 1.234e-5]);
    }

    #[test]
    fn test_write_file() {
        let path = std::env::temp_dir().join(format!("qam_sim_csv_{}.csv", std::process::id()));
        write_curve_file(&path, &curve()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("SNR_dB,BER\n"));
        assert_eq!(text.lines().count(), 3);
        std::fs::remove_file(&path).unwrap();
    }
}
