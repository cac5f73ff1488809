//! Command-line configuration for the `qam-sim` binary.
//!
//! Six positional values describe the sweep, in this order:
//! `<snr_start> <snr_end> <snr_step> <num_threads> <bits_per_thread> <iterations_per_snr>`.
//! Options may appear anywhere on the line.

use std::path::PathBuf;
use std::str::FromStr;

use crate::ber::SimulationParams;
use crate::error::{Error, Result};
use crate::mod_type::ModType;

const POSITIONAL_NAMES: [&str; 6] = [
    "snr_start",
    "snr_end",
    "snr_step",
    "num_threads",
    "bits_per_thread",
    "iterations_per_snr",
];

/// What the command line asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(Config),
    Help,
}

/// Resolved configuration for one binary run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sweep parameters shared by every modulation
    pub params: SimulationParams,

    /// Modulations to sweep, in run order
    pub mod_types: Vec<ModType>,

    /// Directory receiving `ber_<name>.csv`
    pub out_dir: PathBuf,

    /// Force the scalar noise kernel
    pub scalar_noise: bool,

    pub write_csv: bool,

    /// HTML plot of all curves (needs the `plot` feature)
    pub plot_path: Option<PathBuf>,
}

impl Config {
    /// Parse arguments (without the program name).
    pub fn from_args(args: &[String]) -> Result<Invocation> {
        let mut positionals: Vec<&str> = Vec::with_capacity(POSITIONAL_NAMES.len());
        let mut seed: Option<u64> = None;
        let mut out_dir = PathBuf::from(".");
        let mut mod_types = ModType::ALL.to_vec();
        let mut scalar_noise = false;
        let mut write_csv = true;
        let mut plot_path: Option<PathBuf> = None;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    let value = option_value(args, &mut i, "--seed requires a number")?;
                    seed = Some(
                        value
                            .parse()
                            .map_err(|_| Error::Config(format!("invalid seed: {}", value)))?,
                    );
                }
                "--out-dir" => {
                    out_dir = PathBuf::from(option_value(args, &mut i, "--out-dir requires a path")?);
                }
                "--mod" => {
                    let value = option_value(args, &mut i, "--mod requires a list")?;
                    mod_types = parse_mod_list(value)?;
                }
                "--plot" => {
                    plot_path = Some(PathBuf::from(option_value(args, &mut i, "--plot requires a path")?));
                }
                "--scalar" => {
                    scalar_noise = true;
                }
                "--no-csv" => {
                    write_csv = false;
                }
                "--help" | "-h" => {
                    return Ok(Invocation::Help);
                }
                // Negative numbers are positional SNR values, not flags
                arg if arg.starts_with("--") => {
                    return Err(Error::Config(format!("unknown argument: {}", arg)));
                }
                arg => {
                    positionals.push(arg);
                }
            }
            i += 1;
        }

        if positionals.len() < POSITIONAL_NAMES.len() {
            let missing = POSITIONAL_NAMES[positionals.len()..].join(", ");
            return Err(Error::Config(format!("missing arguments: {}", missing)));
        }
        if positionals.len() > POSITIONAL_NAMES.len() {
            return Err(Error::Config(format!(
                "unexpected argument: {}",
                positionals[POSITIONAL_NAMES.len()]
            )));
        }

        let mut params = SimulationParams::new(
            parse_positional(positionals[0], POSITIONAL_NAMES[0])?,
            parse_positional(positionals[1], POSITIONAL_NAMES[1])?,
            parse_positional(positionals[2], POSITIONAL_NAMES[2])?,
            parse_positional(positionals[3], POSITIONAL_NAMES[3])?,
            parse_positional(positionals[4], POSITIONAL_NAMES[4])?,
            parse_positional(positionals[5], POSITIONAL_NAMES[5])?,
        );
        params.seed = seed;
        params.validate()?;

        Ok(Invocation::Run(Config {
            params,
            mod_types,
            out_dir,
            scalar_noise,
            write_csv,
            plot_path,
        }))
    }

    /// `<out_dir>/ber_<name>.csv`
    pub fn csv_path(&self, mod_type: ModType) -> PathBuf {
        self.out_dir.join(format!("ber_{}.csv", mod_type.name()))
    }
}

fn option_value<'a>(args: &'a [String], i: &mut usize, missing: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| Error::Config(missing.to_string()))
}

fn parse_positional<T: FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("invalid {}: {}", name, value)))
}

fn parse_mod_list(value: &str) -> Result<Vec<ModType>> {
    let mut mod_types = Vec::new();
    for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let mod_type: ModType = item.parse()?;
        if !mod_types.contains(&mod_type) {
            mod_types.push(mod_type);
        }
    }
    if mod_types.is_empty() {
        return Err(Error::Config("--mod list is empty".to_string()));
    }
    Ok(mod_types)
}

/// Usage text printed for `--help` and on configuration errors
pub fn usage() -> String {
    let lines = [
        "qam-sim: QAM bit error rate simulation over an AWGN channel",
        "",
        "USAGE:",
        "    qam-sim <snr_start> <snr_end> <snr_step> <num_threads> <bits_per_thread> <iterations_per_snr> [OPTIONS]",
        "",
        "OPTIONS:",
        "    --seed <N>          Fixed base seed for worker generators (default: wall clock)",
        "    --out-dir <PATH>    Directory for ber_<mod>.csv files (default: .)",
        "    --mod <LIST>        Comma-separated subset of qpsk,qam16,qam64 (default: all)",
        "    --scalar            Use the scalar noise kernel",
        "    --no-csv            Do not write CSV files",
        "    --plot <PATH>       Write an HTML BER plot (requires the `plot` feature)",
        "    --help, -h          Print this help",
        "",
        "EXAMPLES:",
        "    qam-sim -5 20 1 8 100000 10",
        "    qam-sim 0 12 2 4 60000 5 --mod qam16 --seed 42 --out-dir results",
        "",
        "Log verbosity follows RUST_LOG (default: info).",
    ];
    lines.join("\n")
}
