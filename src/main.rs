use std::fs;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use qam_sim::config::{usage, Config, Invocation};
use qam_sim::csv_writer::write_curve_file;
use qam_sim::{BerCurve, BerSimulator, NoiseStrategy, Result};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, usage());
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_config() => {
            eprintln!("error: {}\n\n{}", e, usage());
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    if config.write_csv {
        fs::create_dir_all(&config.out_dir)?;
    }

    let mut curves: Vec<BerCurve> = Vec::with_capacity(config.mod_types.len());
    for &mod_type in &config.mod_types {
        let mut simulator = BerSimulator::<f32>::new(mod_type, config.params.clone())?;
        if config.scalar_noise {
            simulator = simulator.noise_strategy(NoiseStrategy::Scalar);
        }

        println!("Running {} simulation...", mod_type);
        let curve = simulator.run()?;
        for point in &curve.points {
            println!(
                "SNR={}, BER={:e}, Errors={}, Bits={}",
                point.snr_db, point.ber, point.errors, point.bits
            );
        }

        if config.write_csv {
            let path = config.csv_path(mod_type);
            write_curve_file(&path, &curve)?;
            info!("wrote {}", path.display());
        }
        curves.push(curve);
    }

    if let Some(path) = &config.plot_path {
        write_plot(&curves, path);
    }

    Ok(())
}

#[cfg(feature = "plot")]
fn write_plot(curves: &[BerCurve], path: &std::path::Path) {
    qam_sim::plot::plot_ber_curves(curves, true, path);
    info!("wrote {}", path.display());
}

#[cfg(not(feature = "plot"))]
fn write_plot(_curves: &[BerCurve], path: &std::path::Path) {
    tracing::warn!("--plot {} ignored: built without the `plot` feature", path.display());
}
