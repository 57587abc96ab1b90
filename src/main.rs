use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mecanum_runtime::autonomous::RoutineOptions;
use mecanum_runtime::config::{PowerLevel, RobotConfig};
use mecanum_runtime::runtime::{self, RunOptions, RunSummary, RuntimeError};

/// Run the autonomous routine on simulated hardware
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON robot config (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind the orientation sensor and report heading
    #[arg(long)]
    imu: bool,

    /// Distance to drive before shooting, in inches
    #[arg(long, default_value_t = 24.0)]
    inches: f64,

    /// Drive power for the move
    #[arg(long, default_value_t = 0.6)]
    drive_power: f64,

    /// Rings to fire
    #[arg(long, default_value_t = 3)]
    rings: u32,

    /// Shooter preset: far, short or power-shot
    #[arg(long, default_value = "far", value_parser = parse_power_level)]
    level: PowerLevel,

    /// Stop after this many cycles even if the routine is unfinished
    #[arg(long, default_value_t = 1500)]
    max_cycles: u64,

    /// Log telemetry every N cycles (0 disables)
    #[arg(long, default_value_t = 25)]
    telemetry_every: u64,
}

fn parse_power_level(s: &str) -> Result<PowerLevel, String> {
    match s {
        "far" => Ok(PowerLevel::Far),
        "short" => Ok(PowerLevel::Short),
        "power-shot" | "power_shot" => Ok(PowerLevel::PowerShot),
        other => Err(format!("unknown power level '{}'", other)),
    }
}

async fn start(args: Args) -> Result<RunSummary, RuntimeError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            RobotConfig::load(path)?
        }
        None => RobotConfig::default(),
    };
    config.use_imu |= args.imu;

    let options = RunOptions {
        routine: RoutineOptions {
            inches: args.inches,
            drive_power: args.drive_power,
            rings: args.rings,
            power_level: args.level,
        },
        max_cycles: args.max_cycles,
        telemetry_every: args.telemetry_every,
    };
    runtime::run(config, options).await
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();
    match start(args).await {
        Ok(summary) => info!(
            "Finished after {} cycles (routine complete: {})",
            summary.cycles, summary.completed
        ),
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            std::process::exit(1);
        }
    }
}
