//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config;

/// Upper bound for `--historical`, roughly a century of backfill.
pub const MAX_HISTORICAL_DAYS: i64 = 36_500;

/// Populate a smart-home database with synthetic device telemetry.
#[derive(Debug, Parser)]
#[command(name = "homesim", version, about, long_about = None)]
pub struct Cli {
    /// Days of backdated history to generate before the live loop
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=MAX_HISTORICAL_DAYS)
    )]
    pub historical: u32,

    /// Total duration of the live loop in minutes
    #[arg(long, default_value_t = 60)]
    pub duration: u64,

    /// Seconds between two live iterations
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Speed multiplier; the pause between iterations is divided by it
    #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
    pub speed: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Configuration file path
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_PATH)]
    pub config: PathBuf,
}

fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err("speed must be greater than zero".to_string())
    }
}
