//! One simulator run from bootstrap to teardown.

use std::future::Future;

use rand::SeedableRng;
use rand::rngs::StdRng;

use homesim_adapter_storage_sqlite_sqlx::{Database, SqliteGateway};
use homesim_app::report::{EnergyReport, EnergyReportService};
use homesim_app::simulator::{BackfillReport, LoopReport, Simulator, SimulatorConfig};

use crate::cli::Cli;
use crate::config::Config;

/// Everything a run needs once flags and configuration are merged.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Days of history to backfill before the live loop. Zero skips it.
    pub historical: u32,
    /// Seconds between two live iterations.
    pub interval: u64,
    /// Length of the live loop in minutes.
    pub duration: u64,
    /// Seed for the random source, or `None` for entropy.
    pub seed: Option<u64>,
    pub simulator: SimulatorConfig,
}

impl RunOptions {
    /// Merge flags with configuration. `--seed` wins over the configured seed.
    #[must_use]
    pub fn new(cli: &Cli, config: &Config) -> Self {
        Self {
            historical: cli.historical,
            interval: cli.interval,
            duration: cli.duration,
            seed: cli.seed.or(config.simulation.seed),
            simulator: SimulatorConfig {
                room_count: config.simulation.room_count,
                simulation_speed: cli.speed,
            },
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                tracing::info!(seed, "using seeded random source");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }
}

/// What a run did before it returned.
#[derive(Debug)]
pub struct RunOutcome {
    /// The shutdown signal fired before the simulation finished.
    pub interrupted: bool,
    pub backfill: Option<BackfillReport>,
    pub live: Option<LoopReport>,
    /// Energy report built after a completed run.
    pub report: Option<EnergyReport>,
}

/// Bootstrap, backfill and run the live loop over `db`, then close it.
///
/// When `shutdown` resolves first the simulation is dropped and no report is
/// built. The database is closed on every path.
pub async fn run<F>(db: Database, options: &RunOptions, shutdown: F) -> RunOutcome
where
    F: Future<Output = ()>,
{
    let gateway = SqliteGateway::new(db.pool().clone());

    let outcome = tokio::select! {
        biased;
        () = shutdown => {
            tracing::info!("simulation stopped by user, shutting down");
            RunOutcome {
                interrupted: true,
                backfill: None,
                live: None,
                report: None,
            }
        }
        (backfill, live) = simulate(gateway.clone(), options) => {
            let report = match EnergyReportService::new(gateway).build().await {
                Ok(report) => {
                    log_report(&report);
                    Some(report)
                }
                Err(err) => {
                    tracing::error!(error = %err, "unable to summarise energy usage");
                    None
                }
            };
            RunOutcome {
                interrupted: false,
                backfill,
                live: Some(live),
                report,
            }
        }
    };

    db.close().await;
    tracing::info!("simulation complete");
    outcome
}

async fn simulate(
    store: SqliteGateway,
    options: &RunOptions,
) -> (Option<BackfillReport>, LoopReport) {
    let mut simulator = Simulator::bootstrap(store, options.rng(), &options.simulator).await;

    let backfill = if options.historical > 0 {
        let report = simulator.generate_historical_data(options.historical).await;
        tracing::info!(
            records = report.records_written,
            status_changes = report.status_changes,
            "history backfilled"
        );
        Some(report)
    } else {
        None
    };

    let live = simulator
        .run_simulation_loop(options.interval, options.duration)
        .await;
    tracing::info!(
        iterations = live.iterations,
        records = live.records_written,
        status_changes = live.status_changes,
        "live simulation finished"
    );

    (backfill, live)
}

fn log_report(report: &EnergyReport) {
    for room in &report.rooms {
        tracing::info!(
            room_number = %room.room.number,
            readings = room.summary.readings,
            total_kwh = room.summary.total,
            peak_kwh = room.summary.peak,
            "room energy"
        );
        for group in &room.by_type {
            tracing::info!(
                room_number = %room.room.number,
                device_type = %group.device_type,
                readings = group.summary.readings,
                total_kwh = group.summary.total,
                average_kwh = group.summary.average,
                "room energy by device type"
            );
        }
        for activity in &room.devices {
            if let Some(last) = activity.recent.first() {
                tracing::debug!(
                    device_id = %activity.device.id,
                    device_name = %activity.device.name,
                    status = %last.status,
                    since = %last.timestamp,
                    changes = activity.recent.len(),
                    "device activity"
                );
            }
        }
    }
    for group in &report.by_type {
        tracing::info!(
            device_type = %group.device_type,
            readings = group.summary.readings,
            total_kwh = group.summary.total,
            peak_kwh = group.summary.peak,
            "energy by device type"
        );
    }
    tracing::info!(
        readings = report.overall.readings,
        total_kwh = report.overall.total,
        average_kwh = report.overall.average,
        "energy summary"
    );
}
