use clap::Parser;
use tracing_subscriber::EnvFilter;

use homesim::cli::Cli;
use homesim::config::Config;
use homesim::run::{self, RunOptions};
use homesim_adapter_storage_sqlite_sqlx::Config as DatabaseConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let filter = EnvFilter::try_new(&config.logging.filter)?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .inspect_err(|err| tracing::error!(error = %err, "unable to open database"))?;

    let options = RunOptions::new(&cli, &config);
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    run::run(db, &options, shutdown).await;
    Ok(())
}
