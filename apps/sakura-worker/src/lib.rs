pub mod worker;

mod error;

pub use error::{Error, Result};

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sakura_notify::Client;
use sakura_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = sakura_cli::VERSION,
	rename_all = "kebab",
	styles = sakura_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sakura_config::load(&args.config)?;

	init_tracing(&config)?;

	let db = Db::connect(&config.storage.sqlite).await?;

	db.ensure_schema().await?;

	let state = worker::WorkerState {
		db,
		client: Client::new(&config.notify),
		outbox: config.outbox.clone(),
	};

	tracing::info!(endpoint = %state.client.endpoint(), "Outbox dispatcher started.");

	worker::run_worker(state, async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for shutdown signal.");

			std::future::pending::<()>().await;
		}
	})
	.await?;

	Ok(())
}

fn init_tracing(config: &sakura_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
