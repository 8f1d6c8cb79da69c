use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sakura_notify::Client;
use sakura_service::{DeliveryMode, IngestRequest, IngestWriter, Notifier};
use sakura_storage::db::Db;

/// Stores one answer record and notifies the configured endpoint.
#[derive(Debug, Parser)]
#[command(
	version = sakura_cli::VERSION,
	rename_all = "kebab",
	styles = sakura_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long)]
	pub question_id: i64,
	#[arg(long)]
	pub answer_id: i64,
	#[arg(long)]
	pub question: String,
	#[arg(long)]
	pub answer: String,
	#[arg(long, default_value_t = 0)]
	pub star: i64,
	/// Repeat for several labels. Only stored when the question is new.
	#[arg(long = "label", value_name = "LABEL")]
	pub labels: Vec<String>,
	/// Overrides `ingest.delivery` from the config file.
	#[arg(long, value_name = "MODE")]
	pub delivery: Option<DeliveryMode>,
}
impl Args {
	pub fn ingest_request(&self) -> IngestRequest {
		IngestRequest {
			question_id: self.question_id,
			answer_id: self.answer_id,
			question: self.question.clone(),
			answer: self.answer.clone(),
			star: self.star,
			labels: self.labels.clone(),
		}
	}

	pub fn delivery_mode(&self, cfg: &sakura_config::Ingest) -> DeliveryMode {
		self.delivery.unwrap_or(cfg.delivery)
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sakura_config::load(&args.config)?;

	init_tracing(&config)?;

	let delivery = args.delivery_mode(&config.ingest);
	let db = Db::connect(&config.storage.sqlite).await?;

	db.ensure_schema().await?;

	let notifier: Arc<dyn Notifier> = Arc::new(Client::new(&config.notify));
	let writer = IngestWriter::new(db, notifier, delivery);
	let response = writer.ingest(args.ingest_request()).await?;

	println!("{}", serde_json::to_string_pretty(&response)?);

	Ok(())
}

fn init_tracing(config: &sakura_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();

	Ok(())
}
