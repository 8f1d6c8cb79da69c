use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sakura_notify::{AnswerMessage, Reply};

/// Reference notification endpoint. Logs every record and acknowledges it.
#[derive(Debug, Parser)]
#[command(
	version = sakura_cli::VERSION,
	rename_all = "kebab",
	styles = sakura_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Listen address. Defaults to `notify.endpoint`.
	#[arg(long, value_name = "ADDR")]
	pub bind: Option<String>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sakura_config::load(&args.config)?;

	init_tracing(&config)?;

	let bind = args.bind.unwrap_or_else(|| config.notify.endpoint.clone());
	let listener = TcpListener::bind(bind.as_str()).await?;

	tracing::info!(addr = %listener.local_addr()?, "Notification receiver listening.");

	sakura_notify::serve(listener, config.notify.max_frame_bytes, acknowledge, async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for shutdown signal.");

			std::future::pending::<()>().await;
		}
	})
	.await?;

	Ok(())
}

pub fn acknowledge(message: AnswerMessage) -> Reply {
	tracing::info!(
		id = message.id,
		question_id = message.question_id,
		answer_id = message.answer_id,
		star = message.star,
		question = %message.question,
		answer = %message.answer,
		"Answer received."
	);

	Reply::Ack { message: format!("received answer {}", message.answer_id) }
}

fn init_tracing(config: &sakura_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
