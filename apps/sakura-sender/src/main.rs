use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sakura_sender::Args::parse();

	sakura_sender::run(args).await
}
