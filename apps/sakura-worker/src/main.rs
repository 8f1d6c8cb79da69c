use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sakura_worker::Args::parse();

	sakura_worker::run(args).await
}
