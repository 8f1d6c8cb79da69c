use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sakura_api::Args::parse();

	sakura_api::run(args).await
}
