use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sakura_receiver::Args::parse();

	sakura_receiver::run(args).await
}
