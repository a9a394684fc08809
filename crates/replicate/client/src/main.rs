use clap::Parser;
use replicate_client::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	let args = Args::parse();
	replicate_client::main(args).await
}
