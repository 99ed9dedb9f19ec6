use clap::Parser;

use ubl_worker::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	ubl_worker::run(Args::parse()).await
}
