pub mod worker;

mod error;

pub use error::{Error, Result};

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use ubl_storage::db::Db;

/// Moves captured searches from the outbox into the capture tables.
#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = ubl_config::load(&args.config)?;
	let filter = EnvFilter::try_new(&config.service.log_level)
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let Some(postgres) = config.storage.postgres.as_ref() else {
		return Err(eyre::eyre!("storage.postgres is required to run the worker."));
	};
	let db = Db::connect(postgres).await?;

	db.ensure_schema().await?;

	tracing::info!(
		poll_interval_ms = config.worker.poll_interval_ms,
		max_attempts = config.worker.max_attempts,
		"Capture worker started."
	);

	let state = worker::WorkerState::new(db, &config.worker);

	worker::run_worker(state).await?;

	Ok(())
}
