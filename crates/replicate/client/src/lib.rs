#![warn(clippy::unwrap_used)]

pub mod engine;

use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::engine::ClientWorld;

/// Runs a replication client.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Args {
    /// How often to run the replication tick, in milliseconds.
    #[clap(short, long, default_value_t = 50)]
    tick_millis: u64,

    /// Header string the server is expected to present during the handshake.
    #[clap(long, default_value = "replicate")]
    protocol_header: String,
}

pub async fn main(args: Args) -> Result<()> {
    color_eyre::install()?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(env_filter)
        .init();

    let world = ClientWorld::new(args.protocol_header.clone());

    info!(tick_millis = args.tick_millis, "replication client starting");

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_millis));
    interval.tick().await;
    loop {
        interval.tick().await;
        world.update();
    }
}
