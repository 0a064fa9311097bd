#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line entry point for the RTS reference client.

use anyhow::Result;
use clap::Parser;
use rts_client_cli::{
    config::{Args, ClientConfig},
    server,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Entry point for the RTS reference client.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_args(&args)?;
    let listener = server::bind(&config)?;

    info!(
        bind = %config.bind,
        carry_threshold = config.engine.carry_threshold(),
        seeded = config.seed.is_some(),
        "RTS client listening"
    );

    server::serve(&listener, &config)
}
