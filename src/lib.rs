pub mod aggregate;
pub mod cli;
pub mod columns;
pub mod config;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod key;
pub mod preview;
pub mod recon_cmd;
pub mod reconcile;
pub mod report;
pub mod table;
pub mod xlsx;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("stay_recon", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Reconcile(args) => recon_cmd::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Columns(args) => columns::execute(&args),
    }
}
