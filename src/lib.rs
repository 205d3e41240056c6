pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::FeeConfigurationEngine;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Show fee rows and suppliers, optionally for one currency
    Schedule { currency: Option<String> },
    /// Compute the fee and its distribution for an amount
    Calc { currency: String, amount: f64 },
}

/// Loads config and bootstraps a fresh engine for one command.
pub async fn load_engine(config_path: Option<&str>) -> Result<FeeConfigurationEngine> {
    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!(
        fee_file = ?config.fee_file,
        management = ?config.management.as_ref().map(|m| &m.base_url),
        "Loaded config"
    );

    let source = providers::source_from_config(&config)?;
    let mut engine = FeeConfigurationEngine::new(source).with_fetch_timeout(config.fetch_timeout());

    let spinner = cli::ui::new_spinner("Loading fee configurations...");
    engine
        .initialize(config.default_supplier_id(), config.default_supplier_name())
        .await;
    spinner.finish_and_clear();

    Ok(engine)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("settlefee starting...");

    let mut engine = load_engine(config_path).await?;

    match command {
        AppCommand::Schedule { currency } => cli::schedule::run(&mut engine, currency.as_deref()),
        AppCommand::Calc { currency, amount } => cli::calc::run(&mut engine, &currency, amount),
    }
}
