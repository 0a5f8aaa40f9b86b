pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::terminal::TerminalSurface;
use crate::core::config::AppConfig;
use crate::providers::exchangerate_api::ExchangeRateApiProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Interactive widget driven from stdin
    Interactive,
    /// One-shot conversion; unset currencies fall back to the config
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        base_url = %config.provider.base_url,
        base = %config.base_currency,
        target = %config.target_currency,
        "Loaded config"
    );

    let provider =
        ExchangeRateApiProvider::new(&config.provider.base_url, &config.provider.api_key);

    match command {
        AppCommand::Interactive => {
            let converter = crate::core::Converter::new(provider, TerminalSurface::new())?;
            cli::interactive::run(converter, &config.base_currency, &config.target_currency).await
        }
        AppCommand::Convert { amount, from, to } => {
            let base = from.unwrap_or(config.base_currency).to_uppercase();
            let target = to.unwrap_or(config.target_currency).to_uppercase();
            cli::convert::run(provider, &base, &target, amount.as_deref()).await
        }
    }
}
