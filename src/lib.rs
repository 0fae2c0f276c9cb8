pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::trend::TrendRequest;
use crate::core::config::AppConfig;
use crate::core::{Catalog, CurrencyCode, TrendRange, UnitRegistry};
use crate::providers::YahooFinanceProvider;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

/// A single user action.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Units {
        value: f64,
        from: String,
        to: String,
    },
    Currency {
        amount: f64,
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
    },
    Trend {
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
        range: Option<TrendRange>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        show_table: bool,
    },
    List,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = Catalog::new();
    let registry = UnitRegistry::new();

    match command {
        AppCommand::Units { value, from, to } => {
            cli::units::run(&registry, &catalog, value, &from, &to)
        }
        AppCommand::Currency { amount, from, to } => {
            let provider = YahooFinanceProvider::from_config(&config.yahoo())?;
            cli::currency::run(
                &provider,
                &catalog,
                amount,
                from.unwrap_or(config.currency),
                to.unwrap_or(config.target_currency),
            )
            .await
        }
        AppCommand::Trend {
            from,
            to,
            range,
            start,
            end,
            show_table,
        } => {
            let provider = YahooFinanceProvider::from_config(&config.yahoo())?;
            let request = TrendRequest {
                from: from.unwrap_or(config.currency),
                to: to.unwrap_or(config.target_currency),
                range,
                start,
                end,
                show_table,
            };
            cli::trend::run(&provider, &request).await
        }
        AppCommand::List => {
            cli::list::run(&catalog);
            Ok(())
        }
    }
}
