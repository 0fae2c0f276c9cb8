use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use xconv::core::log::init_logging;
use xconv::core::{CurrencyCode, TrendRange};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert a value between two units, e.g. `units 100 celsius fahrenheit`
    #[command(allow_negative_numbers = true)]
    Units {
        value: f64,
        from: String,
        to: String,
    },
    /// Convert an amount between currencies at the latest rate
    #[command(allow_negative_numbers = true)]
    Currency {
        amount: f64,
        /// Currency to convert from [default: from config]
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        /// Currency to convert to [default: from config]
        #[arg(short, long)]
        to: Option<CurrencyCode>,
    },
    /// Show the historical exchange rate trend of a currency pair
    Trend {
        /// Base currency [default: from config]
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        /// Quote currency [default: from config]
        #[arg(short, long)]
        to: Option<CurrencyCode>,
        /// Preset range ending today: 1M, 6M or 1Y [default: 1M]
        #[arg(short, long, conflicts_with = "start")]
        range: Option<TrendRange>,
        /// First day of a custom range (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of a custom range (YYYY-MM-DD) [default: today]
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Also print every daily close
        #[arg(long)]
        table: bool,
    },
    /// List supported units and currencies
    List,
}

impl From<Commands> for xconv::AppCommand {
    fn from(cmd: Commands) -> xconv::AppCommand {
        match cmd {
            Commands::Units { value, from, to } => xconv::AppCommand::Units { value, from, to },
            Commands::Currency { amount, from, to } => {
                xconv::AppCommand::Currency { amount, from, to }
            }
            Commands::Trend {
                from,
                to,
                range,
                start,
                end,
                table,
            } => xconv::AppCommand::Trend {
                from,
                to,
                range,
                start,
                end,
                show_table: table,
            },
            Commands::List => xconv::AppCommand::List,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xconv::cli::setup::setup(),
        Some(cmd) => xconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Application failed");
        eprintln!("{}", xconv::cli::ui::error_message(&e));
        std::process::exit(1);
    }
    Ok(())
}
