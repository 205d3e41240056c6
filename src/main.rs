use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use settlefee::core::log::init_logging;

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

impl From<Commands> for settlefee::AppCommand {
    fn from(cmd: Commands) -> settlefee::AppCommand {
        match cmd {
            Commands::Schedule { currency } => settlefee::AppCommand::Schedule { currency },
            Commands::Calc { currency, amount } => settlefee::AppCommand::Calc { currency, amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display fee schedules and supplier tables
    Schedule {
        /// Only show this currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// Calculate the fee and supplier distribution for an amount
    Calc {
        /// Currency code, e.g. USD
        currency: String,
        /// Transaction amount
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => settlefee::cli::setup::setup(),
        Some(cmd) => settlefee::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
