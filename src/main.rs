use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratewise::error::PresentedError;
use ratewise::log::init_logging;

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

impl From<Commands> for ratewise::AppCommand {
    fn from(cmd: Commands) -> ratewise::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                ratewise::AppCommand::Convert { amount, from, to }
            }
            Commands::Swap { amount, from, to } => ratewise::AppCommand::Swap { amount, from, to },
            Commands::Currencies => ratewise::AppCommand::Currencies,
            Commands::Insight { from, to } => ratewise::AppCommand::Insight { from, to },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        amount: String,
        /// Source currency code; defaults to `default_from` from the config
        from: Option<String>,
        /// Target currency code; defaults to `default_to` from the config
        to: Option<String>,
    },
    /// Convert with the currency pair reversed
    Swap {
        amount: String,
        /// Source currency code; defaults to `default_from` from the config
        from: Option<String>,
        /// Target currency code; defaults to `default_to` from the config
        to: Option<String>,
    },
    /// List supported currencies
    Currencies,
    /// Show a 7-day rate trend for a currency pair
    Insight {
        /// Source currency code; defaults to `default_from` from the config
        from: Option<String>,
        /// Target currency code; defaults to `default_to` from the config
        to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(cmd) => ratewise::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        // Errors the presenter already rendered exit quietly; everything
        // else gets logged once here.
        if e.downcast_ref::<PresentedError>().is_some() {
            std::process::exit(1);
        }
        tracing::error!(error = %e, "Application failed");
    }
    result
}
