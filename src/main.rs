use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use parkledger::core::Period;
use parkledger::core::log::init_logging;

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

impl From<Commands> for parkledger::AppCommand {
    fn from(cmd: Commands) -> parkledger::AppCommand {
        match cmd {
            Commands::Balance { period, json } => parkledger::AppCommand::Balance {
                period: period.unwrap_or_else(Period::current),
                json,
            },
            Commands::Advances { period } => parkledger::AppCommand::Advances {
                period: period.unwrap_or_else(Period::current),
            },
            Commands::Withdraw {
                participant,
                amount,
                period,
            } => parkledger::AppCommand::Withdraw {
                participant,
                period: period.unwrap_or_else(Period::current),
                amount,
            },
            Commands::Transfer {
                from,
                to,
                amount,
                date,
                period,
            } => parkledger::AppCommand::Transfer {
                from,
                to,
                amount,
                date,
                period,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show revenue, expenses, transfers and take-home per partner for a month
    Balance {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        period: Option<Period>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show tenant advances held and advance in hand
    Advances {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        period: Option<Period>,
    },
    /// Record a partner's take-home for a month, replacing any earlier figure
    Withdraw {
        participant: String,
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        period: Option<Period>,
    },
    /// Record a cash transfer between two partners
    Transfer {
        from: String,
        to: String,
        amount: String,
        /// Transfer date as YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        /// Month as YYYY-MM (defaults to the month of the transfer date)
        #[arg(short, long)]
        period: Option<Period>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => parkledger::cli::setup::setup(),
        Some(cmd) => parkledger::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
