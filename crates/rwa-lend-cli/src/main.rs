mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::AffordabilityArgs;
use commands::loan::{ScheduleArgs, SummaryArgs};

/// Loan amortization and affordability analytics for RWA-collateralized lending
#[derive(Parser)]
#[command(
    name = "rwl",
    version,
    about = "Loan amortization and affordability analytics",
    long_about = "Decimal-precision loan analytics for real-world-asset collateralized \
                  lending. Computes level-payment summaries, period-by-period \
                  amortization schedules, and collateral/income affordability checks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the loan summary (level payment, totals, capacity, income requirement)
    Summary(SummaryArgs),
    /// Generate the amortization schedule
    Schedule(ScheduleArgs),
    /// Assess collateral capacity and income affordability
    Affordability(AffordabilityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summary(args) => commands::loan::run_summary(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Version => {
            println!("rwl {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
