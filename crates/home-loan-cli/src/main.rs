mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::mortgage::{PaymentArgs, SimulateArgs};

/// French-system home loan simulator
#[derive(Parser)]
#[command(
    name = "hloan",
    version,
    about = "French-system home loan simulator",
    long_about = "A CLI for simulating fixed-rate home loans under the French \
                  (constant-payment) amortization system with decimal precision. \
                  Supports one-time and recurring extraordinary prepayments that \
                  either shorten the term or reduce the monthly payment."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log simulation details to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a mortgage: summary, prepayment comparison and full schedule
    Simulate(SimulateArgs),
    /// Print only the month-by-month amortization schedule
    Schedule(SimulateArgs),
    /// Quote the constant monthly payment for a loan
    Payment(PaymentArgs),
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

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::mortgage::run_simulate(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::Payment(args) => commands::mortgage::run_payment(args),
        Commands::Version => {
            println!("hloan {}", env!("CARGO_PKG_VERSION"));
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
