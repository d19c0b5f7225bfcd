mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::book::RunArgs;
use commands::coverage::CoverageArgs;

/// Bulk underwriting profitability for reinsurance books
#[derive(Parser)]
#[command(
    name = "profit",
    version,
    about = "Bulk underwriting profitability for reinsurance books",
    long_about = "Runs the per-policy reinsurance waterfall (exposure, pool and facultative \
                  cessions, own retention and shortfall, premium, loss, commissions, costs) \
                  across PAR, EQVET, MACHINERY, PUBLIC LIABILITY and FIDELITY GUARANTEE \
                  batches with decimal precision, then summarizes the book."
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
    /// Run every coverage batch in a book and summarize the portfolio
    Run(RunArgs),
    /// Run a single coverage batch
    Coverage(CoverageArgs),
    /// Print the fixed per-coverage rule table
    Rules,
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Run(args) => commands::book::run_book(args),
        Commands::Coverage(args) => commands::coverage::run_coverage(args),
        Commands::Rules => commands::rules::run_rules(),
        Commands::Version => {
            println!("profit {}", env!("CARGO_PKG_VERSION"));
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
