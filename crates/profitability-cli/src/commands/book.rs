use clap::Args;
use serde_json::Value;

use profitability_core::engine::{self, BookInput};

use super::assumptions::AssumptionArgs;
use crate::input;

/// Arguments for a whole-book run
#[derive(Args)]
pub struct RunArgs {
    /// Path to a JSON book file: {"batches": [{"coverage": "PAR", "policies": [...]}]}
    #[arg(long, conflicts_with = "csv_dir")]
    pub input: Option<String>,

    /// Directory with one `<COVERAGE>.csv` file per line of business
    #[arg(long)]
    pub csv_dir: Option<String>,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

pub fn run_book(args: RunArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = args.assumptions.resolve()?;
    let book: BookInput = if let Some(ref dir) = args.csv_dir {
        input::file::read_csv_dir(dir)?
    } else if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(book) = input::stdin::read_stdin_json()? {
        book
    } else {
        return Err("--input <book.json>, --csv-dir <DIR> or stdin required for run".into());
    };
    let result = engine::run_book(&book, &assumptions)?;
    Ok(serde_json::to_value(result)?)
}
