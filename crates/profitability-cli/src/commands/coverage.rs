use clap::Args;
use serde_json::Value;

use profitability_core::engine;
use profitability_core::policy::PolicyRecordInput;
use profitability_core::CoverageKind;

use super::assumptions::AssumptionArgs;
use crate::input;

/// Arguments for a single-coverage run
#[derive(Args)]
pub struct CoverageArgs {
    /// PAR, EQVET, MACHINERY, PUBLIC LIABILITY or FIDELITY GUARANTEE
    #[arg(long)]
    pub coverage: String,

    /// JSON array of policy rows, or a .csv file with one row per policy
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

pub fn run_coverage(args: CoverageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kind: CoverageKind = args.coverage.parse()?;
    let assumptions = args.assumptions.resolve()?;
    let policies: Vec<PolicyRecordInput> = if let Some(ref path) = args.input {
        if input::file::is_csv(path) {
            input::file::read_csv(path)?
        } else {
            input::file::read_json(path)?
        }
    } else if let Some(rows) = input::stdin::read_stdin_json()? {
        rows
    } else {
        return Err("--input <policies.json|policies.csv> or stdin required for coverage".into());
    };
    let result = engine::run_coverage(kind, &policies, &assumptions)?;
    Ok(serde_json::to_value(result)?)
}
