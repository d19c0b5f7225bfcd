use clap::Args;
use rust_decimal::Decimal;

use profitability_core::Assumptions;

use crate::input;

/// Assumption sources shared by every run command.
///
/// Precedence: built-in defaults, then `--assumptions` file, then flags.
#[derive(Args, Debug, Clone, Default)]
pub struct AssumptionArgs {
    /// YAML or JSON file with loss_ratio, xol_fraction and expense_fraction
    #[arg(long)]
    pub assumptions: Option<String>,

    /// Loss ratio applied to premium-rated lines (default 0.45)
    #[arg(long)]
    pub loss_ratio: Option<Decimal>,

    /// Excess-of-loss cost as a fraction of own-retention premium (default 0.12)
    #[arg(long)]
    pub xol: Option<Decimal>,

    /// Expense as a fraction of cedant retained premium (default 0.20)
    #[arg(long)]
    pub expense: Option<Decimal>,
}

impl AssumptionArgs {
    pub fn resolve(&self) -> Result<Assumptions, Box<dyn std::error::Error>> {
        let mut assumptions: Assumptions = match self.assumptions {
            Some(ref path) => input::file::read_yaml(path)?,
            None => Assumptions::default(),
        };
        if let Some(v) = self.loss_ratio {
            assumptions.loss_ratio = v;
        }
        if let Some(v) = self.xol {
            assumptions.xol_fraction = v;
        }
        if let Some(v) = self.expense {
            assumptions.expense_fraction = v;
        }
        assumptions.validate()?;
        Ok(assumptions)
    }
}
