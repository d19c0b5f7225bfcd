use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProfitabilityError;
use crate::types::Rate;
use crate::ProfitabilityResult;

/// Run-wide profitability assumptions, supplied once and passed to every
/// component explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Expected loss ratio applied to premium or to the loss basis.
    pub loss_ratio: Rate,
    /// Excess-of-loss reinsurance cost as a fraction of own-retention premium.
    pub xol_fraction: Rate,
    /// Operating expense as a fraction of cedant retained premium.
    pub expense_fraction: Rate,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            loss_ratio: dec!(0.45),
            xol_fraction: dec!(0.12),
            expense_fraction: dec!(0.20),
        }
    }
}

impl Assumptions {
    /// Every assumption must be a fraction in [0, 1].
    pub fn validate(&self) -> ProfitabilityResult<()> {
        for (field, value) in [
            ("loss_ratio", self.loss_ratio),
            ("xol_fraction", self.xol_fraction),
            ("expense_fraction", self.expense_fraction),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ProfitabilityError::InvalidAssumption {
                    field: field.into(),
                    reason: format!("must be between 0 and 1, got {value}"),
                });
            }
        }
        Ok(())
    }
}
