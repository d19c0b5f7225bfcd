use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::coverage::{CoverageRules, LossMethod};
use crate::policy::PolicyRecord;
use crate::types::Money;
use crate::waterfall::exposure::Exposure;
use crate::waterfall::premium::PremiumSplit;
use crate::waterfall::retention::AllocationShares;

/// Gross expected loss and its layer splits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossSplit {
    /// Amount the loss rate applies to: premium_100 for premium-rated lines,
    /// limit (or TSI when no positive limit) for exposure-rated lines.
    pub loss_basis: Money,
    pub loss_100: Money,
    /// cedant_share × loss_100
    pub loss_cedant: Money,
    /// loss_100 × pct_shortfall
    pub loss_shortfall: Money,
    /// loss_cedant + loss_shortfall
    pub cedant_retained_loss: Money,
    pub loss_pool: Money,
    pub loss_facultative: Money,
}

/// Exposure amount an exposure-rated line is rated on.
pub fn exposure_loss_basis(exposure: &Exposure) -> Money {
    if exposure.limit_local > Decimal::ZERO {
        exposure.limit_local
    } else {
        exposure.tsi_local
    }
}

/// Estimate the 100%-basis expected loss by the coverage's loss method and
/// spread it with the same shares used for premium.
pub fn estimate_loss(
    rules: &CoverageRules,
    record: &PolicyRecord,
    exposure: &Exposure,
    shares: &AllocationShares,
    premium: &PremiumSplit,
    assumptions: &Assumptions,
) -> Option<LossSplit> {
    let (loss_basis, loss_100) = match rules.loss {
        LossMethod::OnPremium => (
            premium.premium_100,
            assumptions.loss_ratio.checked_mul(premium.premium_100)?,
        ),
        LossMethod::OnExposure { rate } => {
            let basis = exposure_loss_basis(exposure);
            let rate = rate.rate_for(record.occupancy.as_deref());
            let loss = rate
                .checked_mul(assumptions.loss_ratio)?
                .checked_mul(basis)?;
            (basis, loss)
        }
    };

    let loss_cedant = record.cedant_share.checked_mul(loss_100)?;
    let loss_shortfall = loss_100.checked_mul(shares.pct_shortfall)?;

    Some(LossSplit {
        loss_basis,
        loss_100,
        loss_cedant,
        loss_shortfall,
        cedant_retained_loss: loss_cedant.checked_add(loss_shortfall)?,
        loss_pool: shares.pct_pool.checked_mul(loss_100)?,
        loss_facultative: record.facultative_share.checked_mul(loss_100)?,
    })
}

impl LossSplit {
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(LossSplit {
            loss_basis: self.loss_basis.checked_add(rhs.loss_basis)?,
            loss_100: self.loss_100.checked_add(rhs.loss_100)?,
            loss_cedant: self.loss_cedant.checked_add(rhs.loss_cedant)?,
            loss_shortfall: self.loss_shortfall.checked_add(rhs.loss_shortfall)?,
            cedant_retained_loss: self
                .cedant_retained_loss
                .checked_add(rhs.cedant_retained_loss)?,
            loss_pool: self.loss_pool.checked_add(rhs.loss_pool)?,
            loss_facultative: self.loss_facultative.checked_add(rhs.loss_facultative)?,
        })
    }
}
