use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageRules;
use crate::types::{checked_sum, safe_ratio, Money, Rate};
use crate::waterfall::cession::Cession;
use crate::waterfall::exposure::Exposure;

/// Retained exposure split across the four risk-sharing layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub pool_amount: Money,
    pub facultative_amount: Money,
    pub own_retention_amount: Money,
    /// Retained by contractual share but beyond cession and retention-cap
    /// capacity. Not reinsured.
    pub shortfall_amount: Money,
}

impl Allocation {
    pub fn total(&self) -> Option<Money> {
        checked_sum([
            self.pool_amount,
            self.facultative_amount,
            self.own_retention_amount,
            self.shortfall_amount,
        ])
    }

    pub fn has_shortfall(&self) -> bool {
        self.shortfall_amount > Decimal::ZERO
    }

    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Allocation {
            pool_amount: self.pool_amount.checked_add(rhs.pool_amount)?,
            facultative_amount: self
                .facultative_amount
                .checked_add(rhs.facultative_amount)?,
            own_retention_amount: self
                .own_retention_amount
                .checked_add(rhs.own_retention_amount)?,
            shortfall_amount: self.shortfall_amount.checked_add(rhs.shortfall_amount)?,
        })
    }
}

/// Each layer amount as a fraction of the exposure basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationShares {
    pub pct_pool: Rate,
    pub pct_facultative: Rate,
    pub pct_own_retention: Rate,
    pub pct_shortfall: Rate,
}

impl AllocationShares {
    /// All zero when the exposure basis is zero.
    pub fn of(allocation: &Allocation, exposure_basis: Money) -> Option<Self> {
        Some(AllocationShares {
            pct_pool: safe_ratio(allocation.pool_amount, exposure_basis)?,
            pct_facultative: safe_ratio(allocation.facultative_amount, exposure_basis)?,
            pct_own_retention: safe_ratio(allocation.own_retention_amount, exposure_basis)?,
            pct_shortfall: safe_ratio(allocation.shortfall_amount, exposure_basis)?,
        })
    }
}

/// Resolve own retention and shortfall from what the cessions leave behind.
///
/// A negative remainder means the risk is fully ceded and retention is zero.
/// Own retention is capped per coverage; anything retained above the cap is
/// shortfall.
pub fn resolve_retention(
    rules: &CoverageRules,
    exposure: &Exposure,
    cession: &Cession,
) -> Option<Allocation> {
    let ceded = cession
        .pool_amount
        .checked_add(cession.facultative_amount)?;
    let raw_own_retention = exposure.retained_exposure.checked_sub(ceded)?;
    let own_retention_amount = raw_own_retention
        .max(Decimal::ZERO)
        .min(rules.own_retention_cap);
    let shortfall_amount = exposure
        .retained_exposure
        .checked_sub(ceded.checked_add(own_retention_amount)?)?
        .max(Decimal::ZERO);

    Some(Allocation {
        pool_amount: cession.pool_amount,
        facultative_amount: cession.facultative_amount,
        own_retention_amount,
        shortfall_amount,
    })
}
