use serde::{Deserialize, Serialize};

use crate::policy::PolicyRecord;
use crate::types::Money;
use crate::waterfall::exposure::Exposure;
use crate::waterfall::retention::{Allocation, AllocationShares};

/// Gross premium and its layer splits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumSplit {
    /// rate × lol_fraction × tsi_local
    pub premium_100: Money,
    /// cedant_share × premium_100
    pub premium_cedant: Money,
    pub premium_pool: Money,
    pub premium_facultative: Money,
    pub premium_own_retention: Money,
    /// rate × lol_fraction × shortfall_amount
    pub premium_shortfall: Money,
    /// premium_cedant + premium_shortfall
    pub cedant_retained_premium: Money,
}

/// Spread the 100%-basis premium with the exposure allocation's shares.
///
/// Shortfall premium is rated directly on the shortfall exposure rather than
/// taken as a residual of the other splits.
pub fn spread_premium(
    record: &PolicyRecord,
    exposure: &Exposure,
    allocation: &Allocation,
    shares: &AllocationShares,
) -> Option<PremiumSplit> {
    let rate_on_lol = record.premium_rate.checked_mul(record.lol_fraction)?;
    let premium_100 = rate_on_lol.checked_mul(exposure.tsi_local)?;
    let premium_cedant = record.cedant_share.checked_mul(premium_100)?;
    let premium_shortfall = rate_on_lol.checked_mul(allocation.shortfall_amount)?;

    Some(PremiumSplit {
        premium_100,
        premium_cedant,
        premium_pool: shares.pct_pool.checked_mul(premium_100)?,
        premium_facultative: record.facultative_share.checked_mul(premium_100)?,
        premium_own_retention: shares.pct_own_retention.checked_mul(premium_100)?,
        premium_shortfall,
        cedant_retained_premium: premium_cedant.checked_add(premium_shortfall)?,
    })
}

impl PremiumSplit {
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(PremiumSplit {
            premium_100: self.premium_100.checked_add(rhs.premium_100)?,
            premium_cedant: self.premium_cedant.checked_add(rhs.premium_cedant)?,
            premium_pool: self.premium_pool.checked_add(rhs.premium_pool)?,
            premium_facultative: self
                .premium_facultative
                .checked_add(rhs.premium_facultative)?,
            premium_own_retention: self
                .premium_own_retention
                .checked_add(rhs.premium_own_retention)?,
            premium_shortfall: self
                .premium_shortfall
                .checked_add(rhs.premium_shortfall)?,
            cedant_retained_premium: self
                .cedant_retained_premium
                .checked_add(rhs.cedant_retained_premium)?,
        })
    }
}
