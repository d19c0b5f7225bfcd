use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::coverage::CoverageRules;
use crate::policy::PolicyRecord;
use crate::types::Money;
use crate::waterfall::premium::PremiumSplit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Costs {
    pub acquisition: Money,
    pub pool_commission: Money,
    pub facultative_commission: Money,
    pub excess_of_loss_cost: Money,
    pub expense: Money,
}

/// Acquisition cost, reinsurance commissions, XoL cost and expense.
pub fn compute_costs(
    rules: &CoverageRules,
    record: &PolicyRecord,
    premium: &PremiumSplit,
    assumptions: &Assumptions,
) -> Option<Costs> {
    Some(Costs {
        acquisition: record
            .acquisition_fraction
            .checked_mul(premium.cedant_retained_premium)?,
        pool_commission: rules
            .pool_commission_rate
            .checked_mul(premium.premium_pool)?,
        facultative_commission: record
            .facultative_commission
            .checked_mul(premium.premium_facultative)?,
        excess_of_loss_cost: assumptions
            .xol_fraction
            .checked_mul(premium.premium_own_retention)?,
        expense: assumptions
            .expense_fraction
            .checked_mul(premium.cedant_retained_premium)?,
    })
}

impl Costs {
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Costs {
            acquisition: self.acquisition.checked_add(rhs.acquisition)?,
            pool_commission: self.pool_commission.checked_add(rhs.pool_commission)?,
            facultative_commission: self
                .facultative_commission
                .checked_add(rhs.facultative_commission)?,
            excess_of_loss_cost: self
                .excess_of_loss_cost
                .checked_add(rhs.excess_of_loss_cost)?,
            expense: self.expense.checked_add(rhs.expense)?,
        })
    }
}
