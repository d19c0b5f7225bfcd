//! Per-row allocation-and-result waterfall.
//!
//! Exposure → cessions → retention/shortfall → premium → loss → costs →
//! result. Each step is a pure function of the steps before it; rows never
//! see each other.

pub mod cession;
pub mod costs;
pub mod exposure;
pub mod loss;
pub mod premium;
pub mod result;
pub mod retention;

use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::coverage::CoverageKind;
use crate::error::ProfitabilityError;
use crate::policy::PolicyRecord;
use crate::ProfitabilityResult;

pub use cession::Cession;
pub use costs::Costs;
pub use exposure::Exposure;
pub use loss::LossSplit;
pub use premium::PremiumSplit;
pub use result::UnderwritingResult;
pub use retention::{Allocation, AllocationShares};

/// Output row for one policy. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRow {
    /// Position of the source record in its batch.
    pub row: usize,
    #[serde(flatten)]
    pub exposure: Exposure,
    #[serde(flatten)]
    pub allocation: Allocation,
    #[serde(flatten)]
    pub shares: AllocationShares,
    #[serde(flatten)]
    pub premium: PremiumSplit,
    #[serde(flatten)]
    pub loss: LossSplit,
    #[serde(flatten)]
    pub costs: Costs,
    #[serde(flatten)]
    pub outcome: UnderwritingResult,
}

impl DerivedRow {
    pub fn has_shortfall(&self) -> bool {
        self.allocation.has_shortfall()
    }

    /// Pool and facultative cessions together exceed the retained share, so
    /// the layers cannot reconcile to retained exposure.
    pub fn is_over_ceded(&self) -> bool {
        match self
            .allocation
            .pool_amount
            .checked_add(self.allocation.facultative_amount)
        {
            Some(ceded) => ceded > self.exposure.retained_exposure,
            None => true,
        }
    }
}

/// Run the full waterfall for one validated record.
///
/// Fails with `Overflow` naming the step when an amount leaves the 96-bit
/// `Decimal` range.
pub fn evaluate_row(
    coverage: CoverageKind,
    row: usize,
    record: &PolicyRecord,
    assumptions: &Assumptions,
) -> ProfitabilityResult<DerivedRow> {
    let rules = coverage.rules();
    let overflow = |step: &str| ProfitabilityError::Overflow {
        coverage: coverage.identifier().to_string(),
        context: format!("row {row}: {step}"),
    };

    let exposure = exposure::compute_exposure(record).ok_or_else(|| overflow("exposure"))?;
    let cession =
        cession::allocate_cessions(rules, record, &exposure).ok_or_else(|| overflow("cession"))?;
    let allocation = retention::resolve_retention(rules, &exposure, &cession)
        .ok_or_else(|| overflow("retention"))?;
    let shares = AllocationShares::of(&allocation, exposure.exposure_basis)
        .ok_or_else(|| overflow("allocation shares"))?;
    let premium = premium::spread_premium(record, &exposure, &allocation, &shares)
        .ok_or_else(|| overflow("premium"))?;
    let loss = loss::estimate_loss(rules, record, &exposure, &shares, &premium, assumptions)
        .ok_or_else(|| overflow("loss"))?;
    let costs = costs::compute_costs(rules, record, &premium, assumptions)
        .ok_or_else(|| overflow("costs"))?;
    let outcome =
        result::aggregate_result(&premium, &loss, &costs).ok_or_else(|| overflow("result"))?;

    Ok(DerivedRow {
        row,
        exposure,
        allocation,
        shares,
        premium,
        loss,
        costs,
        outcome,
    })
}
