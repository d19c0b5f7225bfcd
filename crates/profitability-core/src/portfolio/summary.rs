use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageKind;
use crate::error::ProfitabilityError;
use crate::types::{checked_sum, safe_ratio, Money, Rate};
use crate::waterfall::{
    Allocation, AllocationShares, Costs, DerivedRow, Exposure, LossSplit, PremiumSplit,
    UnderwritingResult,
};
use crate::ProfitabilityResult;

// ---------------------------------------------------------------------------
// Coverage total row
// ---------------------------------------------------------------------------

/// Total row for one coverage batch.
///
/// Additive columns are sums; ratio columns are recomputed from the sums,
/// never averaged across rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTotal {
    pub coverage: CoverageKind,
    pub policies: usize,
    pub shortfall_rows: usize,
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

impl CoverageTotal {
    pub fn empty(coverage: CoverageKind) -> Self {
        CoverageTotal {
            coverage,
            policies: 0,
            shortfall_rows: 0,
            exposure: Exposure::default(),
            allocation: Allocation::default(),
            shares: AllocationShares::default(),
            premium: PremiumSplit::default(),
            loss: LossSplit::default(),
            costs: Costs::default(),
            outcome: UnderwritingResult::default(),
        }
    }

    pub fn from_rows(coverage: CoverageKind, rows: &[DerivedRow]) -> ProfitabilityResult<Self> {
        let mut total = CoverageTotal::empty(coverage);
        for row in rows {
            total.add_row(row)?;
        }
        Ok(total)
    }

    /// Running-sum accumulation; ratios stay consistent after every call.
    /// On overflow the total is left unchanged.
    pub fn add_row(&mut self, row: &DerivedRow) -> ProfitabilityResult<()> {
        let shortfall_rows = usize::from(row.has_shortfall());
        self.accumulate(
            1,
            shortfall_rows,
            &row.exposure,
            &row.allocation,
            &row.premium,
            &row.loss,
            &row.costs,
            row.outcome.result,
        )
    }

    /// Fold another total of the same coverage into this one.
    pub fn merge(&mut self, other: &CoverageTotal) -> ProfitabilityResult<()> {
        self.accumulate(
            other.policies,
            other.shortfall_rows,
            &other.exposure,
            &other.allocation,
            &other.premium,
            &other.loss,
            &other.costs,
            other.outcome.result,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn accumulate(
        &mut self,
        policies: usize,
        shortfall_rows: usize,
        exposure: &Exposure,
        allocation: &Allocation,
        premium: &PremiumSplit,
        loss: &LossSplit,
        costs: &Costs,
        result: Money,
    ) -> ProfitabilityResult<()> {
        let overflow = || ProfitabilityError::Overflow {
            coverage: self.coverage.identifier().to_string(),
            context: "coverage total".to_string(),
        };

        let exposure = self.exposure.checked_add(exposure).ok_or_else(overflow)?;
        let allocation = self.allocation.checked_add(allocation).ok_or_else(overflow)?;
        let premium = self.premium.checked_add(premium).ok_or_else(overflow)?;
        let loss = self.loss.checked_add(loss).ok_or_else(overflow)?;
        let costs = self.costs.checked_add(costs).ok_or_else(overflow)?;
        let result = self
            .outcome
            .result
            .checked_add(result)
            .ok_or_else(overflow)?;

        let shares = AllocationShares::of(&allocation, exposure.exposure_basis)
            .ok_or_else(overflow)?;
        let result_ratio =
            safe_ratio(result, premium.cedant_retained_premium).ok_or_else(overflow)?;

        self.policies += policies;
        self.shortfall_rows += shortfall_rows;
        self.exposure = exposure;
        self.allocation = allocation;
        self.shares = shares;
        self.premium = premium;
        self.loss = loss;
        self.costs = costs;
        self.outcome = UnderwritingResult {
            result,
            result_ratio,
        };
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shortfall signal
// ---------------------------------------------------------------------------

/// Non-fatal business signal: rows whose retained exposure exceeds both the
/// cessions and the own-retention cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortfallSignal {
    pub rows_affected: usize,
    pub total_shortfall: Money,
    /// Row positions with a shortfall, in input order.
    pub rows: Vec<usize>,
}

impl ShortfallSignal {
    /// `None` when the summed shortfall overflows.
    pub fn from_rows(rows: &[DerivedRow]) -> Option<Self> {
        let affected: Vec<&DerivedRow> = rows.iter().filter(|r| r.has_shortfall()).collect();
        Some(ShortfallSignal {
            rows_affected: affected.len(),
            total_shortfall: checked_sum(affected.iter().map(|r| r.allocation.shortfall_amount))?,
            rows: affected.iter().map(|r| r.row).collect(),
        })
    }

    pub fn is_triggered(&self) -> bool {
        self.rows_affected > 0
    }
}

// ---------------------------------------------------------------------------
// Cross-coverage summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    /// Coverage identifier, or "TOTAL" for the grand-total line.
    pub label: String,
    pub policies: usize,
    pub cedant_retained_premium: Money,
    pub result: Money,
    pub result_ratio: Rate,
    pub shortfall_rows: usize,
    pub shortfall_amount: Money,
}

impl SummaryLine {
    fn from_total(label: String, total: &CoverageTotal) -> Self {
        SummaryLine {
            label,
            policies: total.policies,
            cedant_retained_premium: total.premium.cedant_retained_premium,
            result: total.outcome.result,
            result_ratio: total.outcome.result_ratio,
            shortfall_rows: total.shortfall_rows,
            shortfall_amount: total.allocation.shortfall_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// One line per coverage present, canonical coverage order.
    pub lines: Vec<SummaryLine>,
    pub grand_total: SummaryLine,
}

const GRAND_TOTAL_LABEL: &str = "TOTAL";

/// Build the cross-coverage summary. Totals for the same coverage are merged.
pub fn summarize<'a>(
    totals: impl IntoIterator<Item = &'a CoverageTotal>,
) -> ProfitabilityResult<PortfolioSummary> {
    let mut by_coverage: BTreeMap<CoverageKind, CoverageTotal> = BTreeMap::new();
    for total in totals {
        by_coverage
            .entry(total.coverage)
            .or_insert_with(|| CoverageTotal::empty(total.coverage))
            .merge(total)?;
    }

    let lines: Vec<SummaryLine> = by_coverage
        .values()
        .map(|t| SummaryLine::from_total(t.coverage.to_string(), t))
        .collect();

    let overflow = || ProfitabilityError::Overflow {
        coverage: GRAND_TOTAL_LABEL.to_string(),
        context: "portfolio summary".to_string(),
    };
    let cedant_retained_premium =
        checked_sum(lines.iter().map(|l| l.cedant_retained_premium)).ok_or_else(overflow)?;
    let result = checked_sum(lines.iter().map(|l| l.result)).ok_or_else(overflow)?;
    let shortfall_amount =
        checked_sum(lines.iter().map(|l| l.shortfall_amount)).ok_or_else(overflow)?;

    let grand_total = SummaryLine {
        label: GRAND_TOTAL_LABEL.to_string(),
        policies: lines.iter().map(|l| l.policies).sum(),
        cedant_retained_premium,
        result,
        result_ratio: safe_ratio(result, cedant_retained_premium).ok_or_else(overflow)?,
        shortfall_rows: lines.iter().map(|l| l.shortfall_rows).sum(),
        shortfall_amount,
    };

    Ok(PortfolioSummary { lines, grand_total })
}

impl Default for PortfolioSummary {
    fn default() -> Self {
        PortfolioSummary {
            lines: Vec::new(),
            grand_total: SummaryLine {
                label: GRAND_TOTAL_LABEL.to_string(),
                policies: 0,
                cedant_retained_premium: Decimal::ZERO,
                result: Decimal::ZERO,
                result_ratio: Decimal::ZERO,
                shortfall_rows: 0,
                shortfall_amount: Decimal::ZERO,
            },
        }
    }
}

impl PortfolioSummary {
    pub fn line(&self, coverage: CoverageKind) -> Option<&SummaryLine> {
        self.lines.iter().find(|l| l.label == coverage.identifier())
    }

    pub fn has_shortfall(&self) -> bool {
        self.grand_total.shortfall_amount > Decimal::ZERO
    }
}
