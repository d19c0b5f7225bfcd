use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProfitabilityError;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Coverage identifiers
// ---------------------------------------------------------------------------

/// Line of business. Declaration order is the canonical reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoverageKind {
    #[serde(rename = "PAR")]
    Par,
    #[serde(rename = "EQVET")]
    Eqvet,
    #[serde(rename = "MACHINERY")]
    Machinery,
    #[serde(rename = "PUBLIC LIABILITY")]
    PublicLiability,
    #[serde(rename = "FIDELITY GUARANTEE")]
    FidelityGuarantee,
}

impl CoverageKind {
    pub const ALL: [CoverageKind; 5] = [
        CoverageKind::Par,
        CoverageKind::Eqvet,
        CoverageKind::Machinery,
        CoverageKind::PublicLiability,
        CoverageKind::FidelityGuarantee,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            CoverageKind::Par => "PAR",
            CoverageKind::Eqvet => "EQVET",
            CoverageKind::Machinery => "MACHINERY",
            CoverageKind::PublicLiability => "PUBLIC LIABILITY",
            CoverageKind::FidelityGuarantee => "FIDELITY GUARANTEE",
        }
    }

    pub fn rules(self) -> &'static CoverageRules {
        &COVERAGE_RULES[self as usize]
    }
}

impl fmt::Display for CoverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for CoverageKind {
    type Err = ProfitabilityError;

    /// Exact identifier match after trimming surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        CoverageKind::ALL
            .into_iter()
            .find(|k| k.identifier() == id)
            .ok_or_else(|| ProfitabilityError::UnsupportedCoverage(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Pool treaty formulas
// ---------------------------------------------------------------------------

/// Region flag that earns the EQVET priority pool rate.
pub const EQ_PRIORITY_REGION: &str = "DKI-JABAR-BANTEN";

/// Mandatory pool cession formula for a coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoolTreaty {
    /// No pool treaty exists for the line.
    None,
    /// `min(rate × retained_exposure, cap_per_share × cedant_share)`.
    Flat { rate: Rate, cap_per_share: Money },
    /// As `Flat`, with the rate chosen by the risk's earthquake region flag.
    Regional {
        priority_region: &'static str,
        priority_rate: Rate,
        other_rate: Rate,
        cap_per_share: Money,
    },
}

impl PoolTreaty {
    /// Cession rate for a risk. Zero when there is no treaty.
    pub fn rate_for(&self, region: Option<&str>) -> Rate {
        match self {
            PoolTreaty::None => Decimal::ZERO,
            PoolTreaty::Flat { rate, .. } => *rate,
            PoolTreaty::Regional {
                priority_region,
                priority_rate,
                other_rate,
                ..
            } => {
                if region.map(str::trim) == Some(*priority_region) {
                    *priority_rate
                } else {
                    *other_rate
                }
            }
        }
    }

    /// Treaty ceiling scaled by the cedant's share, if a treaty exists.
    pub fn cap(&self, cedant_share: Rate) -> Option<Money> {
        let cap_per_share = match self {
            PoolTreaty::None => return None,
            PoolTreaty::Flat { cap_per_share, .. } => cap_per_share,
            PoolTreaty::Regional { cap_per_share, .. } => cap_per_share,
        };
        Some(*cap_per_share * cedant_share)
    }

    pub fn requires_region(&self) -> bool {
        matches!(self, PoolTreaty::Regional { .. })
    }
}

// ---------------------------------------------------------------------------
// Gross expected loss formulas
// ---------------------------------------------------------------------------

/// Occupancy class that earns the industrial machinery loss rate.
pub const INDUSTRIAL_OCCUPANCY: &str = "industrial";

/// Loss rate applied to the loss basis for exposure-rated lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExposureLossRate {
    Flat { rate: Rate },
    ByOccupancy { industrial: Rate, other: Rate },
}

impl ExposureLossRate {
    pub fn rate_for(&self, occupancy: Option<&str>) -> Rate {
        match self {
            ExposureLossRate::Flat { rate } => *rate,
            ExposureLossRate::ByOccupancy { industrial, other } => {
                if occupancy.is_some_and(is_industrial) {
                    *industrial
                } else {
                    *other
                }
            }
        }
    }
}

/// Case-insensitive occupancy check; every other value is non-industrial.
pub fn is_industrial(occupancy: &str) -> bool {
    occupancy.trim().eq_ignore_ascii_case(INDUSTRIAL_OCCUPANCY)
}

/// How the 100%-basis expected loss is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LossMethod {
    /// `loss_ratio × premium_100`.
    OnPremium,
    /// `rate × loss_ratio × loss_basis`.
    OnExposure { rate: ExposureLossRate },
}

impl LossMethod {
    pub fn requires_occupancy(&self) -> bool {
        matches!(
            self,
            LossMethod::OnExposure {
                rate: ExposureLossRate::ByOccupancy { .. }
            }
        )
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Static per-coverage constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageRules {
    pub coverage: CoverageKind,
    pub pool: PoolTreaty,
    pub pool_commission_rate: Rate,
    pub loss: LossMethod,
    /// Ceiling on the own-retention amount, local currency.
    pub own_retention_cap: Money,
}

/// Indexed by `CoverageKind as usize`.
pub const COVERAGE_RULES: [CoverageRules; 5] = [
    CoverageRules {
        coverage: CoverageKind::Par,
        pool: PoolTreaty::Flat {
            rate: dec!(0.025),
            cap_per_share: dec!(500_000_000),
        },
        pool_commission_rate: dec!(0.35),
        loss: LossMethod::OnPremium,
        own_retention_cap: dec!(350_000_000_000),
    },
    CoverageRules {
        coverage: CoverageKind::Eqvet,
        pool: PoolTreaty::Regional {
            priority_region: EQ_PRIORITY_REGION,
            priority_rate: dec!(0.10),
            other_rate: dec!(0.25),
            // Historical variants also show 10B; pending product-owner confirmation.
            cap_per_share: dec!(100_000_000_000),
        },
        pool_commission_rate: dec!(0.30),
        loss: LossMethod::OnPremium,
        own_retention_cap: dec!(350_000_000_000),
    },
    CoverageRules {
        coverage: CoverageKind::Machinery,
        pool: PoolTreaty::None,
        pool_commission_rate: Decimal::ZERO,
        loss: LossMethod::OnExposure {
            rate: ExposureLossRate::ByOccupancy {
                industrial: dec!(0.0015),
                other: dec!(0.0001),
            },
        },
        own_retention_cap: dec!(300_000_000_000),
    },
    CoverageRules {
        coverage: CoverageKind::PublicLiability,
        pool: PoolTreaty::None,
        pool_commission_rate: Decimal::ZERO,
        loss: LossMethod::OnExposure {
            rate: ExposureLossRate::Flat { rate: dec!(0.0005) },
        },
        own_retention_cap: dec!(80_000_000_000),
    },
    CoverageRules {
        coverage: CoverageKind::FidelityGuarantee,
        pool: PoolTreaty::None,
        pool_commission_rate: Decimal::ZERO,
        loss: LossMethod::OnExposure {
            rate: ExposureLossRate::Flat { rate: dec!(0.0010) },
        },
        own_retention_cap: dec!(80_000_000_000),
    },
];
