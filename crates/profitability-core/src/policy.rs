use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageKind;
use crate::error::{MissingField, ProfitabilityError};
use crate::types::{Money, Rate};
use crate::ProfitabilityResult;

// ---------------------------------------------------------------------------
// Raw input row
// ---------------------------------------------------------------------------

/// One insured risk as supplied by the record source. Every field is optional
/// here; `validate_batch` decides which absences are errors.
///
/// Aliases accept the column headers of the underwriting workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecordInput {
    /// Total sum insured, original currency
    #[serde(default, alias = "TSI Full Value original currency")]
    pub tsi: Option<Money>,
    /// Limit of liability, original currency
    #[serde(default, alias = "Limit of Liability original currency")]
    pub limit_of_liability: Option<Money>,
    /// Top-risk amount, original currency
    #[serde(default, alias = "Top Risk original currency")]
    pub top_risk: Option<Money>,
    /// Original currency → local currency
    #[serde(default, alias = "Kurs")]
    pub fx_rate: Option<Rate>,
    #[serde(default, alias = "% Askrindo Share")]
    pub cedant_share: Option<Rate>,
    #[serde(default, alias = "% Fakultatif Share")]
    pub facultative_share: Option<Rate>,
    #[serde(default, alias = "% Komisi Fakultatif")]
    pub facultative_commission: Option<Rate>,
    #[serde(default, alias = "Rate")]
    pub premium_rate: Option<Rate>,
    /// Percent of premium subject to loss of limit
    #[serde(default, alias = "% LOL Premi")]
    pub lol_fraction: Option<Rate>,
    #[serde(default, alias = "% Akuisisi")]
    pub acquisition_fraction: Option<Rate>,
    /// EQVET only
    #[serde(default, alias = "Wilayah Gempa Prioritas")]
    pub eq_region: Option<String>,
    /// MACHINERY only
    #[serde(default, alias = "Occupancy")]
    pub occupancy: Option<String>,
}

// ---------------------------------------------------------------------------
// Validated record
// ---------------------------------------------------------------------------

/// A fully populated policy row. Read once per run, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub tsi: Money,
    pub limit_of_liability: Money,
    pub top_risk: Money,
    pub fx_rate: Rate,
    pub cedant_share: Rate,
    pub facultative_share: Rate,
    pub facultative_commission: Rate,
    pub premium_rate: Rate,
    pub lol_fraction: Rate,
    pub acquisition_fraction: Rate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<String>,
}

/// Validate a whole coverage batch.
///
/// Every missing required field of every row is collected before failing.
/// Limit of liability and top risk default to zero; a missing facultative
/// commission is coerced to zero. Negative values, and fractions above one
/// (other than the premium rate), are rejected.
pub fn validate_batch(
    coverage: CoverageKind,
    inputs: &[PolicyRecordInput],
) -> ProfitabilityResult<Vec<PolicyRecord>> {
    let rules = coverage.rules();
    let mut missing: Vec<MissingField> = Vec::new();

    for (row, input) in inputs.iter().enumerate() {
        let mut require = |present: bool, field: &str| {
            if !present {
                missing.push(MissingField {
                    row,
                    field: field.into(),
                });
            }
        };
        require(input.tsi.is_some(), "tsi");
        require(input.fx_rate.is_some(), "fx_rate");
        require(input.cedant_share.is_some(), "cedant_share");
        require(input.facultative_share.is_some(), "facultative_share");
        require(input.premium_rate.is_some(), "premium_rate");
        require(input.lol_fraction.is_some(), "lol_fraction");
        require(input.acquisition_fraction.is_some(), "acquisition_fraction");
        if rules.pool.requires_region() {
            require(has_text(&input.eq_region), "eq_region");
        }
        if rules.loss.requires_occupancy() {
            require(has_text(&input.occupancy), "occupancy");
        }
    }

    if !missing.is_empty() {
        return Err(ProfitabilityError::MissingFields {
            coverage: coverage.to_string(),
            fields: missing,
        });
    }

    inputs
        .iter()
        .enumerate()
        .map(|(row, input)| complete_record(coverage, row, input))
        .collect()
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn complete_record(
    coverage: CoverageKind,
    row: usize,
    input: &PolicyRecordInput,
) -> ProfitabilityResult<PolicyRecord> {
    let zero = Decimal::ZERO;
    let record = PolicyRecord {
        tsi: input.tsi.unwrap_or(zero),
        limit_of_liability: input.limit_of_liability.unwrap_or(zero),
        top_risk: input.top_risk.unwrap_or(zero),
        fx_rate: input.fx_rate.unwrap_or(zero),
        cedant_share: input.cedant_share.unwrap_or(zero),
        facultative_share: input.facultative_share.unwrap_or(zero),
        facultative_commission: input.facultative_commission.unwrap_or(zero),
        premium_rate: input.premium_rate.unwrap_or(zero),
        lol_fraction: input.lol_fraction.unwrap_or(zero),
        acquisition_fraction: input.acquisition_fraction.unwrap_or(zero),
        eq_region: input.eq_region.clone(),
        occupancy: input.occupancy.clone(),
    };

    let invalid = |field: &str, reason: &str| ProfitabilityError::InvalidInput {
        coverage: coverage.to_string(),
        row,
        field: field.into(),
        reason: reason.into(),
    };

    for (field, value) in [
        ("tsi", record.tsi),
        ("limit_of_liability", record.limit_of_liability),
        ("top_risk", record.top_risk),
        ("fx_rate", record.fx_rate),
        ("premium_rate", record.premium_rate),
    ] {
        if value < zero {
            return Err(invalid(field, "cannot be negative"));
        }
    }

    for (field, value) in [
        ("cedant_share", record.cedant_share),
        ("facultative_share", record.facultative_share),
        ("facultative_commission", record.facultative_commission),
        ("lol_fraction", record.lol_fraction),
        ("acquisition_fraction", record.acquisition_fraction),
    ] {
        if value < zero || value > Decimal::ONE {
            return Err(invalid(field, "must be a fraction between 0 and 1"));
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn complete_input() -> PolicyRecordInput {
        PolicyRecordInput {
            tsi: Some(dec!(1_000_000_000)),
            limit_of_liability: Some(dec!(600_000_000)),
            top_risk: None,
            fx_rate: Some(dec!(1)),
            cedant_share: Some(dec!(0.5)),
            facultative_share: Some(dec!(0.1)),
            facultative_commission: Some(dec!(0.2)),
            premium_rate: Some(dec!(0.002)),
            lol_fraction: Some(dec!(1)),
            acquisition_fraction: Some(dec!(0.15)),
            eq_region: None,
            occupancy: None,
        }
    }

    #[test]
    fn test_optional_amounts_default_to_zero() {
        let mut input = complete_input();
        input.limit_of_liability = None;
        input.facultative_commission = None;
        let records = validate_batch(CoverageKind::Par, &[input]).unwrap();
        assert_eq!(records[0].limit_of_liability, Decimal::ZERO);
        assert_eq!(records[0].top_risk, Decimal::ZERO);
        assert_eq!(records[0].facultative_commission, Decimal::ZERO);
    }

    #[test]
    fn test_reports_every_missing_field() {
        let mut first = complete_input();
        first.fx_rate = None;
        first.tsi = None;
        let second = complete_input();
        let mut third = complete_input();
        third.acquisition_fraction = None;

        let err = validate_batch(CoverageKind::Par, &[first, second, third]).unwrap_err();
        match err {
            ProfitabilityError::MissingFields { coverage, fields } => {
                assert_eq!(coverage, "PAR");
                assert_eq!(
                    fields,
                    vec![
                        MissingField {
                            row: 0,
                            field: "tsi".into(),
                        },
                        MissingField {
                            row: 0,
                            field: "fx_rate".into(),
                        },
                        MissingField {
                            row: 2,
                            field: "acquisition_fraction".into(),
                        },
                    ]
                );
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_eqvet_requires_region() {
        let err = validate_batch(CoverageKind::Eqvet, &[complete_input()]).unwrap_err();
        assert!(err.to_string().contains("eq_region"));

        let mut input = complete_input();
        input.eq_region = Some("DKI-JABAR-BANTEN".into());
        assert!(validate_batch(CoverageKind::Eqvet, &[input]).is_ok());
    }

    #[test]
    fn test_machinery_requires_non_blank_occupancy() {
        let mut input = complete_input();
        input.occupancy = Some("   ".into());
        let err = validate_batch(CoverageKind::Machinery, &[input.clone()]).unwrap_err();
        assert!(err.to_string().contains("occupancy"));

        input.occupancy = Some("Industrial".into());
        assert!(validate_batch(CoverageKind::Machinery, &[input]).is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut input = complete_input();
        input.top_risk = Some(dec!(-1));
        match validate_batch(CoverageKind::Par, &[complete_input(), input]) {
            Err(ProfitabilityError::InvalidInput { row, field, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(field, "top_risk");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_share_above_one_rejected() {
        let mut input = complete_input();
        input.cedant_share = Some(dec!(1.5));
        assert!(matches!(
            validate_batch(CoverageKind::Par, &[input]),
            Err(ProfitabilityError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_batch_is_valid() {
        assert!(validate_batch(CoverageKind::FidelityGuarantee, &[])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_workbook_headers_deserialize() {
        let json = r#"{
            "TSI Full Value original currency": "1000000",
            "Kurs": "15000",
            "% Askrindo Share": "0.4",
            "% Fakultatif Share": "0",
            "Rate": "0.001",
            "% LOL Premi": "1",
            "% Akuisisi": "0.1",
            "Occupancy": "Industrial",
            "Kode Okupasi": 2934
        }"#;
        let input: PolicyRecordInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.tsi, Some(dec!(1000000)));
        assert_eq!(input.fx_rate, Some(dec!(15000)));
        assert_eq!(input.occupancy.as_deref(), Some("Industrial"));
        assert_eq!(input.limit_of_liability, None);
    }
}
