//! Batch driver: validation, the per-row waterfall, totals and the
//! cross-coverage summary.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assumptions::Assumptions;
use crate::coverage::CoverageKind;
use crate::error::ProfitabilityError;
use crate::policy::{validate_batch, PolicyRecord, PolicyRecordInput};
use crate::portfolio::{summarize, CoverageTotal, PortfolioSummary, ShortfallSignal};
use crate::types::{with_metadata, ComputationOutput};
use crate::waterfall::{evaluate_row, DerivedRow};
use crate::ProfitabilityResult;

const METHODOLOGY: &str =
    "Per-policy reinsurance waterfall: exposure, cessions, retention/shortfall, premium, loss, costs, result";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Result of running one coverage batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub coverage: CoverageKind,
    /// Derived rows, same order as the input.
    pub rows: Vec<DerivedRow>,
    pub total: CoverageTotal,
    pub shortfall: ShortfallSignal,
    /// Rows where pool plus facultative exceed the retained share.
    pub over_ceded_rows: Vec<usize>,
}

/// One coverage batch as submitted, identifier still unparsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageBatch {
    pub coverage: String,
    #[serde(default)]
    pub policies: Vec<PolicyRecordInput>,
}

/// A whole book: one batch per coverage, in any order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookInput {
    pub batches: Vec<CoverageBatch>,
}

/// A batch that failed validation. Other batches are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageFailure {
    pub coverage: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReport {
    pub reports: Vec<CoverageReport>,
    pub failures: Vec<CoverageFailure>,
    pub summary: PortfolioSummary,
}

// ---------------------------------------------------------------------------
// Function 1: run_coverage
// ---------------------------------------------------------------------------

/// Validate and evaluate one coverage batch.
///
/// A validation failure rejects the whole batch; nothing partial is
/// returned. Shortfall and over-cession are reported as warnings.
pub fn run_coverage(
    coverage: CoverageKind,
    inputs: &[PolicyRecordInput],
    assumptions: &Assumptions,
) -> ProfitabilityResult<ComputationOutput<CoverageReport>> {
    let (report, warnings) = evaluate_coverage(coverage, inputs, assumptions)?;
    Ok(with_metadata(METHODOLOGY, assumptions, warnings, report))
}

fn evaluate_coverage(
    coverage: CoverageKind,
    inputs: &[PolicyRecordInput],
    assumptions: &Assumptions,
) -> ProfitabilityResult<(CoverageReport, Vec<String>)> {
    assumptions.validate()?;
    let records = validate_batch(coverage, inputs)?;
    debug!(coverage = %coverage, rows = records.len(), "evaluating batch");

    let rows = evaluate_rows(coverage, &records, assumptions)?;
    let total = CoverageTotal::from_rows(coverage, &rows)?;
    let Some(shortfall) = ShortfallSignal::from_rows(&rows) else {
        return Err(ProfitabilityError::Overflow {
            coverage: coverage.identifier().to_string(),
            context: "shortfall total".to_string(),
        });
    };
    let over_ceded_rows: Vec<usize> = rows
        .iter()
        .filter(|r| r.is_over_ceded())
        .map(|r| r.row)
        .collect();

    let mut warnings = Vec::new();
    if shortfall.is_triggered() {
        warn!(
            coverage = %coverage,
            rows = shortfall.rows_affected,
            amount = %shortfall.total_shortfall,
            "retention shortfall"
        );
        warnings.push(format!(
            "{coverage}: retention shortfall on {} row(s) {:?}, total {}",
            shortfall.rows_affected, shortfall.rows, shortfall.total_shortfall
        ));
    }
    if !over_ceded_rows.is_empty() {
        warn!(coverage = %coverage, rows = ?over_ceded_rows, "cessions exceed retained share");
        warnings.push(format!(
            "{coverage}: pool and facultative cessions exceed the retained share on row(s) {over_ceded_rows:?}"
        ));
    }

    info!(
        coverage = %coverage,
        policies = total.policies,
        result = %total.outcome.result,
        result_ratio = %total.outcome.result_ratio,
        "coverage evaluated"
    );

    let report = CoverageReport {
        coverage,
        rows,
        total,
        shortfall,
        over_ceded_rows,
    };
    Ok((report, warnings))
}

/// The first failing row in input order decides the error.
#[cfg(feature = "parallel")]
fn evaluate_rows(
    coverage: CoverageKind,
    records: &[PolicyRecord],
    assumptions: &Assumptions,
) -> ProfitabilityResult<Vec<DerivedRow>> {
    // Indexed parallel iterators keep input order on collect.
    let rows: Vec<ProfitabilityResult<DerivedRow>> = records
        .par_iter()
        .enumerate()
        .map(|(row, record)| evaluate_row(coverage, row, record, assumptions))
        .collect();
    rows.into_iter().collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_rows(
    coverage: CoverageKind,
    records: &[PolicyRecord],
    assumptions: &Assumptions,
) -> ProfitabilityResult<Vec<DerivedRow>> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| evaluate_row(coverage, row, record, assumptions))
        .collect()
}

// ---------------------------------------------------------------------------
// Function 2: run_book
// ---------------------------------------------------------------------------

/// Run every batch in a book and summarize across coverages.
///
/// A batch that fails (unknown identifier, missing fields, bad values,
/// arithmetic overflow) is listed under `failures`; the remaining batches
/// still run. Invalid assumptions fail the whole book since every batch
/// shares them.
pub fn run_book(
    book: &BookInput,
    assumptions: &Assumptions,
) -> ProfitabilityResult<ComputationOutput<BookReport>> {
    assumptions.validate()?;

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    let mut warnings = Vec::new();

    for batch in &book.batches {
        let outcome = batch
            .coverage
            .parse::<CoverageKind>()
            .and_then(|kind| evaluate_coverage(kind, &batch.policies, assumptions));
        match outcome {
            Ok((report, batch_warnings)) => {
                reports.push(report);
                warnings.extend(batch_warnings);
            }
            Err(e) => {
                warn!(coverage = %batch.coverage, error = %e, "batch rejected");
                warnings.push(format!("{}: batch rejected: {e}", batch.coverage.trim()));
                failures.push(CoverageFailure {
                    coverage: batch.coverage.trim().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let summary = summarize(reports.iter().map(|r| &r.total))?;
    info!(
        batches = reports.len(),
        failures = failures.len(),
        result = %summary.grand_total.result,
        "book evaluated"
    );

    Ok(with_metadata(
        METHODOLOGY,
        assumptions,
        warnings,
        BookReport {
            reports,
            failures,
            summary,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn par_input() -> PolicyRecordInput {
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
    fn test_run_coverage_reference_row() {
        let out =
            run_coverage(CoverageKind::Par, &[par_input()], &Assumptions::default()).unwrap();
        let report = &out.result;
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.total.outcome.result, dec!(32_000));
        assert_eq!(report.total.outcome.result_ratio, dec!(0.032));
        assert!(!report.shortfall.is_triggered());
        assert!(report.over_ceded_rows.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_run_coverage_keeps_row_order() {
        let inputs: Vec<PolicyRecordInput> = (1..=50)
            .map(|i| PolicyRecordInput {
                tsi: Some(Decimal::from(i) * dec!(1_000_000)),
                ..par_input()
            })
            .collect();
        let out = run_coverage(CoverageKind::Par, &inputs, &Assumptions::default()).unwrap();
        for (i, row) in out.result.rows.iter().enumerate() {
            assert_eq!(row.row, i);
            assert_eq!(
                row.exposure.tsi_local,
                Decimal::from(i + 1) * dec!(1_000_000)
            );
        }
    }

    #[test]
    fn test_run_coverage_rejects_whole_batch() {
        let mut bad = par_input();
        bad.fx_rate = None;
        let err = run_coverage(
            CoverageKind::Par,
            &[par_input(), bad],
            &Assumptions::default(),
        )
        .unwrap_err();
        match err {
            ProfitabilityError::MissingFields { fields, .. } => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].row, 1);
                assert_eq!(fields[0].field, "fx_rate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_coverage_rejects_bad_assumptions() {
        let assumptions = Assumptions {
            loss_ratio: dec!(1.5),
            ..Assumptions::default()
        };
        let err = run_coverage(CoverageKind::Par, &[par_input()], &assumptions).unwrap_err();
        assert!(matches!(err, ProfitabilityError::InvalidAssumption { .. }));
    }

    #[test]
    fn test_shortfall_surfaces_as_warning() {
        // Fidelity guarantee: no pool, 80B cap, 100B retained.
        let input = PolicyRecordInput {
            tsi: Some(dec!(200_000_000_000)),
            limit_of_liability: Some(dec!(200_000_000_000)),
            facultative_share: Some(dec!(0)),
            ..par_input()
        };
        let out = run_coverage(
            CoverageKind::FidelityGuarantee,
            &[input],
            &Assumptions::default(),
        )
        .unwrap();
        assert!(out.result.shortfall.is_triggered());
        assert_eq!(out.result.shortfall.rows, vec![0]);
        assert_eq!(out.result.shortfall.total_shortfall, dec!(20_000_000_000));
        assert!(out.warnings.iter().any(|w| w.contains("shortfall")));
    }

    #[test]
    fn test_over_ceded_row_flagged() {
        let input = PolicyRecordInput {
            cedant_share: Some(dec!(0.05)),
            facultative_share: Some(dec!(0.5)),
            ..par_input()
        };
        let out = run_coverage(CoverageKind::Par, &[input], &Assumptions::default()).unwrap();
        assert_eq!(out.result.over_ceded_rows, vec![0]);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("exceed the retained share")));
    }

    #[test]
    fn test_empty_batch() {
        let out = run_coverage(CoverageKind::Machinery, &[], &Assumptions::default()).unwrap();
        assert!(out.result.rows.is_empty());
        assert_eq!(out.result.total.policies, 0);
        assert_eq!(out.result.total.outcome.result_ratio, Decimal::ZERO);
    }

    #[test]
    fn test_run_book_isolates_failures() {
        let mut missing = par_input();
        missing.premium_rate = None;
        let book = BookInput {
            batches: vec![
                CoverageBatch {
                    coverage: "PAR".into(),
                    policies: vec![par_input()],
                },
                CoverageBatch {
                    coverage: "MOTOR".into(),
                    policies: vec![par_input()],
                },
                CoverageBatch {
                    coverage: "PUBLIC LIABILITY".into(),
                    policies: vec![missing],
                },
            ],
        };
        let out = run_book(&book, &Assumptions::default()).unwrap();
        let report = &out.result;

        assert_eq!(report.reports.len(), 1);
        assert_eq!(report.reports[0].coverage, CoverageKind::Par);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].coverage, "MOTOR");
        assert!(report.failures[0].error.contains("Unsupported coverage"));
        assert_eq!(report.failures[1].coverage, "PUBLIC LIABILITY");
        assert!(report.failures[1].error.contains("premium_rate"));

        assert_eq!(report.summary.lines.len(), 1);
        assert_eq!(report.summary.grand_total.result, dec!(32_000));
    }

    #[test]
    fn test_run_coverage_overflow_rejects_batch() {
        let huge = PolicyRecordInput {
            tsi: Some(dec!(1_000_000_000_000_000)),
            fx_rate: Some(dec!(100_000_000_000_000)),
            ..par_input()
        };
        let err = run_coverage(
            CoverageKind::FidelityGuarantee,
            &[par_input(), huge],
            &Assumptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Arithmetic overflow in FIDELITY GUARANTEE batch: row 1: exposure"
        );
    }

    #[test]
    fn test_run_book_isolates_overflowing_batch() {
        let huge = PolicyRecordInput {
            tsi: Some(dec!(1_000_000_000_000_000)),
            fx_rate: Some(dec!(100_000_000_000_000)),
            ..par_input()
        };
        let book = BookInput {
            batches: vec![
                CoverageBatch {
                    coverage: "PAR".into(),
                    policies: vec![par_input()],
                },
                CoverageBatch {
                    coverage: "FIDELITY GUARANTEE".into(),
                    policies: vec![huge],
                },
            ],
        };
        let out = run_book(&book, &Assumptions::default()).unwrap();
        let report = &out.result;

        assert_eq!(report.reports.len(), 1);
        assert_eq!(report.reports[0].coverage, CoverageKind::Par);
        assert_eq!(report.reports[0].total.outcome.result, dec!(32_000));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].coverage, "FIDELITY GUARANTEE");
        assert!(report.failures[0].error.contains("Arithmetic overflow"));
        assert_eq!(report.summary.grand_total.result, dec!(32_000));
    }
}
