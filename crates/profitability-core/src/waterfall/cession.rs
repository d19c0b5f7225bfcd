use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageRules;
use crate::policy::PolicyRecord;
use crate::types::Money;
use crate::waterfall::exposure::Exposure;

/// Pool-treaty and facultative cession amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cession {
    pub pool_amount: Money,
    pub facultative_amount: Money,
}

/// Pool cession is `min(rate × retained_exposure, cap × cedant_share)` for
/// lines with a treaty, zero otherwise. Facultative cession is always
/// `facultative_share × exposure_basis`, uncapped.
///
/// The facultative share is not checked against `1 − cedant_share`; several
/// reinsurance arrangements may coexist on one risk.
pub fn allocate_cessions(
    rules: &CoverageRules,
    record: &PolicyRecord,
    exposure: &Exposure,
) -> Option<Cession> {
    let pool_amount = match rules.pool.cap(record.cedant_share) {
        Some(cap) => {
            let rate = rules.pool.rate_for(record.eq_region.as_deref());
            rate.checked_mul(exposure.retained_exposure)?.min(cap)
        }
        None => Decimal::ZERO,
    };
    let facultative_amount = record
        .facultative_share
        .checked_mul(exposure.exposure_basis)?;

    Some(Cession {
        pool_amount: pool_amount.max(Decimal::ZERO),
        facultative_amount: facultative_amount.max(Decimal::ZERO),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageKind;
    use crate::waterfall::exposure::compute_exposure;
    use crate::waterfall::test_support::par_record;
    use rust_decimal_macros::dec;

    fn cede(kind: CoverageKind, record: &PolicyRecord) -> Cession {
        let exposure = compute_exposure(record).unwrap();
        allocate_cessions(kind.rules(), record, &exposure).unwrap()
    }

    #[test]
    fn test_par_rate_bound_active() {
        // min(0.025 × 300M, 500M × 0.5) = min(7.5M, 250M)
        let c = cede(CoverageKind::Par, &par_record());
        assert_eq!(c.pool_amount, dec!(7_500_000));
        assert_eq!(c.facultative_amount, dec!(60_000_000));
    }

    #[test]
    fn test_par_cap_bound_active() {
        let mut r = par_record();
        r.cedant_share = dec!(1);
        r.limit_of_liability = dec!(100_000_000_000);
        // 0.025 × 100B = 2.5B > 500M × 1
        let c = cede(CoverageKind::Par, &r);
        assert_eq!(c.pool_amount, dec!(500_000_000));
    }

    #[test]
    fn test_eqvet_priority_region_rate() {
        let mut r = par_record();
        r.eq_region = Some("DKI-JABAR-BANTEN".into());
        let c = cede(CoverageKind::Eqvet, &r);
        assert_eq!(c.pool_amount, dec!(30_000_000)); // 10% × 300M
    }

    #[test]
    fn test_eqvet_other_region_rate() {
        let mut r = par_record();
        r.eq_region = Some("SULAWESI".into());
        let c = cede(CoverageKind::Eqvet, &r);
        assert_eq!(c.pool_amount, dec!(75_000_000)); // 25% × 300M
    }

    #[test]
    fn test_eqvet_ceiling_binds() {
        let mut r = par_record();
        r.eq_region = Some("SULAWESI".into());
        r.cedant_share = dec!(0.2);
        r.limit_of_liability = dec!(5_000_000_000_000);
        // 25% × 1T = 250B, ceiling 100B × 0.2 = 20B
        let c = cede(CoverageKind::Eqvet, &r);
        assert_eq!(c.pool_amount, dec!(20_000_000_000));
    }

    #[test]
    fn test_lines_without_treaty_have_no_pool() {
        for kind in [
            CoverageKind::Machinery,
            CoverageKind::PublicLiability,
            CoverageKind::FidelityGuarantee,
        ] {
            let c = cede(kind, &par_record());
            assert_eq!(c.pool_amount, Decimal::ZERO, "{kind}");
            assert_eq!(c.facultative_amount, dec!(60_000_000), "{kind}");
        }
    }
}
