use serde::{Deserialize, Serialize};

use crate::policy::PolicyRecord;
use crate::types::Money;

/// Local-currency amounts and the exposure basis every split is measured on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    pub tsi_local: Money,
    pub limit_local: Money,
    pub top_risk_local: Money,
    /// max(limit_local, top_risk_local)
    pub exposure_basis: Money,
    /// cedant_share × exposure_basis
    pub retained_exposure: Money,
}

/// Convert to local currency and derive the exposure basis.
///
/// Absent limit / top-risk amounts were already defaulted to zero by
/// validation. `None` when an amount times the FX rate overflows.
pub fn compute_exposure(record: &PolicyRecord) -> Option<Exposure> {
    let tsi_local = record.tsi.checked_mul(record.fx_rate)?;
    let limit_local = record.limit_of_liability.checked_mul(record.fx_rate)?;
    let top_risk_local = record.top_risk.checked_mul(record.fx_rate)?;
    let exposure_basis = limit_local.max(top_risk_local);

    Some(Exposure {
        tsi_local,
        limit_local,
        top_risk_local,
        exposure_basis,
        retained_exposure: record.cedant_share.checked_mul(exposure_basis)?,
    })
}

impl Exposure {
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Exposure {
            tsi_local: self.tsi_local.checked_add(rhs.tsi_local)?,
            limit_local: self.limit_local.checked_add(rhs.limit_local)?,
            top_risk_local: self.top_risk_local.checked_add(rhs.top_risk_local)?,
            exposure_basis: self.exposure_basis.checked_add(rhs.exposure_basis)?,
            retained_exposure: self
                .retained_exposure
                .checked_add(rhs.retained_exposure)?,
        })
    }
}
