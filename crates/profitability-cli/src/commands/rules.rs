use rust_decimal::Decimal;
use serde_json::{json, Value};

use profitability_core::coverage::{ExposureLossRate, LossMethod, PoolTreaty};
use profitability_core::CoverageKind;

/// One flat row per coverage describing its fixed rules.
pub fn run_rules() -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Value> = CoverageKind::ALL
        .iter()
        .map(|kind| {
            let rules = kind.rules();
            json!({
                "coverage": kind.identifier(),
                "pool_rate": describe_pool_rate(&rules.pool),
                "pool_cap_per_share": rules
                    .pool
                    .cap(Decimal::ONE)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".into()),
                "pool_commission_rate": rules.pool_commission_rate.to_string(),
                "gross_loss": describe_loss(&rules.loss),
                "own_retention_cap": rules.own_retention_cap.to_string(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

fn describe_pool_rate(pool: &PoolTreaty) -> String {
    match pool {
        PoolTreaty::None => "-".into(),
        PoolTreaty::Flat { rate, .. } => rate.to_string(),
        PoolTreaty::Regional {
            priority_region,
            priority_rate,
            other_rate,
            ..
        } => format!("{priority_rate} ({priority_region}), {other_rate} (other)"),
    }
}

fn describe_loss(loss: &LossMethod) -> String {
    match loss {
        LossMethod::OnPremium => "loss_ratio x premium_100".into(),
        LossMethod::OnExposure { rate } => match rate {
            ExposureLossRate::Flat { rate } => format!("{rate} x loss_ratio x loss_basis"),
            ExposureLossRate::ByOccupancy { industrial, other } => format!(
                "{industrial} (industrial) / {other} (other) x loss_ratio x loss_basis"
            ),
        },
    }
}
