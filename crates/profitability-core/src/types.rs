use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values, in local currency unless a field says otherwise.
pub type Money = Decimal;

/// Fractions expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Divide, yielding zero when the denominator is zero and `None` when the
/// quotient does not fit a `Decimal`.
///
/// Every `%` column, total-row ratio and result ratio goes through this.
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        Some(Decimal::ZERO)
    } else {
        numerator.checked_div(denominator)
    }
}

/// Sum in order, `None` on overflow.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no timing so reruns stay identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(dec!(125), Decimal::ZERO), Some(Decimal::ZERO));
        assert_eq!(
            safe_ratio(Decimal::ZERO, Decimal::ZERO),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_safe_ratio_divides() {
        assert_eq!(
            safe_ratio(dec!(7_500_000), dec!(600_000_000)),
            Some(dec!(0.0125))
        );
        assert_eq!(safe_ratio(dec!(-32), dec!(100)), Some(dec!(-0.32)));
    }

    #[test]
    fn test_safe_ratio_overflow_is_none() {
        // A large result over a sub-unit premium does not fit 96 bits.
        assert_eq!(safe_ratio(Decimal::MAX, dec!(0.001)), None);
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([dec!(1.5), dec!(-0.5), dec!(2)]), Some(dec!(3)));
        assert_eq!(checked_sum(std::iter::empty()), Some(Decimal::ZERO));
        assert_eq!(checked_sum([Decimal::MAX, dec!(1)]), None);
    }

    #[test]
    fn test_metadata_has_no_timing() {
        let out = with_metadata("m", &serde_json::json!({}), vec![], 1u8);
        let value = serde_json::to_value(&out).unwrap();
        assert!(value["metadata"].get("computation_time_us").is_none());
        assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
    }
}
