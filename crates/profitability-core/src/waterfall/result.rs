use serde::{Deserialize, Serialize};

use crate::types::{checked_sum, safe_ratio, Money, Rate};
use crate::waterfall::costs::Costs;
use crate::waterfall::loss::LossSplit;
use crate::waterfall::premium::PremiumSplit;

/// Net underwriting result of the cedant's retained position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderwritingResult {
    pub result: Money,
    /// result / cedant_retained_premium, zero when there is no premium.
    pub result_ratio: Rate,
}

pub fn aggregate_result(
    premium: &PremiumSplit,
    loss: &LossSplit,
    costs: &Costs,
) -> Option<UnderwritingResult> {
    let result = checked_sum([
        premium.cedant_retained_premium,
        -premium.premium_pool,
        -premium.premium_facultative,
        -costs.acquisition,
        costs.pool_commission,
        costs.facultative_commission,
        -loss.cedant_retained_loss,
        loss.loss_pool,
        loss.loss_facultative,
        -costs.excess_of_loss_cost,
        -costs.expense,
    ])?;

    Some(UnderwritingResult {
        result,
        result_ratio: safe_ratio(result, premium.cedant_retained_premium)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_result() {
        let premium = PremiumSplit {
            premium_100: dec!(2_000_000),
            premium_cedant: dec!(1_000_000),
            premium_pool: dec!(25_000),
            premium_facultative: dec!(200_000),
            premium_own_retention: dec!(775_000),
            premium_shortfall: Decimal::ZERO,
            cedant_retained_premium: dec!(1_000_000),
        };
        let loss = LossSplit {
            loss_basis: dec!(2_000_000),
            loss_100: dec!(900_000),
            loss_cedant: dec!(450_000),
            loss_shortfall: Decimal::ZERO,
            cedant_retained_loss: dec!(450_000),
            loss_pool: dec!(11_250),
            loss_facultative: dec!(90_000),
        };
        let costs = Costs {
            acquisition: dec!(150_000),
            pool_commission: dec!(8_750),
            facultative_commission: dec!(40_000),
            excess_of_loss_cost: dec!(93_000),
            expense: dec!(200_000),
        };
        let r = aggregate_result(&premium, &loss, &costs).unwrap();
        assert_eq!(r.result, dec!(32_000));
        assert_eq!(r.result_ratio, dec!(0.032));
    }

    #[test]
    fn test_zero_premium_gives_zero_ratio() {
        let loss = LossSplit {
            cedant_retained_loss: dec!(10),
            ..LossSplit::default()
        };
        let r = aggregate_result(&PremiumSplit::default(), &loss, &Costs::default()).unwrap();
        assert_eq!(r.result, dec!(-10));
        assert_eq!(r.result_ratio, Decimal::ZERO);
    }

    #[test]
    fn test_ratio_over_tiny_premium_overflow_is_none() {
        let premium = PremiumSplit {
            cedant_retained_premium: dec!(0.0001),
            ..PremiumSplit::default()
        };
        let loss = LossSplit {
            cedant_retained_loss: dec!(50_000_000_000_000_000_000_000_000),
            ..LossSplit::default()
        };
        assert_eq!(aggregate_result(&premium, &loss, &Costs::default()), None);
    }
}
