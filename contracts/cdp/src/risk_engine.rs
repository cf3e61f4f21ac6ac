use cosmwasm_std::{Coin, Decimal, Storage};

use hodl::cdp::Params;
use hodl::math::{decimal_multiplication, uint_to_decimal};
use hodl::types::Position;

use crate::error::ContractError;
use crate::oracle::get_price;

/// Snapshot of a Position's solvency
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    pub valuation: Decimal,
    pub total_debt: Decimal,
    pub ratio: Decimal,
}

impl Health {
    pub fn is_liquidatable(&self, params: &Params) -> bool {
        self.ratio < params.liquidation_ratio
    }

    pub fn meets_collateral_ratio(&self, params: &Params) -> bool {
        self.ratio >= params.collateral_ratio
    }
}

/// HODL value of a collateral set, priced through `price_of`
pub fn get_valuation<F>(collateral: &[Coin], price_of: F) -> Result<Decimal, ContractError>
where
    F: Fn(&str) -> Result<Decimal, ContractError>,
{
    let mut valuation = Decimal::zero();

    for coin in collateral {
        let value = decimal_multiplication(uint_to_decimal(coin.amount)?, price_of(&coin.denom)?)?;
        valuation = valuation.checked_add(value)?;
    }

    Ok(valuation)
}

/// valuation / debt.
/// Debt-free (or unrepresentably safe) positions report Decimal::MAX.
pub fn collateral_ratio(valuation: Decimal, total_debt: Decimal) -> Decimal {
    if total_debt.is_zero() {
        return Decimal::MAX;
    }

    valuation.checked_div(total_debt).unwrap_or(Decimal::MAX)
}

pub fn get_health(storage: &dyn Storage, stable_denom: &str, position: &Position) -> Result<Health, ContractError> {
    let valuation = get_valuation(&position.collateral, |denom| get_price(storage, stable_denom, denom))?;
    let total_debt = position.total_debt()?;

    Ok(Health {
        valuation,
        total_debt,
        ratio: collateral_ratio(valuation, total_debt),
    })
}

/// Errors if the Position is below the minimum collateral ratio
pub fn assert_ratio(storage: &dyn Storage, stable_denom: &str, params: &Params, position: &Position) -> Result<Health, ContractError> {
    let health = get_health(storage, stable_denom, position)?;

    if !health.meets_collateral_ratio(params) {
        return Err(ContractError::CollateralRatioTooLow {
            ratio: health.ratio,
            minimum: params.collateral_ratio,
        });
    }

    Ok(health)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coin;
    use std::str::FromStr;

    #[test]
    fn valuation_uses_lookup() {
        let collateral = vec![coin(200, "uatom"), coin(50, "uosmo")];
        let price_of = |denom: &str| match denom {
            "uatom" => Ok(Decimal::percent(60)),
            "uosmo" => Ok(Decimal::percent(200)),
            _ => Err(ContractError::NotWhitelisted { denom: denom.to_string() }),
        };

        assert_eq!(get_valuation(&collateral, price_of).unwrap(), Decimal::from_str("220").unwrap());
        assert_eq!(get_valuation(&[], price_of).unwrap(), Decimal::zero());

        let err = get_valuation(&[coin(1, "uluna")], price_of).unwrap_err();
        assert_eq!(err, ContractError::NotWhitelisted { denom: String::from("uluna") });
    }

    #[test]
    fn ratio_edges() {
        let hundred = Decimal::from_str("100").unwrap();

        assert_eq!(collateral_ratio(hundred, Decimal::zero()), Decimal::MAX);
        assert_eq!(collateral_ratio(Decimal::zero(), hundred), Decimal::zero());
        assert_eq!(
            collateral_ratio(Decimal::from_str("130").unwrap(), hundred),
            Decimal::percent(130)
        );

        //Exactly at the liquidation ratio isn't liquidatable
        let params = Params::default();
        let health = Health {
            valuation: Decimal::from_str("130").unwrap(),
            total_debt: hundred,
            ratio: Decimal::percent(130),
        };
        assert!(!health.is_liquidatable(&params));
        assert!(!health.meets_collateral_ratio(&params));

        let health = Health { ratio: Decimal::from_str("1.2999").unwrap(), ..health };
        assert!(health.is_liquidatable(&params));
    }
}
