use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, Coin, Decimal, StdError, StdResult, Uint128};

use crate::math::uint_to_decimal;

/// Collateralized debt position, one per owner
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct Position {
    pub owner: Addr,
    /// Held collateral. No zero amounts, no duplicate denoms.
    pub collateral: Vec<Coin>,
    /// Principal
    pub minted_hodl: Uint128,
    /// Accrued interest, repaid separately from principal
    pub stability_debt: Decimal,
    /// Block height of the last accrual
    pub last_updated: u64,
}

impl Position {
    pub fn new(owner: Addr, height: u64) -> Self {
        Position {
            owner,
            collateral: vec![],
            minted_hodl: Uint128::zero(),
            stability_debt: Decimal::zero(),
            last_updated: height,
        }
    }

    /// Principal + accrued interest
    pub fn total_debt(&self) -> StdResult<Decimal> {
        Ok(uint_to_decimal(self.minted_hodl)?.checked_add(self.stability_debt)?)
    }

    pub fn collateral_amount(&self, denom: &str) -> Uint128 {
        self.collateral
            .iter()
            .find(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .unwrap_or_default()
    }

    /// Merge coins into held collateral
    pub fn add_collateral(&mut self, coins: &[Coin]) -> StdResult<()> {
        for coin in coins {
            if coin.amount.is_zero() {
                continue;
            }
            match self.collateral.iter_mut().find(|held| held.denom == coin.denom) {
                Some(held) => held.amount = held.amount.checked_add(coin.amount)?,
                None => self.collateral.push(coin.clone()),
            }
        }

        Ok(())
    }

    /// Subtract coins from held collateral, dropping emptied denoms
    pub fn remove_collateral(&mut self, coins: &[Coin]) -> StdResult<()> {
        for coin in coins {
            let held = self
                .collateral
                .iter_mut()
                .find(|held| held.denom == coin.denom)
                .ok_or_else(|| StdError::GenericErr {
                    msg: format!("Position holds no {}", coin.denom),
                })?;
            held.amount = held.amount.checked_sub(coin.amount)?;
        }
        self.collateral.retain(|coin| !coin.amount.is_zero());

        Ok(())
    }

    pub fn has_debt(&self) -> bool {
        !self.minted_hodl.is_zero() || !self.stability_debt.is_zero()
    }

    /// No collateral and no debt left
    pub fn is_empty(&self) -> bool {
        self.collateral.is_empty() && !self.has_debt()
    }
}

/// Whitelisted collateral denom
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct CollateralType {
    pub denom: String,
    /// HODL per collateral unit.
    /// Always set by AddCollateralType. A record without one prices as NoPriceSet
    /// and its next SetPrice skips the deviation guard.
    pub price: Option<Decimal>,
    /// Block height of the last price update
    pub price_updated: u64,
}

/// Global counters, only mutated through the `record_*` methods
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub struct ModuleState {
    /// Outstanding principal minted by the engine
    pub total_supply: Uint128,
    /// Cumulative liquidation shortfall
    pub bad_debt: Decimal,
    /// Cumulative HODL fees sent to the fee collector
    pub fee_revenue: Uint128,
    /// Cumulative stability debt discharged
    pub interest_repaid: Decimal,
}

impl ModuleState {
    pub fn record_mint(&mut self, principal: Uint128) -> StdResult<()> {
        self.total_supply = self.total_supply.checked_add(principal)?;
        Ok(())
    }

    pub fn record_burn(&mut self, principal: Uint128) -> StdResult<()> {
        self.total_supply = self.total_supply.checked_sub(principal).map_err(|_| StdError::GenericErr {
            msg: format!(
                "Burned principal {} exceeds total supply {}",
                principal, self.total_supply
            ),
        })?;
        Ok(())
    }

    pub fn record_fee(&mut self, fee: Uint128) -> StdResult<()> {
        self.fee_revenue = self.fee_revenue.checked_add(fee)?;
        Ok(())
    }

    pub fn record_interest_repaid(&mut self, interest: Decimal) -> StdResult<()> {
        self.interest_repaid = self.interest_repaid.checked_add(interest)?;
        Ok(())
    }

    pub fn record_bad_debt(&mut self, shortfall: Decimal) -> StdResult<()> {
        self.bad_debt = self.bad_debt.checked_add(shortfall)?;
        Ok(())
    }

    /// Circuit breaker: bad debt strictly above the limit
    pub fn is_minting_paused(&self, limit: Uint128) -> StdResult<bool> {
        Ok(self.bad_debt > uint_to_decimal(limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coin;
    use std::str::FromStr;

    #[test]
    fn collateral_merging() {
        let mut position = Position::new(Addr::unchecked("owner"), 1);
        position.add_collateral(&[coin(100, "uatom"), coin(0, "uosmo")]).unwrap();
        position.add_collateral(&[coin(50, "uatom"), coin(10, "uosmo")]).unwrap();

        assert_eq!(position.collateral, vec![coin(150, "uatom"), coin(10, "uosmo")]);

        position.remove_collateral(&[coin(10, "uosmo")]).unwrap();
        assert_eq!(position.collateral, vec![coin(150, "uatom")]);
        assert_eq!(position.collateral_amount("uosmo"), Uint128::zero());

        //Can't overdraw
        position.remove_collateral(&[coin(151, "uatom")]).unwrap_err();
        position.remove_collateral(&[coin(1, "uosmo")]).unwrap_err();
    }

    #[test]
    fn total_debt_and_emptiness() {
        let mut position = Position::new(Addr::unchecked("owner"), 1);
        assert!(position.is_empty());

        position.minted_hodl = Uint128::new(100);
        position.stability_debt = Decimal::from_str("0.25").unwrap();
        assert_eq!(position.total_debt().unwrap(), Decimal::from_str("100.25").unwrap());
        assert!(!position.is_empty());

        position.minted_hodl = Uint128::zero();
        assert!(position.has_debt());
    }

    #[test]
    fn module_state_counters() {
        let mut state = ModuleState::default();
        state.record_mint(Uint128::new(100)).unwrap();
        state.record_burn(Uint128::new(40)).unwrap();
        assert_eq!(state.total_supply, Uint128::new(60));

        //Can't burn more principal than was minted
        state.record_burn(Uint128::new(61)).unwrap_err();

        //Breaker trips only when strictly above the limit
        let limit = Uint128::new(50);
        state.record_bad_debt(Decimal::from_str("50").unwrap()).unwrap();
        assert!(!state.is_minting_paused(limit).unwrap());
        state.record_bad_debt(Decimal::from_str("0.1").unwrap()).unwrap();
        assert!(state.is_minting_paused(limit).unwrap());
        assert_eq!(state.bad_debt, Decimal::from_str("50.1").unwrap());
    }
}
