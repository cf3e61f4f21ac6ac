use std::convert::TryFrom;

use cosmwasm_std::{
    attr, Decimal, DepsMut, Env, Event, Order, Response, StdError, StdResult, Uint128, Uint256,
};

use hodl::cdp::Params;
use hodl::math::{decimal_multiplication, uint_to_decimal};
use hodl::types::Position;

use crate::error::ContractError;
use crate::risk_engine::get_health;
use crate::state::{save_position, CONFIG, LIQUIDATABLE, PARAMS, POSITIONS};

/// Accrue simple interest on principal since the Position's last update.
/// Returns the fee added to stability debt.
pub fn accrue(position: &mut Position, params: &Params, height: u64) -> StdResult<Decimal> {
    let blocks = height.saturating_sub(position.last_updated);
    position.last_updated = height;

    if blocks == 0 || position.minted_hodl.is_zero() || params.stability_fee.is_zero() {
        return Ok(Decimal::zero());
    }
    //Params are validated on write, this only catches a corrupt stored record
    if params.blocks_per_year == 0 {
        return Err(StdError::GenericErr {
            msg: String::from("blocks_per_year must be positive"),
        });
    }

    //principal * annual rate * elapsed fraction of a year
    let annual_fee = decimal_multiplication(uint_to_decimal(position.minted_hodl)?, params.stability_fee)?;
    let fee = annual_fee.atomics().full_mul(blocks) / Uint256::from(params.blocks_per_year);
    let fee = Decimal::new(Uint128::try_from(fee)?);

    position.stability_debt = position.stability_debt.checked_add(fee)?;

    Ok(fee)
}

/// Per-block pass.
/// Accrues every Position and warns once when one crosses into liquidatable.
pub fn end_block(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;

    let positions = POSITIONS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, position)| position))
        .collect::<StdResult<Vec<Position>>>()?;

    let accrued_positions = positions.len();
    let mut total_accrued = Decimal::zero();
    let mut events = vec![];

    for mut position in positions {
        let fee = accrue(&mut position, &params, env.block.height)?;
        total_accrued = total_accrued.checked_add(fee)?;
        save_position(deps.storage, &position)?;

        let health = get_health(deps.storage, &config.stable_denom, &position)?;
        let flagged = LIQUIDATABLE.has(deps.storage, position.owner.clone());

        if health.is_liquidatable(&params) {
            if !flagged {
                LIQUIDATABLE.save(deps.storage, position.owner.clone(), &env.block.height)?;
                events.push(Event::new("liquidation_warning").add_attributes(vec![
                    attr("owner", position.owner.to_string()),
                    attr("ratio", health.ratio.to_string()),
                    attr("valuation", health.valuation.to_string()),
                    attr("total_debt", health.total_debt.to_string()),
                ]));
            }
        } else if flagged {
            LIQUIDATABLE.remove(deps.storage, position.owner.clone());
        }
    }

    let new_warnings = events.len();

    Ok(Response::new()
        .add_attribute("method", "end_block")
        .add_events(events)
        .add_event(Event::new("end_block").add_attributes(vec![
            attr("height", env.block.height.to_string()),
            attr("positions_accrued", accrued_positions.to_string()),
            attr("new_warnings", new_warnings.to_string()),
            attr("total_accrued", total_accrued.to_string()),
        ])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::Addr;
    use std::str::FromStr;

    #[test]
    fn accrual() {
        let params = Params {
            stability_fee: Decimal::percent(10),
            blocks_per_year: 100,
            ..Params::default()
        };
        let mut position = Position::new(Addr::unchecked("owner"), 10);
        position.minted_hodl = Uint128::new(1_000);

        //Same block accrues nothing
        assert_eq!(accrue(&mut position, &params, 10).unwrap(), Decimal::zero());

        //Half a year at 10% on 1000
        let fee = accrue(&mut position, &params, 60).unwrap();
        assert_eq!(fee, Decimal::from_str("50").unwrap());
        assert_eq!(position.stability_debt, Decimal::from_str("50").unwrap());
        assert_eq!(position.last_updated, 60);

        //Simple interest, not compounded on stability debt
        let fee = accrue(&mut position, &params, 70).unwrap();
        assert_eq!(fee, Decimal::from_str("10").unwrap());
        assert_eq!(position.stability_debt, Decimal::from_str("60").unwrap());
    }

    #[test]
    fn accrual_without_principal_still_advances() {
        let params = Params::default();
        let mut position = Position::new(Addr::unchecked("owner"), 10);
        position.stability_debt = Decimal::percent(50);

        assert_eq!(accrue(&mut position, &params, 500).unwrap(), Decimal::zero());
        assert_eq!(position.last_updated, 500);
        assert_eq!(position.stability_debt, Decimal::percent(50));
    }

    #[test]
    fn zero_blocks_per_year_errors() {
        let params = Params {
            blocks_per_year: 0,
            ..Params::default()
        };
        let mut position = Position::new(Addr::unchecked("owner"), 10);
        position.minted_hodl = Uint128::new(1_000);

        accrue(&mut position, &params, 20).unwrap_err();
        assert_eq!(position.stability_debt, Decimal::zero());
    }
}
