use cosmwasm_std::{attr, Coin, Decimal, DepsMut, Env, Event, MessageInfo, Order, Response, Storage};

use hodl::auth::Authorize;
use hodl::cdp::Config;
use hodl::math::{decimal_division, decimal_subtraction};
use hodl::types::CollateralType;

use crate::error::ContractError;
use crate::state::{PARAMS, POSITIONS, WHITELIST};

/// The stablecoin is always worth 1 HODL
const STABLE_PRICE: Decimal = Decimal::one();

pub fn assert_authority(authority: &dyn Authorize, info: &MessageInfo) -> Result<(), ContractError> {
    if !authority.is_authorized(&info.sender) {
        return Err(ContractError::Unauthorized {});
    }
    Ok(())
}

/// Whitelist a collateral denom with a starting price
pub fn add_collateral_type(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    authority: &dyn Authorize,
    config: &Config,
    denom: String,
    initial_price: Decimal,
) -> Result<Response, ContractError> {
    assert_authority(authority, &info)?;

    if denom == config.stable_denom || WHITELIST.has(deps.storage, denom.clone()) {
        return Err(ContractError::AlreadyWhitelisted { denom });
    }
    if initial_price.is_zero() {
        return Err(ContractError::InvalidPrice {});
    }

    WHITELIST.save(
        deps.storage,
        denom.clone(),
        &CollateralType {
            denom: denom.clone(),
            price: Some(initial_price),
            price_updated: env.block.height,
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "add_collateral_type")
        .add_event(Event::new("collateral_added").add_attributes(vec![
            attr("denom", denom),
            attr("price", initial_price.to_string()),
        ])))
}

/// Remove a denom from the whitelist.
/// Errors while any Position still holds it.
pub fn remove_collateral_type(
    deps: DepsMut,
    info: MessageInfo,
    authority: &dyn Authorize,
    denom: String,
) -> Result<Response, ContractError> {
    assert_authority(authority, &info)?;

    if !WHITELIST.has(deps.storage, denom.clone()) {
        return Err(ContractError::NotWhitelisted { denom });
    }

    for item in POSITIONS.range(deps.storage, None, None, Order::Ascending) {
        let (_owner, position) = item?;
        if !position.collateral_amount(&denom).is_zero() {
            return Err(ContractError::PositionsExist { denom });
        }
    }

    WHITELIST.remove(deps.storage, denom.clone());

    Ok(Response::new()
        .add_attribute("method", "remove_collateral_type")
        .add_event(Event::new("collateral_removed").add_attribute("denom", denom)))
}

/// Oracle update, bounded by max_price_deviation relative to the stored price
pub fn set_price(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    authority: &dyn Authorize,
    denom: String,
    price: Decimal,
) -> Result<Response, ContractError> {
    assert_authority(authority, &info)?;

    if price.is_zero() {
        return Err(ContractError::InvalidPrice {});
    }

    let mut collateral = match WHITELIST.may_load(deps.storage, denom.clone())? {
        Some(collateral) => collateral,
        None => return Err(ContractError::NotWhitelisted { denom }),
    };

    //Skip the deviation guard if there is nothing to compare to
    if let Some(old_price) = collateral.price {
        let params = PARAMS.load(deps.storage)?;
        if exceeds_deviation(old_price, price, params.max_price_deviation)? {
            return Err(ContractError::DeviationExceeded {
                denom,
                old_price,
                new_price: price,
            });
        }
    }

    let old_price = collateral.price;
    collateral.price = Some(price);
    collateral.price_updated = env.block.height;
    WHITELIST.save(deps.storage, denom.clone(), &collateral)?;

    Ok(Response::new()
        .add_attribute("method", "set_price")
        .add_event(Event::new("price_updated").add_attributes(vec![
            attr("denom", denom),
            attr("old_price", old_price.map(|p| p.to_string()).unwrap_or_else(|| String::from("none"))),
            attr("new_price", price.to_string()),
            attr("height", env.block.height.to_string()),
        ])))
}

/// |new - old| / old > max_deviation
pub fn exceeds_deviation(
    old_price: Decimal,
    new_price: Decimal,
    max_deviation: Decimal,
) -> Result<bool, ContractError> {
    let difference = if new_price > old_price {
        decimal_subtraction(new_price, old_price)?
    } else {
        decimal_subtraction(old_price, new_price)?
    };

    Ok(decimal_division(difference, old_price)? > max_deviation)
}

/// Current price of a denom in HODL
pub fn get_price(storage: &dyn Storage, stable_denom: &str, denom: &str) -> Result<Decimal, ContractError> {
    if denom == stable_denom {
        return Ok(STABLE_PRICE);
    }

    match WHITELIST.may_load(storage, denom.to_string())? {
        Some(CollateralType { price: Some(price), .. }) => Ok(price),
        Some(_) => Err(ContractError::NoPriceSet { denom: denom.to_string() }),
        None => Err(ContractError::NotWhitelisted { denom: denom.to_string() }),
    }
}

/// Asserts every coin is an accepted collateral type
pub fn assert_whitelisted(storage: &dyn Storage, stable_denom: &str, coins: &[Coin]) -> Result<(), ContractError> {
    for coin in coins {
        if coin.denom != stable_denom && !WHITELIST.has(storage, coin.denom.clone()) {
            return Err(ContractError::InvalidCollateralType { denom: coin.denom.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};
    use cosmwasm_std::Addr;
    use std::str::FromStr;

    #[test]
    fn deviation_bounds() {
        let max = Decimal::percent(20);
        let one = Decimal::one();

        //Exactly at the bound is allowed
        assert!(!exceeds_deviation(one, Decimal::percent(80), max).unwrap());
        assert!(!exceeds_deviation(one, Decimal::percent(120), max).unwrap());
        //Beyond it isn't
        assert!(exceeds_deviation(one, Decimal::from_str("0.7999").unwrap(), max).unwrap());
        assert!(exceeds_deviation(one, Decimal::from_str("1.2001").unwrap(), max).unwrap());
        //Relative to the old price, not the new one
        assert!(!exceeds_deviation(Decimal::percent(80), Decimal::percent(64), max).unwrap());
    }

    #[test]
    fn unpriced_collateral() {
        let mut deps = mock_dependencies();
        WHITELIST
            .save(
                deps.as_mut().storage,
                String::from("uatom"),
                &CollateralType {
                    denom: String::from("uatom"),
                    price: None,
                    price_updated: 0,
                },
            )
            .unwrap();

        assert_eq!(
            get_price(deps.as_ref().storage, "uhodl", "uatom").unwrap_err(),
            ContractError::NoPriceSet { denom: String::from("uatom") }
        );
        assert_eq!(get_price(deps.as_ref().storage, "uhodl", "uhodl").unwrap(), Decimal::one());

        //First price isn't bounded
        let gov = Addr::unchecked("gov");
        let res = set_price(
            deps.as_mut(),
            mock_env(),
            mock_info("gov", &[]),
            &gov,
            String::from("uatom"),
            Decimal::from_str("42").unwrap(),
        )
        .unwrap();
        assert!(res.events[0].attributes.iter().any(|a| a.key == "old_price" && a.value == "none"));
        assert_eq!(
            get_price(deps.as_ref().storage, "uhodl", "uatom").unwrap(),
            Decimal::from_str("42").unwrap()
        );
    }
}
