use cosmwasm_std::{attr, coin, Coin, CosmosMsg, Decimal, DepsMut, Env, Event, MessageInfo, Response, Uint128};

use hodl::cdp::Config;
use hodl::helpers::{burn_msg, has_duplicate_denoms, non_zero_coins, withdrawal_msg};
use hodl::math::{decimal_ceil, decimal_subtraction, mul_ceil, mul_floor, uint_to_decimal};
use hodl::token_factory::mint_msg;
use hodl::types::Position;

use crate::error::ContractError;
use crate::oracle::assert_whitelisted;
use crate::rates::accrue;
use crate::risk_engine::assert_ratio;
use crate::state::{get_position, save_position, CONFIG, MODULE_STATE, PARAMS, POSITIONS};

/// Format a coin list for event attributes.
/// Attribute values can't be empty, so an empty list is "none".
pub fn coins_to_string(coins: &[Coin]) -> String {
    if coins.is_empty() {
        return String::from("none");
    }

    coins
        .iter()
        .map(|coin| coin.to_string())
        .collect::<Vec<String>>()
        .join(",")
}

/// Returns the stablecoin amount sent.
/// Errors if anything other than the stablecoin was attached.
pub fn assert_stable_funds(info: &MessageInfo, config: &Config) -> Result<Uint128, ContractError> {
    let mut sent = Uint128::zero();

    for coin in info.funds.iter() {
        if coin.denom != config.stable_denom {
            return Err(ContractError::InvalidAmount {
                reason: format!("Only {} is accepted, got {}", config.stable_denom, coin.denom),
            });
        }
        sent = sent.checked_add(coin.amount)?;
    }

    Ok(sent)
}

/// Deposit attached collateral and mint `amount` of principal against the sender's Position
pub fn mint(deps: DepsMut, env: Env, info: MessageInfo, amount: Uint128) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;
    let mut state = MODULE_STATE.load(deps.storage)?;

    //Circuit breaker & governance gate
    if !params.minting_enabled || state.is_minting_paused(params.max_bad_debt_limit)? {
        return Err(ContractError::MintingDisabled {});
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: String::from("Mint amount must be positive"),
        });
    }

    let deposit = non_zero_coins(info.funds.clone());
    assert_whitelisted(deps.storage, &config.stable_denom, &deposit)?;

    let mut position = match POSITIONS.may_load(deps.storage, info.sender.clone())? {
        Some(position) => position,
        None => Position::new(info.sender.clone(), env.block.height),
    };
    accrue(&mut position, &params, env.block.height)?;

    position.add_collateral(&deposit)?;
    position.minted_hodl = position.minted_hodl.checked_add(amount)?;

    let health = assert_ratio(deps.storage, &config.stable_denom, &params, &position)?;

    //Fee is kept out of the delivered amount but stays in the recorded debt
    let fee = mul_floor(amount, params.mint_fee)?;
    let delivered = amount.checked_sub(fee)?;

    state.record_mint(amount)?;
    state.record_fee(fee)?;
    MODULE_STATE.save(deps.storage, &state)?;
    save_position(deps.storage, &position)?;

    let mut msgs: Vec<CosmosMsg> = vec![];
    if !delivered.is_zero() {
        msgs.push(mint_msg(&config.token_factory, config.stable_denom.clone(), delivered, &info.sender)?);
    }
    if !fee.is_zero() {
        msgs.push(mint_msg(&config.token_factory, config.stable_denom.clone(), fee, &config.fee_collector)?);
    }

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("method", "mint")
        .add_event(Event::new("mint").add_attributes(vec![
            attr("owner", info.sender.to_string()),
            attr("amount", amount.to_string()),
            attr("fee", fee.to_string()),
            attr("deposited", coins_to_string(&deposit)),
            attr("minted_hodl", position.minted_hodl.to_string()),
            attr("ratio", health.ratio.to_string()),
        ])))
}

/// Repay `amount` of principal. The burn fee is charged on top.
pub fn burn(deps: DepsMut, env: Env, info: MessageInfo, amount: Uint128) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;
    let sent = assert_stable_funds(&info, &config)?;

    let mut position = get_position(deps.storage, &info.sender)?;
    accrue(&mut position, &params, env.block.height)?;

    if amount.is_zero() || amount > position.minted_hodl {
        return Err(ContractError::InvalidBurnAmount {
            amount,
            principal: position.minted_hodl,
        });
    }

    let fee = mul_ceil(amount, params.burn_fee)?;
    let required = amount.checked_add(fee)?;
    if sent < required {
        return Err(ContractError::InsufficientBalance {
            denom: config.stable_denom,
            required,
            sent,
        });
    }
    let excess = sent.checked_sub(required)?;

    position.minted_hodl = position.minted_hodl.checked_sub(amount)?;

    let mut state = MODULE_STATE.load(deps.storage)?;
    state.record_burn(amount)?;
    state.record_fee(fee)?;
    MODULE_STATE.save(deps.storage, &state)?;
    save_position(deps.storage, &position)?;

    let mut msgs = vec![burn_msg(vec![coin(amount.u128(), config.stable_denom.clone())])];
    if !fee.is_zero() {
        msgs.push(withdrawal_msg(
            vec![coin(fee.u128(), config.stable_denom.clone())],
            &config.fee_collector,
        ));
    }
    if !excess.is_zero() {
        msgs.push(withdrawal_msg(
            vec![coin(excess.u128(), config.stable_denom.clone())],
            &info.sender,
        ));
    }

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("method", "burn")
        .add_event(Event::new("burn").add_attributes(vec![
            attr("owner", info.sender.to_string()),
            attr("amount", amount.to_string()),
            attr("fee", fee.to_string()),
            attr("refunded", excess.to_string()),
            attr("minted_hodl", position.minted_hodl.to_string()),
        ])))
}

/// Deposit attached collateral to the sender's existing Position
pub fn add_collateral(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;

    let deposit = non_zero_coins(info.funds.clone());
    if deposit.is_empty() {
        return Err(ContractError::InvalidAmount {
            reason: String::from("No collateral attached"),
        });
    }

    let mut position = get_position(deps.storage, &info.sender)?;
    assert_whitelisted(deps.storage, &config.stable_denom, &deposit)?;

    accrue(&mut position, &params, env.block.height)?;
    position.add_collateral(&deposit)?;
    save_position(deps.storage, &position)?;

    Ok(Response::new()
        .add_attribute("method", "add_collateral")
        .add_event(Event::new("add_collateral").add_attributes(vec![
            attr("owner", info.sender.to_string()),
            attr("deposited", coins_to_string(&deposit)),
            attr("collateral", coins_to_string(&position.collateral)),
        ])))
}

/// Withdraw collateral as long as the Position stays above the minimum collateral ratio
pub fn withdraw_collateral(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    collateral: Vec<Coin>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;

    if collateral.is_empty() {
        return Err(ContractError::InvalidAmount {
            reason: String::from("Nothing to withdraw"),
        });
    }
    if collateral.iter().any(|coin| coin.amount.is_zero()) {
        return Err(ContractError::InvalidAmount {
            reason: String::from("Withdrawal amounts must be positive"),
        });
    }
    if has_duplicate_denoms(&collateral) {
        return Err(ContractError::InvalidAmount {
            reason: String::from("Duplicate denoms in withdrawal"),
        });
    }

    let mut position = get_position(deps.storage, &info.sender)?;

    for coin in collateral.iter() {
        let held = position.collateral_amount(&coin.denom);
        if coin.amount > held {
            return Err(ContractError::InsufficientCollateral {
                denom: coin.denom.clone(),
                requested: coin.amount,
                held,
            });
        }
    }

    accrue(&mut position, &params, env.block.height)?;
    position.remove_collateral(&collateral)?;

    //Debt-free positions can withdraw everything
    let ratio = if position.has_debt() {
        assert_ratio(deps.storage, &config.stable_denom, &params, &position)?.ratio
    } else {
        Decimal::MAX
    };

    save_position(deps.storage, &position)?;

    Ok(Response::new()
        .add_message(withdrawal_msg(collateral.clone(), &info.sender))
        .add_attribute("method", "withdraw_collateral")
        .add_event(Event::new("withdraw_collateral").add_attributes(vec![
            attr("owner", info.sender.to_string()),
            attr("withdrawn", coins_to_string(&collateral)),
            attr("collateral", coins_to_string(&position.collateral)),
            attr("ratio", ratio.to_string()),
            attr("closed", position.is_empty().to_string()),
        ])))
}

/// Repay accrued stability debt, clamped to what's owed
pub fn pay_stability_debt(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;

    let sent = assert_stable_funds(&info, &config)?;
    if sent.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: format!("No {} attached", config.stable_denom),
        });
    }

    let mut position = get_position(deps.storage, &info.sender)?;
    accrue(&mut position, &params, env.block.height)?;

    if position.stability_debt.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: String::from("No stability debt owed"),
        });
    }

    //The ledger moves whole units so the final payment rounds up
    let owed = decimal_ceil(position.stability_debt)?;
    let payment = sent.min(owed);
    let excess = sent.checked_sub(payment)?;

    let payment_value = uint_to_decimal(payment)?;
    let discharged = payment_value.min(position.stability_debt);
    position.stability_debt = decimal_subtraction(position.stability_debt, discharged)?;

    let mut state = MODULE_STATE.load(deps.storage)?;
    state.record_interest_repaid(discharged)?;
    MODULE_STATE.save(deps.storage, &state)?;
    save_position(deps.storage, &position)?;

    let mut msgs = vec![burn_msg(vec![coin(payment.u128(), config.stable_denom.clone())])];
    if !excess.is_zero() {
        msgs.push(withdrawal_msg(
            vec![coin(excess.u128(), config.stable_denom.clone())],
            &info.sender,
        ));
    }

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("method", "pay_stability_debt")
        .add_event(Event::new("pay_stability_debt").add_attributes(vec![
            attr("owner", info.sender.to_string()),
            attr("paid", payment.to_string()),
            attr("discharged", discharged.to_string()),
            attr("refunded", excess.to_string()),
            attr("stability_debt", position.stability_debt.to_string()),
        ])))
}
