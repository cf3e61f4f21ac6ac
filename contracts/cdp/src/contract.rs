#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, to_binary, Binary, Deps, DepsMut, Env, Event, MessageInfo, Response, StdError, StdResult,
};
use cw2::set_contract_version;

use hodl::auth::Authority;
use hodl::cdp::{
    Config, ExecuteMsg, InstantiateMsg, MigrateMsg, Params, QueryMsg, SudoMsg, UpdateConfig,
};
use hodl::types::ModuleState;

use crate::error::ContractError;
use crate::liquidations::liquidate;
use crate::oracle::{add_collateral_type, assert_authority, remove_collateral_type, set_price};
use crate::positions::{add_collateral, burn, mint, pay_stability_debt, withdraw_collateral};
use crate::query::{
    query_module_state, query_position, query_position_health, query_positions, query_price,
    query_total_supply, query_whitelist,
};
use crate::rates::end_block;
use crate::state::{CONFIG, MODULE_STATE, PARAMS};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:cdp";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    //Authority defaults to the sender
    let authority = match msg.authority {
        Some(address) => deps.api.addr_validate(&address)?,
        None => info.sender.clone(),
    };
    let fee_collector = match msg.fee_collector {
        Some(address) => deps.api.addr_validate(&address)?,
        None => authority.clone(),
    };

    if msg.stable_denom.is_empty() {
        return Err(ContractError::InvalidAmount {
            reason: String::from("Stable denom can't be empty"),
        });
    }

    let config = Config {
        authority: Authority::Address(authority.clone()),
        stable_denom: msg.stable_denom,
        token_factory: deps.api.addr_validate(&msg.token_factory)?,
        fee_collector,
    };

    let params = msg.params.unwrap_or_default();
    validate_params(&params)?;

    CONFIG.save(deps.storage, &config)?;
    PARAMS.save(deps.storage, &params)?;
    MODULE_STATE.save(deps.storage, &ModuleState::default())?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let mut attrs = vec![];
    attrs.push(attr("method", "instantiate"));
    attrs.push(attr("authority", authority.to_string()));
    attrs.push(attr("stable_denom", config.stable_denom));

    Ok(Response::new().add_attributes(attrs))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Mint { amount } => mint(deps, env, info, amount),
        ExecuteMsg::Burn { amount } => burn(deps, env, info, amount),
        ExecuteMsg::AddCollateral {} => add_collateral(deps, env, info),
        ExecuteMsg::WithdrawCollateral { collateral } => withdraw_collateral(deps, env, info, collateral),
        ExecuteMsg::PayStabilityDebt {} => pay_stability_debt(deps, env, info),
        ExecuteMsg::Liquidate { owner } => liquidate(deps, env, info, owner),
        ExecuteMsg::AddCollateralType { denom, initial_price } => {
            let config = CONFIG.load(deps.storage)?;
            add_collateral_type(deps, env, info, &config.authority, &config, denom, initial_price)
        }
        ExecuteMsg::RemoveCollateralType { denom } => {
            let config = CONFIG.load(deps.storage)?;
            remove_collateral_type(deps, info, &config.authority, denom)
        }
        ExecuteMsg::SetPrice { denom, price } => {
            let config = CONFIG.load(deps.storage)?;
            set_price(deps, env, info, &config.authority, denom, price)
        }
        ExecuteMsg::UpdateParams(params) => update_params(deps, info, params),
        ExecuteMsg::UpdateConfig(update) => update_config(deps, info, update),
    }
}

/// Chain hooks
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    match msg {
        SudoMsg::EndBlock {} => end_block(deps, env),
    }
}

fn validate_params(params: &Params) -> Result<(), ContractError> {
    params.validate().map_err(|err| ContractError::InvalidParams {
        reason: match err {
            StdError::GenericErr { msg, .. } => msg,
            err => err.to_string(),
        },
    })
}

fn update_params(deps: DepsMut, info: MessageInfo, params: Params) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    assert_authority(&config.authority, &info)?;

    validate_params(&params)?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("method", "update_params")
        .add_event(Event::new("params_updated").add_attributes(vec![
            attr("minting_enabled", params.minting_enabled.to_string()),
            attr("collateral_ratio", params.collateral_ratio.to_string()),
            attr("liquidation_ratio", params.liquidation_ratio.to_string()),
            attr("stability_fee", params.stability_fee.to_string()),
            attr("mint_fee", params.mint_fee.to_string()),
            attr("burn_fee", params.burn_fee.to_string()),
            attr("liquidation_penalty", params.liquidation_penalty.to_string()),
            attr("liquidator_reward", params.liquidator_reward.to_string()),
            attr("max_price_deviation", params.max_price_deviation.to_string()),
            attr("blocks_per_year", params.blocks_per_year.to_string()),
            attr("max_bad_debt_limit", params.max_bad_debt_limit.to_string()),
        ])))
}

fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    update: UpdateConfig,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    //Assert Authority
    assert_authority(&config.authority, &info)?;

    let mut attrs = vec![];

    //Set Optionals
    if let Some(authority) = update.authority {
        let authority = deps.api.addr_validate(&authority)?;
        attrs.push(attr("new_authority", authority.to_string()));
        config.authority = Authority::Address(authority);
    }
    if let Some(token_factory) = update.token_factory {
        config.token_factory = deps.api.addr_validate(&token_factory)?;
        attrs.push(attr("new_token_factory", config.token_factory.to_string()));
    }
    if let Some(fee_collector) = update.fee_collector {
        config.fee_collector = deps.api.addr_validate(&fee_collector)?;
        attrs.push(attr("new_fee_collector", config.fee_collector.to_string()));
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_config")
        .add_event(Event::new("config_updated").add_attributes(attrs)))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::Params {} => to_binary(&PARAMS.load(deps.storage)?),
        QueryMsg::TotalSupply {} => to_binary(&query_total_supply(deps)?),
        QueryMsg::ModuleState {} => to_binary(&query_module_state(deps)?),
        QueryMsg::Price { denom } => to_binary(&query_price(deps, denom)?),
        QueryMsg::Whitelist { start_after, limit } => {
            to_binary(&query_whitelist(deps, start_after, limit)?)
        }
        QueryMsg::Position { owner } => to_binary(&query_position(deps, owner)?),
        QueryMsg::Positions { start_after, limit } => {
            to_binary(&query_positions(deps, start_after, limit)?)
        }
        QueryMsg::PositionHealth { owner } => {
            to_binary(&query_position_health(deps, env, owner)?)
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new().add_attribute("method", "migrate"))
}
