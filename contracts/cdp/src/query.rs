use cosmwasm_std::{Deps, Env, Order, StdError, StdResult, Uint128};

use cw_storage_plus::Bound;

use hodl::cdp::{ModuleStateResponse, PositionHealthResponse, PriceResponse, WhitelistResponse};
use hodl::types::Position;

use crate::error::ContractError;
use crate::oracle::get_price;
use crate::rates::accrue;
use crate::risk_engine::get_health;
use crate::state::{get_position, CONFIG, MODULE_STATE, PARAMS, POSITIONS, WHITELIST};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

//Flatten engine errors to their message
fn to_std_error(err: ContractError) -> StdError {
    match err {
        ContractError::Std(err) => err,
        err => StdError::GenericErr { msg: err.to_string() },
    }
}

pub fn query_total_supply(deps: Deps) -> StdResult<Uint128> {
    Ok(MODULE_STATE.load(deps.storage)?.total_supply)
}

pub fn query_module_state(deps: Deps) -> StdResult<ModuleStateResponse> {
    let params = PARAMS.load(deps.storage)?;
    let state = MODULE_STATE.load(deps.storage)?;

    Ok(ModuleStateResponse {
        minting_paused: state.is_minting_paused(params.max_bad_debt_limit)?,
        state,
    })
}

pub fn query_price(deps: Deps, denom: String) -> StdResult<PriceResponse> {
    let config = CONFIG.load(deps.storage)?;
    let price = get_price(deps.storage, &config.stable_denom, &denom).map_err(to_std_error)?;

    Ok(PriceResponse { denom, price })
}

/// Returns whitelisted collateral types in denom order
pub fn query_whitelist(deps: Deps, start_after: Option<String>, limit: Option<u32>) -> StdResult<WhitelistResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    WHITELIST
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, collateral) = item?;
            Ok(collateral)
        })
        .collect()
}

/// Returns the stored Position, as of its last update
pub fn query_position(deps: Deps, owner: String) -> StdResult<Position> {
    let owner = deps.api.addr_validate(&owner)?;

    get_position(deps.storage, &owner).map_err(to_std_error)
}

/// Returns Positions in owner order
pub fn query_positions(deps: Deps, start_after: Option<String>, limit: Option<u32>) -> StdResult<Vec<Position>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    let start = if let Some(start) = start_after {
        let start_after_addr = deps.api.addr_validate(&start)?;
        Some(Bound::exclusive(start_after_addr))
    } else {
        None
    };

    POSITIONS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, position) = item?;
            Ok(position)
        })
        .collect()
}

/// Position solvency with fees accrued to the current block, without saving
pub fn query_position_health(deps: Deps, env: Env, owner: String) -> StdResult<PositionHealthResponse> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;
    let owner = deps.api.addr_validate(&owner)?;

    let mut position = get_position(deps.storage, &owner).map_err(to_std_error)?;
    accrue(&mut position, &params, env.block.height)?;

    let health = get_health(deps.storage, &config.stable_denom, &position).map_err(to_std_error)?;

    Ok(PositionHealthResponse {
        liquidatable: health.is_liquidatable(&params),
        valuation: health.valuation,
        total_debt: health.total_debt,
        ratio: health.ratio,
        position,
    })
}
