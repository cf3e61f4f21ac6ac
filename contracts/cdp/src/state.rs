use cosmwasm_std::{Addr, Storage, StdResult};
use cw_storage_plus::{Item, Map};

use hodl::cdp::{Config, Params};
use hodl::types::{CollateralType, ModuleState, Position};

use crate::ContractError;

pub const CONFIG: Item<Config> = Item::new("config");
pub const PARAMS: Item<Params> = Item::new("params");
/// Total supply, bad debt & fee tallies
pub const MODULE_STATE: Item<ModuleState> = Item::new("module_state");
pub const POSITIONS: Map<Addr, Position> = Map::new("positions"); //owner, position
pub const WHITELIST: Map<String, CollateralType> = Map::new("whitelist"); //denom, collateral info
/// Positions already warned about in the end block pass, owner -> height first flagged
pub const LIQUIDATABLE: Map<Addr, u64> = Map::new("liquidatable");


//Helper functions
/// Returns the owner's Position.
/// Decode errors surface as ContractError::Std.
pub fn get_position(storage: &dyn Storage, owner: &Addr) -> Result<Position, ContractError> {
    match POSITIONS.may_load(storage, owner.clone())? {
        Some(position) => Ok(position),
        None => Err(ContractError::PositionNotFound { owner: owner.to_string() }),
    }
}

/// Save the Position, or delete it once it holds no collateral and no debt
pub fn save_position(storage: &mut dyn Storage, position: &Position) -> StdResult<()> {
    if position.is_empty() {
        remove_position(storage, &position.owner);
        Ok(())
    } else {
        POSITIONS.save(storage, position.owner.clone(), position)
    }
}

pub fn remove_position(storage: &mut dyn Storage, owner: &Addr) {
    POSITIONS.remove(storage, owner.clone());
    LIQUIDATABLE.remove(storage, owner.clone());
}
