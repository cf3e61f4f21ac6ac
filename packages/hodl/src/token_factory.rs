use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{to_binary, Addr, CosmosMsg, StdResult, Uint128, WasmMsg};

/// Subset of the token factory proxy's interface the engine calls into
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    MintTokens {
        denom: String,
        amount: Uint128,
        mint_to_address: String,
    },
}

/// Mint `amount` of `denom` to `recipient` through the proxy
pub fn mint_msg(
    token_factory: &Addr,
    denom: String,
    amount: Uint128,
    recipient: &Addr,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token_factory.to_string(),
        msg: to_binary(&ExecuteMsg::MintTokens {
            denom,
            amount,
            mint_to_address: recipient.to_string(),
        })?,
        funds: vec![],
    }))
}
