use cosmwasm_std::{to_binary, Addr, Coin, CosmosMsg, QuerierWrapper, StdResult, WasmMsg};
use cosmwasm_schema::cw_serde;

use hodl::cdp::{ExecuteMsg, ModuleStateResponse, QueryMsg};
use hodl::types::Position;

/// CDPContract is a wrapper around Addr that provides a lot of helpers
/// for working with this.
#[cw_serde]
pub struct CDPContract(pub Addr);

impl CDPContract {
    pub fn addr(&self) -> Addr {
        self.0.clone()
    }

    pub fn call<T: Into<ExecuteMsg>>(&self, msg: T, funds: Vec<Coin>) -> StdResult<CosmosMsg> {
        let msg = to_binary(&msg.into())?;
        Ok(WasmMsg::Execute {
            contract_addr: self.addr().into(),
            msg,
            funds,
        }
        .into())
    }

    pub fn position(&self, querier: &QuerierWrapper, owner: impl Into<String>) -> StdResult<Position> {
        querier.query_wasm_smart(self.addr(), &QueryMsg::Position { owner: owner.into() })
    }

    pub fn module_state(&self, querier: &QuerierWrapper) -> StdResult<ModuleStateResponse> {
        querier.query_wasm_smart(self.addr(), &QueryMsg::ModuleState {})
    }
}
