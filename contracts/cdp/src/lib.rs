#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(clippy::too_many_arguments)]
pub mod contract;
mod error;
pub mod helpers;
pub mod liquidations;
pub mod oracle;
pub mod positions;
pub mod query;
pub mod rates;
pub mod risk_engine;
pub mod state;

pub use crate::error::ContractError;
