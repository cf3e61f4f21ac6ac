use cosmwasm_std::{Decimal, OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    //Authorization
    #[error("Unauthorized")]
    Unauthorized {},

    //Validation
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Collateral type isn't whitelisted: {denom}")]
    InvalidCollateralType { denom: String },

    #[error("Invalid burn amount {amount}, outstanding principal is {principal}")]
    InvalidBurnAmount { amount: Uint128, principal: Uint128 },

    #[error("Price must be positive")]
    InvalidPrice {},

    #[error("Invalid params: {reason}")]
    InvalidParams { reason: String },

    //Invariants
    #[error("Collateral ratio {ratio} is below the minimum {minimum}")]
    CollateralRatioTooLow { ratio: Decimal, minimum: Decimal },

    #[error("Price change for {denom} exceeds the max deviation: {old_price} -> {new_price}")]
    DeviationExceeded {
        denom: String,
        old_price: Decimal,
        new_price: Decimal,
    },

    #[error("Position is healthy and can't be liquidated, ratio: {ratio}")]
    PositionHealthy { ratio: Decimal },

    //Resources
    #[error("No position for {owner}")]
    PositionNotFound { owner: String },

    #[error("Insufficient {denom} collateral: requested {requested}, held {held}")]
    InsufficientCollateral {
        denom: String,
        requested: Uint128,
        held: Uint128,
    },

    #[error("Insufficient {denom} sent: required {required}, sent {sent}")]
    InsufficientBalance {
        denom: String,
        required: Uint128,
        sent: Uint128,
    },

    #[error("Denom isn't whitelisted: {denom}")]
    NotWhitelisted { denom: String },

    #[error("No price set for {denom}")]
    NoPriceSet { denom: String },

    #[error("Denom is already whitelisted: {denom}")]
    AlreadyWhitelisted { denom: String },

    #[error("Positions still hold {denom}")]
    PositionsExist { denom: String },

    //System gate
    #[error("Minting is disabled")]
    MintingDisabled {},
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}
