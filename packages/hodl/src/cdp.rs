use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Decimal, StdError, StdResult, Uint128};

use crate::auth::Authority;
use crate::types::{CollateralType, ModuleState, Position};

/// Default ~6 second blocks
pub const DEFAULT_BLOCKS_PER_YEAR: u64 = 5_256_000u64;

#[cw_serde]
pub struct InstantiateMsg {
    /// Governance authority.
    /// Defaults to the sender.
    pub authority: Option<String>,
    /// Native denom of the stablecoin
    pub stable_denom: String,
    /// Token factory proxy that mints `stable_denom`
    pub token_factory: String,
    /// Protocol fee sink.
    /// Defaults to the authority.
    pub fee_collector: Option<String>,
    /// Defaults to `Params::default()`
    pub params: Option<Params>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Deposit collateral (sent as funds) and mint HODL against the position.
    /// Creates the position if it doesn't exist.
    Mint {
        /// Principal to record as debt, the mint fee is taken out of the delivered amount
        amount: Uint128,
    },
    /// Repay principal with HODL sent as funds.
    /// The burn fee is charged on top of `amount`.
    Burn {
        amount: Uint128,
    },
    /// Deposit collateral (sent as funds) to an existing position
    AddCollateral {},
    /// Withdraw collateral from the sender's position
    WithdrawCollateral {
        collateral: Vec<Coin>,
    },
    /// Repay accrued stability debt with HODL sent as funds
    PayStabilityDebt {},
    /// Liquidate an under-collateralized position.
    /// The position's total debt must be sent as HODL.
    Liquidate {
        owner: String,
    },
    /// Whitelist a collateral denom
    AddCollateralType {
        denom: String,
        initial_price: Decimal,
    },
    /// Remove a collateral denom from the whitelist
    RemoveCollateralType {
        denom: String,
    },
    /// Oracle price update, in HODL per collateral unit
    SetPrice {
        denom: String,
        price: Decimal,
    },
    /// Replace the full parameter set
    UpdateParams(Params),
    UpdateConfig(UpdateConfig),
}

/// Chain-invoked hooks
#[cw_serde]
pub enum SudoMsg {
    /// Per-block finalization: accrue every position and flag newly liquidatable ones
    EndBlock {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum QueryMsg {
    /// Returns Config
    Config {},
    /// Returns Params
    Params {},
    /// Returns the principal tally as a Uint128
    TotalSupply {},
    /// Returns ModuleStateResponse
    ModuleState {},
    /// Returns PriceResponse
    Price {
        denom: String,
    },
    /// Returns Vec<CollateralType>
    Whitelist {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns Position
    Position {
        owner: String,
    },
    /// Returns Vec<Position>
    Positions {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns PositionHealthResponse with fees accrued to the current height
    PositionHealth {
        owner: String,
    },
}

#[cw_serde]
pub struct Config {
    /// Governance authority
    pub authority: Authority,
    /// Native denom of the stablecoin
    pub stable_denom: String,
    /// Token factory proxy that mints the stablecoin
    pub token_factory: Addr,
    /// Receives mint/burn fees & the protocol share of liquidations
    pub fee_collector: Addr,
}

#[cw_serde]
pub struct UpdateConfig {
    pub authority: Option<String>,
    pub token_factory: Option<String>,
    pub fee_collector: Option<String>,
}

/// Governance-controlled engine constants
#[cw_serde]
pub struct Params {
    /// Gate for new issuance, independent of the bad debt circuit breaker
    pub minting_enabled: bool,
    /// Minimum ratio after a mint or withdrawal
    pub collateral_ratio: Decimal,
    /// Positions below this ratio are liquidatable.
    /// Must be strictly less than collateral_ratio.
    pub liquidation_ratio: Decimal,
    /// Annual simple interest rate on principal
    pub stability_fee: Decimal,
    pub mint_fee: Decimal,
    pub burn_fee: Decimal,
    /// Charged on total debt at liquidation
    pub liquidation_penalty: Decimal,
    /// Liquidator's cut of the penalty, the rest goes to the fee collector
    pub liquidator_reward: Decimal,
    /// Max relative change per price update
    pub max_price_deviation: Decimal,
    pub blocks_per_year: u64,
    /// Minting pauses once bad debt exceeds this
    pub max_bad_debt_limit: Uint128,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            minting_enabled: true,
            collateral_ratio: Decimal::percent(150),
            liquidation_ratio: Decimal::percent(130),
            stability_fee: Decimal::percent(2),
            mint_fee: Decimal::permille(5),
            burn_fee: Decimal::permille(5),
            liquidation_penalty: Decimal::percent(10),
            liquidator_reward: Decimal::percent(5),
            max_price_deviation: Decimal::percent(20),
            blocks_per_year: DEFAULT_BLOCKS_PER_YEAR,
            max_bad_debt_limit: Uint128::new(1_000_000_000_000u128),
        }
    }
}

impl Params {
    /// Asserts the parameter invariants hold
    pub fn validate(&self) -> StdResult<()> {
        if self.collateral_ratio <= self.liquidation_ratio {
            return Err(StdError::GenericErr {
                msg: format!(
                    "collateral_ratio ({}) must be greater than liquidation_ratio ({})",
                    self.collateral_ratio, self.liquidation_ratio
                ),
            });
        }
        if self.liquidation_ratio.is_zero() {
            return Err(StdError::GenericErr {
                msg: String::from("liquidation_ratio must be positive"),
            });
        }

        let rates = [
            ("stability_fee", self.stability_fee),
            ("mint_fee", self.mint_fee),
            ("burn_fee", self.burn_fee),
            ("liquidation_penalty", self.liquidation_penalty),
            ("liquidator_reward", self.liquidator_reward),
            ("max_price_deviation", self.max_price_deviation),
        ];
        for (name, rate) in rates.iter() {
            if *rate > Decimal::one() {
                return Err(StdError::GenericErr {
                    msg: format!("{} must be within [0, 1], got {}", name, rate),
                });
            }
        }

        if self.liquidator_reward > self.liquidation_penalty {
            return Err(StdError::GenericErr {
                msg: format!(
                    "liquidator_reward ({}) can't exceed liquidation_penalty ({})",
                    self.liquidator_reward, self.liquidation_penalty
                ),
            });
        }
        if self.blocks_per_year == 0 {
            return Err(StdError::GenericErr {
                msg: String::from("blocks_per_year must be positive"),
            });
        }

        Ok(())
    }
}

#[cw_serde]
pub struct PriceResponse {
    pub denom: String,
    pub price: Decimal,
}

#[cw_serde]
pub struct ModuleStateResponse {
    pub state: ModuleState,
    /// Bad debt is above the limit
    pub minting_paused: bool,
}

#[cw_serde]
pub struct PositionHealthResponse {
    pub position: Position,
    pub valuation: Decimal,
    pub total_debt: Decimal,
    /// Decimal::MAX when there is no debt
    pub ratio: Decimal,
    pub liquidatable: bool,
}

/// Whitelist page
pub type WhitelistResponse = Vec<CollateralType>;
