use std::convert::TryFrom;

use cosmwasm_std::{
    attr, coin, Addr, Coin, CosmosMsg, Decimal, DepsMut, Env, Event, MessageInfo, Response, StdError, StdResult,
    Uint128, Uint256,
};

use hodl::helpers::{burn_msg, withdrawal_msg};
use hodl::math::{decimal_ceil, decimal_multiplication, decimal_subtraction};

use crate::error::ContractError;
use crate::positions::{assert_stable_funds, coins_to_string};
use crate::rates::accrue;
use crate::risk_engine::get_health;
use crate::state::{get_position, remove_position, CONFIG, MODULE_STATE, PARAMS};

/// Collateral split between recipients, in the order their shares were given
#[derive(Debug, PartialEq)]
pub struct Distribution {
    pub payouts: Vec<Vec<Coin>>,
    /// Units left over from flooring, kept in custody
    pub dust: Vec<Coin>,
}

/// Split every collateral denom by value share.
/// Each recipient gets floor(share / total_value * amount) of each denom.
pub fn distribute_collateral(collateral: &[Coin], total_value: Decimal, shares: &[Decimal]) -> StdResult<Distribution> {
    if total_value.is_zero() {
        return Err(StdError::GenericErr {
            msg: String::from("Can't distribute collateral with no value"),
        });
    }

    let mut share_total = Decimal::zero();
    for share in shares {
        share_total = share_total.checked_add(*share)?;
    }
    if share_total > total_value {
        return Err(StdError::GenericErr {
            msg: format!("Shares ({}) exceed the collateral value ({})", share_total, total_value),
        });
    }

    let mut payouts: Vec<Vec<Coin>> = vec![vec![]; shares.len()];
    let mut dust = vec![];

    for held in collateral {
        let mut remaining = held.amount;

        for (i, share) in shares.iter().enumerate() {
            let amount = held.amount.full_mul(share.atomics()) / Uint256::from(total_value.atomics());
            let amount = Uint128::try_from(amount)?;

            if !amount.is_zero() {
                remaining = remaining.checked_sub(amount)?;
                payouts[i].push(coin(amount.u128(), held.denom.clone()));
            }
        }

        if !remaining.is_zero() {
            dust.push(coin(remaining.u128(), held.denom.clone()));
        }
    }

    Ok(Distribution { payouts, dust })
}

/// Close an under-collateralized Position.
/// The liquidator repays total debt and is paid out in collateral.
pub fn liquidate(deps: DepsMut, env: Env, info: MessageInfo, owner: String) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;

    let owner = deps.api.addr_validate(&owner)?;
    let mut position = get_position(deps.storage, &owner)?;
    accrue(&mut position, &params, env.block.height)?;

    let health = get_health(deps.storage, &config.stable_denom, &position)?;
    if !health.is_liquidatable(&params) {
        return Err(ContractError::PositionHealthy { ratio: health.ratio });
    }

    //Liquidator repays principal + interest, rounded up to whole units
    let sent = assert_stable_funds(&info, &config)?;
    let repayment = decimal_ceil(health.total_debt)?;
    if sent < repayment {
        return Err(ContractError::InsufficientBalance {
            denom: config.stable_denom,
            required: repayment,
            sent,
        });
    }
    let excess = sent.checked_sub(repayment)?;

    let total_debt = health.total_debt;
    let valuation = health.valuation;
    let debt_with_penalty = decimal_multiplication(total_debt, Decimal::one().checked_add(params.liquidation_penalty)?)?;

    let mut state = MODULE_STATE.load(deps.storage)?;
    let mut events = vec![];
    let mut msgs: Vec<CosmosMsg> = vec![burn_msg(vec![coin(repayment.u128(), config.stable_denom.clone())])];
    if !excess.is_zero() {
        msgs.push(withdrawal_msg(
            vec![coin(excess.u128(), config.stable_denom.clone())],
            &info.sender,
        ));
    }

    let distribution = if valuation >= debt_with_penalty {
        let liquidator_share = decimal_multiplication(total_debt, Decimal::one().checked_add(params.liquidator_reward)?)?;
        let protocol_share = decimal_multiplication(
            total_debt,
            decimal_subtraction(params.liquidation_penalty, params.liquidator_reward)?,
        )?;
        let owner_share = decimal_subtraction(
            decimal_subtraction(valuation, liquidator_share)?,
            protocol_share,
        )?;

        distribute_collateral(
            &position.collateral,
            valuation,
            &[liquidator_share, protocol_share, owner_share],
        )?
    } else {
        //Shortfall: liquidator takes everything, the rest is bad debt
        let shortfall = decimal_subtraction(debt_with_penalty, valuation)?;
        state.record_bad_debt(shortfall)?;

        events.push(Event::new("bad_debt").add_attributes(vec![
            attr("owner", owner.to_string()),
            attr("shortfall", shortfall.to_string()),
            attr("total_bad_debt", state.bad_debt.to_string()),
        ]));

        if state.is_minting_paused(params.max_bad_debt_limit)? {
            events.push(Event::new("circuit_breaker_triggered").add_attributes(vec![
                attr("bad_debt", state.bad_debt.to_string()),
                attr("limit", params.max_bad_debt_limit.to_string()),
            ]));
        }

        Distribution {
            payouts: vec![position.collateral.clone(), vec![], vec![]],
            dust: vec![],
        }
    };

    let recipients: [&Addr; 3] = [&info.sender, &config.fee_collector, &owner];
    for (recipient, payout) in recipients.iter().zip(distribution.payouts.iter()) {
        if !payout.is_empty() {
            msgs.push(withdrawal_msg(payout.clone(), recipient));
        }
    }

    state.record_burn(position.minted_hodl)?;
    state.record_interest_repaid(position.stability_debt)?;
    MODULE_STATE.save(deps.storage, &state)?;
    remove_position(deps.storage, &owner);

    let liquidation_event = Event::new("liquidation").add_attributes(vec![
        attr("owner", owner.to_string()),
        attr("liquidator", info.sender.to_string()),
        attr("principal", position.minted_hodl.to_string()),
        attr("stability_debt", position.stability_debt.to_string()),
        attr("total_debt", total_debt.to_string()),
        attr("debt_with_penalty", debt_with_penalty.to_string()),
        attr("valuation", valuation.to_string()),
        attr("ratio", health.ratio.to_string()),
        attr("repaid", repayment.to_string()),
        attr("liquidator_payout", coins_to_string(&distribution.payouts[0])),
        attr("protocol_payout", coins_to_string(&distribution.payouts[1])),
        attr("owner_payout", coins_to_string(&distribution.payouts[2])),
        attr("dust", coins_to_string(&distribution.dust)),
    ]);

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("method", "liquidate")
        .add_event(liquidation_event)
        .add_events(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn solvent_split() {
        //1200 units at 0.1 against 100 debt, 10% penalty, 5% reward
        let distribution = distribute_collateral(
            &[coin(1_200, "uatom")],
            dec("120"),
            &[dec("105"), dec("5"), dec("10")],
        )
        .unwrap();

        assert_eq!(
            distribution,
            Distribution {
                payouts: vec![
                    vec![coin(1_050, "uatom")],
                    vec![coin(50, "uatom")],
                    vec![coin(100, "uatom")],
                ],
                dust: vec![],
            }
        );
    }

    #[test]
    fn split_floors_and_keeps_dust() {
        //200 units at 0.6
        let distribution = distribute_collateral(
            &[coin(200, "uatom"), coin(7, "uosmo")],
            dec("120"),
            &[dec("105"), dec("5"), dec("10")],
        )
        .unwrap();

        assert_eq!(
            distribution.payouts,
            vec![
                vec![coin(175, "uatom"), coin(6, "uosmo")],
                vec![coin(8, "uatom")],
                vec![coin(16, "uatom")],
            ]
        );
        assert_eq!(distribution.dust, vec![coin(1, "uatom"), coin(1, "uosmo")]);

        //Nothing is created or lost
        for (denom, held) in [("uatom", 200u128), ("uosmo", 7u128)].iter() {
            let paid: u128 = distribution
                .payouts
                .iter()
                .flatten()
                .chain(distribution.dust.iter())
                .filter(|coin| coin.denom == *denom)
                .map(|coin| coin.amount.u128())
                .sum();
            assert_eq!(paid, *held);
        }
    }

    #[test]
    fn split_rejects_bad_inputs() {
        distribute_collateral(&[coin(10, "uatom")], Decimal::zero(), &[]).unwrap_err();
        distribute_collateral(&[coin(10, "uatom")], dec("10"), &[dec("6"), dec("5")]).unwrap_err();
    }
}
