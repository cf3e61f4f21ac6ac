use cosmwasm_std::{Addr, BankMsg, Coin, CosmosMsg};

/// Build withdraw msg for native coins
pub fn withdrawal_msg(coins: Vec<Coin>, recipient: &Addr) -> CosmosMsg {
    CosmosMsg::Bank(BankMsg::Send {
        to_address: recipient.to_string(),
        amount: coins,
    })
}

/// Build burn msg for native coins held by the contract
pub fn burn_msg(coins: Vec<Coin>) -> CosmosMsg {
    CosmosMsg::Bank(BankMsg::Burn { amount: coins })
}

/// Drops zero amounts
pub fn non_zero_coins(coins: Vec<Coin>) -> Vec<Coin> {
    coins
        .into_iter()
        .filter(|coin| !coin.amount.is_zero())
        .collect::<Vec<Coin>>()
}

pub fn has_duplicate_denoms(coins: &[Coin]) -> bool {
    coins
        .iter()
        .enumerate()
        .any(|(i, coin)| coins[i + 1..].iter().any(|other| other.denom == coin.denom))
}
