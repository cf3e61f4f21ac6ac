use std::convert::TryFrom;

use cosmwasm_std::{Decimal, StdError, StdResult, Uint128, Uint256};

pub fn decimal_multiplication(a: Decimal, b: Decimal) -> StdResult<Decimal> {
    Ok(a.checked_mul(b)?)
}

pub fn decimal_division(a: Decimal, b: Decimal) -> StdResult<Decimal> {
    a.checked_div(b).map_err(|_| StdError::GenericErr {
        msg: format!("Decimal division failed: {} / {}", a, b),
    })
}

pub fn decimal_subtraction(a: Decimal, b: Decimal) -> StdResult<Decimal> {
    Ok(a.checked_sub(b)?)
}

/// Whole token units as a Decimal
pub fn uint_to_decimal(amount: Uint128) -> StdResult<Decimal> {
    Decimal::from_atomics(amount, 0).map_err(|_| StdError::GenericErr {
        msg: format!("Amount out of Decimal range: {}", amount),
    })
}

/// amount * ratio, rounded down
pub fn mul_floor(amount: Uint128, ratio: Decimal) -> StdResult<Uint128> {
    let product = amount.full_mul(ratio.atomics()) / Uint256::from(Decimal::one().atomics());

    Ok(Uint128::try_from(product)?)
}

/// amount * ratio, rounded up
pub fn mul_ceil(amount: Uint128, ratio: Decimal) -> StdResult<Uint128> {
    let one = Uint256::from(Decimal::one().atomics());
    let product = amount.full_mul(ratio.atomics());
    let mut quotient = product / one;
    if !(product % one).is_zero() {
        quotient += Uint256::one();
    }

    Ok(Uint128::try_from(quotient)?)
}

/// Whole units needed to cover `amount`
pub fn decimal_ceil(amount: Decimal) -> StdResult<Uint128> {
    mul_ceil(Uint128::one(), amount)
}
