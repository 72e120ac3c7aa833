use std::str::FromStr;

use thiserror::Error;

use crate::engine::{Amount, AmountError};

/// Left in the wallet by a "max" deposit to pay for gas: 0.001 token
pub const GAS_RESERVE: Amount = Amount::from_wei(1_000_000_000_000_000);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepositError {
    #[error("Invalid deposit amount: {0}")]
    Amount(#[from] AmountError),

    #[error("Deposit amount must be greater than zero")]
    NotPositive,

    #[error("Deposit of {requested} exceeds wallet balance of {balance}")]
    InsufficientBalance { requested: Amount, balance: Amount },
}

/// Largest deposit that still leaves the gas reserve in the wallet.
pub fn max_deposit(balance: &Amount) -> Amount {
    balance.saturating_sub(&GAS_RESERVE)
}

pub fn validate_deposit(input: &str, balance: &Amount) -> Result<Amount, DepositError> {
    let requested = Amount::from_str(input)?;
    if requested.is_zero() {
        return Err(DepositError::NotPositive);
    }
    if requested > *balance {
        return Err(DepositError::InsufficientBalance {
            requested,
            balance: *balance,
        });
    }
    Ok(requested)
}
