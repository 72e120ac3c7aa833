use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of decimals carried by the ledger's base unit (wei).
pub const DECIMALS: usize = 18;

const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

// Display keeps 4 decimals: 10^(18 - 4)
const DISPLAY_DIVISOR: u128 = 100_000_000_000_000;

/// Store an amount of vault tokens.
/// It is using internally a count of base units (wei) in a u128 so values coming
/// from the ledger are exact and never go through floating point.
/// Amounts are never negative; it is displayed with four places past the decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    wei: u128,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount parsing error: {0}")]
    Parse(String),

    #[error("Negative amount not allowed: {0}")]
    Negative(String),

    #[error("Overflow error while creating Amount")]
    Overflow,
}

impl Amount {
    pub const ZERO: Amount = Amount { wei: 0 };

    pub const fn from_wei(wei: u128) -> Self {
        Amount { wei }
    }

    pub fn is_zero(&self) -> bool {
        self.wei == 0
    }

    /// Subtraction clamped at zero.
    pub fn saturating_sub(&self, other: &Amount) -> Amount {
        Amount {
            wei: self.wei.saturating_sub(other.wei),
        }
    }

    /// Scale by `numerator / denominator`, rounding down to the base unit.
    ///
    /// The division is split into quotient and remainder so the result is exact
    /// whenever the ratio is at most one; larger ratios saturate at `u128::MAX`.
    /// A zero denominator yields zero.
    pub fn mul_ratio(&self, numerator: u64, denominator: u64) -> Amount {
        if denominator == 0 {
            return Amount::ZERO;
        }
        let num = u128::from(numerator);
        let den = u128::from(denominator);

        let whole = (self.wei / den).saturating_mul(num);
        // remainder < 2^64 and num < 2^64, the product fits
        let rest = (self.wei % den) * num / den;

        Amount {
            wei: whole.saturating_add(rest),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(AmountError::Parse(s.into()))?
        }
        if s.starts_with('-') {
            Err(AmountError::Negative(s.into()))?
        }

        let mut parts = s.split('.');
        let left_part = parts.next().unwrap_or("");
        let decimal_part = parts.next().unwrap_or("");

        // Checking for extra '.'
        if parts.next().is_some() {
            Err(AmountError::Parse(s.into()))?
        }
        // "." alone carries no digits
        if left_part.is_empty() && decimal_part.is_empty() {
            Err(AmountError::Parse(s.into()))?
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(left_part) || !all_digits(decimal_part) {
            Err(AmountError::Parse(s.into()))?
        }

        // Checking if integer part is empty (ex: ".05")
        let left_str = if left_part.is_empty() { "0" } else { left_part };

        // Only digits remain, so a failed parse means the value is too large
        let whole = left_str
            .parse::<u128>()
            .map_err(|_| AmountError::Overflow)?
            .checked_mul(WEI_PER_UNIT)
            .ok_or(AmountError::Overflow)?;

        // Ensure 18 digits for decimal part, extra precision is truncated
        let mut dec_str: String = decimal_part.chars().take(DECIMALS).collect();
        while dec_str.len() < DECIMALS {
            dec_str.push('0');
        }
        let fraction = dec_str
            .parse::<u128>()
            .map_err(|_| AmountError::Parse(s.into()))?;

        match whole.checked_add(fraction) {
            Some(wei) => Ok(Self { wei }),
            None => Err(AmountError::Overflow),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left_part = self.wei / WEI_PER_UNIT;
        let decimal_part = (self.wei % WEI_PER_UNIT) / DISPLAY_DIVISOR;

        write!(f, "{}.{:04}", left_part, decimal_part)
    }
}
