use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{Amount, AmountError, DepositSnapshot, Projection};

/// One row of the ledger export: `account,principal,start_time,withdrawn`
#[derive(Deserialize, Debug, Clone)]
pub struct InputRecord {
    pub account: String,
    pub principal: String,
    pub start_time: i64,
    pub withdrawn: Option<String>,
}

impl InputRecord {
    /// Account key, addresses are compared case-insensitively
    pub fn account_key(&self) -> String {
        self.account.trim().to_ascii_lowercase()
    }

    pub fn to_snapshot(&self) -> Result<DepositSnapshot, AmountError> {
        let principal = Amount::from_str(&self.principal)?;
        let withdrawn = match self.withdrawn.as_deref().map(str::trim) {
            None | Some("") => Amount::ZERO,
            Some(w) => Amount::from_str(w)?,
        };

        Ok(DepositSnapshot::new(principal, self.start_time, withdrawn))
    }
}

/// A projection ready to be written out.
/// Decouples the projector output from its CSV representation.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectionRecord {
    pub account: String,
    pub unlocked: String,
    pub withdrawable: String,
    pub can_withdraw: bool,
}

impl ProjectionRecord {
    pub fn new(account: &str, projection: &Projection) -> Self {
        ProjectionRecord {
            account: account.to_owned(),
            unlocked: projection.unlocked.to_string(),
            withdrawable: projection.withdrawable.to_string(),
            can_withdraw: projection.can_withdraw(),
        }
    }
}
