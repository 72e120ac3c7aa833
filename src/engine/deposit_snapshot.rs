use crate::engine::Amount;

/// A Snapshot of a user's deposit as last read from the ledger.
/// It is immutable once fetched and replaced wholesale on every refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepositSnapshot {
    pub principal: Amount,
    /// Unix timestamp (seconds) at which accrual begins
    pub start_time: i64,
    pub withdrawn: Amount,
}

impl DepositSnapshot {
    pub fn new(principal: Amount, start_time: i64, withdrawn: Amount) -> Self {
        DepositSnapshot {
            principal,
            start_time,
            withdrawn,
        }
    }

    /// Snapshot of an address that never deposited.
    pub fn empty() -> Self {
        DepositSnapshot::default()
    }

    pub fn is_empty(&self) -> bool {
        self.principal.is_zero()
    }
}
