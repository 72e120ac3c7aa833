use std::fmt;
use std::time::Duration;

use crate::engine::{Amount, DepositSnapshot};

const BPS_DENOMINATOR: u64 = 10_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Linear accrual schedule of the vault.
/// The payout target is the principal plus `yield_bps`, unlocked linearly over `full_unlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualSchedule {
    pub yield_bps: u32,
    pub full_unlock: Duration,
}

impl Default for AccrualSchedule {
    /// 20% yield, 1% of the target unlocking every 60 seconds.
    fn default() -> Self {
        AccrualSchedule {
            yield_bps: 2_000,
            full_unlock: Duration::from_secs(6_000),
        }
    }
}

impl AccrualSchedule {
    /// Total amount paid out once the deposit is fully unlocked.
    pub fn target(&self, principal: &Amount) -> Amount {
        principal.mul_ratio(BPS_DENOMINATOR + u64::from(self.yield_bps), BPS_DENOMINATOR)
    }
}

/// Unlocked and withdrawable amounts of a deposit at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projection {
    pub unlocked: Amount,
    pub withdrawable: Amount,
}

impl Projection {
    /// Gate for the withdraw action.
    pub fn can_withdraw(&self) -> bool {
        !self.withdrawable.is_zero()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unlocked={} withdrawable={} withdraw={}",
            self.unlocked,
            self.withdrawable,
            if self.can_withdraw() { "enabled" } else { "disabled" }
        )
    }
}

/// Project a snapshot at `now` (seconds since epoch).
///
/// Total over its inputs: a start time in the future clamps elapsed time to zero,
/// and withdrawals above the unlocked amount leave nothing withdrawable.
pub fn project(snapshot: &DepositSnapshot, now: i64, schedule: &AccrualSchedule) -> Projection {
    if snapshot.is_empty() {
        return Projection::default();
    }

    let elapsed = u64::try_from(now.saturating_sub(snapshot.start_time)).unwrap_or(0);
    let target = schedule.target(&snapshot.principal);

    // Compared in nanoseconds so sub-second periods keep their fraction
    let (elapsed_units, period_units) = match u64::try_from(schedule.full_unlock.as_nanos()) {
        Ok(period_ns) => (elapsed.saturating_mul(NANOS_PER_SEC), period_ns),
        // periods past ~584 years do not fit, whole seconds are precise enough there
        Err(_) => (elapsed, schedule.full_unlock.as_secs()),
    };

    let unlocked = if elapsed == 0 {
        Amount::ZERO
    } else if elapsed_units >= period_units {
        target
    } else {
        target.mul_ratio(elapsed_units, period_units)
    };

    Projection {
        unlocked,
        withdrawable: unlocked.saturating_sub(&snapshot.withdrawn),
    }
}
