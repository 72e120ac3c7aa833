mod amount;
mod clock;
mod deposit_snapshot;
mod funds;
mod ledger;
mod projector;
mod record;
mod session;
mod sink;

pub use amount::{Amount, AmountError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use deposit_snapshot::DepositSnapshot;
pub use funds::{DepositError, GAS_RESERVE, max_deposit, validate_deposit};
pub use ledger::{CsvLedger, Ledger, LedgerError, SnapshotSource, short_account};
pub use projector::{AccrualSchedule, Projection, project};
pub use record::{InputRecord, ProjectionRecord};
pub use session::Session;
pub use sink::{ProjectionSink, WriterSink};
