use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::Trim;
use thiserror::Error;

use crate::engine::{DepositSnapshot, InputRecord};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Cannot open ledger {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read ledger: {0}")]
    Csv(#[from] csv::Error),
}

/// Anything able to hand out the current deposit snapshot of one account.
/// `fetch` may block on I/O; `Session::watch` runs it on the blocking pool.
pub trait SnapshotSource {
    fn fetch(&self) -> Result<DepositSnapshot, LedgerError>;
}

/// Deposit snapshots of every account known to the ledger export.
pub struct Ledger {
    snapshots: HashMap<String, DepositSnapshot>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            snapshots: HashMap::new(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ledger::from_reader(file)
    }

    /// Rows that cannot be read are skipped with a warning.
    /// A later row for the same account replaces the earlier one.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LedgerError> {
        let mut rdr = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        // Fail early on a missing or unreadable header
        rdr.headers()?;

        let mut ledger = Ledger::new();

        log::debug!("Started deserialising ledger records");
        for result in rdr.deserialize::<InputRecord>() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Error deserializing record: {e}");
                    continue;
                }
            };
            match record.to_snapshot() {
                Ok(snapshot) => ledger.insert(&record.account_key(), snapshot),
                Err(e) => log::warn!("Skipping record for account={}: {}", record.account, e),
            }
        }

        Ok(ledger)
    }

    pub fn insert(&mut self, account: &str, snapshot: DepositSnapshot) {
        self.snapshots.insert(account.to_ascii_lowercase(), snapshot);
    }

    /// Accounts with no row read as an empty deposit.
    pub fn snapshot(&self, account: &str) -> DepositSnapshot {
        match self.snapshots.get(&account.trim().to_ascii_lowercase()) {
            Some(snapshot) => *snapshot,
            None => {
                log::debug!("No deposit recorded for {account}");
                DepositSnapshot::empty()
            }
        }
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&str, &DepositSnapshot)> {
        self.snapshots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

/// Ledger export on disk, re-read on every fetch.
pub struct CsvLedger {
    path: PathBuf,
    account: String,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>, account: &str) -> Self {
        CsvLedger {
            path: path.into(),
            account: account.to_owned(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

impl SnapshotSource for CsvLedger {
    fn fetch(&self) -> Result<DepositSnapshot, LedgerError> {
        let ledger = Ledger::from_path(&self.path)?;
        Ok(ledger.snapshot(&self.account))
    }
}

/// Shortened address for status lines: `0xe904...9FF5`
pub fn short_account(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    if chars.len() <= 10 {
        return account.to_owned();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{CsvLedger, Ledger, LedgerError, SnapshotSource, short_account};
    use crate::engine::{Amount, DepositSnapshot};

    const CSV: &str = "\
account, principal, start_time, withdrawn
0xAAAA, 100, 1700000000, 0
0xbbbb, 2.5, 1700000100,
0xcccc, not-a-number, 1700000000, 0
0xdddd, 1, not-a-time, 0
0xaaaa, 200, 1700000500, 10
";

    #[test]
    fn test_ledger_reads_rows_and_skips_bad_ones() {
        let ledger = Ledger::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 2);

        let bbbb = ledger.snapshot("0xBBBB");
        assert_eq!(bbbb.principal, Amount::from_str("2.5").unwrap());
        assert_eq!(bbbb.withdrawn, Amount::ZERO);
        assert_eq!(bbbb.start_time, 1_700_000_100);
    }

    #[test]
    fn test_later_row_replaces_earlier_one() {
        let ledger = Ledger::from_reader(CSV.as_bytes()).unwrap();
        let aaaa = ledger.snapshot("0xaaaa");
        assert_eq!(
            aaaa,
            DepositSnapshot::new(
                Amount::from_str("200").unwrap(),
                1_700_000_500,
                Amount::from_str("10").unwrap()
            )
        );
    }

    #[test]
    fn test_unknown_account_is_empty() {
        let ledger = Ledger::from_reader(CSV.as_bytes()).unwrap();
        assert!(ledger.snapshot("0xffff").is_empty());
        assert!(Ledger::new().is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = CsvLedger::new("./does/not/exist.csv", "0xaaaa");
        assert!(matches!(source.fetch(), Err(LedgerError::Io { .. })));
    }

    #[test]
    fn test_short_account() {
        assert_eq!(
            short_account("0xe904c5BC6f598163D12FE0b2fBddBBE57cB29FF5"),
            "0xe904...9FF5"
        );
        assert_eq!(short_account("0xabc"), "0xabc");
    }
}
