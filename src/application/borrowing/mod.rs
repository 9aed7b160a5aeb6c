mod errors;
mod ledger;
mod persistence;

pub use errors::{LedgerError, LoadWarning, Result, StaleRecord};
pub use ledger::{LedgerStats, LoanLedger};
pub use persistence::LedgerKey;
