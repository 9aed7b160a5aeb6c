pub mod borrowing;
pub mod catalog_view;
pub mod profile;

pub use borrowing::{LedgerError, LedgerStats, LoadWarning, LoanLedger, StaleRecord};
pub use catalog_view::{CatalogEntry, CatalogSummary, book_detail, browse_catalog, summarize_catalog};
pub use profile::{CurrentUser, ProfileSummary};
