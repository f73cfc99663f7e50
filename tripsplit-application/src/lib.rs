#![warn(clippy::uninlined_format_args)]

pub mod config;
pub mod draft;
pub mod error;
pub mod ledger;
pub mod model;

pub use config::LedgerConfig;
pub use draft::{DraftBuilder, to_minor_units};
pub use error::LedgerError;
pub use ledger::{PreparedExpense, TripLedger};
pub use model::{ExpenseDraft, ExpenseRecord, LedgerWarning, SettlementSummary, Trip};
