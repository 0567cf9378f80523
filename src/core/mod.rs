//! Core ledger types and the balance aggregation.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ledger;
pub mod log;
pub mod period;
pub mod records;
pub mod roster;

// Re-export main types for cleaner imports
pub use aggregate::{BalanceReport, LedgerSnapshot, ParticipantSummary};
pub use error::LedgerError;
pub use ledger::{LedgerSink, LedgerSource, TakeHome, Transfer};
pub use period::Period;
pub use roster::Roster;
