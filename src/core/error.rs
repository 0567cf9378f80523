use thiserror::Error;

/// Input rejected before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid amount: '{0}' is not a number")]
    InvalidAmount(String),

    #[error("A date is required")]
    MissingDate,

    #[error("Invalid date: '{0}' is not in YYYY-MM-DD form")]
    InvalidDate(String),

    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
}
