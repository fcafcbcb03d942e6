//! Ledger Errors

use lib_types::{Amount, Percentage};
use thiserror::Error;

/// Error during ledger operations
///
/// Every variant is a caller-visible rejection of the requested operation;
/// a failed operation commits no state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid amount: {0}")]
    InvalidAmount(Amount),

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("invalid delegation address")]
    SelfDelegation,

    #[error("invalid delegation amount: {0}")]
    InvalidPercentage(Percentage),

    #[error("maximum delegators")]
    TooManyDelegatees,

    #[error("insufficient percentage to delegate: committed {committed}, requested {requested}")]
    AllocationExceeded {
        committed: u16,
        requested: Percentage,
    },

    #[error("arithmetic overflow")]
    Overflow,
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
