//! Vote-power ledger primitives.
//! Stable, protocol-neutral, behavior-free.
//!
//! Rule: No String identifiers in ledger state. Ever.

pub mod primitives;

// Canonical ledger types
pub use primitives::{Address, Amount, BlockHeight, Percentage};
