//! Checkpointed Balance and Vote-Power Ledger
//!
//! This crate tracks, for a set of accounts, a fungible balance and a
//! proportionally-delegated vote power, both queryable at any historical
//! block height the ledger has passed through. Every state change writes an
//! append-only checkpoint; historical reads binary-search the checkpoint
//! series, and vote power aggregates over exactly one level of delegation.
//!
//! # Key Types
//!
//! - [`VotePowerLedger`]: the owned facade behind the stable boundary
//! - [`CheckpointSeries`]: append-only versioned values with O(log k) lookup
//! - [`BalanceBook`]: checkpointed balances and the total-supply counter
//! - [`DelegationGraph`]: bounded out-degree percentage delegation edges
//! - [`LedgerError`]: the caller-visible rejection taxonomy
//!
//! # Usage
//!
//! ```
//! use lib_types::Address;
//! use lib_ledger::{Genesis, TxContext, VotePowerLedger};
//!
//! let owner = Address::new([1u8; 32]);
//! let bob = Address::new([2u8; 32]);
//!
//! let mut ledger = VotePowerLedger::new(Genesis { owner, initial_supply: 1_000 });
//! ledger.transfer(&TxContext { caller: owner, height: 1 }, bob, 200).unwrap();
//! ledger.delegate(&TxContext { caller: bob, height: 2 }, owner, 25).unwrap();
//!
//! assert_eq!(ledger.balance_of_at(bob, 2), 200);
//! assert_eq!(ledger.vote_power_of_at(bob, 2), 150);
//! assert_eq!(ledger.vote_power_of_at(bob, 1), 200);
//! ```

pub mod balances;
pub mod checkpoint;
pub mod delegation;
pub mod errors;
pub mod ledger;
pub mod vote_power;

pub use balances::BalanceBook;
pub use checkpoint::{Checkpoint, CheckpointSeries};
pub use delegation::{DelegationGraph, FULL_ALLOCATION, MAX_DELEGATEES};
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{Genesis, TxContext, VotePowerLedger, GENESIS_HEIGHT};
pub use vote_power::vote_power_of_at;
