//! Balance Book
//!
//! Per-account checkpointed balances plus the total-supply counter. Mint and
//! transfer are the only balance-changing operations; both validate fully
//! before the first write so a rejection commits nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lib_types::{Address, Amount, BlockHeight};

use crate::checkpoint::CheckpointSeries;
use crate::errors::{LedgerError, LedgerResult};

/// Checkpointed account balances and the monotonic total supply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceBook {
    /// Balance history per account, keyed deterministically
    balances: BTreeMap<Address, CheckpointSeries<Amount>>,
    /// Sum of all minted amounts; never decreases
    total_supply: Amount,
}

impl BalanceBook {
    /// Create an empty balance book
    pub fn new() -> Self {
        Self::default()
    }

    /// Total supply in circulation
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Current balance of `account`
    pub fn balance(&self, account: Address) -> Amount {
        self.balances
            .get(&account)
            .map(|series| series.latest())
            .unwrap_or(0)
    }

    /// Balance of `account` as of `height`
    ///
    /// Heights at or beyond the account's last write return the latest
    /// value; an account with no checkpoints reads 0.
    pub fn balance_at(&self, account: Address, height: BlockHeight) -> Amount {
        self.balances
            .get(&account)
            .map(|series| series.value_at(height))
            .unwrap_or(0)
    }

    /// Accounts with at least one balance checkpoint
    pub fn accounts(&self) -> impl Iterator<Item = &Address> {
        self.balances.keys()
    }

    /// Mint `amount` new tokens to `account` at `height`
    ///
    /// Increases total supply and records the raised balance as one step.
    pub fn mint(
        &mut self,
        account: Address,
        amount: Amount,
        height: BlockHeight,
    ) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_balance = self
            .balance(account)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.total_supply = new_supply;
        self.record(account, height, new_balance);
        Ok(())
    }

    /// Move `amount` from `from` to `to` at `height`
    ///
    /// Self-transfer is allowed: it writes a debit and a credit checkpoint
    /// at the same height that net to no change.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        height: BlockHeight,
    ) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let from_balance = self.balance(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        // Both post-states are computed before either write, so a rejection
        // here leaves the book untouched.
        let new_from = from_balance - amount;
        let new_to = if to == from {
            from_balance
        } else {
            self.balance(to)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?
        };

        self.record(from, height, new_from);
        self.record(to, height, new_to);
        Ok(())
    }

    fn record(&mut self, account: Address, height: BlockHeight, balance: Amount) {
        self.balances
            .entry(account)
            .or_default()
            .record(height, balance);
    }
}
