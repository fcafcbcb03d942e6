//! Vote Power Ledger Facade
//!
//! The single owned instance behind the stable external boundary: mint,
//! transfer, delegate, and the historical read surface. All state lives in
//! this struct; construction is explicit and there are no hidden statics.
//!
//! Mutations take `&mut self` and reads take `&self`; the host environment
//! serializes state-changing calls, and the aliasing rules guarantee a read
//! observes either none or all of a mutation's checkpoints.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lib_types::{Address, Amount, BlockHeight, Percentage};

use crate::balances::BalanceBook;
use crate::delegation::DelegationGraph;
use crate::errors::LedgerResult;
use crate::vote_power;

/// Height at which the initial supply is credited
pub const GENESIS_HEIGHT: BlockHeight = 0;

/// Caller identity and block height supplied by the host environment
///
/// The ledger trusts the host to keep heights monotonically non-decreasing
/// across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxContext {
    /// Account invoking the operation
    pub caller: Address,
    /// Current block height
    pub height: BlockHeight,
}

/// Construction-time parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    /// Deploying account; receives the entire initial supply
    pub owner: Address,
    /// Supply credited to `owner` at [`GENESIS_HEIGHT`]
    pub initial_supply: Amount,
}

/// Checkpointed balance and delegated vote-power ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePowerLedger {
    owner: Address,
    balances: BalanceBook,
    delegation: DelegationGraph,
}

impl VotePowerLedger {
    /// Create a ledger with `genesis.owner` holding the initial supply
    ///
    /// The owner's balance and (unreduced) vote power both read
    /// `initial_supply` at the genesis height.
    pub fn new(genesis: Genesis) -> Self {
        let mut balances = BalanceBook::new();
        if genesis.initial_supply > 0 {
            balances
                .mint(genesis.owner, genesis.initial_supply, GENESIS_HEIGHT)
                .expect("genesis mint into an empty book cannot overflow");
        }
        debug!(
            "ledger created: owner {} holds initial supply {}",
            genesis.owner, genesis.initial_supply
        );
        Self {
            owner: genesis.owner,
            balances,
            delegation: DelegationGraph::new(),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Mint `amount` new tokens to the caller
    ///
    /// No authorization restriction is imposed here; an outer access-control
    /// layer may restrict minting further.
    pub fn mint(&mut self, ctx: &TxContext, amount: Amount) -> LedgerResult<()> {
        if let Err(error) = self.balances.mint(ctx.caller, amount, ctx.height) {
            warn!("mint of {} by {} rejected: {}", amount, ctx.caller, error);
            return Err(error);
        }
        debug!(
            "minted {} to {} at height {}",
            amount, ctx.caller, ctx.height
        );
        Ok(())
    }

    /// Transfer `amount` from the caller to `to`
    pub fn transfer(&mut self, ctx: &TxContext, to: Address, amount: Amount) -> LedgerResult<()> {
        if let Err(error) = self.balances.transfer(ctx.caller, to, amount, ctx.height) {
            warn!(
                "transfer of {} from {} to {} rejected: {}",
                amount, ctx.caller, to, error
            );
            return Err(error);
        }
        debug!(
            "transferred {} from {} to {} at height {}",
            amount, ctx.caller, to, ctx.height
        );
        Ok(())
    }

    /// Delegate `percentage` of the caller's balance-derived vote power to
    /// `delegatee`
    pub fn delegate(
        &mut self,
        ctx: &TxContext,
        delegatee: Address,
        percentage: Percentage,
    ) -> LedgerResult<()> {
        if let Err(error) =
            self.delegation
                .delegate(ctx.caller, delegatee, percentage, ctx.height)
        {
            warn!(
                "delegation of {}% from {} to {} rejected: {}",
                percentage, ctx.caller, delegatee, error
            );
            return Err(error);
        }
        debug!(
            "{} delegated {}% to {} at height {}",
            ctx.caller, percentage, delegatee, ctx.height
        );
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Balance of `account` as of `height`
    pub fn balance_of_at(&self, account: Address, height: BlockHeight) -> Amount {
        self.balances.balance_at(account, height)
    }

    /// Current balance of `account`
    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.balance(account)
    }

    /// Delegation-adjusted vote power of `account` as of `height`
    pub fn vote_power_of_at(&self, account: Address, height: BlockHeight) -> Amount {
        vote_power::vote_power_of_at(&self.balances, &self.delegation, account, height)
    }

    /// Current vote power of `account`
    pub fn vote_power_of(&self, account: Address) -> Amount {
        self.vote_power_of_at(account, BlockHeight::MAX)
    }

    /// Percentage of the edge `(delegator, delegatee)` as of `height`
    pub fn percentage_of_at(
        &self,
        delegator: Address,
        delegatee: Address,
        height: BlockHeight,
    ) -> Percentage {
        self.delegation.percentage_at(delegator, delegatee, height)
    }

    /// Live delegatees of `delegator` with their current percentages
    pub fn delegatees_of(&self, delegator: Address) -> Vec<(Address, Percentage)> {
        self.delegation.delegatees_of(delegator)
    }

    /// Percentage of its own vote power `delegator` still retains
    pub fn undelegated_percentage_of(&self, delegator: Address) -> Percentage {
        self.delegation.undelegated_percentage(delegator)
    }

    /// Total supply in circulation
    pub fn total_supply(&self) -> Amount {
        self.balances.total_supply()
    }

    /// Deploying account recorded at construction
    pub fn owner(&self) -> Address {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;

    fn addr(n: u8) -> Address {
        Address::new([n; 32])
    }

    fn ctx(caller: Address, height: BlockHeight) -> TxContext {
        TxContext { caller, height }
    }

    #[test]
    fn genesis_credits_owner() {
        let ledger = VotePowerLedger::new(Genesis {
            owner: addr(1),
            initial_supply: 10_000,
        });

        assert_eq!(ledger.owner(), addr(1));
        assert_eq!(ledger.total_supply(), 10_000);
        assert_eq!(ledger.balance_of_at(addr(1), GENESIS_HEIGHT), 10_000);
        assert_eq!(ledger.vote_power_of_at(addr(1), GENESIS_HEIGHT), 10_000);
    }

    #[test]
    fn genesis_with_zero_supply() {
        let ledger = VotePowerLedger::new(Genesis {
            owner: addr(1),
            initial_supply: 0,
        });
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.balance_of(addr(1)), 0);
    }

    #[test]
    fn mutations_flow_through_context() {
        let mut ledger = VotePowerLedger::new(Genesis {
            owner: addr(1),
            initial_supply: 1_000,
        });

        ledger.mint(&ctx(addr(2), 1), 100).unwrap();
        ledger.transfer(&ctx(addr(1), 2), addr(3), 200).unwrap();
        ledger.delegate(&ctx(addr(3), 3), addr(2), 50).unwrap();

        assert_eq!(ledger.total_supply(), 1_100);
        assert_eq!(ledger.balance_of(addr(2)), 100);
        assert_eq!(ledger.balance_of(addr(3)), 200);
        assert_eq!(ledger.vote_power_of(addr(3)), 100);
        assert_eq!(ledger.vote_power_of(addr(2)), 200);
        assert_eq!(ledger.percentage_of_at(addr(3), addr(2), 3), 50);
    }

    #[test]
    fn rejection_surfaces_error_unchanged() {
        let mut ledger = VotePowerLedger::new(Genesis {
            owner: addr(1),
            initial_supply: 100,
        });

        assert_eq!(
            ledger.transfer(&ctx(addr(2), 1), addr(3), 50),
            Err(LedgerError::InsufficientBalance { have: 0, need: 50 })
        );
        assert_eq!(
            ledger.delegate(&ctx(addr(2), 1), addr(2), 10),
            Err(LedgerError::SelfDelegation)
        );
    }

    #[test]
    fn delegation_views() {
        let mut ledger = VotePowerLedger::new(Genesis {
            owner: addr(1),
            initial_supply: 100,
        });
        ledger.delegate(&ctx(addr(1), 1), addr(2), 30).unwrap();
        ledger.delegate(&ctx(addr(1), 2), addr(3), 20).unwrap();

        assert_eq!(
            ledger.delegatees_of(addr(1)),
            vec![(addr(2), 30), (addr(3), 20)]
        );
        assert_eq!(ledger.undelegated_percentage_of(addr(1)), 50);
        assert_eq!(ledger.vote_power_of(addr(1)), 50);
    }
}
