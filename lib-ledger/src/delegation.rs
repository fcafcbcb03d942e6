//! Delegation Graph
//!
//! Bounded out-degree mapping from delegator to `{delegatee -> percentage}`,
//! each percentage checkpointed over time. The graph keeps a reverse index of
//! incoming edges so a vote-power query enumerates an account's actual
//! delegators instead of scanning every edge.
//!
//! # Invariants
//!
//! - A delegator has at most [`MAX_DELEGATEES`] distinct live delegatees
//! - The sum of a delegator's outgoing percentages never exceeds 100
//! - Zero percentages are rejected, so every stored edge is live; a consumed
//!   delegatee slot is never freed
//! - `outgoing` and `incoming` are kept in lockstep

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lib_types::{Address, BlockHeight, Percentage};

use crate::checkpoint::CheckpointSeries;
use crate::errors::{LedgerError, LedgerResult};

/// Maximum distinct live delegatees per delegator
pub const MAX_DELEGATEES: usize = 5;

/// Full allocation of a delegator's own balance (100%)
pub const FULL_ALLOCATION: Percentage = 100;

/// Checkpointed delegation edges with a reverse index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelegationGraph {
    /// delegator -> delegatee -> percentage history
    outgoing: BTreeMap<Address, BTreeMap<Address, CheckpointSeries<Percentage>>>,
    /// delegatee -> delegators with an edge to it
    incoming: BTreeMap<Address, BTreeSet<Address>>,
}

impl DelegationGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the percentage `delegator` delegates to `delegatee` at `height`
    ///
    /// Re-delegating to an already-live delegatee updates that edge's
    /// percentage series without consuming a new slot. All checks run before
    /// the first write.
    pub fn delegate(
        &mut self,
        delegator: Address,
        delegatee: Address,
        percentage: Percentage,
        height: BlockHeight,
    ) -> LedgerResult<()> {
        if delegatee == delegator {
            return Err(LedgerError::SelfDelegation);
        }
        if percentage == 0 || percentage > FULL_ALLOCATION {
            return Err(LedgerError::InvalidPercentage(percentage));
        }

        let edges = self.outgoing.get(&delegator);
        let is_new_edge = edges.map_or(true, |e| !e.contains_key(&delegatee));
        if is_new_edge && edges.map_or(0, |e| e.len()) >= MAX_DELEGATEES {
            return Err(LedgerError::TooManyDelegatees);
        }

        // Headroom excludes any existing edge to the same delegatee, since
        // the new percentage replaces it.
        let committed: u16 = edges.map_or(0, |e| {
            e.iter()
                .filter(|(to, _)| **to != delegatee)
                .map(|(_, series)| series.latest() as u16)
                .sum()
        });
        if committed + percentage as u16 > FULL_ALLOCATION as u16 {
            return Err(LedgerError::AllocationExceeded {
                committed,
                requested: percentage,
            });
        }

        self.outgoing
            .entry(delegator)
            .or_default()
            .entry(delegatee)
            .or_default()
            .record(height, percentage);
        self.incoming
            .entry(delegatee)
            .or_default()
            .insert(delegator);
        Ok(())
    }

    /// Percentage of the edge `(delegator, delegatee)` as of `height`
    ///
    /// Reads 0 when the edge does not exist or had no checkpoint yet.
    pub fn percentage_at(
        &self,
        delegator: Address,
        delegatee: Address,
        height: BlockHeight,
    ) -> Percentage {
        self.outgoing
            .get(&delegator)
            .and_then(|edges| edges.get(&delegatee))
            .map(|series| series.value_at(height))
            .unwrap_or(0)
    }

    /// Sum of `delegator`'s outgoing percentages as of `height`
    ///
    /// Bounded by 100 via the allocation check, but returned as `u16` since
    /// individual historical reads are summed here.
    pub fn outgoing_sum_at(&self, delegator: Address, height: BlockHeight) -> u16 {
        self.outgoing.get(&delegator).map_or(0, |edges| {
            edges
                .values()
                .map(|series| series.value_at(height) as u16)
                .sum()
        })
    }

    /// Live delegatees of `delegator` with their current percentages
    pub fn delegatees_of(&self, delegator: Address) -> Vec<(Address, Percentage)> {
        self.outgoing.get(&delegator).map_or_else(Vec::new, |edges| {
            edges
                .iter()
                .map(|(to, series)| (*to, series.latest()))
                .collect()
        })
    }

    /// Accounts that have delegated to `delegatee`
    pub fn delegators_of(&self, delegatee: Address) -> impl Iterator<Item = &Address> {
        self.incoming
            .get(&delegatee)
            .into_iter()
            .flat_map(|set| set.iter())
    }

    /// Number of live delegatees of `delegator`
    pub fn out_degree(&self, delegator: Address) -> usize {
        self.outgoing.get(&delegator).map_or(0, |edges| edges.len())
    }

    /// Percentage of its own balance `delegator` has not delegated away
    pub fn undelegated_percentage(&self, delegator: Address) -> Percentage {
        let committed: u16 = self.outgoing.get(&delegator).map_or(0, |edges| {
            edges.values().map(|series| series.latest() as u16).sum()
        });
        // committed <= 100 by the allocation invariant
        FULL_ALLOCATION - committed as Percentage
    }
}
