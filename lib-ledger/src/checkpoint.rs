//! Checkpointed Values
//!
//! Append-only `(height, value)` series with point-in-time lookup. This is
//! the versioned-value store underneath both account balances and delegation
//! percentages: every state change writes a checkpoint at the height it
//! happened, and historical queries binary-search the series.
//!
//! # Invariants
//!
//! - Heights strictly increase across consecutive entries
//! - A repeated write at the tip height overwrites the tip value
//!   (idempotent-at-height), never duplicates
//! - Entries are never removed; storage grows with state-changing events,
//!   not with block count

use serde::{Deserialize, Serialize};

use lib_types::BlockHeight;

/// An immutable `(height, value)` record marking a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint<V> {
    /// Height at which the value took effect
    pub height: BlockHeight,
    /// Value in effect from `height` onward
    pub value: V,
}

/// Ordered, append-only sequence of checkpoints for one key
///
/// Lookup is O(log k) for k checkpoints; the series may be probed once per
/// account for a single historical vote-power query, so the log bound
/// matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSeries<V> {
    entries: Vec<Checkpoint<V>>,
}

impl<V: Copy + Default> CheckpointSeries<V> {
    /// Create an empty series
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record `value` at `height`
    ///
    /// Appends when `height` is above the tip, overwrites the tip value when
    /// `height` equals it. The host clock is monotone; a write below the tip
    /// folds into the tip entry so the series stays ordered.
    pub fn record(&mut self, height: BlockHeight, value: V) {
        match self.entries.last_mut() {
            Some(tip) if tip.height >= height => {
                debug_assert!(
                    tip.height == height,
                    "checkpoint write below tip: {} < {}",
                    height,
                    tip.height
                );
                tip.value = value;
            }
            _ => self.entries.push(Checkpoint { height, value }),
        }
    }

    /// Value in effect at `height`: the latest entry with
    /// `entry.height <= height`, or the default when no entry qualifies
    pub fn value_at(&self, height: BlockHeight) -> V {
        let idx = self.entries.partition_point(|c| c.height <= height);
        if idx == 0 {
            V::default()
        } else {
            self.entries[idx - 1].value
        }
    }

    /// Current value: the tip entry, or the default for an empty series
    pub fn latest(&self) -> V {
        self.entries.last().map(|c| c.value).unwrap_or_default()
    }

    /// Height of the tip entry, if any
    pub fn latest_height(&self) -> Option<BlockHeight> {
        self.entries.last().map(|c| c.height)
    }

    /// Number of checkpoints recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the series holds no checkpoints
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
