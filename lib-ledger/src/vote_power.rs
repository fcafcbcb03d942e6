//! Vote Power Aggregation
//!
//! Stateless one-level combination of the balance book and the delegation
//! graph at a requested height. An account's vote power is the share of its
//! own balance it has not delegated away, plus the shares delegated to it by
//! direct delegators. Power received from delegators is never re-delegated,
//! so aggregation walks exactly one edge and cycles cannot amplify.

use lib_types::{Address, Amount, BlockHeight, Percentage};

use crate::balances::BalanceBook;
use crate::delegation::{DelegationGraph, FULL_ALLOCATION};

/// Truncating whole-percent share of `amount`
///
/// Computes `amount * percentage / 100` without intermediate overflow by
/// splitting `amount` into its quotient and remainder mod 100.
pub fn percentage_of(amount: Amount, percentage: Percentage) -> Amount {
    let pct = percentage as Amount;
    (amount / 100) * pct + (amount % 100) * pct / 100
}

/// Vote power of `account` as of `height`
///
/// `retained + incoming`, where
/// - `retained` is `balance * (100 - sum of outgoing percentages) / 100`
/// - `incoming` sums `balance(D) * percentage(D -> account) / 100` over all
///   delegators `D` with an edge to `account`
///
/// Integer division truncates toward zero, so the sum of all accounts' vote
/// powers may fall short of total supply; the deficit is accepted.
pub fn vote_power_of_at(
    balances: &BalanceBook,
    delegation: &DelegationGraph,
    account: Address,
    height: BlockHeight,
) -> Amount {
    let own = balances.balance_at(account, height);
    let delegated_out =
        delegation.outgoing_sum_at(account, height).min(FULL_ALLOCATION as u16) as Percentage;
    let retained = percentage_of(own, FULL_ALLOCATION - delegated_out);

    let incoming: Amount = delegation
        .delegators_of(account)
        .map(|delegator| {
            let weight = delegation.percentage_at(*delegator, account, height);
            percentage_of(balances.balance_at(*delegator, height), weight)
        })
        .sum();

    retained + incoming
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 32])
    }

    #[test]
    fn percentage_of_truncates_toward_zero() {
        assert_eq!(percentage_of(33, 50), 16);
        assert_eq!(percentage_of(36, 25), 9);
        assert_eq!(percentage_of(99, 1), 0);
        assert_eq!(percentage_of(100, 1), 1);
        assert_eq!(percentage_of(0, 100), 0);
    }

    #[test]
    fn percentage_of_handles_large_amounts() {
        // amount * 100 would overflow u128; the split form must not
        assert_eq!(percentage_of(Amount::MAX, 100), Amount::MAX);
        assert_eq!(percentage_of(Amount::MAX, 0), 0);
    }

    #[test]
    fn undelegated_account_has_balance_as_power() {
        let mut balances = BalanceBook::new();
        let delegation = DelegationGraph::new();
        balances.mint(addr(1), 500, 0).unwrap();

        assert_eq!(vote_power_of_at(&balances, &delegation, addr(1), 0), 500);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 0), 0);
    }

    #[test]
    fn delegation_shifts_power_not_balance() {
        let mut balances = BalanceBook::new();
        let mut delegation = DelegationGraph::new();
        balances.mint(addr(1), 200, 0).unwrap();
        delegation.delegate(addr(1), addr(2), 20, 1).unwrap();

        assert_eq!(vote_power_of_at(&balances, &delegation, addr(1), 1), 160);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 1), 40);
        assert_eq!(balances.balance_at(addr(1), 1), 200);
        assert_eq!(balances.balance_at(addr(2), 1), 0);
    }

    #[test]
    fn retained_uses_complement_of_total_outgoing() {
        let mut balances = BalanceBook::new();
        let mut delegation = DelegationGraph::new();
        balances.mint(addr(1), 36, 0).unwrap();
        delegation.delegate(addr(1), addr(2), 50, 1).unwrap();
        delegation.delegate(addr(1), addr(3), 25, 1).unwrap();

        // 36 * 25 / 100, not 36 - 18 - 9
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(1), 1), 9);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 1), 18);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(3), 1), 9);
    }

    #[test]
    fn incoming_power_is_not_redelegated() {
        let mut balances = BalanceBook::new();
        let mut delegation = DelegationGraph::new();
        balances.mint(addr(1), 100, 0).unwrap();
        balances.mint(addr(2), 40, 0).unwrap();

        // 1 -> 2 (100%), then 2 -> 3 (100%): power received from 1 stays
        // with 2, only 2's own balance flows to 3
        delegation.delegate(addr(1), addr(2), 100, 1).unwrap();
        delegation.delegate(addr(2), addr(3), 100, 2).unwrap();

        assert_eq!(vote_power_of_at(&balances, &delegation, addr(1), 2), 0);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 2), 100);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(3), 2), 40);
    }

    #[test]
    fn historical_query_sees_old_percentages_and_balances() {
        let mut balances = BalanceBook::new();
        let mut delegation = DelegationGraph::new();
        balances.mint(addr(1), 100, 0).unwrap();
        delegation.delegate(addr(1), addr(2), 10, 5).unwrap();
        delegation.delegate(addr(1), addr(2), 90, 10).unwrap();
        balances.transfer(addr(1), addr(3), 50, 15).unwrap();

        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 4), 0);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 5), 10);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 9), 10);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 10), 90);
        assert_eq!(vote_power_of_at(&balances, &delegation, addr(2), 15), 45);
    }
}
