//! Greedy debt simplification.
//!
//! At every step the most indebted member pays the largest creditor as much
//! as either side allows, so each transaction closes at least one of them.
//!
//! Working lists are re-sorted with a linear insertion sort whose handling of
//! equal balances is part of the output contract: creditors keep their
//! relative order, debtors with equal balances swap order on every pass.
//! Replacing it with `sort_by` changes which of two equal members is paired
//! first.
//!
//! Balances under the zero threshold are set aside through a [`DustLedger`],
//! so what is set aside never adds up to a balance nobody settles.

use std::fmt;
use tracing::trace;
use super::{SettlementStrategy, Transaction};
use crate::math::DustLedger;

/// Member taking part in the reduction, with what it still owes or is owed
#[derive(Debug, Clone)]
struct WorkingEntry<M> {
    member: M,
    balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortDirection {
    /// Smallest balance first, largest popped first
    Ascending,
    /// Largest balance first, most negative popped first
    Descending,
}

/// Rebuilds `entries` by inserting each of them, in current order, into an
/// empty list.
fn insertion_sort<M>(entries: &mut Vec<WorkingEntry<M>>, direction: SortDirection) {
    let mut sorted: Vec<WorkingEntry<M>> = Vec::with_capacity(entries.len());
    for entry in std::mem::take(entries) {
        let position = sorted
            .iter()
            .position(|existing| match direction {
                SortDirection::Ascending => existing.balance > entry.balance,
                SortDirection::Descending => existing.balance <= entry.balance,
            })
            .unwrap_or(sorted.len());
        sorted.insert(position, entry);
    }
    *entries = sorted;
}

/// Splits balances into creditors and debtors, keeping input order
fn partition<M, I>(
    balances: I,
    dust: &mut DustLedger,
) -> (Vec<WorkingEntry<M>>, Vec<WorkingEntry<M>>)
where
    I: IntoIterator<Item = (M, f64)>,
{
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for (member, balance) in balances {
        if dust.set_aside(balance) {
            continue;
        }
        if balance > 0.0 {
            creditors.push(WorkingEntry { member, balance });
        } else if balance < 0.0 {
            debtors.push(WorkingEntry { member, balance });
        }
    }

    (creditors, debtors)
}

/// Produces the greedy settlement of `balances`.
///
/// Balances whose magnitude is under `threshold` are treated as zero, both
/// on input and for what remains after each payment, as long as everything
/// treated as zero stays under `threshold` in total. Past that point the
/// member keeps taking part however small its balance is.
///
/// NaN balances take no part. Infinite ones are settled like any other.
pub(crate) fn reduce_balances<M, I>(balances: I, threshold: f64) -> Vec<Transaction<M>>
where
    M: Clone + fmt::Debug,
    I: IntoIterator<Item = (M, f64)>,
{
    let mut dust = DustLedger::new(threshold);
    let (mut creditors, mut debtors) = partition(balances, &mut dust);
    let mut transactions = Vec::with_capacity(creditors.len() + debtors.len());

    while !creditors.is_empty() && !debtors.is_empty() {
        insertion_sort(&mut creditors, SortDirection::Ascending);
        insertion_sort(&mut debtors, SortDirection::Descending);

        let (Some(debtor), Some(creditor)) = (debtors.pop(), creditors.pop()) else {
            break;
        };

        let amount = if debtor.balance.abs() > creditor.balance.abs() {
            creditor.balance.abs()
        } else {
            debtor.balance.abs()
        };

        trace!(
            from = ?debtor.member,
            to = ?creditor.member,
            amount,
            "Reducing balances"
        );
        transactions.push(Transaction::new(
            debtor.member.clone(),
            creditor.member.clone(),
            amount,
        ));

        let debtor_left = debtor.balance + amount;
        if debtor_left < 0.0 && !dust.set_aside(debtor_left) {
            debtors.push(WorkingEntry {
                member: debtor.member,
                balance: debtor_left,
            });
            insertion_sort(&mut debtors, SortDirection::Descending);
        }

        let creditor_left = creditor.balance - amount;
        if creditor_left > 0.0 && !dust.set_aside(creditor_left) {
            creditors.push(WorkingEntry {
                member: creditor.member,
                balance: creditor_left,
            });
            insertion_sort(&mut creditors, SortDirection::Ascending);
        }
    }

    transactions
}

/// Greedy largest-creditor/largest-debtor strategy
#[derive(Debug, Clone, Copy)]
pub struct OptimalSettlement {
    threshold: f64,
}

impl OptimalSettlement {
    /// Creates the strategy; balances under `threshold` count as zero
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl<M> SettlementStrategy<M> for OptimalSettlement
where
    M: Clone + fmt::Debug,
{
    fn settle(&self, balances: &[(M, f64)]) -> Vec<Transaction<M>> {
        reduce_balances(balances.iter().cloned(), self.threshold)
    }

    fn name(&self) -> &str {
        "optimal"
    }
}
