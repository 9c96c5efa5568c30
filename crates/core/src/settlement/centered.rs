use std::fmt;
use super::{SettlementStrategy, Transaction};
use crate::math::DustLedger;

/// Settles every member directly with `center`, in input order.
///
/// The center's own balance is never read. A center absent from `balances`
/// is not an error: every other member still settles with it. Balances under
/// `threshold` are skipped only while the skipped total stays under it too.
/// NaN balances are skipped.
pub(crate) fn settle_around<M, I>(balances: I, center: &M, threshold: f64) -> Vec<Transaction<M>>
where
    M: Clone + PartialEq + fmt::Debug,
    I: IntoIterator<Item = (M, f64)>,
{
    let mut dust = DustLedger::new(threshold);
    balances
        .into_iter()
        .filter(|(member, balance)| member != center && !dust.set_aside(*balance))
        .filter_map(|(member, balance)| {
            if balance > 0.0 {
                Some(Transaction::new(center.clone(), member, balance))
            } else if balance < 0.0 {
                Some(Transaction::new(member, center.clone(), -balance))
            } else {
                None
            }
        })
        .collect()
}

/// Strategy routing every transaction through one member
#[derive(Debug, Clone)]
pub struct CenteredSettlement<M> {
    center: M,
    threshold: f64,
}

impl<M> CenteredSettlement<M> {
    /// Creates the strategy; balances under `threshold` count as zero
    pub fn new(center: M, threshold: f64) -> Self {
        Self { center, threshold }
    }

    /// Member every transaction goes through
    pub fn center(&self) -> &M {
        &self.center
    }
}

impl<M> SettlementStrategy<M> for CenteredSettlement<M>
where
    M: Clone + PartialEq + fmt::Debug + Send + Sync,
{
    fn settle(&self, balances: &[(M, f64)]) -> Vec<Transaction<M>> {
        settle_around(balances.iter().cloned(), &self.center, self.threshold)
    }

    fn name(&self) -> &str {
        "centered"
    }
}
