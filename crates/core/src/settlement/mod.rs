pub mod optimal;
pub mod centered;
pub mod reimbursement;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use crate::balance::MemberBalances;
use crate::domain::MemberId;
use crate::math;

pub use centered::CenteredSettlement;
pub use optimal::OptimalSettlement;

/// A single payment that moves `amount` from `from` to `to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction<M = MemberId> {
    /// Member who pays
    pub from: M,

    /// Member who receives
    pub to: M,

    /// Paid amount, always positive and never rounded
    pub amount: f64,
}

impl<M> Transaction<M> {
    /// Creates a new transaction
    pub fn new(from: M, to: M, amount: f64) -> Self {
        Self { from, to, amount }
    }
}

/// Settlement configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Decimal places of the project currency.
    ///
    /// Balances that round to zero at this precision take part in no
    /// transaction, and reimbursement amounts are rounded to it.
    pub precision: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl SettlementConfig {
    /// Validates configuration values
    pub fn validate(&self) -> crate::Result<()> {
        if self.precision > math::MAX_PRECISION {
            return Err(crate::Error::ConfigError(format!(
                "precision {} exceeds the maximum of {}",
                self.precision,
                math::MAX_PRECISION
            )));
        }
        Ok(())
    }

    /// Magnitude under which a balance counts as settled
    pub fn zero_threshold(&self) -> f64 {
        math::zero_threshold(self.precision)
    }
}

/// How a settlement plan is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// Greedy debt simplification over all members
    Optimal,

    /// Every transaction goes through the given member
    CenteredOn(MemberId),
}

/// Settlement plan: the transactions and the balances they settle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Transactions in emission order
    pub transactions: Vec<Transaction>,

    /// Balances the plan was computed from
    pub balances: MemberBalances,
}

impl SettlementPlan {
    /// Total amount moved by the plan
    pub fn total_amount(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Balances after applying every transaction: debit `from`, credit `to`
    pub fn remaining_balances(&self) -> MemberBalances {
        let mut remaining = self.balances.clone();
        for transaction in &self.transactions {
            *remaining.entry(transaction.from).or_insert(0.0) += transaction.amount;
            *remaining.entry(transaction.to).or_insert(0.0) -= transaction.amount;
        }
        remaining
    }
}

/// Strategy turning balances into transactions
pub trait SettlementStrategy<M>: Send + Sync {
    /// Produces the transactions zeroing `balances`, in emission order
    fn settle(&self, balances: &[(M, f64)]) -> Vec<Transaction<M>>;

    /// Returns strategy name
    fn name(&self) -> &str;
}

/// Entry point of the settlement engine
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: SettlementConfig,
}

impl SettlementEngine {
    /// Creates an engine after validating its configuration
    pub fn new(config: SettlementConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns engine configuration
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Greedy largest-creditor/largest-debtor settlement
    pub fn optimal<M, I>(&self, balances: I) -> Vec<Transaction<M>>
    where
        M: Clone + fmt::Debug,
        I: IntoIterator<Item = (M, f64)>,
    {
        optimal::reduce_balances(balances, self.config.zero_threshold())
    }

    /// Settlement where every transaction involves `center`
    pub fn centered<M, I>(&self, balances: I, center: &M) -> Vec<Transaction<M>>
    where
        M: Clone + PartialEq + fmt::Debug,
        I: IntoIterator<Item = (M, f64)>,
    {
        centered::settle_around(balances, center, self.config.zero_threshold())
    }

    /// Builds the strategy matching `mode`
    pub fn strategy(&self, mode: SettlementMode) -> Box<dyn SettlementStrategy<MemberId>> {
        let threshold = self.config.zero_threshold();
        match mode {
            SettlementMode::Optimal => Box::new(OptimalSettlement::new(threshold)),
            SettlementMode::CenteredOn(center) => {
                Box::new(CenteredSettlement::new(center, threshold))
            }
        }
    }

    /// Computes a settlement plan for project balances.
    ///
    /// Rejects non-finite balances. The plain `optimal` and `centered`
    /// entry points skip NaN and settle infinite balances as given.
    pub fn plan(&self, balances: MemberBalances, mode: SettlementMode) -> crate::Result<SettlementPlan> {
        if let Some((member, balance)) = balances.iter().find(|(_, b)| !b.is_finite()) {
            return Err(crate::Error::InvalidBalance(format!(
                "member {member} has balance {balance}"
            )));
        }

        let strategy = self.strategy(mode);
        debug!(strategy = strategy.name(), members = balances.len(), "Settling balances");

        let entries: Vec<(MemberId, f64)> = balances.iter().map(|(m, b)| (*m, *b)).collect();
        let transactions = strategy.settle(&entries);

        info!(
            strategy = strategy.name(),
            transactions = transactions.len(),
            "Settlement plan ready"
        );

        Ok(SettlementPlan { transactions, balances })
    }
}

/// Optimal settlement with the default configuration
pub fn optimal_settlement<M, I>(balances: I) -> Vec<Transaction<M>>
where
    M: Clone + fmt::Debug,
    I: IntoIterator<Item = (M, f64)>,
{
    SettlementEngine::default().optimal(balances)
}

/// Centered settlement with the default configuration
pub fn centered_settlement<M, I>(balances: I, center: &M) -> Vec<Transaction<M>>
where
    M: Clone + PartialEq + fmt::Debug,
    I: IntoIterator<Item = (M, f64)>,
{
    SettlementEngine::default().centered(balances, center)
}
