use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use crate::domain::{Bill, Member, MemberId, Project};
use crate::math::{is_negligible, weighted_share};

/// Net balance per member: positive is owed money, negative owes money
pub type MemberBalances = BTreeMap<MemberId, f64>;

/// Computes member balances from a project's bills
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Sums what each member paid minus what each member owes.
    ///
    /// Every member starts at zero. When `max_timestamp` is set, only bills
    /// dated strictly before it count. Each ower carries a part of the bill
    /// proportional to its member weight.
    pub fn calculate(
        &self,
        members: &[Member],
        bills: &[Bill],
        max_timestamp: Option<i64>,
    ) -> crate::Result<MemberBalances> {
        let weights: HashMap<MemberId, f64> = members
            .iter()
            .map(|m| (m.id, m.share_weight()))
            .collect();
        let mut balances: MemberBalances = members.iter().map(|m| (m.id, 0.0)).collect();

        let mut counted = 0usize;
        for bill in bills.iter().filter(|b| b.is_before(max_timestamp)) {
            bill.validate().map_err(crate::Error::InvalidBill)?;

            let shares = bill
                .owers
                .iter()
                .map(|id| {
                    weights
                        .get(id)
                        .copied()
                        .ok_or(crate::Error::UnknownMember(*id))
                })
                .collect::<crate::Result<Vec<f64>>>()?;
            let total_shares: f64 = shares.iter().sum();
            if total_shares <= 0.0 {
                return Err(crate::Error::InvalidBill(format!(
                    "Bill {} has no positive ower weight",
                    bill.id
                )));
            }

            *balances
                .get_mut(&bill.payer_id)
                .ok_or(crate::Error::UnknownMember(bill.payer_id))? += bill.amount;

            for (ower, weight) in bill.owers.iter().zip(shares) {
                if let Some(balance) = balances.get_mut(ower) {
                    *balance -= weighted_share(bill.amount, total_shares, weight);
                }
            }
            counted += 1;
        }

        debug!(members = members.len(), bills = counted, "Balances computed");
        Ok(balances)
    }
}

/// Computes member balances with the default calculator
pub fn compute_balances(
    members: &[Member],
    bills: &[Bill],
    max_timestamp: Option<i64>,
) -> crate::Result<MemberBalances> {
    BalanceCalculator.calculate(members, bills, max_timestamp)
}

impl Project {
    /// Member balances over the project's bills
    pub fn balances(&self, max_timestamp: Option<i64>) -> crate::Result<MemberBalances> {
        compute_balances(&self.members, &self.bills, max_timestamp)
    }

    /// Balances worth listing: disabled members only appear while their
    /// balance is not negligible at `threshold`
    pub fn displayed_balances(
        &self,
        max_timestamp: Option<i64>,
        threshold: f64,
    ) -> crate::Result<MemberBalances> {
        let mut balances = self.balances(max_timestamp)?;
        for member in self.members.iter().filter(|m| !m.activated) {
            if balances
                .get(&member.id)
                .is_some_and(|b| is_negligible(*b, threshold))
            {
                balances.remove(&member.id);
            }
        }
        Ok(balances)
    }
}
