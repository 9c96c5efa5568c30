use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use super::{SettlementEngine, Transaction};
use crate::domain::{Bill, MemberId, CATEGORY_REIMBURSEMENT};
use crate::math::round_to_precision;

impl SettlementEngine {
    /// Turns settlement transactions into reimbursement bills.
    ///
    /// Bills are dated one second before `max_timestamp` when a cutoff is
    /// given, so that a balance computed at that cutoff includes them.
    /// Otherwise they are dated now.
    pub fn reimbursements(
        &self,
        transactions: &[Transaction],
        member_names: &HashMap<MemberId, String>,
        max_timestamp: Option<i64>,
    ) -> crate::Result<Vec<Bill>> {
        let timestamp = match max_timestamp {
            Some(max) => max - 1,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or_default(),
        };
        self.reimbursements_at(transactions, member_names, timestamp)
    }

    /// Same as [`SettlementEngine::reimbursements`] with an explicit date
    pub fn reimbursements_at(
        &self,
        transactions: &[Transaction],
        member_names: &HashMap<MemberId, String>,
        timestamp: i64,
    ) -> crate::Result<Vec<Bill>> {
        let name_of = move |id: MemberId| {
            member_names
                .get(&id)
                .ok_or(crate::Error::UnknownMember(id))
        };

        let mut bills = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            let from = name_of(transaction.from)?;
            let to = name_of(transaction.to)?;

            let amount = round_to_precision(transaction.amount, self.config().precision);
            if amount == 0.0 {
                debug!(
                    from = %transaction.from,
                    to = %transaction.to,
                    amount = transaction.amount,
                    "Skipping reimbursement that rounds to zero"
                );
                continue;
            }

            let mut bill = Bill::new(transaction.from, amount, vec![transaction.to], timestamp);
            bill.what = format!("{from} → {to}");
            bill.category_id = CATEGORY_REIMBURSEMENT;
            bills.push(bill);
        }

        info!(bills = bills.len(), timestamp, "Reimbursements prepared");
        Ok(bills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::SettlementConfig;

    fn names() -> HashMap<MemberId, String> {
        HashMap::from([
            (MemberId(1), "alice".to_string()),
            (MemberId(2), "bob".to_string()),
            (MemberId(3), "carol".to_string()),
        ])
    }

    #[test]
    fn test_reimbursement_bill_fields() {
        let engine = SettlementEngine::default();
        let transactions = vec![Transaction::new(MemberId(2), MemberId(1), 10.0 / 3.0)];

        let bills = engine
            .reimbursements(&transactions, &names(), Some(1_700_000_000))
            .unwrap();

        assert_eq!(bills.len(), 1);
        let bill = &bills[0];
        assert_eq!(bill.what, "bob → alice");
        assert_eq!(bill.payer_id, MemberId(2));
        assert_eq!(bill.owers, vec![MemberId(1)]);
        assert_eq!(bill.amount, 3.33);
        assert_eq!(bill.timestamp, 1_699_999_999);
        assert!(bill.is_reimbursement());
    }

    #[test]
    fn test_precision_controls_rounding() {
        let engine = SettlementEngine::new(SettlementConfig { precision: 0 }).unwrap();
        let transactions = vec![
            Transaction::new(MemberId(3), MemberId(1), 2.5),
            Transaction::new(MemberId(2), MemberId(1), 0.4),
        ];

        let bills = engine.reimbursements_at(&transactions, &names(), 42).unwrap();

        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].amount, 3.0);
        assert_eq!(bills[0].what, "carol → alice");
    }

    #[test]
    fn test_unknown_member_is_reported() {
        let engine = SettlementEngine::default();
        let transactions = vec![Transaction::new(MemberId(9), MemberId(1), 1.0)];

        let result = engine.reimbursements_at(&transactions, &names(), 0);
        assert!(matches!(result, Err(crate::Error::UnknownMember(MemberId(9)))));
    }

    #[test]
    fn test_undated_reimbursements_use_current_time() {
        let engine = SettlementEngine::default();
        let transactions = vec![Transaction::new(MemberId(1), MemberId(2), 1.0)];

        let bills = engine.reimbursements(&transactions, &names(), None).unwrap();
        assert!(bills[0].timestamp > 1_600_000_000);
    }
}
