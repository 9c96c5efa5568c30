use serde::{Deserialize, Serialize};
use super::members::MemberId;

/// Category id given to bills that settle debts between members
pub const CATEGORY_REIMBURSEMENT: i64 = -11;

/// A ledger entry: one payer paid `amount` on behalf of a set of owers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    /// Bill identifier
    #[serde(default)]
    pub id: i64,

    /// Short description
    #[serde(default)]
    pub what: String,

    /// Member who paid
    pub payer_id: MemberId,

    /// Paid amount in the project's base currency
    pub amount: f64,

    /// Members sharing the cost
    pub owers: Vec<MemberId>,

    /// Unix timestamp (seconds) of the expense
    #[serde(default)]
    pub timestamp: i64,

    /// Category id, 0 when uncategorized
    #[serde(default)]
    pub category_id: i64,
}

impl Bill {
    /// Creates an uncategorized bill
    pub fn new(payer_id: MemberId, amount: f64, owers: Vec<MemberId>, timestamp: i64) -> Self {
        Self {
            id: 0,
            what: String::new(),
            payer_id,
            amount,
            owers,
            timestamp,
            category_id: 0,
        }
    }

    /// Validates bill parameters
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() {
            return Err(format!("Bill {} has a non-finite amount", self.id));
        }

        if self.owers.is_empty() {
            return Err(format!("Bill {} has no owers", self.id));
        }

        Ok(())
    }

    /// Checks if this bill settles a debt
    pub fn is_reimbursement(&self) -> bool {
        self.category_id == CATEGORY_REIMBURSEMENT
    }

    /// Checks if the bill counts for a balance computed before `max_timestamp`
    pub fn is_before(&self, max_timestamp: Option<i64>) -> bool {
        max_timestamp.map_or(true, |max| self.timestamp < max)
    }
}
