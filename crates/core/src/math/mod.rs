/// Largest precision accepted for monetary rounding
pub const MAX_PRECISION: u32 = 10;

/// Rounds `value` to `precision` decimal places, half away from zero
pub fn round_to_precision(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // avoid handing out -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Magnitude under which an amount rounds to zero at `precision` decimals
pub fn zero_threshold(precision: u32) -> f64 {
    0.5 * 10f64.powi(-(precision as i32))
}

/// Checks if `value` is indistinguishable from zero at the given threshold
pub fn is_negligible(value: f64, threshold: f64) -> bool {
    value.abs() < threshold
}

/// Running total of the balances a settlement treats as zero.
///
/// A balance is only set aside while it is negligible on its own and the
/// running total stays negligible as well. Once the total would reach the
/// threshold the balance has to be settled, so leftovers never add up to a
/// stranded amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DustLedger {
    total: f64,
    threshold: f64,
}

impl DustLedger {
    pub fn new(threshold: f64) -> Self {
        Self {
            total: 0.0,
            threshold,
        }
    }

    /// Records `balance` as settled if it may be treated as zero.
    ///
    /// Returns `false` when the member has to take part in the settlement.
    /// NaN is never set aside.
    pub fn set_aside(&mut self, balance: f64) -> bool {
        if balance == 0.0 {
            return true;
        }

        let total = self.total + balance;
        if is_negligible(balance, self.threshold) && is_negligible(total, self.threshold) {
            self.total = total;
            true
        } else {
            false
        }
    }

    /// Sum of every balance set aside so far
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Part of `amount` owed by someone holding `weight` out of `total_shares`
pub fn weighted_share(amount: f64, total_shares: f64, weight: f64) -> f64 {
    if total_shares == 0.0 {
        return 0.0;
    }

    amount / total_shares * weight
}
