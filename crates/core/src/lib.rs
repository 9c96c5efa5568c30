pub mod domain;
pub mod balance;
pub mod settlement;
pub mod math;

pub use balance::{compute_balances, BalanceCalculator, MemberBalances};
pub use domain::{Bill, Member, MemberId, Project};
pub use settlement::{
    centered_settlement, optimal_settlement, SettlementConfig, SettlementEngine, SettlementMode,
    SettlementPlan, SettlementStrategy, Transaction,
};

/// Core result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown member: {0}")]
    UnknownMember(MemberId),

    #[error("Invalid member: {0}")]
    InvalidMember(String),

    #[error("Invalid bill: {0}")]
    InvalidBill(String),

    #[error("Invalid balance: {0}")]
    InvalidBalance(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Malformed project snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
