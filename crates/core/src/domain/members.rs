use serde::{Deserialize, Serialize};
use std::fmt;

/// Member unique identifier within a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a project member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    /// Member identifier
    pub id: MemberId,

    /// Display name, used in reimbursement titles
    pub name: String,

    /// Share weight applied when the member owes part of a bill
    #[serde(default = "default_weight")]
    pub weight: f64,

    /// Disabled members keep their balance but are hidden by most clients
    #[serde(default = "default_activated")]
    pub activated: bool,
}

fn default_weight() -> f64 {
    1.0
}

fn default_activated() -> bool {
    true
}

impl Member {
    /// Creates an activated member with weight 1
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: MemberId(id),
            name: name.into(),
            weight: default_weight(),
            activated: default_activated(),
        }
    }

    /// Returns the same member with another weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Number of shares this member takes in a bill.
    ///
    /// A weight of exactly zero counts as one share.
    pub fn share_weight(&self) -> f64 {
        if self.weight == 0.0 {
            1.0
        } else {
            self.weight
        }
    }

    /// Validates member parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("Member {} has an empty name", self.id));
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!("Member {} has an invalid weight {}", self.id, self.weight));
        }

        Ok(())
    }
}
