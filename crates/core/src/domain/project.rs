use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use super::bills::Bill;
use super::members::{Member, MemberId};

/// Snapshot of a project's members and bills
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// Project members
    pub members: Vec<Member>,

    /// Project bills
    #[serde(default)]
    pub bills: Vec<Bill>,
}

impl Project {
    /// Parses a project snapshot from JSON
    pub fn from_json(input: &str) -> crate::Result<Self> {
        let project: Project = serde_json::from_str(input)?;
        project.validate()?;
        Ok(project)
    }

    /// Looks up a member by id
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Maps member ids to display names
    pub fn member_names(&self) -> HashMap<MemberId, String> {
        self.members
            .iter()
            .map(|m| (m.id, m.name.clone()))
            .collect()
    }

    /// Validates members, then checks every bill only references known members
    pub fn validate(&self) -> crate::Result<()> {
        let mut seen = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            member.validate().map_err(crate::Error::InvalidMember)?;
            if !seen.insert(member.id) {
                return Err(crate::Error::InvalidMember(format!(
                    "Duplicate member id {}",
                    member.id
                )));
            }
        }

        for bill in &self.bills {
            bill.validate().map_err(crate::Error::InvalidBill)?;
            for id in std::iter::once(&bill.payer_id).chain(bill.owers.iter()) {
                if !seen.contains(id) {
                    return Err(crate::Error::UnknownMember(*id));
                }
            }
        }

        Ok(())
    }
}
