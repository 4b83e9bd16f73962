//! # Identity Matcher
//!
//! Decides whether a submitting agent may submit a package on behalf of
//! the account the package declares.
//!
//! Agents are registered under an account with one of two roles:
//!
//! - `Operator`: archive staff. Operator privilege is global. An operator
//!   registered under any account may submit for every account.
//! - `Contact`: an account's own depositor. A contact may submit only for
//!   the account it is registered under.

use daitss_core::{AccountCode, AgentId};
use serde::{Deserialize, Serialize};

/// Role an agent holds in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Operator,
    Contact,
}

impl AgentRole {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Contact => "contact",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identity presented at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub role: AgentRole,
    /// Account the agent is registered under.
    pub account: AccountCode,
}

impl Agent {
    pub fn operator(id: AgentId, account: AccountCode) -> Self {
        Self {
            id,
            role: AgentRole::Operator,
            account,
        }
    }

    pub fn contact(id: AgentId, account: AccountCode) -> Self {
        Self {
            id,
            role: AgentRole::Contact,
            account,
        }
    }

    /// Check if this agent may submit a package declaring `package_account`.
    ///
    /// - `Operator` may submit for any account, whichever account the
    ///   operator is registered under.
    /// - `Contact` may submit only when registered under `package_account`.
    pub fn may_submit_for(&self, package_account: &AccountCode) -> bool {
        match self.role {
            AgentRole::Operator => true,
            AgentRole::Contact => self.account == *package_account,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> AccountCode {
        AccountCode::new(s).unwrap()
    }

    fn id(s: &str) -> AgentId {
        AgentId::new(s).unwrap()
    }

    #[test]
    fn operator_of_same_account_matches() {
        let agent = Agent::operator(id("ops"), code("ACT"));
        assert!(agent.may_submit_for(&code("ACT")));
    }

    #[test]
    fn operator_of_other_account_still_matches() {
        let agent = Agent::operator(id("ops"), code("FOO"));
        assert!(agent.may_submit_for(&code("ACT")));
    }

    #[test]
    fn contact_of_same_account_matches() {
        let agent = Agent::contact(id("alice"), code("ACT"));
        assert!(agent.may_submit_for(&code("ACT")));
    }

    #[test]
    fn contact_of_other_account_does_not_match() {
        let agent = Agent::contact(id("bob"), code("FOO"));
        assert!(!agent.may_submit_for(&code("ACT")));
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&AgentRole::Operator).unwrap(), "\"operator\"");
        assert_eq!(AgentRole::Contact.to_string(), "contact");
    }
}
