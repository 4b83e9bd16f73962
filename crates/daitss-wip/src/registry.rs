//! # Account / Project / Agent Registry
//!
//! Read-only lookups the validation gates consume. The production registry
//! lives in the archive's database; this crate only defines the interface
//! plus an in-memory implementation used by tests and by the CLI, which
//! loads it from a YAML snapshot:
//!
//! ```yaml
//! accounts:
//!   - code: ACT
//!     projects: [PRJ]
//!     agents:
//!       - id: ops
//!         role: operator
//!       - id: alice
//!         role: contact
//! ```
//!
//! Projects are scoped to their account: `PRJ` under `ACT` says nothing
//! about `PRJ` under `FOO`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use daitss_core::{AccountCode, AgentId, ProjectCode};
use serde::Deserialize;

use crate::agent::{Agent, AgentRole};
use crate::error::RegistryError;

/// Read-only lookups against the account/project/agent registry.
///
/// Implementations report backend failures as [`RegistryError`]; a code
/// that simply does not exist is `Ok(false)` / `Ok(None)`.
pub trait Registry {
    /// Does an account with this code exist?
    fn account_exists(&self, account: &AccountCode) -> Result<bool, RegistryError>;

    /// Does this project exist under this account?
    fn project_exists(
        &self,
        account: &AccountCode,
        project: &ProjectCode,
    ) -> Result<bool, RegistryError>;

    /// Look up an agent's role and owning account.
    fn agent(&self, id: &AgentId) -> Result<Option<Agent>, RegistryError>;
}

/// Registry held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    accounts: BTreeMap<AccountCode, BTreeSet<ProjectCode>>,
    agents: BTreeMap<AgentId, Agent>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. Re-adding an existing account is a no-op.
    pub fn add_account(&mut self, account: AccountCode) -> &mut Self {
        self.accounts.entry(account).or_default();
        self
    }

    /// Register a project under an account, creating the account if needed.
    pub fn add_project(&mut self, account: AccountCode, project: ProjectCode) -> &mut Self {
        self.accounts.entry(account).or_default().insert(project);
        self
    }

    /// Register an operator under `account`.
    pub fn add_operator(&mut self, id: AgentId, account: AccountCode) -> &mut Self {
        self.add_agent(Agent::operator(id, account))
    }

    /// Register a contact under `account`.
    pub fn add_contact(&mut self, id: AgentId, account: AccountCode) -> &mut Self {
        self.add_agent(Agent::contact(id, account))
    }

    fn add_agent(&mut self, agent: Agent) -> &mut Self {
        self.accounts.entry(agent.account.clone()).or_default();
        self.agents.insert(agent.id.clone(), agent);
        self
    }

    /// Build a registry from a YAML snapshot file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Malformed {
            path: path.to_path_buf(),
            reason: format!("cannot read registry snapshot: {e}"),
        })?;
        Self::from_yaml_str(&content).map_err(|reason| RegistryError::Malformed {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Build a registry from a YAML snapshot document.
    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        let snapshot: Snapshot = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        let mut registry = Self::new();
        for account in snapshot.accounts {
            registry.add_account(account.code.clone());
            for project in account.projects {
                registry.add_project(account.code.clone(), project);
            }
            for agent in account.agents {
                registry.add_agent(Agent {
                    id: agent.id,
                    role: agent.role,
                    account: account.code.clone(),
                });
            }
        }
        tracing::debug!(
            accounts = registry.accounts.len(),
            agents = registry.agents.len(),
            "loaded registry snapshot"
        );
        Ok(registry)
    }
}

impl Registry for InMemoryRegistry {
    fn account_exists(&self, account: &AccountCode) -> Result<bool, RegistryError> {
        Ok(self.accounts.contains_key(account))
    }

    fn project_exists(
        &self,
        account: &AccountCode,
        project: &ProjectCode,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .accounts
            .get(account)
            .is_some_and(|projects| projects.contains(project)))
    }

    fn agent(&self, id: &AgentId) -> Result<Option<Agent>, RegistryError> {
        Ok(self.agents.get(id).cloned())
    }
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    accounts: Vec<SnapshotAccount>,
}

#[derive(Debug, Deserialize)]
struct SnapshotAccount {
    code: AccountCode,
    #[serde(default)]
    projects: Vec<ProjectCode>,
    #[serde(default)]
    agents: Vec<SnapshotAgent>,
}

#[derive(Debug, Deserialize)]
struct SnapshotAgent {
    id: AgentId,
    role: AgentRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act() -> AccountCode {
        AccountCode::new("ACT").unwrap()
    }

    fn prj() -> ProjectCode {
        ProjectCode::new("PRJ").unwrap()
    }

    #[test]
    fn lookups_on_built_registry() {
        let mut registry = InMemoryRegistry::new();
        registry
            .add_project(act(), prj())
            .add_operator(AgentId::new("ops").unwrap(), act());

        assert!(registry.account_exists(&act()).unwrap());
        assert!(!registry.account_exists(&AccountCode::new("FOO").unwrap()).unwrap());
        assert!(registry.project_exists(&act(), &prj()).unwrap());
        assert!(!registry
            .project_exists(&act(), &ProjectCode::new("NOPE").unwrap())
            .unwrap());

        let agent = registry.agent(&AgentId::new("ops").unwrap()).unwrap().unwrap();
        assert_eq!(agent.role, AgentRole::Operator);
        assert!(registry.agent(&AgentId::new("ghost").unwrap()).unwrap().is_none());
    }

    #[test]
    fn projects_are_account_scoped() {
        let foo = AccountCode::new("FOO").unwrap();
        let mut registry = InMemoryRegistry::new();
        registry.add_project(act(), prj()).add_account(foo.clone());
        assert!(!registry.project_exists(&foo, &prj()).unwrap());
    }

    #[test]
    fn yaml_snapshot_loads() {
        let registry = InMemoryRegistry::from_yaml_str(
            r#"
accounts:
  - code: ACT
    projects: [PRJ]
    agents:
      - id: ops
        role: operator
  - code: FOO
    agents:
      - id: bob
        role: contact
"#,
        )
        .unwrap();
        let bob = registry.agent(&AgentId::new("bob").unwrap()).unwrap().unwrap();
        assert_eq!(bob.role, AgentRole::Contact);
        assert_eq!(bob.account, "FOO");
        assert!(registry.project_exists(&act(), &prj()).unwrap());
    }

    #[test]
    fn yaml_snapshot_rejects_unknown_role() {
        let err = InMemoryRegistry::from_yaml_str(
            "accounts: [{code: ACT, agents: [{id: x, role: admin}]}]",
        )
        .unwrap_err();
        assert!(err.contains("admin") || err.contains("variant"));
    }

    #[test]
    fn missing_snapshot_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let err = InMemoryRegistry::from_yaml_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
    }
}
