pub mod memory;
pub mod password;
pub mod policy;
pub mod sql;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::database::DatabaseError;

pub use memory::InMemoryCredentialStore;
pub use policy::{AccessPolicy, AccessRule, PathPattern};
pub use sql::SqlCredentialStore;

/// Prefix that marks an authority as a role usable by the access policy
pub const ROLE_PREFIX: &str = "ROLE_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// Authority string as stored in a credential, e.g. `ROLE_MANAGER`
    pub fn authority(self) -> String {
        format!("{}{}", ROLE_PREFIX, self.name())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to authenticate and authorize one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    /// `{encoding}value`, see [`password::verify_password`]
    pub password: String,
    pub enabled: bool,
    pub authorities: BTreeSet<String>,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>, roles: &[Role]) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            enabled: true,
            authorities: roles.iter().map(|role| role.authority()).collect(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.authorities.contains(&role.authority())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Full authentication is required to access this resource")]
    MissingCredentials,
    #[error("Malformed Authorization header: {0}")]
    MalformedHeader(&'static str),
    #[error("Bad credentials")]
    BadCredentials,
    #[error("User is disabled")]
    Disabled,
    #[error("Access denied: role {0} required")]
    Forbidden(Role),
    #[error("Access denied: no access rule for {method} {path}")]
    Unmapped { method: String, path: String },
    #[error("Authority '{authority}' of user '{username}' is missing the {prefix} prefix", prefix = ROLE_PREFIX)]
    InvalidRoleTag { username: String, authority: String },
    #[error(transparent)]
    Store(#[from] DatabaseError),
}

/// Resolves usernames to credentials.
///
/// Implementations must return role authorities carrying [`ROLE_PREFIX`];
/// [`ensure_role_convention`] checks this once at startup.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn resolve(&self, username: &str) -> Result<Option<Credential>, DatabaseError>;

    /// Every `(username, authority)` pair the store can hand out
    async fn role_assignments(&self) -> Result<Vec<(String, String)>, DatabaseError>;

    fn name(&self) -> &'static str;
}

/// Fail fast when any stored authority lacks the role prefix
pub async fn ensure_role_convention(store: &dyn CredentialStore) -> Result<usize, AuthError> {
    let assignments = store.role_assignments().await?;
    for (username, authority) in &assignments {
        if !authority.starts_with(ROLE_PREFIX) || authority.len() == ROLE_PREFIX.len() {
            return Err(AuthError::InvalidRoleTag {
                username: username.clone(),
                authority: authority.clone(),
            });
        }
    }
    tracing::info!(
        "Credential store '{}' passed role validation ({} assignments)",
        store.name(),
        assignments.len()
    );
    Ok(assignments.len())
}
