use async_trait::async_trait;
use std::collections::HashMap;

use super::{Credential, CredentialStore, Role};
use crate::database::DatabaseError;

/// Fixed list of users compiled into the process.
///
/// The demo users carry `{noop}` passwords and are not fit for production.
pub struct InMemoryCredentialStore {
    users: HashMap<String, Credential>,
}

impl InMemoryCredentialStore {
    pub fn new(users: Vec<Credential>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|credential| (credential.username.clone(), credential))
                .collect(),
        }
    }

    /// erdogan (EMPLOYEE), irem (EMPLOYEE, MANAGER), gamze (EMPLOYEE, MANAGER, ADMIN)
    pub fn demo() -> Self {
        Self::new(vec![
            Credential::new("erdogan", "{noop}test123", &[Role::Employee]),
            Credential::new("irem", "{noop}test123", &[Role::Employee, Role::Manager]),
            Credential::new(
                "gamze",
                "{noop}test123",
                &[Role::Employee, Role::Manager, Role::Admin],
            ),
        ])
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn resolve(&self, username: &str) -> Result<Option<Credential>, DatabaseError> {
        Ok(self.users.get(username).cloned())
    }

    async fn role_assignments(&self) -> Result<Vec<(String, String)>, DatabaseError> {
        Ok(self
            .users
            .values()
            .flat_map(|credential| {
                credential
                    .authorities
                    .iter()
                    .map(|authority| (credential.username.clone(), authority.clone()))
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
