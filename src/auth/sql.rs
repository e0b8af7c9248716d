use async_trait::async_trait;
use sqlx::PgPool;

use super::{Credential, CredentialStore};
use crate::config::SecurityConfig;
use crate::database::models::{AuthorityRow, CredentialRow};
use crate::database::DatabaseError;

/// Credentials looked up with two parameterized queries:
/// - users: `$1` username → `(username, password, enabled)`, at most one row
/// - authorities: `$1` username → `(username, authority)`, zero or more rows
pub struct SqlCredentialStore {
    pool: PgPool,
    users_query: String,
    authorities_query: String,
    audit_query: String,
}

impl SqlCredentialStore {
    pub fn new(pool: PgPool, security: &SecurityConfig) -> Self {
        Self {
            pool,
            users_query: security.users_by_username_query.clone(),
            authorities_query: security.authorities_by_username_query.clone(),
            audit_query: security.role_audit_query.clone(),
        }
    }
}

#[async_trait]
impl CredentialStore for SqlCredentialStore {
    async fn resolve(&self, username: &str) -> Result<Option<Credential>, DatabaseError> {
        let mut rows = sqlx::query_as::<_, CredentialRow>(&self.users_query)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;

        let user = match rows.len() {
            0 => return Ok(None),
            1 => rows.remove(0),
            n => {
                return Err(DatabaseError::QueryError(format!(
                    "users query returned {} rows for '{}'",
                    n, username
                )))
            }
        };

        let authorities = sqlx::query_as::<_, AuthorityRow>(&self.authorities_query)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;

        if authorities.is_empty() {
            tracing::debug!("User '{}' has no authorities", user.username);
        }

        Ok(Some(Credential {
            username: user.username,
            password: user.password,
            enabled: user.enabled,
            authorities: authorities.into_iter().map(|row| row.authority).collect(),
        }))
    }

    async fn role_assignments(&self) -> Result<Vec<(String, String)>, DatabaseError> {
        let rows = sqlx::query_as::<_, AuthorityRow>(&self.audit_query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.username, row.authority))
            .collect())
    }

    fn name(&self) -> &'static str {
        "sql"
    }
}
