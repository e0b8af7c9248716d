use std::sync::Arc;
use tracing::info;

use crate::auth::{
    ensure_role_convention, AccessPolicy, CredentialStore, InMemoryCredentialStore,
    SqlCredentialStore,
};
use crate::config::{AppConfig, CredentialStoreKind, EmployeeStoreKind};
use crate::database::{
    DatabaseManager, EmployeeRepository, MemoryEmployeeRepository, PgEmployeeRepository,
};
use crate::services::EmployeeService;

/// Shared application state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub credentials: Arc<dyn CredentialStore>,
    pub policy: Arc<AccessPolicy>,
    pub realm: String,
    pub database: Option<DatabaseManager>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn EmployeeRepository>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            employees: EmployeeService::new(repository),
            credentials,
            policy: Arc::new(AccessPolicy::employee_directory()),
            realm: "Realm".to_string(),
            database: None,
        }
    }

    /// In-memory employees and the demo users
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryEmployeeRepository::new()),
            Arc::new(InMemoryCredentialStore::demo()),
        )
    }

    /// Build stores selected by `config` and validate the credential store.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let database = if config.requires_database() {
            Some(DatabaseManager::connect(&config.database).await?)
        } else {
            None
        };

        let repository: Arc<dyn EmployeeRepository> = match (config.storage.employee_store, &database) {
            (EmployeeStoreKind::Postgres, Some(db)) => {
                Arc::new(PgEmployeeRepository::new(db.pool().clone()))
            }
            _ => Arc::new(MemoryEmployeeRepository::new()),
        };

        let credentials: Arc<dyn CredentialStore> =
            match (config.security.credential_store, &database) {
                (CredentialStoreKind::Sql, Some(db)) => {
                    Arc::new(SqlCredentialStore::new(db.pool().clone(), &config.security))
                }
                _ => {
                    tracing::warn!("Using built-in demo users with plain-text passwords");
                    Arc::new(InMemoryCredentialStore::demo())
                }
            };

        ensure_role_convention(credentials.as_ref()).await?;

        info!(
            "Employee store: {:?}, credential store: {}",
            config.storage.employee_store,
            credentials.name()
        );

        let policy = AccessPolicy::employee_directory();
        for rule in policy.rules() {
            tracing::debug!("{} {} requires {}", rule.method, rule.pattern.as_str(), rule.role);
        }

        Ok(Self {
            employees: EmployeeService::new(repository),
            credentials,
            policy: Arc::new(policy),
            realm: config.security.realm.clone(),
            database,
        })
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }
}
