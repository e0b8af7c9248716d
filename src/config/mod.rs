use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub employee_store: EmployeeStoreKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub credential_store: CredentialStoreKind,
    pub realm: String,
    pub users_by_username_query: String,
    pub authorities_by_username_query: String,
    pub role_audit_query: String,
}

/// Backing store for employee records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum EmployeeStoreKind {
    Memory,
    Postgres,
}

/// Source of HTTP Basic credentials. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum CredentialStoreKind {
    Memory,
    Sql,
}

impl FromStr for EmployeeStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("unknown employee store '{}'", other)),
        }
    }
}

impl FromStr for CredentialStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "sql" | "jdbc" => Ok(Self::Sql),
            other => Err(format!("unknown credential store '{}'", other)),
        }
    }
}

pub const DEFAULT_USERS_QUERY: &str =
    "SELECT username, password, enabled FROM users WHERE username = $1";
pub const DEFAULT_AUTHORITIES_QUERY: &str =
    "SELECT username, authority FROM authorities WHERE username = $1";
pub const DEFAULT_ROLE_AUDIT_QUERY: &str = "SELECT username, authority FROM authorities";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Store selection
        if let Ok(v) = env::var("EMPLOYEE_STORE") {
            match v.parse() {
                Ok(kind) => self.storage.employee_store = kind,
                Err(e) => tracing::warn!("Ignoring EMPLOYEE_STORE: {}", e),
            }
        }
        if let Ok(v) = env::var("CREDENTIAL_STORE") {
            match v.parse() {
                Ok(kind) => self.security.credential_store = kind,
                Err(e) => tracing::warn!("Ignoring CREDENTIAL_STORE: {}", e),
            }
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_REALM") {
            self.security.realm = v;
        }
        if let Ok(v) = env::var("SECURITY_USERS_QUERY") {
            self.security.users_by_username_query = v;
        }
        if let Ok(v) = env::var("SECURITY_AUTHORITIES_QUERY") {
            self.security.authorities_by_username_query = v;
        }
        if let Ok(v) = env::var("SECURITY_ROLE_AUDIT_QUERY") {
            self.security.role_audit_query = v;
        }

        self
    }

    /// True when either store needs a PostgreSQL pool.
    pub fn requires_database(&self) -> bool {
        self.storage.employee_store == EmployeeStoreKind::Postgres
            || self.security.credential_store == CredentialStoreKind::Sql
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            storage: StorageConfig {
                employee_store: EmployeeStoreKind::Memory,
            },
            security: SecurityConfig {
                credential_store: CredentialStoreKind::Memory,
                realm: "Realm".to_string(),
                users_by_username_query: DEFAULT_USERS_QUERY.to_string(),
                authorities_by_username_query: DEFAULT_AUTHORITIES_QUERY.to_string(),
                role_audit_query: DEFAULT_ROLE_AUDIT_QUERY.to_string(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            storage: StorageConfig {
                employee_store: EmployeeStoreKind::Postgres,
            },
            security: SecurityConfig {
                credential_store: CredentialStoreKind::Sql,
                realm: "Realm".to_string(),
                users_by_username_query: DEFAULT_USERS_QUERY.to_string(),
                authorities_by_username_query: DEFAULT_AUTHORITIES_QUERY.to_string(),
                role_audit_query: DEFAULT_ROLE_AUDIT_QUERY.to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
