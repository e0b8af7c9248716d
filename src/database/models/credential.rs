use sqlx::{postgres::PgRow, FromRow, Row};

/// Result of the users-by-username query.
///
/// Columns are read by position so operators can point the configured query
/// at tables with other column names, as long as the order is
/// `(username, password, enabled)`.
#[derive(Debug, Clone)]
pub struct CredentialRow {
    pub username: String,
    pub password: String,
    pub enabled: bool,
}

/// Result of the authorities-by-username query, ordered `(username, authority)`.
#[derive(Debug, Clone)]
pub struct AuthorityRow {
    pub username: String,
    pub authority: String,
}

impl<'r> FromRow<'r, PgRow> for CredentialRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            username: row.try_get(0)?,
            password: row.try_get(1)?,
            enabled: row.try_get(2)?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AuthorityRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            username: row.try_get(0)?,
            authority: row.try_get(1)?,
        })
    }
}
