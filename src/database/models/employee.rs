use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identifier value meaning "not yet persisted".
pub const UNSAVED_ID: i32 = 0;

/// Row of the `employee` table and the JSON body of every employee endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Employee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == UNSAVED_ID
    }
}
