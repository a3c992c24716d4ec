//! User records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::store::payload::{require_fields, string_field};
use crate::store::{new_id, timestamp_now, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl User {
    /// Records the user service starts with
    pub fn seed() -> Vec<User> {
        vec![
            User {
                id: "1".to_string(),
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                created_at: "2024-01-01T00:00:00".to_string(),
            },
            User {
                id: "2".to_string(),
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
                created_at: "2024-01-02T00:00:00".to_string(),
            },
        ]
    }
}

impl Resource for User {
    const COLLECTION: &'static str = "users";
    const DISPLAY_NAME: &'static str = "User";
    const SERVICE_NAME: &'static str = "user-service";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_payload(payload: Option<&Value>) -> Result<Self> {
        let object = require_fields(payload, &["name", "email"], "Name and email are required")?;
        let missing = || AppError::Validation("Name and email are required".to_string());

        let name = string_field(object, "name")?.ok_or_else(missing)?;
        let email = string_field(object, "email")?.ok_or_else(missing)?;

        Ok(User {
            id: new_id(),
            name,
            email,
            created_at: timestamp_now(),
        })
    }
}
