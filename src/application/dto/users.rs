use crate::domain::user::{Role, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// User without credentials.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub description: String,
    pub role: Role,
    pub is_active: bool,
    pub permissions: Vec<String>,
    pub last_try_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            login: user.login.as_str().to_string(),
            name: user.name,
            description: user.description,
            role: user.role,
            is_active: user.is_active,
            permissions: user.attributes.permissions,
            last_try_at: user.last_try_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
