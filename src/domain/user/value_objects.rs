// src/domain/user/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(pub i64);

impl UserId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("user id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `context:token` permission, e.g. `pages:edit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub resource: String,
    pub action: String,
}

impl Capability {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && (self.action == action || self.action == "*")
    }
}

impl FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((resource, action)) if !resource.is_empty() && !action.is_empty() => {
                Ok(Self::new(resource, action))
            }
            _ => Err(DomainError::Validation(format!("invalid permission '{s}'"))),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Editor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
        }
    }

    pub fn default_capabilities(&self) -> HashSet<Capability> {
        use Capability as Cap;
        match self {
            Role::Admin => HashSet::from([
                Cap::new("pages", "*"),
                Cap::new("media", "*"),
                Cap::new("users", "*"),
                Cap::new("languages", "*"),
                Cap::new("addons", "*"),
            ]),
            Role::Editor => HashSet::from([
                Cap::new("pages", "add"),
                Cap::new("pages", "edit"),
                Cap::new("pages", "move"),
                Cap::new("pages", "publish"),
                Cap::new("media", "manage"),
            ]),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            other => Err(DomainError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Login(String);

impl Login {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::Validation("login cannot be empty".into()));
        }
        if value.len() < 3 {
            return Err(DomainError::Validation(
                "login must be at least 3 characters long".into(),
            ));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::Validation(
                "login must not contain whitespace".into(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Login> for String {
    fn from(value: Login) -> Self {
        value.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation(
                "password hash cannot be empty".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}

/// Minimum length for clear-text passwords before hashing.
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn ensure_password_policy(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Free-form attribute bag stored as JSON next to the user row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startpage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserAttributes {
    pub fn capabilities(&self) -> HashSet<Capability> {
        self.permissions
            .iter()
            .filter_map(|p| p.parse().ok())
            .collect()
    }

    pub fn grant(&mut self, capability: &Capability) {
        let token = capability.to_string();
        if !self.permissions.contains(&token) {
            self.permissions.push(token);
            self.permissions.sort();
        }
    }

    pub fn revoke(&mut self, capability: &Capability) {
        let token = capability.to_string();
        self.permissions.retain(|p| p != &token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn capability_parses_and_matches_wildcards() {
        let cap: Capability = "pages:*".parse().unwrap();
        assert!(cap.matches("pages", "delete"));
        assert!(!cap.matches("media", "delete"));
        assert!("pages".parse::<Capability>().is_err());
        assert_eq!(Capability::new("media", "manage").to_string(), "media:manage");
    }

    #[test]
    fn login_rules() {
        assert!(Login::new("ab").is_err());
        assert!(Login::new("john doe").is_err());
        assert_eq!(Login::new(" admin ").unwrap().as_str(), "admin");
    }

    #[test]
    fn attributes_keep_unknown_keys() {
        let raw = json!({"backend_locale": "de_de", "permissions": ["pages:delete"], "theme": "dark"});
        let attrs: UserAttributes = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(attrs.backend_locale.as_deref(), Some("de_de"));
        assert_eq!(attrs.extra.get("theme"), Some(&json!("dark")));
        assert!(attrs.capabilities().contains(&Capability::new("pages", "delete")));
        assert_eq!(serde_json::to_value(&attrs).unwrap(), raw);
    }

    #[test]
    fn grant_and_revoke_are_idempotent() {
        let mut attrs = UserAttributes::default();
        let cap = Capability::new("users", "manage");
        attrs.grant(&cap);
        attrs.grant(&cap);
        assert_eq!(attrs.permissions, vec!["users:manage".to_string()]);
        attrs.revoke(&cap);
        assert!(attrs.permissions.is_empty());
    }

    #[test]
    fn password_policy_counts_characters() {
        assert!(ensure_password_policy("short").is_err());
        assert!(ensure_password_policy("long enough").is_ok());
    }
}
