// src/domain/user/entity.rs
use crate::domain::stamp::AuditStamp;
use crate::domain::user::value_objects::{
    Capability, Login, PasswordHash, Role, UserAttributes, UserId,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub login: Login,
    pub name: String,
    pub description: String,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub is_active: bool,
    pub attributes: UserAttributes,
    pub last_try_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn capabilities(&self) -> HashSet<Capability> {
        let mut caps = self.role.default_capabilities();
        caps.extend(self.attributes.capabilities());
        caps
    }

    pub fn has_permission(&self, context: &str, token: &str) -> bool {
        self.is_admin()
            || self
                .capabilities()
                .iter()
                .any(|cap| cap.matches(context, token))
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: Login,
    pub name: String,
    pub description: String,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub is_active: bool,
    pub attributes: UserAttributes,
    pub stamp: AuditStamp,
}

impl NewUser {
    pub fn new(login: Login, password_hash: PasswordHash, role: Role, stamp: AuditStamp) -> Self {
        Self {
            name: login.as_str().to_string(),
            login,
            description: String::new(),
            password_hash,
            role,
            is_active: true,
            attributes: UserAttributes::default(),
            stamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: UserId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
    pub password_hash: Option<PasswordHash>,
    pub attributes: Option<UserAttributes>,
    pub last_try_at: Option<DateTime<Utc>>,
    pub stamp: AuditStamp,
}

impl UserUpdate {
    pub fn new(id: UserId, stamp: AuditStamp) -> Self {
        Self {
            id,
            name: None,
            description: None,
            is_active: None,
            role: None,
            password_hash: None,
            attributes: None,
            last_try_at: None,
            stamp,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_password_hash(mut self, password_hash: PasswordHash) -> Self {
        self.password_hash = Some(password_hash);
        self
    }

    pub fn with_attributes(mut self, attributes: UserAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_last_try_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_try_at = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role, permissions: &[&str]) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(1).unwrap(),
            login: Login::new("editor").unwrap(),
            name: "Editor".into(),
            description: String::new(),
            password_hash: PasswordHash::new("hash").unwrap(),
            role,
            is_active: true,
            attributes: UserAttributes {
                permissions: permissions.iter().map(|p| p.to_string()).collect(),
                ..UserAttributes::default()
            },
            last_try_at: None,
            created_at: now,
            created_by: "setup".into(),
            updated_at: now,
            updated_by: "setup".into(),
        }
    }

    #[test]
    fn admins_may_do_anything() {
        assert!(user(Role::Admin, &[]).has_permission("whatever", "thing"));
    }

    #[test]
    fn editors_need_explicit_grants_for_deletes() {
        let plain = user(Role::Editor, &[]);
        assert!(plain.has_permission("pages", "edit"));
        assert!(!plain.has_permission("pages", "delete"));

        let trusted = user(Role::Editor, &["pages:delete"]);
        assert!(trusted.has_permission("pages", "delete"));
    }
}
