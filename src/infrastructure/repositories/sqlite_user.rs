use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::{
    Login, NewUser, PasswordHash, Role, User, UserAttributes, UserId, UserRepository, UserUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

const COLUMNS: &str = "id, login, name, description, password, status, role, attributes, \
     lasttrydate, createdate, createuser, updatedate, updateuser";

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    login: String,
    name: String,
    description: String,
    password: String,
    status: bool,
    role: String,
    attributes: String,
    lasttrydate: Option<DateTime<Utc>>,
    createdate: DateTime<Utc>,
    createuser: String,
    updatedate: DateTime<Utc>,
    updateuser: String,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let attributes: UserAttributes = serde_json::from_str(&row.attributes).map_err(|err| {
            DomainError::Persistence(format!("user {} has unreadable attributes: {err}", row.id))
        })?;
        Ok(User {
            id: UserId::new(row.id)?,
            login: Login::new(row.login)?,
            name: row.name,
            description: row.description,
            password_hash: PasswordHash::new(row.password)?,
            role: row.role.parse::<Role>()?,
            is_active: row.status,
            attributes,
            last_try_at: row.lasttrydate,
            created_at: row.createdate,
            created_by: row.createuser,
            updated_at: row.updatedate,
            updated_by: row.updateuser,
        })
    }
}

fn encode_attributes(attributes: &UserAttributes) -> DomainResult<String> {
    serde_json::to_string(attributes)
        .map_err(|err| DomainError::Validation(format!("invalid user attributes: {err}")))
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn count(&self) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM sly_user")
            .fetch_one(&self.pool)
            .await
            .map(|count| count as u64)
            .map_err(map_sqlx)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let NewUser {
            login,
            name,
            description,
            password_hash,
            role,
            is_active,
            attributes,
            stamp,
        } = new_user;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO sly_user (login, name, description, password, status, role, attributes,
                                   createdate, createuser, updatedate, updateuser)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        ))
        .bind(login.as_str())
        .bind(&name)
        .bind(&description)
        .bind(password_hash.as_str())
        .bind(is_active)
        .bind(role.as_str())
        .bind(encode_attributes(&attributes)?)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(stamp.at)
        .bind(&stamp.by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        User::try_from(row)
    }

    async fn find_by_login(&self, login: &Login) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM sly_user WHERE login = ?"
        ))
        .bind(login.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM sly_user WHERE id = ?"
        ))
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, update: UserUpdate) -> DomainResult<User> {
        let attributes = update.attributes.as_ref().map(encode_attributes).transpose()?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE sly_user SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                status = COALESCE(?, status),
                role = COALESCE(?, role),
                password = COALESCE(?, password),
                attributes = COALESCE(?, attributes),
                lasttrydate = COALESCE(?, lasttrydate),
                updatedate = ?,
                updateuser = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        ))
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.is_active)
        .bind(update.role.map(|role| role.as_str()))
        .bind(update.password_hash.as_ref().map(PasswordHash::as_str))
        .bind(attributes)
        .bind(update.last_try_at)
        .bind(update.stamp.at)
        .bind(&update.stamp.by)
        .bind(i64::from(update.id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| DomainError::NotFound(format!("user {} not found", update.id)))
    }

    async fn delete(&self, id: UserId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM sly_user WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("user {id} not found")));
        }
        Ok(())
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM sly_user ORDER BY login"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(User::try_from).collect()
    }
}
