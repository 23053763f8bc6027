use super::map_sqlx;
use crate::domain::article::ArticlePath;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::media::{
    MediaCategory, MediaCategoryId, MediaCategoryRepository, Medium, MediumId, MediumRepository,
    NewMediaCategory, NewMedium,
};
use crate::domain::stamp::AuditStamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

const CATEGORY_COLUMNS: &str = "id, name, re_id, path, createdate, createuser, updatedate, updateuser";
const MEDIUM_COLUMNS: &str = "id, category_id, filename, originalname, filetype, filesize, title, \
     createdate, createuser, updatedate, updateuser";

#[derive(Clone)]
pub struct SqliteMediaCategoryRepository {
    pool: SqlitePool,
}

impl SqliteMediaCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Clone)]
pub struct SqliteMediumRepository {
    pool: SqlitePool,
}

impl SqliteMediumRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    re_id: i64,
    path: String,
    createdate: DateTime<Utc>,
    createuser: String,
    updatedate: DateTime<Utc>,
    updateuser: String,
}

impl TryFrom<CategoryRow> for MediaCategory {
    type Error = DomainError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(MediaCategory {
            id: MediaCategoryId::new(row.id)?,
            name: row.name,
            parent: MediaCategoryId::from_column(row.re_id)?,
            path: ArticlePath::parse(row.path)?,
            created_at: row.createdate,
            created_by: row.createuser,
            updated_at: row.updatedate,
            updated_by: row.updateuser,
        })
    }
}

#[derive(Debug, FromRow)]
struct MediumRow {
    id: i64,
    category_id: i64,
    filename: String,
    originalname: String,
    filetype: String,
    filesize: i64,
    title: String,
    createdate: DateTime<Utc>,
    createuser: String,
    updatedate: DateTime<Utc>,
    updateuser: String,
}

impl TryFrom<MediumRow> for Medium {
    type Error = DomainError;

    fn try_from(row: MediumRow) -> Result<Self, Self::Error> {
        Ok(Medium {
            id: MediumId::new(row.id)?,
            category: MediaCategoryId::from_column(row.category_id)?,
            filename: row.filename,
            original_name: row.originalname,
            mimetype: row.filetype,
            filesize: row.filesize,
            title: row.title,
            created_at: row.createdate,
            created_by: row.createuser,
            updated_at: row.updatedate,
            updated_by: row.updateuser,
        })
    }
}

#[async_trait]
impl MediaCategoryRepository for SqliteMediaCategoryRepository {
    async fn find_by_id(&self, id: MediaCategoryId) -> DomainResult<Option<MediaCategory>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM sly_file_category WHERE id = ?"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(MediaCategory::try_from).transpose()
    }

    async fn children(&self, parent: Option<MediaCategoryId>) -> DomainResult<Vec<MediaCategory>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM sly_file_category WHERE re_id = ? ORDER BY name, id"
        ))
        .bind(MediaCategoryId::column(parent))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(MediaCategory::try_from).collect()
    }

    async fn insert(&self, category: NewMediaCategory) -> DomainResult<MediaCategory> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO sly_file_category (name, re_id, path, createdate, createuser, updatedate, updateuser)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&category.name)
        .bind(MediaCategoryId::column(category.parent))
        .bind(category.path.as_str())
        .bind(category.stamp.at)
        .bind(&category.stamp.by)
        .bind(category.stamp.at)
        .bind(&category.stamp.by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;
        MediaCategory::try_from(row)
    }

    async fn rename(
        &self,
        id: MediaCategoryId,
        name: &str,
        stamp: &AuditStamp,
    ) -> DomainResult<MediaCategory> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE sly_file_category SET name = ?, updatedate = ?, updateuser = ?
             WHERE id = ?
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(name)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(MediaCategory::try_from)
            .transpose()?
            .ok_or_else(|| DomainError::NotFound(format!("media category {id} not found")))
    }

    async fn delete(&self, id: MediaCategoryId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM sly_file_category WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("media category {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl MediumRepository for SqliteMediumRepository {
    async fn find_by_id(&self, id: MediumId) -> DomainResult<Option<Medium>> {
        let row = sqlx::query_as::<_, MediumRow>(&format!(
            "SELECT {MEDIUM_COLUMNS} FROM sly_file WHERE id = ?"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Medium::try_from).transpose()
    }

    async fn find_by_filename(&self, filename: &str) -> DomainResult<Option<Medium>> {
        let row = sqlx::query_as::<_, MediumRow>(&format!(
            "SELECT {MEDIUM_COLUMNS} FROM sly_file WHERE filename = ?"
        ))
        .bind(filename)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Medium::try_from).transpose()
    }

    async fn list_in_category(&self, category: Option<MediaCategoryId>) -> DomainResult<Vec<Medium>> {
        let rows = sqlx::query_as::<_, MediumRow>(&format!(
            "SELECT {MEDIUM_COLUMNS} FROM sly_file WHERE category_id = ? ORDER BY filename"
        ))
        .bind(MediaCategoryId::column(category))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(Medium::try_from).collect()
    }

    async fn count_in_category(&self, category: MediaCategoryId) -> DomainResult<i64> {
        sqlx::query_scalar("SELECT COUNT(1) FROM sly_file WHERE category_id = ?")
            .bind(category.0)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn insert(&self, medium: NewMedium) -> DomainResult<Medium> {
        let row = sqlx::query_as::<_, MediumRow>(&format!(
            "INSERT INTO sly_file (category_id, filename, originalname, filetype, filesize, title,
                                   createdate, createuser, updatedate, updateuser)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {MEDIUM_COLUMNS}"
        ))
        .bind(MediaCategoryId::column(medium.category))
        .bind(&medium.filename)
        .bind(&medium.original_name)
        .bind(&medium.mimetype)
        .bind(medium.filesize)
        .bind(&medium.title)
        .bind(medium.stamp.at)
        .bind(&medium.stamp.by)
        .bind(medium.stamp.at)
        .bind(&medium.stamp.by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Medium::try_from(row)
    }

    async fn update(
        &self,
        id: MediumId,
        title: &str,
        category: Option<MediaCategoryId>,
        stamp: &AuditStamp,
    ) -> DomainResult<Medium> {
        let row = sqlx::query_as::<_, MediumRow>(&format!(
            "UPDATE sly_file SET title = ?, category_id = ?, updatedate = ?, updateuser = ?
             WHERE id = ?
             RETURNING {MEDIUM_COLUMNS}"
        ))
        .bind(title)
        .bind(MediaCategoryId::column(category))
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Medium::try_from)
            .transpose()?
            .ok_or_else(|| DomainError::NotFound(format!("medium {id} not found")))
    }

    async fn delete(&self, id: MediumId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM sly_file WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("medium {id} not found")));
        }
        Ok(())
    }
}
