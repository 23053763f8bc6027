use super::{map_sqlx, sqlite_slice::copy_slices};
use crate::domain::article::ArticleId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::language::{ClangId, Language, LanguageRepository, NewLanguage};
use crate::domain::slice::RevisionKey;
use crate::domain::stamp::AuditStamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct SqliteLanguageRepository {
    pool: SqlitePool,
}

impl SqliteLanguageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LanguageRow {
    id: i64,
    name: String,
    locale: String,
}

impl TryFrom<LanguageRow> for Language {
    type Error = DomainError;

    fn try_from(row: LanguageRow) -> Result<Self, Self::Error> {
        Ok(Language {
            id: ClangId::new(row.id)?,
            name: row.name,
            locale: row.locale,
        })
    }
}

/// Mirrors every article row of `source` into `target`, offline, and gives
/// every copied revision its own slices. Soft-deleted rows are mirrored with
/// their flag so a later restore brings them back in all languages. Copied
/// slices keep the stamp of the revision they were taken from.
async fn mirror_articles(
    conn: &mut SqliteConnection,
    source: ClangId,
    target: ClangId,
) -> DomainResult<u64> {
    let copied = sqlx::query(
        "INSERT INTO sly_article (id, clang, revision, re_id, name, catname, catpos, pos, path,
                                  startpage, type, online, latest, deleted,
                                  createdate, createuser, updatedate, updateuser)
         SELECT id, ?, revision, re_id, name, catname, catpos, pos, path,
                startpage, type, 0, latest, deleted,
                createdate, createuser, updatedate, updateuser
         FROM sly_article WHERE clang = ?",
    )
    .bind(target.0)
    .bind(source.0)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx)?
    .rows_affected();

    let revisions: Vec<(i64, i64, DateTime<Utc>, String)> = sqlx::query_as(
        "SELECT id, revision, updatedate, updateuser FROM sly_article
         WHERE clang = ? ORDER BY id, revision",
    )
    .bind(source.0)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx)?;

    for (id, revision, at, by) in revisions {
        let article = ArticleId::new(id)?;
        copy_slices(
            conn,
            RevisionKey::new(article, source, revision),
            RevisionKey::new(article, target, revision),
            &AuditStamp::new(at, by),
        )
        .await
        .map_err(map_sqlx)?;
    }
    Ok(copied)
}

#[async_trait]
impl LanguageRepository for SqliteLanguageRepository {
    async fn list(&self) -> DomainResult<Vec<Language>> {
        let rows = sqlx::query_as::<_, LanguageRow>("SELECT id, name, locale FROM sly_clang ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.into_iter().map(Language::try_from).collect()
    }

    async fn find_by_id(&self, id: ClangId) -> DomainResult<Option<Language>> {
        let row = sqlx::query_as::<_, LanguageRow>("SELECT id, name, locale FROM sly_clang WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.map(Language::try_from).transpose()
    }

    async fn insert(
        &self,
        language: NewLanguage,
        copy_from: Option<ClangId>,
    ) -> DomainResult<Language> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let id = sqlx::query("INSERT INTO sly_clang (name, locale) VALUES (?, ?)")
            .bind(&language.name)
            .bind(&language.locale)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?
            .last_insert_rowid();
        let id = ClangId::new(id)?;

        if let Some(source) = copy_from {
            let rows = mirror_articles(&mut tx, source, id).await?;
            tracing::debug!(clang = %id, source = %source, rows, "article rows mirrored");
        }

        tx.commit().await.map_err(map_sqlx)?;
        Ok(Language {
            id,
            name: language.name,
            locale: language.locale,
        })
    }

    async fn update(&self, language: &Language) -> DomainResult<Language> {
        let result = sqlx::query("UPDATE sly_clang SET name = ?, locale = ? WHERE id = ?")
            .bind(&language.name)
            .bind(&language.locale)
            .bind(language.id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("language {} not found", language.id)));
        }
        Ok(language.clone())
    }

    async fn delete(&self, id: ClangId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        // placements cascade from their slice rows
        sqlx::query(
            "DELETE FROM sly_slice WHERE id IN (SELECT slice_id FROM sly_article_slice WHERE clang = ?)",
        )
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        sqlx::query("DELETE FROM sly_article WHERE clang = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        let result = sqlx::query("DELETE FROM sly_clang WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("language {id} not found")));
        }

        tx.commit().await.map_err(map_sqlx)
    }
}
