use super::{map_sqlx, sqlite_slice::copy_slices};
use crate::domain::article::{
    Article, ArticleContentUpdate, ArticleId, ArticleName, ArticlePath, ArticleReadRepository,
    ArticleType, ArticleWriteRepository, NewArticle, RevisionSelector, SiblingScope, tree,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::language::ClangId;
use crate::domain::slice::RevisionKey;
use crate::domain::stamp::AuditStamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, clang, revision, re_id, name, catname, catpos, pos, path, startpage, \
     type, online, latest, deleted, createdate, createuser, updatedate, updateuser";

/// Article tree over the `sly_article` table. Every structural write runs
/// in one transaction and updates all languages and revisions of the id.
#[derive(Clone)]
pub struct SqliteArticleRepository {
    pool: SqlitePool,
}

impl SqliteArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ArticleRow {
    id: i64,
    clang: i64,
    revision: i64,
    re_id: i64,
    name: String,
    catname: String,
    catpos: i64,
    pos: i64,
    path: String,
    startpage: bool,
    #[sqlx(rename = "type")]
    article_type: String,
    online: bool,
    latest: bool,
    deleted: bool,
    createdate: DateTime<Utc>,
    createuser: String,
    updatedate: DateTime<Utc>,
    updateuser: String,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DomainError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(Article {
            id: ArticleId::new(row.id)?,
            clang: ClangId::new(row.clang)?,
            revision: row.revision,
            parent: ArticleId::from_parent_column(row.re_id)?,
            name: ArticleName::new(row.name)?,
            cat_name: row.catname,
            cat_position: row.catpos,
            position: row.pos,
            path: ArticlePath::parse(row.path)?,
            startpage: row.startpage,
            article_type: ArticleType::new(row.article_type)?,
            online: row.online,
            latest: row.latest,
            deleted: row.deleted,
            created_at: row.createdate,
            created_by: row.createuser,
            updated_at: row.updatedate,
            updated_by: row.updateuser,
        })
    }
}

/// `(startpage flag, re_id value, position column)` of a sibling set.
fn scope_parts(scope: SiblingScope) -> (bool, i64, &'static str) {
    match scope {
        SiblingScope::Categories { parent } => (true, ArticleId::parent_column(parent), "catpos"),
        SiblingScope::Articles { category } => {
            (false, ArticleId::parent_column(category), "pos")
        }
    }
}

fn position_in_scope(article: &Article) -> i64 {
    if article.startpage {
        article.cat_position
    } else {
        article.position
    }
}

fn not_found(id: ArticleId) -> DomainError {
    DomainError::NotFound(format!("article {id} not found"))
}

async fn count_in(conn: &mut SqliteConnection, scope: SiblingScope) -> DomainResult<i64> {
    let (startpage, parent, _) = scope_parts(scope);
    sqlx::query_scalar(
        "SELECT COUNT(DISTINCT id) FROM sly_article
         WHERE startpage = ? AND re_id = ? AND deleted = 0 AND latest = 1",
    )
    .bind(startpage)
    .bind(parent)
    .fetch_one(conn)
    .await
    .map_err(map_sqlx)
}

async fn apply_shift(
    conn: &mut SqliteConnection,
    scope: SiblingScope,
    shift: tree::Shift,
    except: Option<ArticleId>,
) -> DomainResult<()> {
    let (startpage, parent, column) = scope_parts(scope);
    sqlx::query(&format!(
        "UPDATE sly_article SET {column} = {column} + ?
         WHERE startpage = ? AND re_id = ? AND deleted = 0 AND {column} BETWEEN ? AND ? AND id != ?"
    ))
    .bind(shift.delta)
    .bind(startpage)
    .bind(parent)
    .bind(shift.from)
    .bind(shift.to)
    .bind(except.map(|id| id.0).unwrap_or(0))
    .execute(conn)
    .await
    .map_err(map_sqlx)?;
    Ok(())
}

/// Latest row of the lowest language; structural fields are the same in all.
async fn structural_row(
    conn: &mut SqliteConnection,
    id: ArticleId,
    include_deleted: bool,
) -> DomainResult<Option<Article>> {
    let row = sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {COLUMNS} FROM sly_article
         WHERE id = ? AND latest = 1 AND (? OR deleted = 0)
         ORDER BY clang LIMIT 1"
    ))
    .bind(id.0)
    .bind(include_deleted)
    .fetch_optional(conn)
    .await
    .map_err(map_sqlx)?;
    row.map(Article::try_from).transpose()
}

/// Path given to rows placed below `parent`; the parent must be a live category.
async fn path_below(conn: &mut SqliteConnection, parent: Option<ArticleId>) -> DomainResult<ArticlePath> {
    let Some(parent) = parent else {
        return Ok(ArticlePath::root());
    };
    match structural_row(conn, parent, false).await? {
        Some(row) if row.is_category() => Ok(row.child_path()),
        _ => Err(DomainError::NotFound(format!("category {parent} not found"))),
    }
}

async fn touch_stamp(
    conn: &mut SqliteConnection,
    id: ArticleId,
    stamp: &AuditStamp,
) -> DomainResult<()> {
    sqlx::query("UPDATE sly_article SET updatedate = ?, updateuser = ? WHERE id = ?")
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id.0)
        .execute(conn)
        .await
        .map_err(map_sqlx)?;
    Ok(())
}

#[async_trait]
impl ArticleReadRepository for SqliteArticleRepository {
    async fn find(
        &self,
        id: ArticleId,
        clang: ClangId,
        revision: RevisionSelector,
    ) -> DomainResult<Option<Article>> {
        let (filter, exact) = match revision {
            RevisionSelector::Latest => ("latest = 1", None),
            RevisionSelector::Online => ("online = 1", None),
            RevisionSelector::Exact(rev) => ("revision = ?", Some(rev)),
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM sly_article
             WHERE id = ? AND clang = ? AND deleted = 0 AND {filter}
             ORDER BY revision DESC LIMIT 1"
        );
        let mut query = sqlx::query_as::<_, ArticleRow>(&sql).bind(id.0).bind(clang.0);
        if let Some(rev) = exact {
            query = query.bind(rev);
        }
        let row = query.fetch_optional(&self.pool).await.map_err(map_sqlx)?;
        row.map(Article::try_from).transpose()
    }

    async fn find_including_deleted(
        &self,
        id: ArticleId,
        clang: ClangId,
    ) -> DomainResult<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {COLUMNS} FROM sly_article WHERE id = ? AND clang = ? AND latest = 1"
        ))
        .bind(id.0)
        .bind(clang.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Article::try_from).transpose()
    }

    async fn children_categories(
        &self,
        parent: Option<ArticleId>,
        clang: ClangId,
    ) -> DomainResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {COLUMNS} FROM sly_article
             WHERE re_id = ? AND clang = ? AND startpage = 1 AND latest = 1 AND deleted = 0
             ORDER BY catpos, id"
        ))
        .bind(ArticleId::parent_column(parent))
        .bind(clang.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(Article::try_from).collect()
    }

    async fn articles_in_category(
        &self,
        category: Option<ArticleId>,
        clang: ClangId,
    ) -> DomainResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {COLUMNS} FROM sly_article
             WHERE re_id = ? AND clang = ? AND startpage = 0 AND latest = 1 AND deleted = 0
             ORDER BY pos, id"
        ))
        .bind(ArticleId::parent_column(category))
        .bind(clang.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(Article::try_from).collect()
    }

    async fn revisions(&self, id: ArticleId, clang: ClangId) -> DomainResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {COLUMNS} FROM sly_article
             WHERE id = ? AND clang = ? AND deleted = 0 ORDER BY revision DESC"
        ))
        .bind(id.0)
        .bind(clang.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(Article::try_from).collect()
    }

    async fn count_siblings(&self, scope: SiblingScope) -> DomainResult<i64> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx)?;
        count_in(&mut conn, scope).await
    }
}

#[async_trait]
impl ArticleWriteRepository for SqliteArticleRepository {
    async fn insert(&self, article: NewArticle) -> DomainResult<ArticleId> {
        let NewArticle {
            parent,
            name,
            startpage,
            position,
            article_type,
            stamp,
        } = article;
        let scope = if startpage {
            SiblingScope::Categories { parent }
        } else {
            SiblingScope::Articles { category: parent }
        };

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let path = path_below(&mut tx, parent).await?;
        let count = count_in(&mut tx, scope).await?;
        let position = tree::insert_position(position, count);
        if let Some(shift) = tree::insert_shift(position, count) {
            apply_shift(&mut tx, scope, shift, None).await?;
        }

        let languages: Vec<i64> = sqlx::query_scalar("SELECT id FROM sly_clang ORDER BY id")
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        if languages.is_empty() {
            return Err(DomainError::Validation("no languages are configured".into()));
        }

        let id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM sly_article")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        let (cat_name, cat_position, article_position) = if startpage {
            (name.as_str(), position, 0)
        } else {
            ("", 0, position)
        };

        for clang in languages {
            sqlx::query(&format!(
                "INSERT INTO sly_article ({COLUMNS})
                 VALUES (?, ?, 0, ?, ?, ?, ?, ?, ?, ?, ?, 0, 1, 0, ?, ?, ?, ?)"
            ))
            .bind(id)
            .bind(clang)
            .bind(ArticleId::parent_column(parent))
            .bind(name.as_str())
            .bind(cat_name)
            .bind(cat_position)
            .bind(article_position)
            .bind(path.as_str())
            .bind(startpage)
            .bind(article_type.as_str())
            .bind(stamp.at)
            .bind(&stamp.by)
            .bind(stamp.at)
            .bind(&stamp.by)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)?;
        ArticleId::new(id)
    }

    async fn update_content(
        &self,
        id: ArticleId,
        clang: ClangId,
        update: ArticleContentUpdate,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let result = sqlx::query(
            "UPDATE sly_article
             SET name = COALESCE(?, name), catname = COALESCE(?, catname), updatedate = ?, updateuser = ?
             WHERE id = ? AND clang = ? AND deleted = 0",
        )
        .bind(update.name.as_ref().map(ArticleName::as_str))
        .bind(update.cat_name.as_ref().map(ArticleName::as_str))
        .bind(update.stamp.at)
        .bind(&update.stamp.by)
        .bind(id.0)
        .bind(clang.0)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        // the type is structural: same in every language
        if let Some(article_type) = &update.article_type {
            sqlx::query("UPDATE sly_article SET type = ? WHERE id = ?")
                .bind(article_type.as_str())
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)
    }

    async fn reposition(
        &self,
        id: ArticleId,
        position: i64,
        stamp: &AuditStamp,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let row = structural_row(&mut tx, id, false)
            .await?
            .ok_or_else(|| not_found(id))?;
        let scope = SiblingScope::of(&row);
        let (_, _, column) = scope_parts(scope);

        let count = count_in(&mut tx, scope).await?;
        let (target, shift) = tree::move_shift(position_in_scope(&row), position, count);
        if let Some(shift) = shift {
            apply_shift(&mut tx, scope, shift, Some(id)).await?;
        }

        sqlx::query(&format!("UPDATE sly_article SET {column} = ? WHERE id = ?"))
            .bind(target)
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        touch_stamp(&mut tx, id, stamp).await?;

        tx.commit().await.map_err(map_sqlx)
    }

    async fn move_to(
        &self,
        id: ArticleId,
        target: Option<ArticleId>,
        stamp: &AuditStamp,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let row = structural_row(&mut tx, id, false)
            .await?
            .ok_or_else(|| not_found(id))?;
        if row.parent == target {
            return Ok(());
        }

        let old_scope = SiblingScope::of(&row);
        let (_, _, column) = scope_parts(old_scope);
        let new_scope = if row.startpage {
            SiblingScope::Categories { parent: target }
        } else {
            SiblingScope::Articles { category: target }
        };

        let new_path = path_below(&mut tx, target).await?;
        if new_path.contains(id) {
            return Err(DomainError::rule(
                "category.move_into_itself",
                format!("article {id} cannot be moved below itself"),
            ));
        }

        let old_count = count_in(&mut tx, old_scope).await?;
        if let Some(shift) = tree::removal_shift(position_in_scope(&row), old_count) {
            apply_shift(&mut tx, old_scope, shift, Some(id)).await?;
        }
        let new_position = count_in(&mut tx, new_scope).await? + 1;

        sqlx::query(&format!(
            "UPDATE sly_article SET re_id = ?, {column} = ?, path = ? WHERE id = ?"
        ))
        .bind(ArticleId::parent_column(target))
        .bind(new_position)
        .bind(new_path.as_str())
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if row.startpage {
            // rewrite the prefix of every descendant's path
            let old_prefix = row.child_path();
            let new_prefix = new_path.child(id);
            sqlx::query(
                "UPDATE sly_article SET path = ? || substr(path, ?) WHERE path LIKE ? || '%'",
            )
            .bind(new_prefix.as_str())
            .bind(old_prefix.as_str().len() as i64 + 1)
            .bind(old_prefix.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }
        touch_stamp(&mut tx, id, stamp).await?;

        tx.commit().await.map_err(map_sqlx)
    }

    async fn soft_delete(&self, id: ArticleId, stamp: &AuditStamp) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let row = structural_row(&mut tx, id, false)
            .await?
            .ok_or_else(|| not_found(id))?;
        let scope = SiblingScope::of(&row);
        let count = count_in(&mut tx, scope).await?;

        sqlx::query("UPDATE sly_article SET deleted = 1, online = 0 WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        if let Some(shift) = tree::removal_shift(position_in_scope(&row), count) {
            apply_shift(&mut tx, scope, shift, Some(id)).await?;
        }
        touch_stamp(&mut tx, id, stamp).await?;

        tx.commit().await.map_err(map_sqlx)
    }

    async fn restore(&self, id: ArticleId, stamp: &AuditStamp) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let row = structural_row(&mut tx, id, true)
            .await?
            .ok_or_else(|| not_found(id))?;
        if !row.deleted {
            return Err(DomainError::Conflict(format!("article {id} is not deleted")));
        }
        let scope = SiblingScope::of(&row);
        let (_, _, column) = scope_parts(scope);
        let position = count_in(&mut tx, scope).await? + 1;

        sqlx::query(&format!(
            "UPDATE sly_article SET deleted = 0, {column} = ? WHERE id = ?"
        ))
        .bind(position)
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        touch_stamp(&mut tx, id, stamp).await?;

        tx.commit().await.map_err(map_sqlx)
    }

    async fn copy(
        &self,
        id: ArticleId,
        target: Option<ArticleId>,
        stamp: &AuditStamp,
    ) -> DomainResult<ArticleId> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let sources = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {COLUMNS} FROM sly_article
             WHERE id = ? AND latest = 1 AND deleted = 0 ORDER BY clang"
        ))
        .bind(id.0)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        if sources.is_empty() {
            return Err(not_found(id));
        }

        let path = path_below(&mut tx, target).await?;
        let position = count_in(&mut tx, SiblingScope::Articles { category: target }).await? + 1;
        let copy_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM sly_article")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        let copy = ArticleId::new(copy_id)?;

        for source in sources {
            sqlx::query(&format!(
                "INSERT INTO sly_article ({COLUMNS})
                 VALUES (?, ?, 0, ?, ?, '', 0, ?, ?, 0, ?, 0, 1, 0, ?, ?, ?, ?)"
            ))
            .bind(copy_id)
            .bind(source.clang)
            .bind(ArticleId::parent_column(target))
            .bind(&source.name)
            .bind(position)
            .bind(path.as_str())
            .bind(&source.article_type)
            .bind(stamp.at)
            .bind(&stamp.by)
            .bind(stamp.at)
            .bind(&stamp.by)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

            let clang = ClangId::new(source.clang)?;
            copy_slices(
                &mut tx,
                RevisionKey::new(id, clang, source.revision),
                RevisionKey::new(copy, clang, 0),
                stamp,
            )
            .await
            .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)?;
        Ok(copy)
    }

    async fn touch(&self, id: ArticleId, clang: ClangId, stamp: &AuditStamp) -> DomainResult<i64> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let current: Option<i64> = sqlx::query_scalar(
            "SELECT revision FROM sly_article
             WHERE id = ? AND clang = ? AND latest = 1 AND deleted = 0",
        )
        .bind(id.0)
        .bind(clang.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        let current = current.ok_or_else(|| not_found(id))?;

        let next: i64 = sqlx::query_scalar(
            "SELECT MAX(revision) + 1 FROM sly_article WHERE id = ? AND clang = ?",
        )
        .bind(id.0)
        .bind(clang.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query(&format!(
            "INSERT INTO sly_article ({COLUMNS})
             SELECT id, clang, ?, re_id, name, catname, catpos, pos, path, startpage, type,
                    0, 1, deleted, createdate, createuser, ?, ?
             FROM sly_article WHERE id = ? AND clang = ? AND revision = ?"
        ))
        .bind(next)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id.0)
        .bind(clang.0)
        .bind(current)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query(
            "UPDATE sly_article SET latest = 0 WHERE id = ? AND clang = ? AND revision != ?",
        )
        .bind(id.0)
        .bind(clang.0)
        .bind(next)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        copy_slices(
            &mut tx,
            RevisionKey::new(id, clang, current),
            RevisionKey::new(id, clang, next),
            stamp,
        )
        .await
        .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;
        Ok(next)
    }

    async fn set_online(
        &self,
        id: ArticleId,
        clang: ClangId,
        online: bool,
        stamp: &AuditStamp,
    ) -> DomainResult<()> {
        let sql = if online {
            "UPDATE sly_article SET online = latest, updatedate = ?, updateuser = ?
             WHERE id = ? AND clang = ? AND deleted = 0"
        } else {
            "UPDATE sly_article SET online = 0, updatedate = ?, updateuser = ?
             WHERE id = ? AND clang = ? AND deleted = 0"
        };
        let result = sqlx::query(sql)
            .bind(stamp.at)
            .bind(&stamp.by)
            .bind(id.0)
            .bind(clang.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_map_to_their_columns() {
        let parent = Some(ArticleId(4));
        assert_eq!(
            scope_parts(SiblingScope::Categories { parent }),
            (true, 4, "catpos")
        );
        assert_eq!(
            scope_parts(SiblingScope::Articles { category: None }),
            (false, 0, "pos")
        );
    }
}
