use super::map_sqlx;
use crate::domain::article::ArticleId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::language::ClangId;
use crate::domain::slice::{
    ArticleSlice, ArticleSliceId, ArticleSliceRepository, NewArticleSlice, RevisionKey, Slice,
    SliceValues, SlotName,
};
use crate::domain::stamp::AuditStamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

const SELECT_SLICES: &str = "SELECT a.id, a.article_id, a.clang, a.revision, a.slot, a.pos, a.slice_id, \
     s.module, s.serialized_values, a.createdate, a.createuser, a.updatedate, a.updateuser \
     FROM sly_article_slice a JOIN sly_slice s ON s.id = a.slice_id";

#[derive(Clone)]
pub struct SqliteArticleSliceRepository {
    pool: SqlitePool,
}

impl SqliteArticleSliceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ArticleSliceRow {
    id: i64,
    article_id: i64,
    clang: i64,
    revision: i64,
    slot: String,
    pos: i64,
    slice_id: i64,
    module: String,
    serialized_values: String,
    createdate: DateTime<Utc>,
    createuser: String,
    updatedate: DateTime<Utc>,
    updateuser: String,
}

impl TryFrom<ArticleSliceRow> for ArticleSlice {
    type Error = DomainError;

    fn try_from(row: ArticleSliceRow) -> Result<Self, Self::Error> {
        Ok(ArticleSlice {
            id: ArticleSliceId::new(row.id)?,
            key: RevisionKey::new(ArticleId::new(row.article_id)?, ClangId::new(row.clang)?, row.revision),
            slot: SlotName::new(row.slot)?,
            position: row.pos,
            slice: Slice {
                id: row.slice_id,
                module: row.module,
                values: Slice::deserialize_values(&row.serialized_values)?,
            },
            created_at: row.createdate,
            created_by: row.createuser,
            updated_at: row.updatedate,
            updated_by: row.updateuser,
        })
    }
}

async fn fetch_slice(conn: &mut SqliteConnection, id: i64) -> DomainResult<Option<ArticleSlice>> {
    let row = sqlx::query_as::<_, ArticleSliceRow>(&format!("{SELECT_SLICES} WHERE a.id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(map_sqlx)?;
    row.map(ArticleSlice::try_from).transpose()
}

async fn insert_placement(
    conn: &mut SqliteConnection,
    key: RevisionKey,
    slot: &str,
    position: i64,
    module: &str,
    serialized_values: &str,
    stamp: &AuditStamp,
) -> Result<i64, sqlx::Error> {
    let slice_id = sqlx::query("INSERT INTO sly_slice (module, serialized_values) VALUES (?, ?)")
        .bind(module)
        .bind(serialized_values)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    let placement = sqlx::query(
        "INSERT INTO sly_article_slice (article_id, clang, revision, slot, pos, slice_id, createdate, createuser, updatedate, updateuser)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(key.article_id.0)
    .bind(key.clang.0)
    .bind(key.revision)
    .bind(slot)
    .bind(position)
    .bind(slice_id)
    .bind(stamp.at)
    .bind(&stamp.by)
    .bind(stamp.at)
    .bind(&stamp.by)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(placement)
}

/// Duplicates every slice of `from` into `to` with fresh slice rows.
/// Runs on the caller's connection so it joins the caller's transaction.
pub(super) async fn copy_slices(
    conn: &mut SqliteConnection,
    from: RevisionKey,
    to: RevisionKey,
    stamp: &AuditStamp,
) -> Result<u64, sqlx::Error> {
    let rows: Vec<(String, String, String, i64)> = sqlx::query_as(
        "SELECT s.module, s.serialized_values, a.slot, a.pos
         FROM sly_article_slice a JOIN sly_slice s ON s.id = a.slice_id
         WHERE a.article_id = ? AND a.clang = ? AND a.revision = ?
         ORDER BY a.slot, a.pos",
    )
    .bind(from.article_id.0)
    .bind(from.clang.0)
    .bind(from.revision)
    .fetch_all(&mut *conn)
    .await?;

    let mut copied = 0;
    for (module, values, slot, pos) in rows {
        insert_placement(conn, to, &slot, pos, &module, &values, stamp).await?;
        copied += 1;
    }
    Ok(copied)
}

/// Where a new slice lands in a slot holding `count` slices (0-based).
fn slot_position(requested: Option<i64>, count: i64) -> i64 {
    match requested {
        Some(pos) if pos < 0 => 0,
        Some(pos) if pos < count => pos,
        _ => count,
    }
}

#[async_trait]
impl ArticleSliceRepository for SqliteArticleSliceRepository {
    async fn find_by_id(&self, id: ArticleSliceId) -> DomainResult<Option<ArticleSlice>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx)?;
        fetch_slice(&mut conn, id.0).await
    }

    async fn list(
        &self,
        key: RevisionKey,
        slot: Option<&SlotName>,
    ) -> DomainResult<Vec<ArticleSlice>> {
        let rows = sqlx::query_as::<_, ArticleSliceRow>(&format!(
            "{SELECT_SLICES} WHERE a.article_id = ? AND a.clang = ? AND a.revision = ?
             AND (? IS NULL OR a.slot = ?) ORDER BY a.slot, a.pos"
        ))
        .bind(key.article_id.0)
        .bind(key.clang.0)
        .bind(key.revision)
        .bind(slot.map(SlotName::as_str))
        .bind(slot.map(SlotName::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(ArticleSlice::try_from).collect()
    }

    async fn insert(&self, slice: NewArticleSlice) -> DomainResult<ArticleSlice> {
        let NewArticleSlice {
            key,
            slot,
            position,
            module,
            values,
            stamp,
        } = slice;
        let serialized = Slice::serialize_values(&values)?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM sly_article_slice
             WHERE article_id = ? AND clang = ? AND revision = ? AND slot = ?",
        )
        .bind(key.article_id.0)
        .bind(key.clang.0)
        .bind(key.revision)
        .bind(slot.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let position = slot_position(position, count);
        sqlx::query(
            "UPDATE sly_article_slice SET pos = pos + 1
             WHERE article_id = ? AND clang = ? AND revision = ? AND slot = ? AND pos >= ?",
        )
        .bind(key.article_id.0)
        .bind(key.clang.0)
        .bind(key.revision)
        .bind(slot.as_str())
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let id = insert_placement(&mut tx, key, slot.as_str(), position, &module, &serialized, &stamp)
            .await
            .map_err(map_sqlx)?;
        let created = fetch_slice(&mut tx, id).await?;
        tx.commit().await.map_err(map_sqlx)?;

        created.ok_or_else(|| DomainError::Persistence("inserted slice vanished".into()))
    }

    async fn update_values(
        &self,
        id: ArticleSliceId,
        values: SliceValues,
        stamp: &AuditStamp,
    ) -> DomainResult<ArticleSlice> {
        let serialized = Slice::serialize_values(&values)?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let updated = sqlx::query(
            "UPDATE sly_article_slice SET updatedate = ?, updateuser = ? WHERE id = ?",
        )
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        if updated.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("slice {id} not found")));
        }

        sqlx::query(
            "UPDATE sly_slice SET serialized_values = ?
             WHERE id = (SELECT slice_id FROM sly_article_slice WHERE id = ?)",
        )
        .bind(&serialized)
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let slice = fetch_slice(&mut tx, id.0).await?;
        tx.commit().await.map_err(map_sqlx)?;
        slice.ok_or_else(|| DomainError::NotFound(format!("slice {id} not found")))
    }

    async fn delete(&self, id: ArticleSliceId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let existing = fetch_slice(&mut tx, id.0)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("slice {id} not found")))?;

        sqlx::query("DELETE FROM sly_article_slice WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        sqlx::query("DELETE FROM sly_slice WHERE id = ?")
            .bind(existing.slice.id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        sqlx::query(
            "UPDATE sly_article_slice SET pos = pos - 1
             WHERE article_id = ? AND clang = ? AND revision = ? AND slot = ? AND pos > ?",
        )
        .bind(existing.key.article_id.0)
        .bind(existing.key.clang.0)
        .bind(existing.key.revision)
        .bind(existing.slot.as_str())
        .bind(existing.position)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)
    }

    async fn swap(
        &self,
        id: ArticleSliceId,
        neighbour: ArticleSliceId,
        stamp: &AuditStamp,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let first = fetch_slice(&mut tx, id.0)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("slice {id} not found")))?;
        let second = fetch_slice(&mut tx, neighbour.0)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("slice {neighbour} not found")))?;
        if first.key != second.key || first.slot != second.slot {
            return Err(DomainError::Validation(
                "only slices of the same slot can be swapped".into(),
            ));
        }

        for (slice_id, position) in [(first.id, second.position), (second.id, first.position)] {
            sqlx::query(
                "UPDATE sly_article_slice SET pos = ?, updatedate = ?, updateuser = ? WHERE id = ?",
            )
            .bind(position)
            .bind(stamp.at)
            .bind(&stamp.by)
            .bind(slice_id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)
    }

}

#[cfg(test)]
mod tests {
    use super::slot_position;

    #[test]
    fn slot_positions_are_zero_based() {
        assert_eq!(slot_position(None, 0), 0);
        assert_eq!(slot_position(None, 3), 3);
        assert_eq!(slot_position(Some(1), 3), 1);
        assert_eq!(slot_position(Some(7), 3), 3);
        assert_eq!(slot_position(Some(-2), 3), 0);
    }
}
