// src/infrastructure/cache/redis_cache.rs
use super::{namespace_chain, physical_key};
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::cache::{Cache, validate_key, validate_namespace},
};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;

/// Entries orphaned by a namespace bump expire after this long.
const DEFAULT_TTL_SECS: u64 = 60 * 60 * 24;

#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
    prefix: String,
    ttl_secs: u64,
}

fn infra(err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::infrastructure(err.to_string())
}

impl RedisCache {
    /// Create a cache from a redis URL (e.g. redis://:password@host:6379/0).
    /// Every physical key starts with `prefix`.
    pub fn from_url(url: &str, prefix: impl Into<String>) -> ApplicationResult<Self> {
        let pool = DeadpoolConfig::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(infra)?;
        Ok(Self {
            pool,
            prefix: prefix.into(),
            ttl_secs: DEFAULT_TTL_SECS,
        })
    }

    async fn conn(&self) -> ApplicationResult<Connection> {
        self.pool.get().await.map_err(infra)
    }

    fn version_key(&self, namespace: &str) -> String {
        format!("{}:v:{namespace}", self.prefix)
    }

    fn members_key(&self, namespace: &str) -> String {
        format!("{}:k:{namespace}", self.prefix)
    }

    async fn physical(
        &self,
        conn: &mut Connection,
        namespace: &str,
        key: &str,
    ) -> ApplicationResult<String> {
        let version_keys: Vec<String> = namespace_chain(namespace)
            .into_iter()
            .map(|ns| self.version_key(ns))
            .collect();
        // explicit MGET: a single-key mget degrades to GET and returns a scalar
        let versions: Vec<Option<u64>> = redis::cmd("MGET")
            .arg(&version_keys)
            .query_async(conn)
            .await
            .map_err(infra)?;
        let versions: Vec<u64> = versions.into_iter().map(Option::unwrap_or_default).collect();
        Ok(physical_key(&self.prefix, namespace, &versions, key))
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, namespace: &str, key: &str) -> ApplicationResult<Option<String>> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let mut conn = self.conn().await?;
        let physical = self.physical(&mut conn, namespace, key).await?;
        conn.get(physical).await.map_err(infra)
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let mut conn = self.conn().await?;
        let physical = self.physical(&mut conn, namespace, key).await?;
        conn.set_ex::<_, _, ()>(physical, value, self.ttl_secs)
            .await
            .map_err(infra)?;
        conn.sadd::<_, _, ()>(self.members_key(namespace), key)
            .await
            .map_err(infra)
    }

    async fn delete(&self, namespace: &str, key: &str) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let mut conn = self.conn().await?;
        let physical = self.physical(&mut conn, namespace, key).await?;
        conn.del::<_, ()>(physical).await.map_err(infra)?;
        conn.srem::<_, _, ()>(self.members_key(namespace), key)
            .await
            .map_err(infra)
    }

    async fn exists(&self, namespace: &str, key: &str) -> ApplicationResult<bool> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let mut conn = self.conn().await?;
        let physical = self.physical(&mut conn, namespace, key).await?;
        conn.exists(physical).await.map_err(infra)
    }

    async fn flush(&self, namespace: &str, recursive: bool) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        let mut conn = self.conn().await?;

        let members_key = self.members_key(namespace);
        let members: Vec<String> = conn.smembers(&members_key).await.map_err(infra)?;
        if !members.is_empty() {
            let mut physical = Vec::with_capacity(members.len());
            for key in &members {
                physical.push(self.physical(&mut conn, namespace, key).await?);
            }
            conn.del::<_, ()>(physical).await.map_err(infra)?;
        }
        conn.del::<_, ()>(members_key).await.map_err(infra)?;

        if recursive {
            conn.incr::<_, _, ()>(self.version_key(namespace), 1u64)
                .await
                .map_err(infra)?;
        }
        tracing::debug!(namespace, recursive, direct_keys = members.len(), "redis cache namespace flushed");
        Ok(())
    }
}
