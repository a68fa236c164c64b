//! Read-through cache for data fetched from upstream APIs.

use std::{
  fmt::Display,
  future::Future,
  time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;
use fxhash::FxBuildHasher;
use serde::{de::DeserializeOwned, Serialize};

use crate::metrics::kv_cache;

#[derive(Debug)]
pub struct CacheError(String);

impl Display for CacheError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

impl std::error::Error for CacheError {}

#[cfg(feature = "redis_cache")]
impl From<redis::RedisError> for CacheError {
  fn from(err: redis::RedisError) -> Self { CacheError(err.to_string()) }
}

/// String key-value store with per-entry expiry.
#[async_trait]
pub trait KvCache: Send + Sync {
  async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

  async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

struct MemoryEntry {
  value: String,
  expires_at: Instant,
}

/// Process-local cache used when no Redis instance is configured.  Expired entries are evicted when
/// they are next read and swept out on every write.
#[derive(Default)]
pub struct MemoryCache {
  entries: DashMap<String, MemoryEntry, FxBuildHasher>,
}

impl MemoryCache {
  pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl KvCache for MemoryCache {
  async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
    let now = Instant::now();
    let expired = match self.entries.get(key) {
      Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
      Some(_) => true,
      None => false,
    };
    if expired {
      self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
    }
    Ok(None)
  }

  async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
    let now = Instant::now();
    self.entries.retain(|_, entry| entry.expires_at > now);
    self.entries.insert(key.to_owned(), MemoryEntry {
      value,
      expires_at: now + ttl,
    });
    Ok(())
  }
}

#[cfg(feature = "redis_cache")]
pub struct RedisCache {
  conn: redis::aio::ConnectionManager,
}

#[cfg(feature = "redis_cache")]
impl RedisCache {
  pub async fn connect(url: &str) -> Result<Self, CacheError> {
    let client = redis::Client::open(url)?;
    let conn = client.get_connection_manager().await?;
    Ok(RedisCache { conn })
  }
}

#[cfg(feature = "redis_cache")]
#[async_trait]
impl KvCache for RedisCache {
  async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
    use redis::AsyncCommands;

    let mut conn = self.conn.clone();
    let value: Option<String> = conn.get(key).await?;
    Ok(value)
  }

  async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
    use redis::AsyncCommands;

    let mut conn = self.conn.clone();
    conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
    Ok(())
  }
}

/// Looks up `{namespace}:{id}` and falls back to `fetch` on a miss, caching whatever it returns for
/// `ttl`.
///
/// `fetch` returning `Ok(None)` means the upstream doesn't know the key; that is passed through and
/// not cached.  Cache failures are logged and handled as misses so that a broken cache degrades to
/// calling the upstream directly.
pub async fn get_or_populate<T, E, F, Fut>(
  cache: &dyn KvCache,
  namespace: &'static str,
  id: impl Display,
  ttl: Duration,
  fetch: F,
) -> Result<Option<T>, E>
where
  T: Serialize + DeserializeOwned,
  F: FnOnce() -> Fut,
  Fut: Future<Output = Result<Option<T>, E>>,
{
  let key = format!("{namespace}:{id}");

  match cache.get(&key).await {
    Ok(Some(cached)) => match serde_json::from_str(&cached) {
      Ok(value) => {
        kv_cache::hits_total(namespace).inc();
        return Ok(Some(value));
      },
      Err(err) => {
        warn!("Discarding unparseable cache entry for {key}: {err}");
        kv_cache::errors_total(namespace, "parse").inc();
      },
    },
    Ok(None) => (),
    Err(err) => {
      warn!("Failed to read {key} from cache: {err}");
      kv_cache::errors_total(namespace, "get").inc();
    },
  }
  kv_cache::misses_total(namespace).inc();

  let Some(fresh) = fetch().await? else {
    return Ok(None);
  };

  match serde_json::to_string(&fresh) {
    Ok(serialized) => {
      if let Err(err) = cache.set_ex(&key, serialized, ttl).await {
        warn!("Failed to write {key} to cache: {err}");
        kv_cache::errors_total(namespace, "set").inc();
      }
    },
    Err(err) => error!("Failed to serialize {key} for caching: {err}"),
  }

  Ok(Some(fresh))
}
