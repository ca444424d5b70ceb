//! SQLite-backed cache of raw forecast response bodies.
//!
//! Entries are keyed by endpoint plus the canonical query string and expire
//! purely by age. Deleting the file at any time is safe.

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

pub struct ResponseCache {
    conn: Mutex<Connection>,
    ttl: Duration,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache").field("ttl", &self.ttl).finish()
    }
}

impl ResponseCache {
    /// Open (or create) a cache file.
    pub fn open<P: AsRef<Path>>(path: P, ttl: Duration) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let cache = Self {
            conn: Mutex::new(conn),
            ttl,
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache that lives as long as this value.
    pub fn in_memory(ttl: Duration) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self {
            conn: Mutex::new(conn),
            ttl,
        };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                stored_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_responses_stored_at ON responses(stored_at);
            "#,
        )?;
        Ok(())
    }

    /// Maximum age of a servable entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Build the lookup key: endpoint plus parameters sorted by name.
    pub fn cache_key(endpoint: &str, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort();
        let query = sorted
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", endpoint, query)
    }

    /// Fresh body for `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_at(key, Utc::now())
    }

    /// Like [`get`](Self::get) with an explicit clock.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let row: Option<(String, i64)> = self
            .conn
            .lock()
            .query_row(
                "SELECT body, stored_at FROM responses WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.and_then(|(body, stored_at)| {
            self.is_fresh(stored_at, now).then_some(body)
        }))
    }

    /// Store `body`, replacing any earlier entry for `key`.
    pub fn put(&self, key: &str, body: &str) -> Result<()> {
        self.put_at(key, body, Utc::now())
    }

    /// Like [`put`](Self::put) with an explicit clock.
    pub fn put_at(&self, key: &str, body: &str, now: DateTime<Utc>) -> Result<()> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO responses (key, body, stored_at) VALUES (?1, ?2, ?3)",
            params![key, body, now.timestamp_millis()],
        )?;
        Ok(())
    }

    /// Delete expired rows, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        self.purge_expired_at(Utc::now())
    }

    /// Like [`purge_expired`](Self::purge_expired) with an explicit clock.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now.timestamp_millis() - self.ttl_millis();
        let removed = self.conn.lock().execute(
            "DELETE FROM responses WHERE stored_at <= ?1",
            params![cutoff],
        )?;
        if removed > 0 {
            tracing::debug!("Purged {} expired cache entries", removed);
        }
        Ok(removed)
    }

    /// Remove every entry, fresh or not.
    pub fn clear(&self) -> Result<()> {
        self.conn.lock().execute_batch("DELETE FROM responses;")?;
        Ok(())
    }

    /// Number of stored rows, fresh or not.
    pub fn len(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .lock()
                .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True when no rows are stored
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    fn is_fresh(&self, stored_at: i64, now: DateTime<Utc>) -> bool {
        now.timestamp_millis().saturating_sub(stored_at) < self.ttl_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour() -> Duration {
        Duration::from_secs(3600)
    }

    #[test]
    fn test_put_and_get() {
        let cache = ResponseCache::in_memory(hour()).unwrap();
        cache.put("k", "{\"a\":1}").unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_missing_key() {
        let cache = ResponseCache::in_memory(hour()).unwrap();
        assert!(cache.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::in_memory(hour()).unwrap();
        let stored = Utc::now();
        cache.put_at("k", "body", stored).unwrap();

        let almost = stored + chrono::Duration::minutes(59);
        assert!(cache.get_at("k", almost).unwrap().is_some());

        let later = stored + chrono::Duration::minutes(60);
        assert!(cache.get_at("k", later).unwrap().is_none());
    }

    #[test]
    fn test_zero_ttl_never_serves() {
        let cache = ResponseCache::in_memory(Duration::ZERO).unwrap();
        cache.put("k", "body").unwrap();
        assert!(cache.get("k").unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_existing() {
        let cache = ResponseCache::in_memory(hour()).unwrap();
        cache.put("k", "old").unwrap();
        cache.put("k", "new").unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("new"));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_purge_expired() {
        let cache = ResponseCache::in_memory(hour()).unwrap();
        let now = Utc::now();
        cache.put_at("old", "a", now - chrono::Duration::hours(2)).unwrap();
        cache.put_at("fresh", "b", now).unwrap();

        assert_eq!(cache.purge_expired_at(now).unwrap(), 1);
        assert_eq!(cache.len().unwrap(), 1);
        assert!(cache.get_at("fresh", now).unwrap().is_some());
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::in_memory(hour()).unwrap();
        cache.put("a", "1").unwrap();
        cache.put("b", "2").unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = ResponseCache::cache_key(
            "https://api/v1/forecast",
            &[("latitude", "1".into()), ("timezone", "UTC".into())],
        );
        let b = ResponseCache::cache_key(
            "https://api/v1/forecast",
            &[("timezone", "UTC".into()), ("latitude", "1".into())],
        );
        assert_eq!(a, b);
        assert_eq!(a, "https://api/v1/forecast?latitude=1&timezone=UTC");
    }

    #[test]
    fn test_cache_key_differs_by_timezone() {
        let ny = ResponseCache::cache_key("e", &[("timezone", "America/New_York".into())]);
        let utc = ResponseCache::cache_key("e", &[("timezone", "UTC".into())]);
        assert_ne!(ny, utc);
    }

    #[test]
    fn test_file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.sqlite");

        {
            let cache = ResponseCache::open(&path, hour()).unwrap();
            cache.put("k", "persisted").unwrap();
        }

        let cache = ResponseCache::open(&path, hour()).unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("persisted"));
    }
}
