//! SQLite-backed key-value store over the `kv_store` table.

use super::{check_quota, KeyValueStore, StorageResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Persistent slot store borrowing a migrated connection.
///
/// Use `open_db`/`open_db_in_memory` to obtain the connection so the
/// `kv_store` table exists.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
    quota_bytes: Option<usize>,
}

impl<'conn> SqliteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            quota_bytes: None,
        }
    }

    pub fn with_quota(conn: &'conn Connection, quota_bytes: Option<usize>) -> Self {
        Self { conn, quota_bytes }
    }

    /// Total bytes of all keys and values, excluding `except_key`.
    fn used_bytes_excluding(&self, except_key: &str) -> StorageResult<usize> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv_store
             WHERE key <> ?1;",
            [except_key],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(used).unwrap_or(0))
    }
}

impl KeyValueStore for SqliteStore<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.quota_bytes.is_some() {
            let required = self.used_bytes_excluding(key)? + key.len() + value.len();
            check_quota(key, required, self.quota_bytes)?;
        }

        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=storage_write module=storage status=ok backend=sqlite key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM kv_store;", [])?;
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}
