use crate::Database;
use crate::models::CacheRow;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

impl Database {
    // -- Session --

    pub fn session_get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    pub fn session_set(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO session (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (key, value),
            )?;
            Ok(())
        })
    }

    /// Removes several keys in one transaction.
    pub fn session_remove(&self, keys: &[&str]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for key in keys {
                tx.execute("DELETE FROM session WHERE key = ?1", [key])?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    // -- Cache --

    pub fn cache_put(&self, key: &str, payload: &str, cached_at: DateTime<Utc>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cache (key, payload, cached_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, cached_at = excluded.cached_at",
                (key, payload, cached_at.to_rfc3339()),
            )?;
            Ok(())
        })
    }

    pub fn cache_get(&self, key: &str) -> Result<Option<CacheRow>> {
        self.with_conn(|conn| query_cache_row(conn, key))
    }

    /// Timestamp of the most recent cache write, if anything is cached.
    pub fn cache_last_updated(&self) -> Result<Option<DateTime<Utc>>> {
        self.with_conn(|conn| {
            let raw: Option<String> =
                conn.query_row("SELECT MAX(cached_at) FROM cache", [], |row| row.get(0))?;
            raw.map(|value| parse_timestamp(&value)).transpose()
        })
    }

    pub fn cache_clear(&self) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM cache", [])?))
    }
}

fn query_cache_row(conn: &Connection, key: &str) -> Result<Option<CacheRow>> {
    let mut stmt = conn.prepare("SELECT key, payload, cached_at FROM cache WHERE key = ?1")?;

    let row = stmt
        .query_row([key], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .optional()?;

    row.map(|(key, payload, cached_at)| {
        Ok(CacheRow {
            key,
            payload,
            cached_at: parse_timestamp(&cached_at)?,
        })
    })
    .transpose()
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| anyhow!("Corrupt cache timestamp '{}': {}", raw, e))
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn session_values_overwrite_and_remove() {
        let db = Database::open_in_memory().unwrap();
        db.session_set("token", "abc").unwrap();
        db.session_set("token", "def").unwrap();
        db.session_set("user_id", "4").unwrap();
        assert_eq!(db.session_get("token").unwrap().as_deref(), Some("def"));

        db.session_remove(&["token", "user_id"]).unwrap();
        assert!(db.session_get("token").unwrap().is_none());
        assert!(db.session_get("user_id").unwrap().is_none());
    }

    #[test]
    fn cache_roundtrips_payload_and_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        db.cache_put("channels", "[]", at).unwrap();

        let row = db.cache_get("channels").unwrap().unwrap();
        assert_eq!(row.payload, "[]");
        assert_eq!(row.cached_at, at);
        assert!(db.cache_get("messages:1").unwrap().is_none());
    }

    #[test]
    fn last_updated_tracks_newest_write() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.cache_last_updated().unwrap().is_none());

        let first = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        db.cache_put("channels", "[]", first).unwrap();
        db.cache_put("messages:3", "[]", second).unwrap();
        assert_eq!(db.cache_last_updated().unwrap(), Some(second));

        assert_eq!(db.cache_clear().unwrap(), 2);
        assert!(db.cache_get("channels").unwrap().is_none());
    }
}
