use chrono::{DateTime, Utc};

/// Cached snapshot row. `payload` is the JSON the API returned.
#[derive(Debug, Clone)]
pub struct CacheRow {
    pub key: String,
    pub payload: String,
    pub cached_at: DateTime<Utc>,
}
