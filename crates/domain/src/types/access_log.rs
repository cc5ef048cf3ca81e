//! Access log records (read-only, never cached)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::object_id::ObjectId;

/// One logged request for a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub url: String,
    /// Explicit request time when one was logged, otherwise the id's
    /// creation time
    pub time: DateTime<Utc>,
}

impl AccessLogRecord {
    pub fn new(id: ObjectId, url: impl Into<String>, logged_at: Option<DateTime<Utc>>) -> Self {
        Self { id, url: url.into(), time: logged_at.unwrap_or_else(|| id.timestamp()) }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn time_falls_back_to_id_timestamp() {
        let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let record = AccessLogRecord::new(ObjectId::with_timestamp(created), "/matches", None);
        assert_eq!(record.time, created);
    }

    #[test]
    fn explicit_time_wins() {
        let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let logged = Utc.timestamp_opt(1_700_000_123, 456_000_000).unwrap();
        let record =
            AccessLogRecord::new(ObjectId::with_timestamp(created), "/matches", Some(logged));
        assert_eq!(record.time, logged);
    }
}
