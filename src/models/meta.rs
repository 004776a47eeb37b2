//! Schedule metadata and provider status structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seed form of the schedule metadata as persisted in `meta.toml`.
///
/// Only `source` and `url` are mandatory; the provider fills the rest in
/// on first load and keeps them up to date afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMeta {
    /// Name of the schedule source (spreadsheet service, file, site).
    pub source: String,

    /// Base URL of the source, export endpoints are resolved against it.
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_check: Option<DateTime<Utc>>,
}

impl ScheduleMeta {
    /// Promote loaded metadata into a full status, defaulting absent
    /// fields to `now` (or the empty fingerprint).
    pub fn into_status(self, now: DateTime<Utc>) -> ScheduleStatus {
        ScheduleStatus {
            source: self.source,
            url: self.url,
            hash: self.hash.unwrap_or_default(),
            check_at: self.check_at.unwrap_or(now),
            update_at: self.update_at.unwrap_or(now),
            next_check: self.next_check.unwrap_or(now),
        }
    }
}

/// Metadata describing where the held schedule came from and how fresh it is.
///
/// Invariant: `hash` always reflects the content of the last successfully
/// parsed schedule; `next_check` is advanced after every non-throttled
/// check attempt, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleStatus {
    pub source: String,
    pub url: String,

    /// Content fingerprint used by the cheap change check.
    pub hash: String,

    /// Last time a check was attempted.
    pub check_at: DateTime<Utc>,

    /// Last time the schedule was successfully replaced.
    pub update_at: DateTime<Utc>,

    /// Earliest time the next check is allowed to do real work.
    pub next_check: DateTime<Utc>,
}

/// Static identity of this provider instance.
///
/// Lets clients tell several providers apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub version: String,
    pub url: String,
}

/// Full status payload: provider identity plus schedule metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub provider: ProviderStatus,
    pub schedule: ScheduleStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_status_defaults() {
        let now = Utc::now();
        let meta = ScheduleMeta {
            source: "sheets".to_string(),
            url: "https://example.com/doc/".to_string(),
            hash: None,
            check_at: None,
            update_at: None,
            next_check: None,
        };

        let status = meta.into_status(now);
        assert_eq!(status.hash, "");
        assert_eq!(status.check_at, now);
        assert_eq!(status.next_check, now);
    }

    #[test]
    fn test_into_status_keeps_existing_fields() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::hours(2);
        let meta = ScheduleMeta {
            source: "sheets".to_string(),
            url: "https://example.com/doc/".to_string(),
            hash: Some("abc123".to_string()),
            check_at: Some(earlier),
            update_at: Some(earlier),
            next_check: Some(earlier),
        };

        let status = meta.into_status(now);
        assert_eq!(status.hash, "abc123");
        assert_eq!(status.update_at, earlier);
    }
}
