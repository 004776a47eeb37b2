//! Storage abstractions for schedule persistence.
//!
//! Two durable artifacts back the provider:
//! - `meta.toml` — schedule metadata (source, URL, fingerprint, timestamps)
//! - `sc.json` — the schedule content itself
//!
//! Both are loaded once at startup and rewritten after every successful
//! update and at shutdown.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Schedule, ScheduleStatus};

// Re-export for convenience
pub use local::LocalStore;

/// Trait for durable schedule snapshot backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load persisted metadata and schedule content.
    ///
    /// Fails when either artifact is absent or malformed; the provider
    /// assumes pre-seeded state exists (see the CLI `init` command).
    async fn load(&self) -> Result<(ScheduleStatus, Schedule)>;

    /// Persist metadata, then schedule content.
    async fn save(&self, meta: &ScheduleStatus, schedule: &Schedule) -> Result<()>;
}
