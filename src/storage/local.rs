//! Local filesystem snapshot store.
//!
//! ## Storage layout
//!
//! ```text
//! {data_dir}/
//! ├── meta.toml   # schedule metadata (seedable by hand or via `init`)
//! └── sc.json     # schedule content
//! ```
//!
//! Each file is written atomically (temp file + rename). The pair is not
//! transactional: a crash between the two renames can leave `meta.toml`
//! describing content that `sc.json` does not hold yet. Accepted risk,
//! see DESIGN.md.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Schedule, ScheduleMeta, ScheduleStatus};
use crate::storage::SnapshotStore;

const META_FILE: &str = "meta.toml";
const SCHEDULE_FILE: &str = "sc.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Whether seeded state already exists.
    pub fn is_seeded(&self) -> bool {
        self.path(META_FILE).exists()
    }

    /// Write initial state so the provider can start for the first time.
    pub async fn seed(&self, meta: &ScheduleMeta) -> Result<()> {
        let meta_text = toml::to_string_pretty(meta)?;
        self.write_bytes(META_FILE, meta_text.as_bytes()).await?;
        let schedule_json = serde_json::to_vec_pretty(&Schedule::default())?;
        self.write_bytes(SCHEDULE_FILE, &schedule_json).await
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(name);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let result = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&tmp, &path).await
        }
        .await;

        result.map_err(|e| AppError::persist(path.display().to_string(), e))
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Read a file strictly; an absent file is a load error, not a default.
    async fn read_to_string(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::load(path.display().to_string(), e))
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn load(&self) -> Result<(ScheduleStatus, Schedule)> {
        let meta_text = self.read_to_string(META_FILE).await?;
        let meta: ScheduleMeta = toml::from_str(&meta_text)
            .map_err(|e| AppError::load(self.path(META_FILE).display().to_string(), e))?;
        let status = meta.into_status(Utc::now());

        let schedule_text = self.read_to_string(SCHEDULE_FILE).await?;
        let schedule: Schedule = serde_json::from_str(&schedule_text)
            .map_err(|e| AppError::load(self.path(SCHEDULE_FILE).display().to_string(), e))?;

        Ok((status, schedule))
    }

    async fn save(&self, meta: &ScheduleStatus, schedule: &Schedule) -> Result<()> {
        // Metadata first, then schedule. See module docs for the crash
        // window between the two renames.
        let meta_text = toml::to_string_pretty(meta)?;
        self.write_bytes(META_FILE, meta_text.as_bytes()).await?;

        let schedule_json = serde_json::to_vec_pretty(schedule)?;
        self.write_bytes(SCHEDULE_FILE, &schedule_json).await
    }
}
