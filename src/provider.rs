// src/provider.rs

//! Schedule provider: owner of the current snapshot.
//!
//! Holds the schedule metadata and content loaded from the store, drives
//! update cycles against the remote export, and serves filtered read
//! views. The snapshot lives behind a `RwLock` held only around reads and
//! swaps, never across I/O, so readers observe either the previous or the
//! fully updated schedule and nothing in between.

use std::sync::{Arc, OnceLock};

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::fetch::Fetcher;
use crate::fingerprint;
use crate::models::{
    Config, ProviderStatus, Schedule, ScheduleFilter, ScheduleStatus, Status, TimeTable,
    default_timetable,
};
use crate::parser;
use crate::storage::SnapshotStore;

/// Outcome of one update cycle, logged by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// `next_check` was not due yet; only the check timestamp moved.
    Throttled,
    /// Probe fingerprint matched the held one, full fetch skipped.
    Unchanged,
    /// Schedule replaced and persisted.
    Updated,
}

struct ProviderState {
    meta: ScheduleStatus,
    schedule: Arc<Schedule>,
}

/// Schedule provider.
pub struct Provider {
    config: Config,
    store: Box<dyn SnapshotStore>,
    fetcher: OnceLock<Fetcher>,
    state: RwLock<Option<ProviderState>>,
}

impl Provider {
    /// Create an unconnected provider over the given store.
    pub fn new(config: Config, store: Box<dyn SnapshotStore>) -> Self {
        Self {
            config,
            store,
            fetcher: OnceLock::new(),
            state: RwLock::new(None),
        }
    }

    /// Load persisted state and prepare the export fetcher.
    ///
    /// Must succeed before any read or update operation; missing seed
    /// state is fatal here.
    pub async fn connect(&self) -> Result<()> {
        log::debug!("Connect provider");
        let (meta, schedule) = self.store.load().await?;
        let fetcher = Fetcher::new(&self.config.http, &meta.url)?;
        self.fetcher
            .set(fetcher)
            .map_err(|_| AppError::config("provider already connected"))?;

        *self.state.write().await = Some(ProviderState {
            meta,
            schedule: Arc::new(schedule),
        });
        Ok(())
    }

    /// Flush state to the store on shutdown.
    pub async fn close(&self) -> Result<()> {
        log::debug!("Close provider");
        self.save().await
    }

    /// Run one update cycle.
    ///
    /// Records the check time; when the stored `next_check` is still in
    /// the future this is a throttled no-op. Otherwise `next_check` is
    /// advanced regardless of outcome, the probe is fingerprinted, and
    /// only on a changed fingerprint is the full export fetched, parsed,
    /// swapped in and persisted. Any error leaves the held schedule
    /// untouched.
    pub async fn update(&self) -> Result<UpdateOutcome> {
        log::debug!("Start schedule update...");
        let now = Utc::now();
        let recheck = Duration::seconds(self.config.checker.recheck_secs as i64);

        let old_hash = {
            let mut guard = self.state.write().await;
            let state = guard
                .as_mut()
                .ok_or(AppError::NotReady("connect provider before update"))?;
            state.meta.check_at = now;
            if now < state.meta.next_check {
                log::debug!("Next check not due yet");
                return Ok(UpdateOutcome::Throttled);
            }
            state.meta.next_check = now + recheck;
            state.meta.hash.clone()
        };

        let fetcher = self.fetcher()?;
        let probe = fetcher.fetch_probe().await?;
        let new_hash = fingerprint::fingerprint(&probe);
        if !fingerprint::has_changed(&old_hash, &new_hash) {
            log::info!("Schedule is up to date");
            return Ok(UpdateOutcome::Unchanged);
        }

        let full = fetcher.fetch_full().await?;
        let schedule = Schedule {
            schedule: parser::parse_lessons(&full)?,
        };
        log::info!("Schedule updated, {} classes", schedule.schedule.len());

        {
            let mut guard = self.state.write().await;
            let state = guard
                .as_mut()
                .ok_or(AppError::NotReady("connect provider before update"))?;
            state.meta.hash = new_hash;
            state.meta.update_at = Utc::now();
            state.schedule = Arc::new(schedule);
        }

        self.save().await?;
        Ok(UpdateOutcome::Updated)
    }

    // Read operations
    // ===============

    /// The full held schedule, or a filtered copy when a filter is given.
    pub async fn schedule(&self, filter: Option<&ScheduleFilter>) -> Result<Arc<Schedule>> {
        let guard = self.state.read().await;
        let state = guard
            .as_ref()
            .ok_or(AppError::NotReady("connect provider before reading"))?;
        match filter {
            None => Ok(Arc::clone(&state.schedule)),
            Some(filter) => Ok(Arc::new(state.schedule.filtered(filter))),
        }
    }

    /// All known class identifiers.
    pub async fn classes(&self) -> Result<Vec<String>> {
        let guard = self.state.read().await;
        let state = guard
            .as_ref()
            .ok_or(AppError::NotReady("connect provider before reading"))?;
        Ok(state.schedule.classes())
    }

    /// The static bell timetable.
    pub fn timetable(&self) -> TimeTable {
        default_timetable()
    }

    /// Provider identity plus the current schedule metadata.
    pub async fn status(&self) -> Result<Status> {
        let guard = self.state.read().await;
        let state = guard
            .as_ref()
            .ok_or(AppError::NotReady("connect provider before reading"))?;
        Ok(Status {
            provider: ProviderStatus {
                name: self.config.provider.name.clone(),
                version: self.config.provider.version.clone(),
                url: self.config.provider.url.clone(),
            },
            schedule: state.meta.clone(),
        })
    }

    // Internals
    // =========

    fn fetcher(&self) -> Result<&Fetcher> {
        self.fetcher
            .get()
            .ok_or(AppError::NotReady("connect provider before fetching"))
    }

    async fn save(&self) -> Result<()> {
        let (meta, schedule) = {
            let guard = self.state.read().await;
            let state = guard
                .as_ref()
                .ok_or(AppError::NotReady("nothing to save before connect"))?;
            (state.meta.clone(), Arc::clone(&state.schedule))
        };
        self.store.save(&meta, &schedule).await
    }
}
