// src/models/mod.rs

//! Domain models for the schedule provider.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod meta;
mod schedule;
mod timetable;

// Re-export all public types
pub use config::{CheckerConfig, Config, HttpConfig, ProviderConfig};
pub use meta::{ProviderStatus, ScheduleMeta, ScheduleStatus, Status};
pub use schedule::{ClassLessons, DayLessons, Lesson, Schedule, ScheduleFilter, WEEK_DAYS};
pub use timetable::{LessonTime, TimeTable, default_timetable};
