//! Static bell timetable shared by every class.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Start and end of one lesson period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonTime {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Ordered lesson periods of a school day.
pub type TimeTable = Vec<LessonTime>;

/// The fixed reference timetable.
///
/// Reference data only, never derived from the remote export.
pub fn default_timetable() -> TimeTable {
    const SLOTS: [(u32, u32, u32, u32); 8] = [
        (8, 0, 8, 40),
        (8, 50, 9, 30),
        (9, 50, 10, 30),
        (10, 50, 11, 30),
        (11, 40, 12, 20),
        (12, 30, 13, 10),
        (13, 20, 14, 0),
        (14, 10, 14, 50),
    ];

    SLOTS
        .iter()
        .map(|&(sh, sm, eh, em)| LessonTime {
            start: NaiveTime::from_hms_opt(sh, sm, 0).expect("valid literal time"),
            end: NaiveTime::from_hms_opt(eh, em, 0).expect("valid literal time"),
        })
        .collect()
}
