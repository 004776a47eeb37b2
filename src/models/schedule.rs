//! Normalized schedule structures and read-side filtering.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Number of weekdays covered by one class schedule (Monday..Saturday).
pub const WEEK_DAYS: usize = 6;

/// One scheduled (or cancelled) period for one class on one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lesson {
    /// Subject name. `None` means the slot is cancelled or a free period.
    pub name: Option<String>,

    /// Cabinets the lesson takes place in.
    ///
    /// More than one cabinet means the class splits into parallel groups
    /// for this slot.
    pub cabinets: Vec<String>,
}

/// Lessons of one class for one weekday, trailing cancelled slots trimmed.
pub type DayLessons = Vec<Lesson>;

/// Per-weekday lesson lists for one class, indexed 0..=5.
pub type ClassLessons = Vec<DayLessons>;

/// Full lesson schedule: class identifier (lowercased) to its week.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub schedule: HashMap<String, ClassLessons>,
}

impl Schedule {
    /// All known class identifiers, sorted for a deterministic read API.
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.schedule.keys().cloned().collect();
        classes.sort();
        classes
    }

    /// Return a new schedule restricted by the given filter.
    ///
    /// An absent or empty class set keeps every class; an absent or empty
    /// day set keeps every weekday. The receiver is never mutated.
    pub fn filtered(&self, filter: &ScheduleFilter) -> Schedule {
        let classes: Option<HashSet<&str>> = filter
            .cl
            .as_deref()
            .filter(|cl| !cl.is_empty())
            .map(|cl| cl.iter().map(String::as_str).collect());
        let days: Option<HashSet<usize>> = filter
            .days
            .as_deref()
            .filter(|days| !days.is_empty())
            .map(|days| days.iter().copied().collect());

        let schedule = self
            .schedule
            .iter()
            .filter(|(class, _)| match &classes {
                Some(set) => set.contains(class.as_str()),
                None => true,
            })
            .map(|(class, lessons)| {
                let week: ClassLessons = match &days {
                    Some(set) => lessons
                        .iter()
                        .enumerate()
                        .filter(|(day, _)| set.contains(day))
                        .map(|(_, day_lessons)| day_lessons.clone())
                        .collect(),
                    None => lessons.clone(),
                };
                (class.clone(), week)
            })
            .collect();

        Schedule { schedule }
    }
}

/// Optional restrictions applied when reading the schedule.
///
/// Both axes are independent; omitting one means "no restriction".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleFilter {
    /// Weekday indices to keep (0 = Monday .. 5 = Saturday).
    #[serde(default)]
    pub days: Option<Vec<usize>>,

    /// Class identifiers to keep.
    #[serde(default)]
    pub cl: Option<Vec<String>>,
}
