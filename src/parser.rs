// src/parser.rs

//! Tolerant parser for the XLSX schedule export.
//!
//! The sheet layout is irregular: one title row, then a header row naming
//! class columns, then lesson rows grouped by class-group labels. Weekday
//! boundaries are not marked explicitly; a new day starts whenever the
//! lesson number in a row is lower than the previous one.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::error::{AppError, Result};
use crate::models::{ClassLessons, DayLessons, Lesson, WEEK_DAYS};

/// Decoded spreadsheet cell, narrowed at the parser boundary.
///
/// Everything the workbook reader yields outside the three supported
/// shapes collapses into `Other` so the open-ended cell type never leaks
/// past this module.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Other,
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::Int(n) => CellValue::Number(*n as f64),
            Data::Float(n) => CellValue::Number(*n),
            Data::String(s) => CellValue::Text(s.clone()),
            _ => CellValue::Other,
        }
    }
}

/// Parse the full XLSX export into the normalized schedule mapping.
///
/// Fails when the workbook has no readable worksheet or a cabinet cell
/// holds an unsupported type.
pub fn parse_lessons(data: &[u8]) -> Result<HashMap<String, ClassLessons>> {
    log::info!("Start parse lessons...");
    let mut workbook = Xlsx::new(Cursor::new(data))
        .map_err(|e| AppError::parse(format!("unreadable workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::parse("workbook has no readable worksheet"))?
        .map_err(|e| AppError::parse(format!("unreadable worksheet: {e}")))?;

    let rows: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();
    parse_grid(&rows)
}

/// Parse an already decoded cell grid.
///
/// Split out from [`parse_lessons`] so the layout logic is testable
/// without fabricating workbook bytes.
pub fn parse_grid(rows: &[Vec<CellValue>]) -> Result<HashMap<String, ClassLessons>> {
    let mut row_iter = rows.iter();

    // Title row carries no layout information.
    row_iter.next();

    // The header row defines the column layout: every non-empty text cell
    // is a class label whose subject column sits at that index, with the
    // cabinet column immediately to its right.
    let header = match row_iter.next() {
        Some(row) => row,
        None => return Ok(HashMap::new()),
    };
    let cl_header: Vec<(String, usize)> = header
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| match cell {
            CellValue::Text(s) if !s.trim().is_empty() => Some((s.trim().to_lowercase(), i)),
            _ => None,
        })
        .collect();

    let mut lessons: HashMap<String, ClassLessons> = HashMap::new();
    let mut day: i32 = -1;
    let mut last_num = 8.0_f64;

    for row in row_iter {
        // A non-empty text in the first cell marks a class-group boundary.
        // Informational only, parsing state is untouched.
        if let Some(CellValue::Text(group)) = row.first() {
            if !group.is_empty() {
                log::debug!("Process group {group} ...");
            }
        }

        match row.get(1) {
            Some(CellValue::Number(n)) => {
                // Lesson numbering resetting to a lower value is the only
                // signal that a new weekday started.
                if *n < last_num {
                    day += 1;
                }
                last_num = *n;

                if day < 0 || day >= WEEK_DAYS as i32 {
                    log::debug!("Lesson row outside the six-day week, skipping");
                    continue;
                }
                let day_idx = day as usize;

                for (cl, i) in &cl_header {
                    let subject = parse_subject(row.get(*i).unwrap_or(&CellValue::Empty));
                    let cabinets = parse_cabinets(row.get(*i + 1).unwrap_or(&CellValue::Empty))?;
                    lessons
                        .entry(cl.clone())
                        .or_insert_with(|| vec![Vec::new(); WEEK_DAYS])[day_idx]
                        .push(Lesson {
                            name: subject,
                            cabinets,
                        });
                }
            }
            _ => {
                // Rows without a lesson number after the last day act as
                // the end-of-sheet sentinel.
                if day == WEEK_DAYS as i32 - 1 {
                    log::info!("Schedule sheet reading completed");
                    break;
                }
            }
        }
    }

    for class_lessons in lessons.values_mut() {
        for day_lessons in class_lessons.iter_mut() {
            clear_day_lessons(day_lessons);
        }
    }
    Ok(lessons)
}

/// Normalize a subject cell: trimmed and lowercased text, or absent for
/// empty cells and cancellation markers like `---`.
fn parse_subject(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) => {
            let name = s.trim_matches(&[' ', '.', '-'][..]).to_lowercase();
            if name.is_empty() { None } else { Some(name) }
        }
        CellValue::Number(n) => Some(number_to_text(*n)),
        CellValue::Empty | CellValue::Other => None,
    }
}

/// Normalize a cabinet cell into a room list.
///
/// Cabinets are sometimes numbers and sometimes text in the source sheet;
/// anything else is a hard parse failure.
fn parse_cabinets(cell: &CellValue) -> Result<Vec<String>> {
    match cell {
        CellValue::Empty => Ok(Vec::new()),
        CellValue::Number(n) => Ok(vec![(*n as i64).to_string()]),
        CellValue::Text(s) => Ok(vec![s.trim().to_lowercase()]),
        CellValue::Other => Err(AppError::parse("invalid cabinet cell type")),
    }
}

/// Remove cancelled lessons from the end of a day's list.
fn clear_day_lessons(day_lessons: &mut DayLessons) {
    while matches!(day_lessons.last(), Some(lesson) if lesson.name.is_none()) {
        day_lessons.pop();
    }
}

fn number_to_text(n: f64) -> String {
    if n.fract() == 0.0 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> CellValue {
        CellValue::Empty
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn title_and_header(labels: &[&str]) -> Vec<Vec<CellValue>> {
        vec![
            vec![text("Расписание уроков")],
            labels
                .iter()
                .map(|l| if l.is_empty() { empty() } else { text(l) })
                .collect(),
        ]
    }

    #[test]
    fn test_header_example_with_mixed_cabinet_types() {
        let mut grid = title_and_header(&["", "", "9A", "", "10b", ""]);
        grid.push(vec![
            empty(),
            num(1.0),
            text("Math"),
            num(301.0),
            text("History"),
            text("каб5"),
        ]);

        let lessons = parse_grid(&grid).unwrap();
        let day0 = &lessons["9a"][0];
        assert_eq!(day0.len(), 1);
        assert_eq!(day0[0].name.as_deref(), Some("math"));
        assert_eq!(day0[0].cabinets, vec!["301".to_string()]);

        let day0 = &lessons["10b"][0];
        assert_eq!(day0[0].name.as_deref(), Some("history"));
        assert_eq!(day0[0].cabinets, vec!["каб5".to_string()]);
    }

    #[test]
    fn test_day_rollover_from_numbering_reset() {
        let mut grid = title_and_header(&["", "", "9a", ""]);
        for n in [1.0, 2.0, 3.0, 1.0, 2.0] {
            grid.push(vec![empty(), num(n), text("math"), num(301.0)]);
        }

        let lessons = parse_grid(&grid).unwrap();
        let week = &lessons["9a"];
        assert_eq!(week.len(), WEEK_DAYS);
        assert_eq!(week[0].len(), 3);
        assert_eq!(week[1].len(), 2);
        assert!(week[2].is_empty());
    }

    #[test]
    fn test_trailing_cancelled_slots_trimmed() {
        let mut grid = title_and_header(&["", "", "9a", ""]);
        grid.push(vec![empty(), num(1.0), text("math"), num(301.0)]);
        grid.push(vec![empty(), num(2.0), empty(), empty()]);
        grid.push(vec![empty(), num(3.0), text("---"), empty()]);

        let lessons = parse_grid(&grid).unwrap();
        assert_eq!(lessons["9a"][0].len(), 1);
    }

    #[test]
    fn test_gap_between_populated_slots_is_kept() {
        let mut grid = title_and_header(&["", "", "9a", ""]);
        grid.push(vec![empty(), num(1.0), text("math"), num(301.0)]);
        grid.push(vec![empty(), num(2.0), empty(), empty()]);
        grid.push(vec![empty(), num(3.0), text("physics"), num(205.0)]);

        let lessons = parse_grid(&grid).unwrap();
        let day = &lessons["9a"][0];
        assert_eq!(day.len(), 3);
        assert!(day[1].name.is_none());
    }

    #[test]
    fn test_subject_trimming_and_case() {
        assert_eq!(parse_subject(&text(" .Math- ")).as_deref(), Some("math"));
        assert_eq!(parse_subject(&text("---")), None);
        assert_eq!(parse_subject(&text("   ")), None);
        assert_eq!(parse_subject(&empty()), None);
    }

    #[test]
    fn test_invalid_cabinet_type_fails() {
        let mut grid = title_and_header(&["", "", "9a", ""]);
        grid.push(vec![empty(), num(1.0), text("math"), CellValue::Other]);

        assert!(parse_grid(&grid).is_err());
    }

    #[test]
    fn test_header_without_labels_yields_empty_schedule() {
        let mut grid = vec![vec![text("title")], vec![empty(), empty(), empty()]];
        grid.push(vec![empty(), num(1.0), text("math"), num(301.0)]);

        let lessons = parse_grid(&grid).unwrap();
        assert!(lessons.is_empty());
    }

    #[test]
    fn test_group_label_rows_do_not_affect_state() {
        let mut grid = title_and_header(&["", "", "9a", ""]);
        grid.push(vec![text("9 классы")]);
        grid.push(vec![empty(), num(1.0), text("math"), num(301.0)]);
        grid.push(vec![text("10 классы")]);
        grid.push(vec![empty(), num(2.0), text("history"), num(205.0)]);

        let lessons = parse_grid(&grid).unwrap();
        assert_eq!(lessons["9a"][0].len(), 2);
    }

    #[test]
    fn test_sentinel_row_stops_parsing_after_last_day() {
        let mut grid = title_and_header(&["", "", "9a", ""]);
        // One lesson per day, each number lower than the previous one, so
        // every row rolls the day counter forward.
        for n in (1..=WEEK_DAYS).rev() {
            grid.push(vec![empty(), num(n as f64), text("math"), num(301.0)]);
        }
        grid.push(vec![text("конец"), empty()]);
        // Anything after the sentinel must be ignored.
        grid.push(vec![empty(), num(1.0), text("ghost"), num(999.0)]);

        let lessons = parse_grid(&grid).unwrap();
        let week = &lessons["9a"];
        assert!(week.iter().all(|day| day.len() == 1));
        assert!(
            week.iter()
                .all(|day| day[0].name.as_deref() == Some("math"))
        );
    }

    #[test]
    fn test_ragged_rows_read_as_empty_cells() {
        let mut grid = title_and_header(&["", "", "9a", "", "10b", ""]);
        // Row too short to reach 10b's columns.
        grid.push(vec![empty(), num(1.0), text("math")]);

        let lessons = parse_grid(&grid).unwrap();
        assert_eq!(lessons["9a"][0][0].cabinets, Vec::<String>::new());
        // 10b got an absent slot which the trailing trim removed.
        assert!(lessons["10b"][0].is_empty());
    }

    #[test]
    fn test_unreadable_workbook_is_parse_error() {
        assert!(matches!(
            parse_lessons(b"definitely not an xlsx payload"),
            Err(AppError::Parse(_))
        ));
    }
}
