//! Timetable slots and the manual assignment grid.
//!
//! Slots are generated from a timetable's start, end and gap. Cells are
//! filled by hand; nothing here schedules or checks for conflicts.

use crate::error::GridError;
use crate::record::Record;
use chrono::{NaiveTime, TimeDelta, Weekday};
use std::fmt;

/// Shown when an assigned course has no faculty offering.
pub const NO_FACULTY: &str = "No Faculty Assigned";

pub const TEACHING_DAYS: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M", "%I:%M %p"];

/// Parse `HH:MM`, `HH:MM:SS` or `h:MM AM`.
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(input, format).ok())
}

/// `h:MM AM` clock label.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn label(&self) -> String {
        format!("{} to {}", format_clock(self.start), format_clock(self.end))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Consecutive `gap_minutes` slots starting at `start` while the slot start is before `end`.
///
/// The last slot may run past `end`. A zero gap yields no slots, and a slot
/// that crosses midnight ends the sequence.
pub fn generate_time_slots(start: NaiveTime, end: NaiveTime, gap_minutes: u32) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if gap_minutes == 0 {
        return slots;
    }
    let step = TimeDelta::minutes(i64::from(gap_minutes));
    let mut current = start;
    while current < end {
        let (next, wrapped) = current.overflowing_add_signed(step);
        slots.push(TimeSlot { start: current, end: next });
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    slots
}

/// Header row returned by `getimetable`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableSummary {
    pub dept_name: String,
    pub program_name: String,
    pub year_name: String,
    pub section_name: String,
    pub gap_minutes: u32,
    pub start: NaiveTime,
    pub end: NaiveTime,
    keys: Record,
}

impl TimetableSummary {
    pub fn from_record(record: &Record) -> Result<Self, GridError> {
        let time = |field: &str| {
            parse_time(&record.text(field)).ok_or_else(|| GridError::InvalidSummary {
                reason: format!("{} '{}' is not a time", field, record.text(field)),
            })
        };
        let gap = record.get("gap");
        let gap_minutes = gap
            .as_number()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
            .ok_or_else(|| GridError::InvalidSummary {
                reason: format!("gap '{}' is not a whole number of minutes", gap),
            })?;

        let mut keys = Record::new();
        for field in ["pid", "yid", "sid"] {
            match record.raw(field) {
                Some(value) if !record.get(field).is_empty() => keys.set(field, value.clone()),
                _ => {
                    return Err(GridError::InvalidSummary {
                        reason: format!("missing {}", field),
                    })
                }
            }
        }

        Ok(Self {
            dept_name: record.text("dept_name"),
            program_name: record.text("program_name"),
            year_name: record.text("year_name"),
            section_name: record.text("section_name"),
            gap_minutes,
            start: time("start_time")?,
            end: time("end_time")?,
            keys,
        })
    }

    /// Payload for `getfacultybytimetable`.
    pub fn faculty_query(&self) -> Record {
        self.keys.clone()
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        generate_time_slots(self.start, self.end, self.gap_minutes)
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotAssignment {
    pub course: Option<String>,
    pub faculty: Option<String>,
    pub room: Option<String>,
}

impl SlotAssignment {
    pub fn is_empty(&self) -> bool {
        self.course.is_none() && self.room.is_none()
    }

    /// Faculty line for an assigned course.
    pub fn faculty_label(&self) -> Option<&str> {
        self.course.as_ref()?;
        Some(
            self.faculty
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(NO_FACULTY),
        )
    }
}

/// Days by slots grid of manual assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableGrid {
    slots: Vec<TimeSlot>,
    cells: Vec<SlotAssignment>,
}

impl TimetableGrid {
    pub fn new(slots: Vec<TimeSlot>) -> Self {
        let cells = vec![SlotAssignment::default(); slots.len() * TEACHING_DAYS.len()];
        Self { slots, cells }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn days(&self) -> &'static [Weekday] {
        &TEACHING_DAYS
    }

    fn index(&self, day: usize, slot: usize) -> Result<usize, GridError> {
        if day >= TEACHING_DAYS.len() || slot >= self.slots.len() {
            return Err(GridError::OutOfRange { day, slot });
        }
        Ok(day * self.slots.len() + slot)
    }

    pub fn cell(&self, day: usize, slot: usize) -> Result<&SlotAssignment, GridError> {
        let index = self.index(day, slot)?;
        Ok(&self.cells[index])
    }

    /// Set or clear the course of a cell. The faculty follows the matching offering.
    pub fn assign_course(
        &mut self,
        day: usize,
        slot: usize,
        course_id: Option<&str>,
        offerings: &[Record],
    ) -> Result<(), GridError> {
        let index = self.index(day, slot)?;
        let cell = &mut self.cells[index];
        match course_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(cid) => {
                let faculty = offerings
                    .iter()
                    .find(|offering| offering.get("cid").normalized() == cid)
                    .map(|offering| offering.text("faculty_name"))
                    .filter(|name| !name.trim().is_empty());
                cell.course = Some(cid.to_string());
                cell.faculty = faculty;
            }
            None => {
                cell.course = None;
                cell.faculty = None;
            }
        }
        Ok(())
    }

    pub fn assign_room(&mut self, day: usize, slot: usize, room_id: Option<&str>) -> Result<(), GridError> {
        let index = self.index(day, slot)?;
        self.cells[index].room = room_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Ok(())
    }

    pub fn clear(&mut self, day: usize, slot: usize) -> Result<(), GridError> {
        let index = self.index(day, slot)?;
        self.cells[index] = SlotAssignment::default();
        Ok(())
    }

    pub fn assigned_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("09:30"), Some(t(9, 30)));
        assert_eq!(parse_time("09:30:00"), Some(t(9, 30)));
        assert_eq!(parse_time("5:00 PM"), Some(t(17, 0)));
        assert_eq!(parse_time(" 14:05 "), Some(t(14, 5)));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn test_slot_labels() {
        let slots = generate_time_slots(t(10, 0), t(10, 30), 15);
        let labels: Vec<String> = slots.iter().map(TimeSlot::label).collect();
        assert_eq!(labels, vec!["10:00 AM to 10:15 AM", "10:15 AM to 10:30 AM"]);
    }

    #[test]
    fn test_last_slot_may_overrun_end() {
        let slots = generate_time_slots(t(11, 30), t(13, 0), 60);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].label(), "12:30 PM to 1:30 PM");
    }

    #[test]
    fn test_zero_gap_and_empty_window_yield_nothing() {
        assert!(generate_time_slots(t(9, 0), t(17, 0), 0).is_empty());
        assert!(generate_time_slots(t(17, 0), t(9, 0), 30).is_empty());
    }

    #[test]
    fn test_slots_stop_at_midnight() {
        let slots = generate_time_slots(t(23, 0), t(23, 59), 45);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end, t(0, 30));
    }

    fn summary_record() -> Record {
        Record::new()
            .with("dept_name", "Computer Science")
            .with("program_name", "BSc CS")
            .with("year_name", "First")
            .with("section_name", "A")
            .with("gap", "60")
            .with("start_time", "09:00:00")
            .with("end_time", "12:00:00")
            .with("pid", 1)
            .with("yid", 2)
            .with("sid", 3)
    }

    #[test]
    fn test_summary_from_record() {
        let summary = TimetableSummary::from_record(&summary_record()).unwrap();
        assert_eq!(summary.gap_minutes, 60);
        assert_eq!(summary.slots().len(), 3);
        let query = summary.faculty_query();
        assert_eq!(query.text("pid"), "1");
        assert_eq!(query.text("sid"), "3");
    }

    #[test]
    fn test_summary_rejects_missing_keys_and_bad_times() {
        let mut record = summary_record();
        record.remove("yid");
        assert!(matches!(
            TimetableSummary::from_record(&record),
            Err(GridError::InvalidSummary { .. })
        ));
        let record = summary_record().with("end_time", "noon");
        assert!(TimetableSummary::from_record(&record).is_err());
    }

    #[test]
    fn test_assign_course_sets_faculty_from_offering() {
        let offerings = vec![
            Record::new().with("cid", 7).with("course_name", "Algebra").with("faculty_name", "Dr. Rao"),
            Record::new().with("cid", 8).with("course_name", "Physics").with("faculty_name", ""),
        ];
        let mut grid = TimetableGrid::new(generate_time_slots(t(9, 0), t(11, 0), 60));

        grid.assign_course(0, 1, Some("7"), &offerings).unwrap();
        let cell = grid.cell(0, 1).unwrap();
        assert_eq!(cell.course.as_deref(), Some("7"));
        assert_eq!(cell.faculty_label(), Some("Dr. Rao"));

        grid.assign_course(5, 0, Some("8"), &offerings).unwrap();
        assert_eq!(grid.cell(5, 0).unwrap().faculty_label(), Some(NO_FACULTY));
        assert_eq!(grid.assigned_count(), 2);
    }

    #[test]
    fn test_room_and_clear() {
        let mut grid = TimetableGrid::new(generate_time_slots(t(9, 0), t(10, 0), 30));
        grid.assign_room(2, 1, Some("4")).unwrap();
        assert_eq!(grid.cell(2, 1).unwrap().room.as_deref(), Some("4"));
        assert_eq!(grid.cell(2, 1).unwrap().faculty_label(), None);
        grid.clear(2, 1).unwrap();
        assert!(grid.cell(2, 1).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_cells() {
        let mut grid = TimetableGrid::new(generate_time_slots(t(9, 0), t(10, 0), 30));
        assert_eq!(grid.cell(6, 0).unwrap_err(), GridError::OutOfRange { day: 6, slot: 0 });
        assert!(grid.assign_room(0, 2, Some("1")).is_err());
    }
}
