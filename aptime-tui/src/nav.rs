//! Navigation and view switching utilities.

use aptime_core::EntityKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Login,
    Shifts,
    Departments,
    Sections,
    Programs,
    Years,
    Semesters,
    Courses,
    Faculty,
    Classrooms,
    Allotments,
    CourseAllotments,
    Timetables,
    TimetableGrid,
    ChangePassword,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::TimetableGrid => "Timetable Grid",
            View::ChangePassword => "Change Password",
            other => other.entity().map(EntityKind::title).unwrap_or("Aptime"),
        }
    }

    /// Views reachable by Tab and digits once signed in. Login is not part of
    /// the cycle.
    pub fn all() -> &'static [View] {
        &[
            View::Shifts,
            View::Departments,
            View::Sections,
            View::Programs,
            View::Years,
            View::Semesters,
            View::Courses,
            View::Faculty,
            View::Classrooms,
            View::Allotments,
            View::CourseAllotments,
            View::Timetables,
            View::TimetableGrid,
            View::ChangePassword,
        ]
    }

    pub fn entity(&self) -> Option<EntityKind> {
        let kind = match self {
            View::Shifts => EntityKind::Shift,
            View::Departments => EntityKind::Department,
            View::Sections => EntityKind::Section,
            View::Programs => EntityKind::Program,
            View::Years => EntityKind::Year,
            View::Semesters => EntityKind::Semester,
            View::Courses => EntityKind::Course,
            View::Faculty => EntityKind::Faculty,
            View::Classrooms => EntityKind::Classroom,
            View::Allotments => EntityKind::Allotment,
            View::CourseAllotments => EntityKind::CourseAllotment,
            View::Timetables => EntityKind::Timetable,
            View::Login | View::TimetableGrid | View::ChangePassword => return None,
        };
        Some(kind)
    }

    pub fn for_entity(kind: EntityKind) -> View {
        match kind {
            EntityKind::Shift => View::Shifts,
            EntityKind::Department => View::Departments,
            EntityKind::Section => View::Sections,
            EntityKind::Program => View::Programs,
            EntityKind::Year => View::Years,
            EntityKind::Semester => View::Semesters,
            EntityKind::Course => View::Courses,
            EntityKind::Faculty => View::Faculty,
            EntityKind::Classroom => View::Classrooms,
            EntityKind::Allotment => View::Allotments,
            EntityKind::CourseAllotment => View::CourseAllotments,
            EntityKind::Timetable => View::Timetables,
        }
    }

    pub fn requires_session(&self) -> bool {
        *self != View::Login
    }

    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|v| v == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let next = (idx + 1) % all.len();
        all[next]
    }

    pub fn previous(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_has_a_view() {
        for kind in EntityKind::all() {
            let view = View::for_entity(*kind);
            assert_eq!(view.entity(), Some(*kind));
            assert!(View::all().contains(&view));
        }
    }

    #[test]
    fn test_cycle_wraps_and_skips_login() {
        assert_eq!(View::ChangePassword.next(), View::Shifts);
        assert_eq!(View::Shifts.previous(), View::ChangePassword);
        assert!(!View::all().contains(&View::Login));
        assert_eq!(View::Courses.title(), EntityKind::Course.title());
    }
}
