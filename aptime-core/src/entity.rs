//! Entity catalogue: one static schema per managed entity kind.
//!
//! A schema names the remote resource, the explicit id field, the table
//! columns, the reference joins used for enrichment and the entry form with
//! its validation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the field that identifies records of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdField(&'static str);

impl IdField {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A rendered table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
}

impl Column {
    pub const fn new(field: &'static str, header: &'static str) -> Self {
        Self { field, header }
    }
}

/// Foreign key join used to add a display field to each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    pub foreign_key: &'static str,
    pub reference: EntityKind,
    pub display_field: &'static str,
    pub unknown_label: &'static str,
}

/// Field of the modal entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub field: &'static str,
    pub label: &'static str,
    /// Selection is made from this reference list.
    pub reference: Option<EntityKind>,
    pub default: Option<&'static str>,
}

/// Validation rule applied to a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    /// Non-empty values must parse as a number.
    Numeric,
    PositiveNumber,
    MinLength(usize),
    /// Non-empty values must parse as a clock time.
    Time,
    /// Must be a later time than the named field.
    After(&'static str),
    /// Non-empty values must name a loaded record of this kind.
    Reference(EntityKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

/// Client-side duplicate detection against the loaded list.
///
/// The first field is compared case-insensitively when `fold_first` is set;
/// the rest compare by normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateRule {
    pub fields: &'static [&'static str],
    pub fold_first: bool,
    pub error_field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub resource: &'static str,
    pub id_field: IdField,
    pub title: &'static str,
    pub noun: &'static str,
    pub items_per_page: usize,
    pub columns: &'static [Column],
    pub search_fields: &'static [&'static str],
    pub joins: &'static [Join],
    pub form: &'static [FormField],
    pub rules: &'static [FieldRule],
    pub duplicate: Option<DuplicateRule>,
}

impl EntitySchema {
    /// Entity kinds whose lists must be loaded alongside the primary list.
    pub fn reference_kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<EntityKind> = Vec::new();
        let joined = self.joins.iter().map(|j| j.reference);
        let selected = self.form.iter().filter_map(|f| f.reference);
        let checked = self.rules.iter().filter_map(|r| match r.rule {
            Rule::Reference(kind) => Some(kind),
            _ => None,
        });
        for kind in joined.chain(selected).chain(checked) {
            if kind != self.kind && !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    pub fn form_field(&self, field: &str) -> Option<&FormField> {
        self.form.iter().find(|f| f.field == field)
    }
}

/// Every entity managed by the console.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Shift,
    Department,
    Section,
    Program,
    Year,
    Semester,
    Course,
    Faculty,
    Classroom,
    Allotment,
    CourseAllotment,
    Timetable,
}

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Shift,
            EntityKind::Department,
            EntityKind::Section,
            EntityKind::Program,
            EntityKind::Year,
            EntityKind::Semester,
            EntityKind::Course,
            EntityKind::Faculty,
            EntityKind::Classroom,
            EntityKind::Allotment,
            EntityKind::CourseAllotment,
            EntityKind::Timetable,
        ]
    }

    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::Shift => &SHIFT,
            EntityKind::Department => &DEPARTMENT,
            EntityKind::Section => &SECTION,
            EntityKind::Program => &PROGRAM,
            EntityKind::Year => &YEAR,
            EntityKind::Semester => &SEMESTER,
            EntityKind::Course => &COURSE,
            EntityKind::Faculty => &FACULTY,
            EntityKind::Classroom => &CLASSROOM,
            EntityKind::Allotment => &ALLOTMENT,
            EntityKind::CourseAllotment => &COURSE_ALLOTMENT,
            EntityKind::Timetable => &TIMETABLE,
        }
    }

    pub fn resource(self) -> &'static str {
        self.schema().resource
    }

    pub fn id_field(self) -> IdField {
        self.schema().id_field
    }

    pub fn title(self) -> &'static str {
        self.schema().title
    }

    pub fn noun(self) -> &'static str {
        self.schema().noun
    }
}

/// Field of a reference record shown in joins and selectors.
pub const LABEL_FIELD: &str = "name";

const fn field(field: &'static str, label: &'static str) -> FormField {
    FormField { field, label, reference: None, default: None }
}

const fn select(field: &'static str, label: &'static str, kind: EntityKind) -> FormField {
    FormField { field, label, reference: Some(kind), default: None }
}

const fn rule(field: &'static str, rule: Rule, message: &'static str) -> FieldRule {
    FieldRule { field, rule, message }
}

const fn join(
    foreign_key: &'static str,
    reference: EntityKind,
    display_field: &'static str,
    unknown_label: &'static str,
) -> Join {
    Join { foreign_key, reference, display_field, unknown_label }
}

const JOIN_SHIFT: Join = join("timeid", EntityKind::Shift, "shiftName", "Unknown Shift");
const JOIN_DEPARTMENT: Join = join("did", EntityKind::Department, "deptName", "Unknown Department");
const JOIN_SECTION: Join = join("sid", EntityKind::Section, "sectionName", "Unknown Section");
const JOIN_PROGRAM: Join = join("pid", EntityKind::Program, "programName", "Unknown Program");
const JOIN_YEAR: Join = join("yid", EntityKind::Year, "yearName", "Unknown Year");
const JOIN_SEMESTER: Join = join("semid", EntityKind::Semester, "semesterName", "Unknown Semester");
const JOIN_COURSE: Join = join("cid", EntityKind::Course, "courseName", "Unknown Course");
const JOIN_FACULTY: Join = join("fid", EntityKind::Faculty, "facultyName", "Unknown Faculty");

static SHIFT: EntitySchema = EntitySchema {
    kind: EntityKind::Shift,
    resource: "time",
    id_field: IdField::new("timeid"),
    title: "Shifts",
    noun: "Time Slot",
    items_per_page: 6,
    columns: &[
        Column::new("name", "Shift"),
        Column::new("start", "Start Time"),
        Column::new("end", "Close Time"),
        Column::new("gap", "Gap in Lectures"),
    ],
    search_fields: &["name", "start", "end"],
    joins: &[],
    form: &[
        field("name", "Name"),
        field("start", "Start Time (HH:MM)"),
        field("end", "End Time (HH:MM)"),
        FormField { field: "gap", label: "Gap (minutes)", reference: None, default: Some("15") },
    ],
    rules: &[
        rule("name", Rule::Required, "Name is required"),
        rule("start", Rule::Required, "Start time is required"),
        rule("start", Rule::Time, "Start time must be a valid time"),
        rule("end", Rule::Required, "End time is required"),
        rule("end", Rule::Time, "End time must be a valid time"),
        rule("end", Rule::After("start"), "End time must be later than start time"),
        rule("gap", Rule::PositiveNumber, "Gap must be a positive number"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name"],
        fold_first: true,
        error_field: "name",
        message: "Time Slot already exists",
    }),
};

static DEPARTMENT: EntitySchema = EntitySchema {
    kind: EntityKind::Department,
    resource: "dept",
    id_field: IdField::new("did"),
    title: "Departments",
    noun: "Department",
    items_per_page: 6,
    columns: &[
        Column::new("name", "Name"),
        Column::new("alias", "Short Name"),
        Column::new("shiftName", "Shift"),
    ],
    search_fields: &["name", "alias", "shiftName"],
    joins: &[JOIN_SHIFT],
    form: &[
        field("name", "Name"),
        field("alias", "Short Name"),
        select("timeid", "Shift", EntityKind::Shift),
    ],
    rules: &[
        rule("name", Rule::Required, "Name is required"),
        rule("alias", Rule::Required, "Alias is required"),
        rule("timeid", Rule::Required, "Time is required"),
        rule("timeid", Rule::Reference(EntityKind::Shift), "Selected shift not found. Please choose a valid shift."),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name"],
        fold_first: true,
        error_field: "name",
        message: "Department already exists",
    }),
};

static SECTION: EntitySchema = EntitySchema {
    kind: EntityKind::Section,
    resource: "section",
    id_field: IdField::new("sid"),
    title: "Sections",
    noun: "Section",
    items_per_page: 5,
    columns: &[Column::new("name", "Name")],
    search_fields: &["name"],
    joins: &[],
    form: &[field("name", "Name")],
    rules: &[rule("name", Rule::Required, "Name is required")],
    duplicate: Some(DuplicateRule {
        fields: &["name"],
        fold_first: true,
        error_field: "name",
        message: "Section already exists",
    }),
};

static PROGRAM: EntitySchema = EntitySchema {
    kind: EntityKind::Program,
    resource: "program",
    id_field: IdField::new("pid"),
    title: "Programs",
    noun: "Program",
    items_per_page: 5,
    columns: &[
        Column::new("name", "Name"),
        Column::new("alias", "Short Name"),
        Column::new("sectionName", "Section"),
    ],
    search_fields: &["name", "alias", "sectionName"],
    joins: &[JOIN_SECTION],
    form: &[
        field("name", "Name"),
        field("alias", "Short Name"),
        select("sid", "Section", EntityKind::Section),
    ],
    rules: &[
        rule("name", Rule::Required, "Name is required"),
        rule("alias", Rule::Required, "Alias is required"),
        rule("sid", Rule::Required, "Section is required"),
        rule("sid", Rule::Reference(EntityKind::Section), "Selected section not found. Please choose a valid section."),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name"],
        fold_first: true,
        error_field: "name",
        message: "Program already exists",
    }),
};

static YEAR: EntitySchema = EntitySchema {
    kind: EntityKind::Year,
    resource: "year",
    id_field: IdField::new("yid"),
    title: "Years",
    noun: "Year",
    items_per_page: 6,
    columns: &[
        Column::new("name", "Name"),
        Column::new("programName", "Program"),
    ],
    search_fields: &["name", "programName"],
    joins: &[JOIN_PROGRAM],
    form: &[
        field("name", "Name"),
        select("pid", "Program", EntityKind::Program),
    ],
    rules: &[
        rule("name", Rule::Required, "Name is required"),
        rule("pid", Rule::Required, "Program is required"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name", "pid"],
        fold_first: true,
        error_field: "name",
        message: "Year already exists",
    }),
};

static SEMESTER: EntitySchema = EntitySchema {
    kind: EntityKind::Semester,
    resource: "semesterdata",
    id_field: IdField::new("semid"),
    title: "Semesters",
    noun: "Semester",
    items_per_page: 6,
    columns: &[
        Column::new("programName", "Program"),
        Column::new("yearName", "Year"),
        Column::new("name", "Semester"),
    ],
    search_fields: &["name", "programName", "yearName"],
    joins: &[JOIN_PROGRAM, JOIN_YEAR],
    form: &[
        field("name", "Name"),
        select("pid", "Program", EntityKind::Program),
        select("yid", "Year", EntityKind::Year),
    ],
    rules: &[
        rule("name", Rule::Required, "Name is required"),
        rule("pid", Rule::Required, "Program is required"),
        rule("yid", Rule::Required, "Year is required"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name", "pid", "yid"],
        fold_first: true,
        error_field: "name",
        message: "This semester already exists.",
    }),
};

static COURSE: EntitySchema = EntitySchema {
    kind: EntityKind::Course,
    resource: "course",
    id_field: IdField::new("cid"),
    title: "Courses",
    noun: "Course",
    items_per_page: 6,
    columns: &[
        Column::new("name", "Course Name"),
        Column::new("alias", "Short Name"),
        Column::new("course_code", "Code"),
        Column::new("category", "Category"),
        Column::new("max_lecture", "Max Lecture per Week"),
        Column::new("duration", "Duration"),
        Column::new("deptName", "Department"),
        Column::new("programName", "Program"),
        Column::new("yearName", "Year"),
        Column::new("semesterName", "Semester"),
        Column::new("elective", "Elective"),
    ],
    search_fields: &["name", "alias", "course_code", "category", "deptName", "programName"],
    joins: &[JOIN_DEPARTMENT, JOIN_PROGRAM, JOIN_YEAR, JOIN_SEMESTER],
    form: &[
        field("name", "Name"),
        field("alias", "Short Name"),
        field("course_code", "Course Code"),
        field("category", "Category"),
        field("max_lecture", "Max Lectures per Week"),
        field("duration", "Duration"),
        select("did", "Department", EntityKind::Department),
        select("pid", "Program", EntityKind::Program),
        select("yid", "Year", EntityKind::Year),
        select("semid", "Semester", EntityKind::Semester),
        field("elective", "Elective"),
    ],
    rules: &[
        rule("name", Rule::Required, "Name is required"),
        rule("alias", Rule::Required, "Alias is required"),
        rule("course_code", Rule::Required, "Course Code is required"),
        rule("category", Rule::Required, "Category is required"),
        rule("max_lecture", Rule::Required, "Max Lecture must be a number"),
        rule("max_lecture", Rule::Numeric, "Max Lecture must be a number"),
        rule("duration", Rule::Required, "Duration is required"),
        rule("did", Rule::Required, "Department is required"),
        rule("pid", Rule::Required, "Program is required"),
        rule("yid", Rule::Required, "Year is required"),
        rule("semid", Rule::Required, "Semester is required"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name", "course_code", "did", "pid", "yid", "semid"],
        fold_first: true,
        error_field: "name",
        message: "Course already exists",
    }),
};

static FACULTY: EntitySchema = EntitySchema {
    kind: EntityKind::Faculty,
    resource: "faculty",
    id_field: IdField::new("fid"),
    title: "Faculty",
    noun: "Faculty",
    items_per_page: 6,
    columns: &[
        Column::new("name", "Name"),
        Column::new("entrytime", "Entry Time"),
        Column::new("exittime", "Exit Time"),
        Column::new("max_allowed_lecture", "Max Allowed Lectures"),
    ],
    search_fields: &["name", "entrytime", "exittime"],
    joins: &[],
    form: &[
        field("name", "Name"),
        field("entrytime", "Entry Time (HH:MM)"),
        field("exittime", "Exit Time (HH:MM)"),
        field("max_allowed_lecture", "Max Allowed Lectures"),
    ],
    rules: &[
        rule("name", Rule::Required, "Name is required"),
        rule("entrytime", Rule::Required, "Entry time is required"),
        rule("entrytime", Rule::Time, "Entry time must be a valid time"),
        rule("exittime", Rule::Required, "Exit time is required"),
        rule("exittime", Rule::Time, "Exit time must be a valid time"),
        rule("exittime", Rule::After("entrytime"), "Exit time must be later than entry time"),
        rule("max_allowed_lecture", Rule::Required, "Max allowed lecture must be a number"),
        rule("max_allowed_lecture", Rule::Numeric, "Max allowed lecture must be a number"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name"],
        fold_first: true,
        error_field: "name",
        message: "Faculty Name already exists",
    }),
};

static CLASSROOM: EntitySchema = EntitySchema {
    kind: EntityKind::Classroom,
    resource: "classroom",
    id_field: IdField::new("rid"),
    title: "Classrooms",
    noun: "Classroom",
    items_per_page: 5,
    columns: &[
        Column::new("name", "Name"),
        Column::new("type", "Type"),
        Column::new("capacity", "Capacity"),
    ],
    search_fields: &["name", "type"],
    joins: &[],
    form: &[
        field("name", "Name"),
        field("type", "Type"),
        field("capacity", "Capacity"),
    ],
    rules: &[
        rule("name", Rule::MinLength(3), "Name is required and should be at least 3 characters long"),
        rule("type", Rule::Required, "Type is required"),
        rule("capacity", Rule::PositiveNumber, "Capacity must be a positive number"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["name"],
        fold_first: true,
        error_field: "name",
        message: "Classroom name already exists",
    }),
};

static ALLOTMENT: EntitySchema = EntitySchema {
    kind: EntityKind::Allotment,
    resource: "allotment",
    id_field: IdField::new("aid"),
    title: "Allotments",
    noun: "Allotment",
    items_per_page: 5,
    columns: &[
        Column::new("programName", "Program"),
        Column::new("courseName", "Course"),
        Column::new("deptName", "Department"),
        Column::new("facultyName", "Faculty"),
    ],
    search_fields: &["programName", "courseName", "deptName", "facultyName"],
    joins: &[JOIN_PROGRAM, JOIN_COURSE, JOIN_DEPARTMENT, JOIN_FACULTY],
    form: &[
        select("pid", "Program", EntityKind::Program),
        select("cid", "Course", EntityKind::Course),
        select("fid", "Faculty", EntityKind::Faculty),
        select("did", "Department", EntityKind::Department),
    ],
    rules: &[
        rule("pid", Rule::Required, "Program is required"),
        rule("cid", Rule::Required, "Course is required"),
        rule("fid", Rule::Required, "Faculty is required"),
        rule("did", Rule::Required, "Department ID is required"),
    ],
    duplicate: None,
};

static COURSE_ALLOTMENT: EntitySchema = EntitySchema {
    kind: EntityKind::CourseAllotment,
    resource: "courseallotment",
    id_field: IdField::new("caid"),
    title: "Course Allotments",
    noun: "Course Allotment",
    items_per_page: 6,
    columns: &[
        Column::new("programName", "Program"),
        Column::new("yearName", "Year"),
        Column::new("semesterName", "Semester"),
        Column::new("sectionName", "Section"),
        Column::new("courseName", "Course"),
        Column::new("facultyName", "Faculty"),
    ],
    search_fields: &["programName", "yearName", "sectionName", "courseName", "facultyName"],
    joins: &[JOIN_PROGRAM, JOIN_YEAR, JOIN_SEMESTER, JOIN_SECTION, JOIN_COURSE, JOIN_FACULTY],
    form: &[
        select("pid", "Program", EntityKind::Program),
        select("yid", "Year", EntityKind::Year),
        select("semid", "Semester", EntityKind::Semester),
        select("sid", "Section", EntityKind::Section),
        select("cid", "Course", EntityKind::Course),
        select("fid", "Faculty", EntityKind::Faculty),
    ],
    rules: &[
        rule("cid", Rule::Required, "Course is required"),
        rule("pid", Rule::Required, "Program is required"),
        rule("yid", Rule::Required, "Year is required"),
        rule("sid", Rule::Required, "Section is required"),
        rule("fid", Rule::Required, "Faculty is required"),
        rule("semid", Rule::Required, "Semester is required"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["pid", "yid", "semid", "sid", "fid", "cid"],
        fold_first: false,
        error_field: "cid",
        message: "This course is already allotted for the section.",
    }),
};

static TIMETABLE: EntitySchema = EntitySchema {
    kind: EntityKind::Timetable,
    resource: "timetable",
    id_field: IdField::new("tid"),
    title: "Timetables",
    noun: "Timetable",
    items_per_page: 6,
    columns: &[
        Column::new("deptName", "Department"),
        Column::new("programName", "Program"),
        Column::new("yearName", "Year"),
        Column::new("sectionName", "Section"),
        Column::new("gap", "Gap"),
        Column::new("start_time", "Start"),
        Column::new("end_time", "End"),
    ],
    search_fields: &["deptName", "programName", "yearName", "sectionName"],
    joins: &[JOIN_DEPARTMENT, JOIN_PROGRAM, JOIN_YEAR, JOIN_SECTION],
    form: &[
        select("did", "Department", EntityKind::Department),
        select("pid", "Program", EntityKind::Program),
        select("yid", "Year", EntityKind::Year),
        select("sid", "Section", EntityKind::Section),
        FormField { field: "gap", label: "Gap (minutes)", reference: None, default: Some("60") },
        field("start_time", "Start Time (HH:MM)"),
        field("end_time", "End Time (HH:MM)"),
    ],
    rules: &[
        rule("did", Rule::Required, "Department is required"),
        rule("pid", Rule::Required, "Program is required"),
        rule("yid", Rule::Required, "Year is required"),
        rule("sid", Rule::Required, "Section is required"),
        rule("gap", Rule::PositiveNumber, "Gap must be a positive number"),
        rule("start_time", Rule::Required, "Start time is required"),
        rule("start_time", Rule::Time, "Start time must be a valid time"),
        rule("end_time", Rule::Required, "End time is required"),
        rule("end_time", Rule::Time, "End time must be a valid time"),
        rule("end_time", Rule::After("start_time"), "End time must be later than start time"),
    ],
    duplicate: Some(DuplicateRule {
        fields: &["did", "pid", "yid", "sid"],
        fold_first: false,
        error_field: "sid",
        message: "A timetable already exists for this section.",
    }),
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_has_matching_schema() {
        for kind in EntityKind::all() {
            let schema = kind.schema();
            assert_eq!(schema.kind, *kind);
            assert!(!schema.columns.is_empty(), "{:?} has no columns", kind);
            assert!(schema.items_per_page == 5 || schema.items_per_page == 6);
            assert!(!schema.form.is_empty());
        }
    }

    #[test]
    fn test_resources_and_id_fields_are_unique() {
        let resources: HashSet<_> = EntityKind::all().iter().map(|k| k.resource()).collect();
        let ids: HashSet<_> = EntityKind::all().iter().map(|k| k.id_field()).collect();
        assert_eq!(resources.len(), EntityKind::all().len());
        assert_eq!(ids.len(), EntityKind::all().len());
    }

    #[test]
    fn test_search_fields_are_known_fields() {
        for kind in EntityKind::all() {
            let schema = kind.schema();
            for field in schema.search_fields {
                let known = schema.columns.iter().any(|c| c.field == *field)
                    || schema.form.iter().any(|f| f.field == *field);
                assert!(known, "{:?} searches unknown field {}", kind, field);
            }
        }
    }

    #[test]
    fn test_rules_target_form_fields() {
        for kind in EntityKind::all() {
            let schema = kind.schema();
            for r in schema.rules {
                assert!(schema.form_field(r.field).is_some(), "{:?} rule on {}", kind, r.field);
                if let Rule::After(other) = r.rule {
                    assert!(schema.form_field(other).is_some());
                }
            }
        }
    }

    #[test]
    fn test_reference_kinds_cover_joins_without_self() {
        let kinds = EntityKind::CourseAllotment.schema().reference_kinds();
        assert_eq!(kinds.len(), 6);
        assert!(kinds.contains(&EntityKind::Faculty));
        assert!(!kinds.contains(&EntityKind::CourseAllotment));
        assert!(EntityKind::Section.schema().reference_kinds().is_empty());
    }

    #[test]
    fn test_entity_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::CourseAllotment).unwrap();
        assert_eq!(json, "\"course_allotment\"");
    }
}
