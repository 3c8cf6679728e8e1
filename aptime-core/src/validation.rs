//! Entry form validation, run before any network call.

use crate::enrich::ReferenceSet;
use crate::entity::{DuplicateRule, EntitySchema, Rule};
use crate::error::FormErrors;
use crate::record::Record;
use crate::timetable::parse_time;

/// Check `form` against the schema rules and the loaded list.
///
/// The first failing rule per field wins; a duplicate match overrides it.
/// Reference checks are skipped for lists that are not loaded. Duplicate
/// detection is best-effort against `existing` and ignores the record that
/// shares the form's id.
pub fn validate_form(
    schema: &EntitySchema,
    form: &Record,
    existing: &[Record],
    refs: &ReferenceSet,
) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();

    for field_rule in schema.rules {
        let value = form.get(field_rule.field);
        let failed = match field_rule.rule {
            Rule::Required => value.is_empty(),
            Rule::Numeric => !value.is_empty() && value.as_number().is_none(),
            Rule::PositiveNumber => value.as_number().map_or(true, |n| n <= 0.0),
            Rule::MinLength(min) => value.normalized().chars().count() < min,
            Rule::Time => !value.is_empty() && parse_time(&value.normalized()).is_none(),
            Rule::After(other) => {
                let end = parse_time(&value.normalized());
                let start = parse_time(&form.get(other).normalized());
                matches!((start, end), (Some(start), Some(end)) if end <= start)
            }
            Rule::Reference(kind) => {
                !value.is_empty()
                    && refs.is_loaded(kind)
                    && refs.lookup(kind, &value.normalized()).is_none()
            }
        };
        if failed {
            errors.add(field_rule.field, field_rule.message);
        }
    }

    if let Some(rule) = &schema.duplicate {
        if is_duplicate(rule, schema, form, existing) {
            errors.replace(rule.error_field, rule.message);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_duplicate(rule: &DuplicateRule, schema: &EntitySchema, form: &Record, existing: &[Record]) -> bool {
    let editing = form.id(schema.id_field);
    existing
        .iter()
        .filter(|record| match &editing {
            Some(id) => !id.matches(record),
            None => true,
        })
        .any(|record| {
            rule.fields.iter().enumerate().all(|(i, field)| {
                let ours = form.get(field).normalized();
                let theirs = record.get(field).normalized();
                if i == 0 && rule.fold_first {
                    ours.to_lowercase() == theirs.to_lowercase()
                } else {
                    ours == theirs
                }
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn classroom(name: &str, kind: &str, capacity: &str) -> Record {
        Record::new().with("name", name).with("type", kind).with("capacity", capacity)
    }

    #[test]
    fn test_classroom_rules() {
        let schema = EntityKind::Classroom.schema();
        let refs = ReferenceSet::new();

        let errors = validate_form(schema, &classroom("AB", "", "0"), &[], &refs).unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some("Name is required and should be at least 3 characters long")
        );
        assert_eq!(errors.get("type"), Some("Type is required"));
        assert_eq!(errors.get("capacity"), Some("Capacity must be a positive number"));

        assert!(validate_form(schema, &classroom("Lab 1", "Lab", "40"), &[], &refs).is_ok());
    }

    #[test]
    fn test_duplicate_name_is_case_insensitive() {
        let schema = EntityKind::Classroom.schema();
        let existing = vec![classroom("Lab 1", "Lab", "40").with("rid", 1)];
        let errors =
            validate_form(schema, &classroom("LAB 1", "Lab", "30"), &existing, &ReferenceSet::new())
                .unwrap_err();
        assert_eq!(errors.get("name"), Some("Classroom name already exists"));
    }

    #[test]
    fn test_duplicate_check_excludes_record_being_edited() {
        let schema = EntityKind::Classroom.schema();
        let existing = vec![classroom("Lab 1", "Lab", "40").with("rid", 1)];
        let edited = classroom("Lab 1", "Lab", "45").with("rid", "1");
        assert!(validate_form(schema, &edited, &existing, &ReferenceSet::new()).is_ok());
    }

    #[test]
    fn test_shift_end_must_follow_start() {
        let schema = EntityKind::Shift.schema();
        let form = Record::new()
            .with("name", "Morning")
            .with("start", "10:00")
            .with("end", "09:30")
            .with("gap", "15");
        let errors = validate_form(schema, &form, &[], &ReferenceSet::new()).unwrap_err();
        assert_eq!(errors.get("end"), Some("End time must be later than start time"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_shift_gap_must_be_positive() {
        let schema = EntityKind::Shift.schema();
        let form = Record::new()
            .with("name", "Morning")
            .with("start", "08:00")
            .with("end", "12:00")
            .with("gap", 0);
        let errors = validate_form(schema, &form, &[], &ReferenceSet::new()).unwrap_err();
        assert_eq!(errors.get("gap"), Some("Gap must be a positive number"));
    }

    #[test]
    fn test_program_section_must_exist_when_loaded() {
        let schema = EntityKind::Program.schema();
        let form = Record::new().with("name", "BSc").with("alias", "BS").with("sid", "9");

        // Not loaded: skipped.
        assert!(validate_form(schema, &form, &[], &ReferenceSet::new()).is_ok());

        let refs = ReferenceSet::new().with(
            EntityKind::Section,
            vec![Record::new().with("sid", 1).with("name", "A")],
        );
        let errors = validate_form(schema, &form, &[], &refs).unwrap_err();
        assert_eq!(
            errors.get("sid"),
            Some("Selected section not found. Please choose a valid section.")
        );
    }

    #[test]
    fn test_course_max_lecture_required_and_numeric() {
        let schema = EntityKind::Course.schema();
        let base = Record::new()
            .with("name", "Data Structures")
            .with("alias", "DS")
            .with("course_code", "CS201")
            .with("category", "Core")
            .with("duration", "1 Semester")
            .with("did", 1)
            .with("pid", 1)
            .with("yid", 1)
            .with("semid", 1);
        let missing = validate_form(schema, &base, &[], &ReferenceSet::new()).unwrap_err();
        assert_eq!(missing.get("max_lecture"), Some("Max Lecture must be a number"));
        assert_eq!(missing.len(), 1);

        let ok = base.clone().with("max_lecture", "4");
        assert!(validate_form(schema, &ok, &[], &ReferenceSet::new()).is_ok());

        let bad = base.clone().with("max_lecture", "four");
        let errors = validate_form(schema, &bad, &[], &ReferenceSet::new()).unwrap_err();
        assert_eq!(errors.get("max_lecture"), Some("Max Lecture must be a number"));
    }

    #[test]
    fn test_year_duplicate_requires_same_program() {
        let schema = EntityKind::Year.schema();
        let existing = vec![Record::new().with("yid", 1).with("name", "First").with("pid", 1)];
        let other_program = Record::new().with("name", "first").with("pid", 2);
        assert!(validate_form(schema, &other_program, &existing, &ReferenceSet::new()).is_ok());

        let same_program = Record::new().with("name", "first").with("pid", "1");
        let errors =
            validate_form(schema, &same_program, &existing, &ReferenceSet::new()).unwrap_err();
        assert_eq!(errors.get("name"), Some("Year already exists"));
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let schema = EntityKind::Faculty.schema();
        let form = Record::new()
            .with("name", "Dr. Rao")
            .with("entrytime", "09:00")
            .with("exittime", "17:00");
        let errors = validate_form(schema, &form, &[], &ReferenceSet::new()).unwrap_err();
        assert_eq!(
            errors.get("max_allowed_lecture"),
            Some("Max allowed lecture must be a number")
        );
        assert_eq!(errors.len(), 1);
    }
}
