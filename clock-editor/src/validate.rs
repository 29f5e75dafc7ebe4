//! Checks a routine document must pass before it is persisted.

use clock_core::{RoutineLabel, RoutineSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} routine: add at least one task")]
    NoTasks(RoutineLabel),
    #[error("{0} routine: every task needs a name")]
    MissingName(RoutineLabel),
    #[error("{label} routine: task {} needs a duration of at least one minute", .index + 1)]
    InvalidDuration { label: RoutineLabel, index: usize },
    #[error("{0} routine: start time '{1}' is not HH:MM")]
    InvalidStartTime(RoutineLabel, String),
    #[error("the morning and evening routines overlap")]
    Overlap,
}

/// All problems with `set`, in a stable order. Empty means it can be saved.
pub fn validate(set: &RoutineSet) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut ranges = Vec::new();

    for (label, routine) in set.iter() {
        if routine.tasks.is_empty() {
            errors.push(ValidationError::NoTasks(label));
        }

        // One message per routine is enough to point the user at it.
        if routine.tasks.iter().any(|t| t.name.trim().is_empty()) {
            errors.push(ValidationError::MissingName(label));
        }

        for (index, task) in routine.tasks.iter().enumerate() {
            if task.duration <= 0 {
                errors.push(ValidationError::InvalidDuration { label, index });
            }
        }

        match routine.minute_range() {
            Ok(range) => ranges.push(range),
            Err(_) => errors.push(ValidationError::InvalidStartTime(
                label,
                routine.start_time.clone(),
            )),
        }
    }

    if let [a, b] = ranges.as_slice() {
        if a.0 < b.1 && b.0 < a.1 {
            errors.push(ValidationError::Overlap);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{TaskDraft, build_routine};

    fn routine(start: &str, durations: &[i32]) -> clock_core::Routine {
        let drafts: Vec<_> = durations
            .iter()
            .enumerate()
            .map(|(i, d)| TaskDraft::new(format!("task {i}"), *d, "⭐", "#9E9E9E"))
            .collect();
        build_routine(start, &drafts).unwrap()
    }

    #[test]
    fn valid_two_block_document() {
        let set = RoutineSet {
            morning: Some(routine("07:00", &[20, 10])),
            evening: Some(routine("18:00", &[30])),
            ..Default::default()
        };
        assert!(validate(&set).is_empty());
    }

    #[test]
    fn empty_document_is_valid() {
        assert!(validate(&RoutineSet::default()).is_empty());
    }

    #[test]
    fn overlap_detected() {
        let set = RoutineSet {
            morning: Some(routine("07:00", &[30])),
            evening: Some(routine("07:20", &[10])),
            ..Default::default()
        };
        assert_eq!(validate(&set), vec![ValidationError::Overlap]);
    }

    #[test]
    fn back_to_back_routines_do_not_overlap() {
        let set = RoutineSet {
            morning: Some(routine("07:00", &[30])),
            evening: Some(routine("07:30", &[10])),
            ..Default::default()
        };
        assert!(validate(&set).is_empty());
    }

    #[test]
    fn missing_names_reported_once_per_routine() {
        let mut r = routine("07:00", &[5, 5, 5]);
        r.tasks[0].name = " ".into();
        r.tasks[2].name = String::new();
        let set = RoutineSet {
            morning: Some(r),
            ..Default::default()
        };
        assert_eq!(validate(&set), vec![ValidationError::MissingName(RoutineLabel::Morning)]);
    }

    #[test]
    fn empty_routine_and_bad_duration() {
        let mut r = routine("18:00", &[10]);
        r.tasks[0].duration = 0;
        let set = RoutineSet {
            morning: Some(routine("07:00", &[])),
            evening: Some(r),
            ..Default::default()
        };
        let errors = validate(&set);
        assert_eq!(
            errors,
            vec![
                ValidationError::NoTasks(RoutineLabel::Morning),
                ValidationError::InvalidDuration {
                    label: RoutineLabel::Evening,
                    index: 0
                },
            ]
        );
        assert_eq!(
            errors[1].to_string(),
            "evening routine: task 1 needs a duration of at least one minute"
        );
    }

    #[test]
    fn bad_start_time() {
        let mut r = routine("07:00", &[10]);
        r.start_time = "7".into();
        let set = RoutineSet {
            morning: Some(r),
            ..Default::default()
        };
        assert_eq!(
            validate(&set),
            vec![ValidationError::InvalidStartTime(RoutineLabel::Morning, "7".into())]
        );
    }
}
