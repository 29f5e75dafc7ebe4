//! Routine selection: which of the (at most two) routines owns the dial now.

use anyhow::Result;
use chrono::Timelike;
use serde::Serialize;
use tracing::debug;

use crate::routine::{Routine, RoutineLabel, RoutineSet};
use crate::time::minutes_since_midnight;
use crate::window::{WindowPolicy, any_visible};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveRoutine<'a> {
    pub label: RoutineLabel,
    pub routine: &'a Routine,
}

/// Pick the first routine, in label priority order, with at least one task
/// inside the visibility window.
///
/// `Ok(None)` means nothing is scheduled around `now`. Overlapping routines
/// are assumed to have been rejected by the editor; if they slip through,
/// morning wins.
pub fn select_active<'a, T: Timelike>(
    set: &'a RoutineSet,
    now: &T,
    policy: WindowPolicy,
) -> Result<Option<ActiveRoutine<'a>>> {
    select_active_at(set, minutes_since_midnight(now), policy)
}

pub fn select_active_at(
    set: &RoutineSet,
    now_minutes: i32,
    policy: WindowPolicy,
) -> Result<Option<ActiveRoutine<'_>>> {
    for (label, routine) in set.iter() {
        if any_visible(&routine.tasks, now_minutes, policy)? {
            debug!(%label, now_minutes, "active routine");
            return Ok(Some(ActiveRoutine { label, routine }));
        }
    }
    debug!(now_minutes, "no active routine");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::NaiveTime;

    fn routine(start: &str, tasks: Vec<Task>) -> Routine {
        Routine {
            start_time: start.to_string(),
            end_time: start.to_string(),
            tasks,
        }
    }

    fn sample_set() -> RoutineSet {
        RoutineSet {
            morning: Some(routine(
                "07:00",
                vec![Task::new("Breakfast", "07:00", 20), Task::new("Dress", "07:20", 10)],
            )),
            evening: Some(routine(
                "18:30",
                vec![Task::new("Dinner", "18:30", 30), Task::new("Story", "19:00", 15)],
            )),
            ..Default::default()
        }
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn morning_selected_when_only_it_is_in_window() {
        let set = sample_set();
        let active = select_active(&set, &at(7, 5), WindowPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(active.label, RoutineLabel::Morning);
        assert_eq!(active.routine.tasks[0].name, "Breakfast");
    }

    #[test]
    fn evening_selected_when_only_it_is_in_window() {
        let set = sample_set();
        let active = select_active(&set, &at(18, 0), WindowPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(active.label, RoutineLabel::Evening);
    }

    #[test]
    fn upcoming_routine_is_active_before_it_starts() {
        let set = sample_set();
        // Breakfast starts in 44 minutes.
        let active = select_active(&set, &at(6, 16), WindowPolicy::default()).unwrap();
        assert_eq!(active.map(|a| a.label), Some(RoutineLabel::Morning));
        // ...but not 45 minutes ahead.
        assert!(select_active(&set, &at(6, 15), WindowPolicy::default()).unwrap().is_none());
    }

    #[test]
    fn nothing_scheduled_is_none() {
        let set = sample_set();
        assert!(select_active(&set, &at(12, 0), WindowPolicy::default()).unwrap().is_none());
        assert!(select_active(&RoutineSet::default(), &at(7, 0), WindowPolicy::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn morning_wins_when_both_are_visible() {
        // Overlap is invalid upstream, but selection must stay deterministic.
        let set = RoutineSet {
            morning: Some(routine("07:00", vec![Task::new("a", "07:00", 10)])),
            evening: Some(routine("07:05", vec![Task::new("b", "07:05", 10)])),
            ..Default::default()
        };
        let active = select_active(&set, &at(7, 6), WindowPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(active.label, RoutineLabel::Morning);
    }

    #[test]
    fn evening_alone_in_document() {
        let set = RoutineSet {
            evening: Some(routine("19:00", vec![Task::new("Bath", "19:00", 20)])),
            ..Default::default()
        };
        let active = select_active(&set, &at(19, 10), WindowPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(active.label, RoutineLabel::Evening);
    }
}
