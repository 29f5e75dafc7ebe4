//! One tick's worth of engine output, ready for a renderer.

use anyhow::Result;
use chrono::Timelike;
use serde::Serialize;

use crate::dial::{HandAngles, hand_angles};
use crate::routine::{RoutineLabel, RoutineSet};
use crate::selector::select_active;
use crate::time::{format_minutes, minutes_since_midnight};
use crate::window::{VisibleTask, WindowPolicy, compute_visible_tasks};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialView {
    /// "HH:MM" of the tick.
    pub now: String,
    pub hands: HandAngles,
    /// `None` when nothing is scheduled around now.
    pub label: Option<RoutineLabel>,
    pub routine_window: Option<(String, String)>,
    pub tasks: Vec<VisibleTask>,
}

impl DialView {
    pub fn is_idle(&self) -> bool {
        self.label.is_none()
    }

    pub fn running(&self) -> Option<&VisibleTask> {
        self.tasks.iter().find(|t| t.is_active)
    }
}

/// Select the active routine and project its tasks. A full recomputation,
/// meant to be called once per tick.
pub fn build_view<T: Timelike>(set: &RoutineSet, now: &T, policy: WindowPolicy) -> Result<DialView> {
    let active = select_active(set, now, policy)?;

    let (label, routine_window, tasks) = match active {
        Some(a) => (
            Some(a.label),
            Some((a.routine.start_time.clone(), a.routine.end_time.clone())),
            compute_visible_tasks(&a.routine.tasks, now, policy)?,
        ),
        None => (None, None, Vec::new()),
    };

    Ok(DialView {
        now: format_minutes(minutes_since_midnight(now)),
        hands: hand_angles(now),
        label,
        routine_window,
        tasks,
    })
}
