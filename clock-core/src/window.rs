//! Visibility window + dial angle projection.
//!
//! Given a routine's tasks and "now", decide which tasks are drawn on the
//! 60-minute dial, where their arcs sit and how far a running task has got.
//! Recomputed from scratch on every tick; nothing here holds state.

use anyhow::Result;
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::task::Task;
use crate::time::{minutes_since_midnight, seconds_of_minute};

pub const DEGREES_PER_MINUTE: f64 = 6.0;

/// How far ahead and behind "now" a task stays on the dial.
///
/// The defaults add up to exactly one hour, i.e. one trip of the minute hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    /// A task starting within this many minutes is shown (exclusive).
    pub horizon_future: i32,
    /// A finished task lingers for this many minutes (exclusive).
    pub horizon_past: i32,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            horizon_future: 45,
            horizon_past: 15,
        }
    }
}

impl WindowPolicy {
    /// Offsets are task boundary minus now, in minutes.
    pub fn is_visible(&self, minutes_until_start: i32, minutes_until_end: i32) -> bool {
        let starts_soon = (0..self.horizon_future).contains(&minutes_until_start);
        let running = minutes_until_start < 0 && minutes_until_end > 0;
        let recently_finished =
            minutes_until_end <= 0 && minutes_until_end > -self.horizon_past;

        starts_soon || running || recently_finished
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskState {
    NotStarted,
    Running,
    Finished,
}

impl TaskState {
    pub fn from_offsets(minutes_until_start: i32, minutes_until_end: i32) -> Self {
        let has_started = minutes_until_start <= 0;
        let has_finished = minutes_until_end <= 0;
        match (has_started, has_finished) {
            (_, true) => TaskState::Finished,
            (true, false) => TaskState::Running,
            (false, false) => TaskState::NotStarted,
        }
    }
}

/// A task as it appears on the dial right now. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleTask {
    #[serde(flatten)]
    pub task: Task,

    pub minutes_until_start: i32,
    pub minutes_until_end: i32,

    /// Degrees, 0 = 12 o'clock, clockwise.
    pub start_angle: f64,
    /// May exceed 360 when the task crosses the top of the hour.
    pub end_angle: f64,

    pub state: TaskState,
    pub is_active: bool,

    /// Fraction of the duration already elapsed, only while running.
    pub progress: Option<f64>,
}

impl VisibleTask {
    pub fn arc_degrees(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Angle separating the elapsed ("past") part of a running task from the
    /// remaining part.
    pub fn split_angle(&self) -> Option<f64> {
        self.progress
            .map(|p| self.start_angle + p * self.arc_degrees())
    }
}

/// Project absolute task bounds onto the dial at 6° per minute-of-hour.
///
/// A task whose end minute-of-hour is smaller than its start wraps past the
/// top of the hour and gets 360° added to its end, so it stays one wedge.
pub fn dial_angles(start_minutes: i32, end_minutes: i32) -> (f64, f64) {
    let start_moh = start_minutes.rem_euclid(60);
    let end_moh = end_minutes.rem_euclid(60);

    let start_angle = f64::from(start_moh) * DEGREES_PER_MINUTE;
    let mut end_angle = f64::from(end_moh) * DEGREES_PER_MINUTE;
    if end_moh < start_moh {
        end_angle += 360.0;
    }
    (start_angle, end_angle)
}

/// Project one task, or `None` when it is outside the window.
pub fn project_task(
    task: &Task,
    now_minutes: i32,
    now_seconds: u32,
    policy: WindowPolicy,
) -> Result<Option<VisibleTask>> {
    let start = task.start_minutes()?;
    let end = start + task.duration;

    let minutes_until_start = start - now_minutes;
    let minutes_until_end = minutes_until_start + task.duration;

    if !policy.is_visible(minutes_until_start, minutes_until_end) {
        return Ok(None);
    }

    let (start_angle, end_angle) = dial_angles(start, end);
    let state = TaskState::from_offsets(minutes_until_start, minutes_until_end);

    let progress = (state == TaskState::Running).then(|| {
        let elapsed =
            f64::from((-minutes_until_start).max(0)) + f64::from(now_seconds) / 60.0;
        (elapsed / f64::from(task.duration)).clamp(0.0, 1.0)
    });

    Ok(Some(VisibleTask {
        task: task.clone(),
        minutes_until_start,
        minutes_until_end,
        start_angle,
        end_angle,
        state,
        is_active: state == TaskState::Running,
        progress,
    }))
}

/// Same as [`compute_visible_tasks`] but with "now" already split into
/// minutes since midnight and seconds.
pub fn compute_visible_tasks_at(
    tasks: &[Task],
    now_minutes: i32,
    now_seconds: u32,
    policy: WindowPolicy,
) -> Result<Vec<VisibleTask>> {
    let mut out = Vec::new();
    for task in tasks {
        if let Some(v) = project_task(task, now_minutes, now_seconds, policy)? {
            out.push(v);
        }
    }
    debug!(total = tasks.len(), visible = out.len(), now_minutes, "projected tasks");
    Ok(out)
}

/// Tasks visible on the dial at `now`, in routine order.
pub fn compute_visible_tasks<T: Timelike>(
    tasks: &[Task],
    now: &T,
    policy: WindowPolicy,
) -> Result<Vec<VisibleTask>> {
    compute_visible_tasks_at(
        tasks,
        minutes_since_midnight(now),
        seconds_of_minute(now),
        policy,
    )
}

/// True if any task would be drawn at `now_minutes`. Seconds don't matter
/// for visibility.
pub fn any_visible(tasks: &[Task], now_minutes: i32, policy: WindowPolicy) -> Result<bool> {
    for task in tasks {
        let until_start = task.start_minutes()? - now_minutes;
        if policy.is_visible(until_start, until_start + task.duration) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use proptest::prelude::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn one(task: &Task, now_minutes: i32, seconds: u32) -> Option<VisibleTask> {
        project_task(task, now_minutes, seconds, WindowPolicy::default()).unwrap()
    }

    #[test]
    fn wraparound_keeps_one_wedge() {
        // 06:55 + 10 min ends at minute-of-hour 5.
        let t = Task::new("Shoes", "06:55", 10);
        let v = one(&t, 6 * 60 + 50, 0).unwrap();
        assert_eq!(v.start_angle, 330.0);
        assert_eq!(v.end_angle, 390.0);
        assert_eq!(v.arc_degrees(), 60.0);
    }

    #[test]
    fn angles_are_absolute_minute_of_hour() {
        let a = one(&Task::new("a", "07:10", 5), 7 * 60, 0).unwrap();
        let b = one(&Task::new("b", "08:10", 5), 8 * 60, 0).unwrap();
        assert_eq!((a.start_angle, a.end_angle), (60.0, 90.0));
        assert_eq!((a.start_angle, a.end_angle), (b.start_angle, b.end_angle));
    }

    #[test]
    fn progress_split_uses_seconds() {
        // Started 4 minutes ago, 30 seconds into the current minute.
        let t = Task::new("Teeth", "07:00", 10);
        let v = one(&t, 7 * 60 + 4, 30).unwrap();
        assert_eq!(v.state, TaskState::Running);
        let p = v.progress.unwrap();
        assert!((p - 0.45).abs() < 1e-9);
        let split = v.split_angle().unwrap();
        assert!((split - (v.start_angle + 0.45 * v.arc_degrees())).abs() < 1e-9);
        assert!((split - 27.0).abs() < 1e-9);
    }

    #[test]
    fn future_boundary_is_exclusive() {
        let now = 7 * 60;
        assert!(one(&Task::new("soon", "07:44", 5), now, 0).is_some());
        assert!(one(&Task::new("edge", "07:45", 5), now, 0).is_none());
        assert!(one(&Task::new("later", "07:46", 5), now, 0).is_none());
        assert!(one(&Task::new("now", "07:00", 5), now, 0).is_some());
    }

    #[test]
    fn past_grace_is_exclusive() {
        let now = 8 * 60;
        // Ended exactly 15 minutes ago.
        assert!(one(&Task::new("gone", "07:35", 10), now, 0).is_none());
        // Ended 14 minutes ago.
        let v = one(&Task::new("recent", "07:36", 10), now, 0).unwrap();
        assert_eq!(v.state, TaskState::Finished);
        assert!(!v.is_active);
        assert!(v.progress.is_none());
    }

    #[test]
    fn task_ending_now_is_finished() {
        let v = one(&Task::new("done", "07:50", 10), 8 * 60, 0).unwrap();
        assert_eq!(v.minutes_until_end, 0);
        assert_eq!(v.state, TaskState::Finished);
    }

    #[test]
    fn task_starting_now_is_running() {
        let v = one(&Task::new("go", "08:00", 10), 8 * 60, 0).unwrap();
        assert_eq!(v.state, TaskState::Running);
        assert_eq!(v.progress, Some(0.0));
    }

    #[test]
    fn breakfast_then_dress_at_seven_oh_five() {
        let tasks = vec![
            Task::new("Breakfast", "07:00", 20),
            Task::new("Dress", "07:20", 10),
        ];
        let out = compute_visible_tasks(&tasks, &at(7, 5, 0), WindowPolicy::default()).unwrap();
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].task.name, "Breakfast");
        assert_eq!(out[0].minutes_until_start, -5);
        assert!(out[0].is_active);
        assert_eq!(out[0].progress, Some(0.25));

        assert_eq!(out[1].task.name, "Dress");
        assert_eq!(out[1].minutes_until_start, 15);
        assert_eq!(out[1].state, TaskState::NotStarted);
        assert!(!out[1].is_active);
    }

    #[test]
    fn malformed_start_time_is_an_error() {
        let tasks = vec![Task::new("bad", "7am", 10)];
        assert!(compute_visible_tasks(&tasks, &at(7, 0, 0), WindowPolicy::default()).is_err());
    }

    #[test]
    fn serializes_flat_camel_case() {
        let v = one(&Task::new("Dress", "07:20", 10), 7 * 60 + 5, 0).unwrap();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["name"], "Dress");
        assert_eq!(json["minutesUntilStart"], 15);
        assert_eq!(json["state"], "notStarted");
        assert_eq!(json["isActive"], false);
    }

    proptest! {
        #[test]
        fn offsets_and_state_are_consistent(
            start in 0i32..1440,
            duration in 1i32..120,
            now in 0i32..1440,
            seconds in 0u32..60,
        ) {
            let task = Task::new("p", crate::time::format_minutes(start), duration);
            if let Some(v) = one(&task, now, seconds) {
                prop_assert_eq!(v.minutes_until_end, v.minutes_until_start + duration);

                let states = [
                    v.minutes_until_start > 0,
                    v.minutes_until_start <= 0 && v.minutes_until_end > 0,
                    v.minutes_until_end <= 0,
                ];
                prop_assert_eq!(states.iter().filter(|s| **s).count(), 1);
                prop_assert_eq!(v.is_active, v.state == TaskState::Running);
                prop_assert_eq!(v.progress.is_some(), v.is_active);

                prop_assert!(v.start_angle >= 0.0 && v.start_angle < 360.0);
                prop_assert!(v.end_angle >= v.start_angle);
                if let Some(p) = v.progress {
                    prop_assert!((0.0..=1.0).contains(&p));
                }
            }
        }
    }
}
