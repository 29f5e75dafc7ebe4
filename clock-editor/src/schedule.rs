//! Start-time projection: a routine's start plus the ordered task durations
//! fully determine every task's start and the routine's end.

use anyhow::Result;
use clock_core::time::{format_minutes, parse_time_to_minutes};
use clock_core::{Routine, Task};
use serde::{Deserialize, Serialize};

use crate::suggest::{FALLBACK_ICON, keyword_match};

/// A task as edited: everything but the computed start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub duration: i32,
    pub icon: String,
    pub color: String,

    /// Set once the user picks an icon by hand; suggestions stop touching it.
    #[serde(default)]
    pub icon_pinned: bool,
    #[serde(default)]
    pub color_pinned: bool,
}

impl TaskDraft {
    pub const DEFAULT_DURATION: i32 = 10;
    pub const DEFAULT_COLOR: &'static str = "#9E9E9E";

    /// Blank row as added by "add task".
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            duration: Self::DEFAULT_DURATION,
            icon: FALLBACK_ICON.to_string(),
            color: Self::DEFAULT_COLOR.to_string(),
            icon_pinned: false,
            color_pinned: false,
        }
    }

    pub fn new(name: impl Into<String>, duration: i32, icon: &str, color: &str) -> Self {
        Self {
            name: name.into(),
            duration,
            icon: icon.to_string(),
            color: color.to_string(),
            icon_pinned: false,
            color_pinned: false,
        }
    }
}

impl From<&Task> for TaskDraft {
    /// A stored field counts as hand-picked only when it is neither a
    /// default nor what the name would suggest anyway.
    fn from(t: &Task) -> Self {
        let suggested = keyword_match(&t.name);
        let icon_pinned = !t.icon.is_empty()
            && t.icon != FALLBACK_ICON
            && suggested.as_ref().is_none_or(|s| s.icon != t.icon);
        let color_pinned = !t.color.is_empty()
            && t.color != Self::DEFAULT_COLOR
            && suggested.as_ref().is_none_or(|s| s.color != t.color);

        Self {
            name: t.name.clone(),
            duration: t.duration,
            icon: t.icon.clone(),
            color: t.color.clone(),
            icon_pinned,
            color_pinned,
        }
    }
}

/// Lay tasks end to end from `start_time`.
pub fn compute_start_times(start_time: &str, drafts: &[TaskDraft]) -> Result<Vec<Task>> {
    let mut cursor = parse_time_to_minutes(start_time)?;
    let mut tasks = Vec::with_capacity(drafts.len());

    for d in drafts {
        tasks.push(Task {
            name: d.name.clone(),
            start_time: format_minutes(cursor),
            duration: d.duration,
            icon: d.icon.clone(),
            color: d.color.clone(),
        });
        cursor += d.duration;
    }

    Ok(tasks)
}

/// "HH:MM" end of the routine, wrapped at midnight.
pub fn compute_end_time(start_time: &str, drafts: &[TaskDraft]) -> Result<String> {
    let (_, end) = minute_range(start_time, drafts)?;
    Ok(format_minutes(end))
}

/// `[start, end)` in minutes, end not wrapped.
pub fn minute_range(start_time: &str, drafts: &[TaskDraft]) -> Result<(i32, i32)> {
    let start = parse_time_to_minutes(start_time)?;
    let total: i32 = drafts.iter().map(|d| d.duration).sum();
    Ok((start, start + total))
}

pub fn build_routine(start_time: &str, drafts: &[TaskDraft]) -> Result<Routine> {
    Ok(Routine {
        start_time: start_time.to_string(),
        end_time: compute_end_time(start_time, drafts)?,
        tasks: compute_start_times(start_time, drafts)?,
    })
}
