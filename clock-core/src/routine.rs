//! Routines and the two-block routine document.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::time::parse_time_to_minutes;

/// The fixed label set. Declaration order is selection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineLabel {
    Morning,
    Evening,
}

impl RoutineLabel {
    /// Priority order used by the selector: morning before evening.
    pub const ALL: [RoutineLabel; 2] = [RoutineLabel::Morning, RoutineLabel::Evening];

    pub fn as_str(self) -> &'static str {
        match self {
            RoutineLabel::Morning => "morning",
            RoutineLabel::Evening => "evening",
        }
    }

    /// Start time a freshly added routine gets in the editor.
    pub fn default_start(self) -> &'static str {
        match self {
            RoutineLabel::Morning => "07:00",
            RoutineLabel::Evening => "18:00",
        }
    }
}

impl fmt::Display for RoutineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutineLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(RoutineLabel::Morning),
            "evening" => Ok(RoutineLabel::Evening),
            other => Err(anyhow::anyhow!("unknown routine '{other}' (expected morning or evening)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub start_time: String,
    /// start + sum of durations, formatted "HH:MM" (wraps at midnight).
    pub end_time: String,
    pub tasks: Vec<Task>,
}

impl Routine {
    /// `[start, end)` in minutes since midnight. `end` is not wrapped, so a
    /// routine crossing midnight has `end > 1440`.
    pub fn minute_range(&self) -> Result<(i32, i32)> {
        let start = parse_time_to_minutes(&self.start_time)?;
        let total: i32 = self.tasks.iter().map(|t| t.duration).sum();
        Ok((start, start + total))
    }
}

/// A stored routine document: at most one morning and one evening routine
/// plus opaque timestamps the engine never reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<Routine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<Routine>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl RoutineSet {
    pub fn get(&self, label: RoutineLabel) -> Option<&Routine> {
        match label {
            RoutineLabel::Morning => self.morning.as_ref(),
            RoutineLabel::Evening => self.evening.as_ref(),
        }
    }

    pub fn set(&mut self, label: RoutineLabel, routine: Option<Routine>) {
        match label {
            RoutineLabel::Morning => self.morning = routine,
            RoutineLabel::Evening => self.evening = routine,
        }
    }

    /// Present routines in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (RoutineLabel, &Routine)> {
        RoutineLabel::ALL
            .into_iter()
            .filter_map(|label| self.get(label).map(|r| (label, r)))
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_none() && self.evening.is_none()
    }
}
