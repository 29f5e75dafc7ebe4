//! Task model: one segment of a routine.

use serde::{Deserialize, Serialize};

use anyhow::Result;

use crate::time::parse_time_to_minutes;

/// A single routine step as stored in a routine document.
///
/// `start_time` is never edited directly: it is projected from the routine's
/// start plus the durations of the tasks before it (see `clock-editor`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,

    /// "HH:MM" local wall-clock time.
    pub start_time: String,

    /// Minutes, > 0.
    pub duration: i32,

    pub icon: String,
    pub color: String,
}

impl Task {
    pub fn new(name: impl Into<String>, start_time: impl Into<String>, duration: i32) -> Self {
        Self {
            name: name.into(),
            start_time: start_time.into(),
            duration,
            icon: "⭐".to_string(),
            color: "#9E9E9E".to_string(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Start in minutes since midnight.
    pub fn start_minutes(&self) -> Result<i32> {
        parse_time_to_minutes(&self.start_time)
    }

    /// End in minutes since midnight. May exceed 1440 for a task that runs
    /// past midnight.
    pub fn end_minutes(&self) -> Result<i32> {
        Ok(self.start_minutes()? + self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_bounds_in_minutes() {
        let t = Task::new("Breakfast", "07:00", 20);
        assert_eq!(t.start_minutes().unwrap(), 420);
        assert_eq!(t.end_minutes().unwrap(), 440);
    }

    #[test]
    fn task_deserializes_from_document_shape() {
        let json = r##"{"name":"Dress","startTime":"07:20","duration":10,"icon":"👕","color":"#2196F3"}"##;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t, Task::new("Dress", "07:20", 10).with_icon("👕").with_color("#2196F3"));
    }
}
