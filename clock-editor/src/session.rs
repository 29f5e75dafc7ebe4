//! Editing session over a routine document.
//!
//! Holds a draft (start time + task rows per routine) and the suggestion
//! state. Start times are never edited per task; `build` projects them and
//! validates the result before anything is persisted.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use clock_core::time::parse_time_to_minutes;
use clock_core::{RoutineLabel, RoutineSet, Task};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schedule::{TaskDraft, build_routine, compute_end_time, compute_start_times};
use crate::suggest::SuggestionSession;
use crate::validate::{ValidationError, validate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineDraft {
    pub start_time: String,
    pub tasks: Vec<TaskDraft>,
}

impl RoutineDraft {
    /// New routine with one blank task.
    pub fn new_for(label: RoutineLabel) -> Self {
        Self {
            start_time: label.default_start().to_string(),
            tasks: vec![TaskDraft::blank()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Start times and end time as they would be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutinePreview {
    pub tasks: Vec<Task>,
    pub end_time: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    routines: BTreeMap<RoutineLabel, RoutineDraft>,
    suggestions: SuggestionSession,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter document offered to a new user.
    pub fn example() -> Self {
        let mut s = Self::new();
        s.routines.insert(
            RoutineLabel::Morning,
            RoutineDraft {
                start_time: "07:00".to_string(),
                tasks: vec![
                    TaskDraft::new("Frühstück", 20, "🥣", "#FF9500"),
                    TaskDraft::new("Zähne putzen", 5, "🪥", "#4CAF50"),
                    TaskDraft::new("Anziehen", 10, "👕", "#2196F3"),
                ],
            },
        );
        s
    }

    /// Start editing a stored document. Metadata is dropped; the store
    /// stamps it again on save.
    pub fn from_set(set: &RoutineSet) -> Self {
        let routines = set
            .iter()
            .map(|(label, r)| {
                (
                    label,
                    RoutineDraft {
                        start_time: r.start_time.clone(),
                        tasks: r.tasks.iter().map(TaskDraft::from).collect(),
                    },
                )
            })
            .collect();
        Self {
            routines,
            suggestions: SuggestionSession::new(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = RoutineLabel> + '_ {
        self.routines.keys().copied()
    }

    pub fn routine(&self, label: RoutineLabel) -> Option<&RoutineDraft> {
        self.routines.get(&label)
    }

    /// No-op when the routine already exists.
    pub fn add_routine(&mut self, label: RoutineLabel) {
        self.routines
            .entry(label)
            .or_insert_with(|| RoutineDraft::new_for(label));
    }

    pub fn remove_routine(&mut self, label: RoutineLabel) -> bool {
        self.routines.remove(&label).is_some()
    }

    pub fn set_start_time(&mut self, label: RoutineLabel, start_time: &str) -> Result<()> {
        parse_time_to_minutes(start_time)?;
        self.routine_mut(label)?.start_time = start_time.trim().to_string();
        Ok(())
    }

    /// Append a blank task and return its index.
    pub fn add_task(&mut self, label: RoutineLabel) -> Result<usize> {
        let r = self.routine_mut(label)?;
        r.tasks.push(TaskDraft::blank());
        Ok(r.tasks.len() - 1)
    }

    pub fn remove_task(&mut self, label: RoutineLabel, index: usize) -> Result<TaskDraft> {
        let r = self.routine_mut(label)?;
        if index >= r.tasks.len() {
            bail!("{label} routine has no task {}", index + 1);
        }
        Ok(r.tasks.remove(index))
    }

    /// Swap with the neighbour. Moving past either end leaves the order
    /// unchanged and returns `false`.
    pub fn move_task(&mut self, label: RoutineLabel, index: usize, dir: Direction) -> Result<bool> {
        let r = self.routine_mut(label)?;
        let target = match dir {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1),
        };
        match target {
            Some(t) if index < r.tasks.len() && t < r.tasks.len() => {
                r.tasks.swap(index, t);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Rename and refresh the icon/colour from the new name unless the user
    /// set them by hand.
    pub fn rename_task(&mut self, label: RoutineLabel, index: usize, name: &str) -> Result<()> {
        let task = self.task_mut(label, index)?;
        task.name = name.to_string();
        if task.icon_pinned && task.color_pinned {
            return Ok(());
        }

        let Some(s) = self.suggestions.suggest(name) else {
            return Ok(());
        };
        let task = self.task_mut(label, index)?;
        if !task.icon_pinned {
            task.icon = s.icon;
        }
        if !task.color_pinned {
            task.color = s.color;
        }
        debug!(%label, index, icon = %task.icon, color = %task.color, "applied suggestion");
        Ok(())
    }

    pub fn set_duration(&mut self, label: RoutineLabel, index: usize, minutes: i32) -> Result<()> {
        if minutes <= 0 {
            bail!("duration must be at least one minute, got {minutes}");
        }
        self.task_mut(label, index)?.duration = minutes;
        Ok(())
    }

    pub fn set_icon(&mut self, label: RoutineLabel, index: usize, icon: &str) -> Result<()> {
        let task = self.task_mut(label, index)?;
        task.icon = icon.to_string();
        task.icon_pinned = true;
        Ok(())
    }

    pub fn set_color(&mut self, label: RoutineLabel, index: usize, color: &str) -> Result<()> {
        let task = self.task_mut(label, index)?;
        task.color = color.to_string();
        task.color_pinned = true;
        Ok(())
    }

    /// Computed start times and end time for one routine, as shown while
    /// editing.
    pub fn preview(&self, label: RoutineLabel) -> Result<Option<RoutinePreview>> {
        let Some(r) = self.routines.get(&label) else {
            return Ok(None);
        };
        Ok(Some(RoutinePreview {
            tasks: compute_start_times(&r.start_time, &r.tasks)?,
            end_time: compute_end_time(&r.start_time, &r.tasks)?,
        }))
    }

    /// Project start/end times and validate. The result is what gets saved.
    pub fn build(&self) -> std::result::Result<RoutineSet, Vec<ValidationError>> {
        let mut set = RoutineSet::default();
        let mut errors = Vec::new();

        for (&label, draft) in &self.routines {
            match build_routine(&draft.start_time, &draft.tasks) {
                Ok(routine) => set.set(label, Some(routine)),
                Err(_) => errors.push(ValidationError::InvalidStartTime(
                    label,
                    draft.start_time.clone(),
                )),
            }
        }

        errors.extend(validate(&set));
        if errors.is_empty() { Ok(set) } else { Err(errors) }
    }

    /// Start the fallback colour rotation over.
    pub fn reset_suggestions(&mut self) {
        self.suggestions.reset();
    }

    fn routine_mut(&mut self, label: RoutineLabel) -> Result<&mut RoutineDraft> {
        self.routines
            .get_mut(&label)
            .ok_or_else(|| anyhow::anyhow!("no {label} routine in this document"))
    }

    fn task_mut(&mut self, label: RoutineLabel, index: usize) -> Result<&mut TaskDraft> {
        self.routine_mut(label)?
            .tasks
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("{label} routine has no task {}", index + 1))
    }
}
