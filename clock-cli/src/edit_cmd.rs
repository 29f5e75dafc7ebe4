use anyhow::{Context, Result, bail};
use clap::Subcommand;
use clock_core::{RoutineLabel, RoutineStore};
use clock_editor::{Direction, EditorSession};

use crate::store::FileStore;

#[derive(Subcommand, Debug)]
pub enum EditCommand {
    /// Add a morning or evening routine with one blank task
    AddRoutine { routine: RoutineLabel },

    /// Remove a routine and all its tasks
    RemoveRoutine { routine: RoutineLabel },

    /// Set a routine's start time (HH:MM); task times follow
    Start { routine: RoutineLabel, time: String },

    /// Append a task
    AddTask {
        routine: RoutineLabel,

        #[arg(long)]
        name: String,

        /// Minutes
        #[arg(long, default_value_t = 10)]
        duration: i32,

        /// Override the suggested icon
        #[arg(long)]
        icon: Option<String>,

        /// Override the suggested colour (#RRGGBB)
        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a task (1-based position)
    RemoveTask { routine: RoutineLabel, position: usize },

    /// Move a task one slot up or down (1-based position)
    MoveTask {
        routine: RoutineLabel,
        position: usize,

        #[arg(long, conflicts_with = "down")]
        up: bool,

        #[arg(long)]
        down: bool,
    },

    /// Rename a task; icon and colour follow unless set by hand
    RenameTask {
        routine: RoutineLabel,
        position: usize,
        name: String,
    },

    /// Change a task's duration, icon or colour
    SetTask {
        routine: RoutineLabel,
        position: usize,

        #[arg(long)]
        duration: Option<i32>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
}

fn index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .context("task positions start at 1")
}

/// Load `id`, apply one edit, validate and save.
pub fn run(store: &mut FileStore, id: &str, cmd: EditCommand) -> Result<()> {
    let doc = store
        .load(id)?
        .with_context(|| format!("no routine document '{id}' (see: routine-clock list)"))?;
    let mut session = EditorSession::from_set(&doc);

    apply(&mut session, cmd)?;

    let built = match session.build() {
        Ok(set) => set,
        Err(errors) => {
            for e in &errors {
                eprintln!("- {e}");
            }
            bail!("not saved: {} validation error(s)", errors.len());
        }
    };

    store.save(id, &built)?;

    for (label, routine) in built.iter() {
        println!("{label} {}-{}", routine.start_time, routine.end_time);
        for t in &routine.tasks {
            println!("  {} {} {} ({} min)", t.start_time, t.icon, t.name, t.duration);
        }
    }
    Ok(())
}

pub fn apply(session: &mut EditorSession, cmd: EditCommand) -> Result<()> {
    match cmd {
        EditCommand::AddRoutine { routine } => session.add_routine(routine),
        EditCommand::RemoveRoutine { routine } => {
            if !session.remove_routine(routine) {
                bail!("no {routine} routine in this document");
            }
        }
        EditCommand::Start { routine, time } => session.set_start_time(routine, &time)?,
        EditCommand::AddTask {
            routine,
            name,
            duration,
            icon,
            color,
        } => {
            let i = session.add_task(routine)?;
            session.set_duration(routine, i, duration)?;
            if let Some(icon) = icon {
                session.set_icon(routine, i, &icon)?;
            }
            if let Some(color) = color {
                session.set_color(routine, i, &color)?;
            }
            session.rename_task(routine, i, &name)?;
        }
        EditCommand::RemoveTask { routine, position } => {
            session.remove_task(routine, index(position)?)?;
        }
        EditCommand::MoveTask {
            routine,
            position,
            up,
            down,
        } => {
            let dir = match (up, down) {
                (true, false) => Direction::Up,
                (false, true) => Direction::Down,
                _ => bail!("pass exactly one of --up or --down"),
            };
            if !session.move_task(routine, index(position)?, dir)? {
                println!("Task {position} is already at the edge; order unchanged.");
            }
        }
        EditCommand::RenameTask {
            routine,
            position,
            name,
        } => session.rename_task(routine, index(position)?, &name)?,
        EditCommand::SetTask {
            routine,
            position,
            duration,
            icon,
            color,
        } => {
            let i = index(position)?;
            if let Some(d) = duration {
                session.set_duration(routine, i, d)?;
            }
            if let Some(icon) = icon {
                session.set_icon(routine, i, &icon)?;
            }
            if let Some(color) = color {
                session.set_color(routine, i, &color)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: RoutineLabel = RoutineLabel::Morning;

    #[test]
    fn add_task_suggests_then_respects_overrides() {
        let mut s = EditorSession::example();
        apply(
            &mut s,
            EditCommand::AddTask {
                routine: M,
                name: "Schuhe anziehen".into(),
                duration: 5,
                icon: None,
                color: Some("#000000".into()),
            },
        )
        .unwrap();

        let t = s.routine(M).unwrap().tasks.last().unwrap().clone();
        assert_eq!(t.icon, "👕");
        assert_eq!(t.color, "#000000");
        assert_eq!(t.duration, 5);
        assert_eq!(s.build().unwrap().morning.unwrap().end_time, "07:40");
    }

    #[test]
    fn positions_are_one_based() {
        let mut s = EditorSession::example();
        apply(&mut s, EditCommand::RemoveTask { routine: M, position: 1 }).unwrap();
        assert_eq!(s.routine(M).unwrap().tasks[0].name, "Zähne putzen");
        assert!(apply(&mut s, EditCommand::RemoveTask { routine: M, position: 0 }).is_err());
    }

    #[test]
    fn move_needs_a_direction() {
        let mut s = EditorSession::example();
        let cmd = EditCommand::MoveTask {
            routine: M,
            position: 2,
            up: false,
            down: false,
        };
        assert!(apply(&mut s, cmd).is_err());
    }
}
