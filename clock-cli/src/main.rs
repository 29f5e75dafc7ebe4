use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clock_core::{RoutineSet, RoutineStore, TaskState, build_view};
use clock_editor::EditorSession;
use std::path::PathBuf;
use std::time::Duration;

mod clock;
mod config;
mod edit_cmd;
mod logging;
mod render;
mod state;
mod store;
mod watch;

use crate::clock::{ClockSource, clock_from_arg};
use crate::store::FileStore;

#[derive(Parser, Debug)]
#[command(
    name = "routine-clock",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ROUTINE_CLOCK_BUILD_SHA"), ")"),
    about = "Family routine clock: tasks on a 60-minute dial"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new routine document and print its id
    Init {
        /// Start from the example morning routine
        #[arg(long, default_value_t = false)]
        example: bool,
    },

    /// List stored routine documents
    List,

    /// Print the active routine and the tasks on the dial
    Show {
        id: String,

        /// Pretend it is HH:MM (seconds start at 00)
        #[arg(long)]
        time: Option<String>,

        /// Emit the dial view as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Render the clock face as SVG
    Render {
        id: String,

        #[arg(long)]
        time: Option<String>,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Live clock in the terminal, redrawn every tick
    Watch {
        id: String,

        /// Start the clock at HH:MM and let it run from there
        #[arg(long)]
        time: Option<String>,
    },

    /// Edit a stored routine document
    Edit {
        id: String,

        #[command(subcommand)]
        command: edit_cmd::EditCommand,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.routine-clock/config.toml with defaults
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init_tracing(&cfg.log.level)?;

    let policy = cfg.window_policy();

    match cli.command {
        Command::Init { example } => {
            let doc = if example {
                EditorSession::example()
                    .build()
                    .map_err(|errs| anyhow::anyhow!("example routine is invalid: {errs:?}"))?
            } else {
                RoutineSet::default()
            };
            let mut store = FileStore::open_default()?;
            let id = store.create(&doc)?;
            println!("{id}");
        }

        Command::List => {
            let store = FileStore::open_default()?;
            let ids = store.list()?;
            if ids.is_empty() {
                println!("No routines yet. Run: routine-clock init --example");
            }
            for id in ids {
                match store.load(&id) {
                    Ok(Some(doc)) => {
                        let windows: Vec<String> = doc
                            .iter()
                            .map(|(label, r)| format!("{label} {}-{}", r.start_time, r.end_time))
                            .collect();
                        println!("{id}  {}", windows.join(", "));
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(id = %id, error = %e, "skipping unreadable document"),
                }
            }
        }

        Command::Show { id, time, json } => {
            let doc = load_doc(&id)?;
            let now = clock_from_arg(time.as_deref())?.now();
            let view = build_view(&doc, &now, policy)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            match (&view.label, &view.routine_window) {
                (Some(label), Some((start, end))) => {
                    println!("{}  {label} routine {start}-{end}\n", view.now)
                }
                _ => {
                    println!("{}  nothing scheduled", view.now);
                    return Ok(());
                }
            }
            for t in &view.tasks {
                let status = match t.state {
                    TaskState::NotStarted => format!("in {} min", t.minutes_until_start),
                    TaskState::Running => {
                        format!("running {:.0}%", t.progress.unwrap_or(0.0) * 100.0)
                    }
                    TaskState::Finished => format!("done {} min ago", -t.minutes_until_end),
                };
                println!(
                    "{} {} {:<20} {:>3} min  {:>5.0}°-{:<5.0}°  {}",
                    t.task.start_time,
                    t.task.icon,
                    t.task.name,
                    t.task.duration,
                    t.start_angle,
                    t.end_angle,
                    status
                );
            }
        }

        Command::Render { id, time, out } => {
            let doc = load_doc(&id)?;
            let now = clock_from_arg(time.as_deref())?.now();
            let view = build_view(&doc, &now, policy)?;
            let svg = render::render_svg(&view, cfg.clock.size);

            match out {
                Some(path) => {
                    std::fs::write(&path, svg)
                        .with_context(|| format!("write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{svg}"),
            }
        }

        Command::Watch { id, time } => {
            let doc = load_doc(&id)?;
            let clock = clock_from_arg(time.as_deref())?;
            let tick = Duration::from_millis(cfg.clock.tick_ms.max(100));
            watch::run_watch(&doc, clock.as_ref(), policy, tick).await?;
        }

        Command::Edit { id, command } => {
            let mut store = FileStore::open_default()?;
            edit_cmd::run(&mut store, &id, command)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn load_doc(id: &str) -> Result<RoutineSet> {
    let store = FileStore::open_default()?;
    match store.load(id)? {
        Some(doc) => Ok(doc),
        None => bail!(
            "no routine document '{id}' in {} (see: routine-clock list)",
            store.dir().display()
        ),
    }
}
