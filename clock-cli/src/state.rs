use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$ROUTINE_CLOCK_HOME`, or `~/.routine-clock`.
pub fn clock_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ROUTINE_CLOCK_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".routine-clock"))
}

pub fn ensure_clock_home() -> Result<PathBuf> {
    let dir = clock_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn routines_dir() -> Result<PathBuf> {
    let dir = ensure_clock_home()?.join("routines");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
