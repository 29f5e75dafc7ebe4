use anyhow::{Context, Result};
use clock_core::WindowPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_clock_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub clock: ClockSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    /// Minutes ahead a task appears on the dial.
    pub horizon_future: i32,
    /// Minutes a finished task lingers.
    pub horizon_past: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSection {
    /// SVG edge length in px.
    pub size: u32,
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default filter when RUST_LOG is unset.
    pub level: String,
}

impl Default for WindowSection {
    fn default() -> Self {
        let p = WindowPolicy::default();
        Self {
            horizon_future: p.horizon_future,
            horizon_past: p.horizon_past,
        }
    }
}

impl Default for ClockSection {
    fn default() -> Self {
        Self {
            size: 600,
            tick_ms: 1000,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn window_policy(&self) -> WindowPolicy {
        WindowPolicy {
            horizon_future: self.window.horizon_future,
            horizon_past: self.window.horizon_past,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_clock_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
