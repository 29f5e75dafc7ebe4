//! Where "now" comes from. The engine never reads a clock itself; the host
//! picks a source and passes its reading in.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use clock_core::time::parse_time_to_minutes;
use std::time::Instant;

pub trait ClockSource {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock seeded at a chosen time that then runs at real speed.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    seed: NaiveDateTime,
    started: Instant,
}

impl SimulatedClock {
    pub fn new(seed: NaiveDateTime) -> Self {
        Self {
            seed,
            started: Instant::now(),
        }
    }

    /// Seed "HH:MM" on today's date, seconds zeroed.
    pub fn from_hh_mm(s: &str) -> Result<Self> {
        Ok(Self::new(seed_today(s, Local::now().date_naive())?))
    }

    /// Reading after `elapsed` real time.
    pub fn at_elapsed(&self, elapsed: std::time::Duration) -> NaiveDateTime {
        let secs = i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX);
        self.seed + Duration::seconds(secs)
    }
}

impl ClockSource for SimulatedClock {
    fn now(&self) -> NaiveDateTime {
        self.at_elapsed(self.started.elapsed())
    }
}

fn seed_today(s: &str, day: chrono::NaiveDate) -> Result<NaiveDateTime> {
    let minutes = parse_time_to_minutes(s)?;
    let minutes = u32::try_from(minutes).context("negative minutes")?;
    let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
        .with_context(|| format!("invalid time '{s}'"))?;
    Ok(day.and_time(time))
}

/// `--time HH:MM` picks a simulated clock, otherwise the wall clock.
pub fn clock_from_arg(time: Option<&str>) -> Result<Box<dyn ClockSource>> {
    Ok(match time {
        Some(t) => Box::new(SimulatedClock::from_hh_mm(t)?),
        None => Box::new(SystemClock),
    })
}
