//! Dial geometry shared by the renderers: hands, markers, and the
//! past/future partition of each visible arc.

use chrono::Timelike;
use serde::Serialize;

use crate::window::{TaskState, VisibleTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArcStyle {
    /// Elapsed time: drawn dimmed.
    Past,
    /// Remaining time: full colour.
    Future,
}

/// One drawable piece of a task's wedge, in dial degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcPart {
    pub start_angle: f64,
    pub end_angle: f64,
    pub style: ArcStyle,
}

impl ArcPart {
    fn new(start_angle: f64, end_angle: f64, style: ArcStyle) -> Self {
        Self {
            start_angle,
            end_angle,
            style,
        }
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn is_degenerate(&self) -> bool {
        self.sweep().abs() < f64::EPSILON
    }
}

/// Split a visible task into past and future arcs. Zero-length pieces are
/// dropped: a degenerate path must never reach the renderer.
pub fn arc_parts(task: &VisibleTask) -> Vec<ArcPart> {
    let parts = match (task.state, task.split_angle()) {
        (TaskState::Running, Some(split)) => vec![
            ArcPart::new(task.start_angle, split, ArcStyle::Past),
            ArcPart::new(split, task.end_angle, ArcStyle::Future),
        ],
        (TaskState::Finished, _) => {
            vec![ArcPart::new(task.start_angle, task.end_angle, ArcStyle::Past)]
        }
        _ => vec![ArcPart::new(task.start_angle, task.end_angle, ArcStyle::Future)],
    };

    parts.into_iter().filter(|p| !p.is_degenerate()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
}

/// Hour hand: 30° per hour + 0.5° per minute. Minute hand: 6° per minute +
/// 0.1° per second.
pub fn hand_angles<T: Timelike>(now: &T) -> HandAngles {
    let h = f64::from(now.hour() % 12);
    let m = f64::from(now.minute());
    let s = f64::from(now.second());
    HandAngles {
        hour: h * 30.0 + m * 0.5,
        minute: m * 6.0 + s * 0.1,
    }
}

/// Twelve labelled markers every five minutes; the top one reads 60.
pub fn minute_markers() -> [(f64, u32); 12] {
    std::array::from_fn(|i| {
        let i = i as u32;
        let label = if i == 0 { 60 } else { i * 5 };
        (f64::from(i) * 30.0, label)
    })
}

/// Dial angle to cartesian, 0° at 12 o'clock, clockwise, y pointing down
/// (SVG convention).
pub fn polar(center: (f64, f64), radius: f64, angle_deg: f64) -> (f64, f64) {
    let rad = (angle_deg - 90.0).to_radians();
    (center.0 + radius * rad.cos(), center.1 + radius * rad.sin())
}

/// Middle of the wedge, where the icon and name go.
pub fn label_angle(task: &VisibleTask) -> f64 {
    (task.start_angle + task.end_angle) / 2.0
}
