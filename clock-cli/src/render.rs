//! SVG rendering of a dial view. Pure markup; every decision (what is
//! visible, where arcs start, where the split is) comes from clock-core.

use clock_core::dial::{ArcPart, ArcStyle, arc_parts, label_angle, minute_markers, polar};
use clock_core::{DialView, VisibleTask};

const PAST_OPACITY: f64 = 0.35;
const FUTURE_OPACITY: f64 = 0.85;

struct Geometry {
    center: (f64, f64),
    radius: f64,
}

impl Geometry {
    fn new(size: u32) -> Self {
        let size = f64::from(size);
        Self {
            center: (size / 2.0, size / 2.0),
            radius: size * 0.4,
        }
    }

    fn at(&self, radius: f64, angle: f64) -> (f64, f64) {
        polar(self.center, radius, angle)
    }
}

/// Wedge between two radii, clockwise from `part.start_angle`.
fn wedge_path(g: &Geometry, part: &ArcPart, inner: f64, outer: f64) -> String {
    let (x1, y1) = g.at(inner, part.start_angle);
    let (x2, y2) = g.at(outer, part.start_angle);
    let (x3, y3) = g.at(outer, part.end_angle);
    let (x4, y4) = g.at(inner, part.end_angle);
    let large_arc = u8::from(part.sweep() > 180.0);

    format!(
        "M {x1:.2} {y1:.2} L {x2:.2} {y2:.2} A {outer:.2} {outer:.2} 0 {large_arc} 1 {x3:.2} {y3:.2} \
         L {x4:.2} {y4:.2} A {inner:.2} {inner:.2} 0 {large_arc} 0 {x1:.2} {y1:.2} Z"
    )
}

fn line(svg: &mut String, text: String) {
    svg.push_str(&text);
    svg.push('\n');
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn write_segment(svg: &mut String, g: &Geometry, task: &VisibleTask) {
    let inner = g.radius * 0.6;
    let outer = g.radius * 0.95;
    let color = escape(&task.task.color);

    for part in arc_parts(task) {
        let opacity = match part.style {
            ArcStyle::Past => PAST_OPACITY,
            ArcStyle::Future if task.is_active => 1.0,
            ArcStyle::Future => FUTURE_OPACITY,
        };
        let path = format!(
            r#"  <path class="segment {style}" d="{d}" fill="{color}" opacity="{opacity}" stroke="white" stroke-width="2"/>"#,
            style = match part.style {
                ArcStyle::Past => "past",
                ArcStyle::Future => "future",
            },
            d = wedge_path(g, &part, inner, outer),
        );
        line(svg, path);
    }

    if task.arc_degrees().abs() < f64::EPSILON {
        return;
    }
    let (x, y) = g.at(g.radius * 0.7, label_angle(task));
    let label = format!(
        r#"  <g class="label" transform="translate({x:.2}, {y:.2})"><text text-anchor="middle" dominant-baseline="middle" font-size="32" dy="-12">{icon}</text><text text-anchor="middle" dominant-baseline="middle" font-size="16" font-weight="bold" fill="white" dy="12">{name}</text></g>"#,
        icon = escape(&task.task.icon),
        name = escape(&task.task.name),
    );
    line(svg, label);
}

/// Full clock face for one tick.
pub fn render_svg(view: &DialView, size: u32) -> String {
    let g = Geometry::new(size);
    let (cx, cy) = g.center;
    let mut svg = String::new();

    let open = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    line(&mut svg, open);
    let face = format!(
        r##"  <circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="white" stroke="#ddd" stroke-width="4"/>"##,
        r = g.radius,
    );
    line(&mut svg, face);

    for task in &view.tasks {
        write_segment(&mut svg, &g, task);
    }

    for (angle, label) in minute_markers() {
        let (x, y) = g.at(g.radius * 0.85, angle);
        let marker = format!(
            r##"  <text class="minute-marker" x="{x:.2}" y="{y:.2}" text-anchor="middle" dominant-baseline="middle" font-size="24" font-weight="bold" fill="#333">{label}</text>"##
        );
        line(&mut svg, marker);
    }

    let dot = format!(r##"  <circle cx="{cx:.2}" cy="{cy:.2}" r="8" fill="#333"/>"##);
    line(&mut svg, dot);

    for (angle, length, width) in [
        (view.hands.hour, g.radius * 0.5, 8),
        (view.hands.minute, g.radius * 0.75, 6),
    ] {
        let (x, y) = g.at(length, angle);
        let hand = format!(
            r##"  <line class="hand" x1="{cx:.2}" y1="{cy:.2}" x2="{x:.2}" y2="{y:.2}" stroke="#333" stroke-width="{width}" stroke-linecap="round"/>"##
        );
        line(&mut svg, hand);
    }

    let caption = match view.label {
        Some(label) => format!("{} · {label}", view.now),
        None => format!("{} · nothing scheduled", view.now),
    };
    let text = format!(
        r##"  <text class="digital-time" x="{cx:.2}" y="{y:.2}" text-anchor="middle" font-size="28" fill="#333">{caption}</text>"##,
        y = cy + g.radius + 40.0,
        caption = escape(&caption),
    );
    line(&mut svg, text);

    svg.push_str("</svg>\n");
    svg
}
