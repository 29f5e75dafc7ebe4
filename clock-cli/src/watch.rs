//! Live terminal clock. One full engine recomputation per tick; keys are
//! read from crossterm's event stream alongside the ticker.

use anyhow::Result;
use clock_core::dial::{ArcStyle, arc_parts, minute_markers};
use clock_core::{DialView, RoutineSet, TaskState, WindowPolicy, build_view};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Gauge, Paragraph, Wrap,
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
    },
};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::clock::ClockSource;

/// Raw mode plus alternate screen, undone on drop so an early `?` or a
/// panic still hands the terminal back.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

pub async fn run_watch(
    set: &RoutineSet,
    clock: &dyn ClockSource,
    policy: WindowPolicy,
    tick: Duration,
) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    watch_loop(&mut terminal, set, clock, policy, tick).await
}

async fn watch_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    set: &RoutineSet,
    clock: &dyn ClockSource,
    policy: WindowPolicy,
    tick: Duration,
) -> Result<()> {
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut events = EventStream::new();
    let mut last: Option<DialView> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let view = build_view(set, &clock.now(), policy)?;
                terminal.draw(|f| draw(f, &view))?;
                last = Some(view);
            }
            ev = events.next() => match ev {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if is_quit(&key) {
                        debug!("watch: quit");
                        break;
                    }
                }
                Some(Ok(Event::Resize(..))) => {
                    if let Some(view) = &last {
                        terminal.draw(|f| draw(f, view))?;
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
                _ => {}
            },
        }
    }

    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// "#RRGGBB" -> (r, g, b).
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn task_color(color: &str, style: ArcStyle) -> Color {
    match (parse_hex(color), style) {
        (Some((r, g, b)), ArcStyle::Future) => Color::Rgb(r, g, b),
        (Some((r, g, b)), ArcStyle::Past) => Color::Rgb(r / 3, g / 3, b / 3),
        (None, ArcStyle::Future) => Color::White,
        (None, ArcStyle::Past) => Color::DarkGray,
    }
}

/// Dial angle to canvas coordinates (y up), unit radius.
fn canvas_point(radius: f64, angle_deg: f64) -> (f64, f64) {
    let a = angle_deg.to_radians();
    (radius * a.sin(), radius * a.cos())
}

fn draw(f: &mut Frame, view: &DialView) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(f.area());

    draw_dial(f, chunks[0], view);
    draw_side(f, chunks[1], view);
}

fn draw_dial(f: &mut Frame, area: ratatui::layout::Rect, view: &DialView) {
    let dial = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("routine clock"))
        .marker(Marker::Braille)
        .x_bounds([-1.2, 1.2])
        .y_bounds([-1.2, 1.2])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 1.0,
                color: Color::Gray,
            });

            for task in &view.tasks {
                for part in arc_parts(task) {
                    let mut coords = Vec::new();
                    let steps = (part.sweep().abs().ceil() as usize).max(1);
                    for i in 0..=steps {
                        let angle = part.start_angle + part.sweep() * i as f64 / steps as f64;
                        for r in [0.6, 0.7, 0.8, 0.9] {
                            coords.push(canvas_point(r, angle));
                        }
                    }
                    ctx.draw(&Points {
                        coords: &coords,
                        color: task_color(&task.task.color, part.style),
                    });
                }
            }

            ctx.layer();
            for (angle, label) in minute_markers() {
                let (x, y) = canvas_point(1.08, angle);
                ctx.print(x, y, label.to_string());
            }

            for (angle, length) in [(view.hands.hour, 0.5), (view.hands.minute, 0.75)] {
                let (x2, y2) = canvas_point(length, angle);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2,
                    y2,
                    color: Color::White,
                });
            }
        });
    f.render_widget(dial, area);
}

fn draw_side(f: &mut Frame, area: ratatui::layout::Rect, view: &DialView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let heading = match (&view.label, &view.routine_window) {
        (Some(label), Some((start, end))) => format!("{label} routine  {start}-{end}"),
        _ => "nothing scheduled".to_string(),
    };
    let header = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            view.now.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(heading, Style::default().fg(Color::Cyan))),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    if view.tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing on the clock right now.",
            Style::default().fg(Color::Gray),
        )));
    }
    for t in &view.tasks {
        let style = match t.state {
            TaskState::Running => Style::default()
                .fg(task_color(&t.task.color, ArcStyle::Future))
                .add_modifier(Modifier::BOLD),
            TaskState::NotStarted => Style::default(),
            TaskState::Finished => Style::default().fg(Color::DarkGray),
        };
        let marker = if t.is_active { "●" } else { " " };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker} {} {} {} ({} min)",
                t.task.icon, t.task.start_time, t.task.name, t.task.duration
            ),
            style,
        )));
    }
    let list = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("tasks"))
        .wrap(Wrap { trim: false });
    f.render_widget(list, chunks[1]);

    let footer_block = Block::default().borders(Borders::ALL).title("q to quit");
    match view.running() {
        Some(t) => {
            let p = t.progress.unwrap_or(0.0);
            let gauge = Gauge::default()
                .block(footer_block)
                .gauge_style(Style::default().fg(task_color(&t.task.color, ArcStyle::Future)))
                .ratio(p.clamp(0.0, 1.0))
                .label(format!("{} {:.0}%", t.task.name, p * 100.0));
            f.render_widget(gauge, chunks[2]);
        }
        None => f.render_widget(Paragraph::new("").block(footer_block), chunks[2]),
    }
}
