use chrono::{Duration, NaiveDate, NaiveDateTime};
use clock_core::{
    ArcStyle, Routine, RoutineLabel, RoutineSet, Task, TaskState, WindowPolicy, arc_parts,
    build_view,
};

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// Evening routine straddling the top of the hour.
fn evening() -> RoutineSet {
    RoutineSet {
        evening: Some(Routine {
            start_time: "19:50".into(),
            end_time: "20:15".into(),
            tasks: vec![
                Task::new("Bath", "19:50", 15),
                Task::new("Story", "20:05", 10),
            ],
        }),
        ..Default::default()
    }
}

/// Tick once per second across the whole bath: progress only grows, the
/// split stays inside the wedge, and the wedge never splits at 12 o'clock.
#[test]
fn test_progress_is_monotonic_across_hour_boundary() {
    let set = evening();
    let policy = WindowPolicy::default();

    let start = at(19, 50, 0);
    let mut last_progress = -1.0;

    for sec in 0..(15 * 60) {
        let now = start + Duration::seconds(sec);
        let view = build_view(&set, &now, policy).unwrap();
        assert_eq!(view.label, Some(RoutineLabel::Evening));

        let bath = &view.tasks[0];
        assert_eq!(bath.state, TaskState::Running);
        assert_eq!((bath.start_angle, bath.end_angle), (300.0, 390.0));

        let p = bath.progress.unwrap();
        assert!(p >= last_progress, "progress went backwards at +{sec}s");
        last_progress = p;

        let split = bath.split_angle().unwrap();
        assert!((300.0..=390.0).contains(&split));

        let parts = arc_parts(bath);
        assert!(parts.iter().all(|a| a.end_angle > a.start_angle));
        assert_eq!(parts.last().map(|a| a.style), Some(ArcStyle::Future));
    }

    // First second after the bath: finished, the story is running.
    let view = build_view(&set, &at(20, 5, 0), policy).unwrap();
    assert_eq!(view.tasks[0].state, TaskState::Finished);
    assert_eq!(view.running().unwrap().task.name, "Story");
    assert_eq!(
        (view.tasks[1].start_angle, view.tasks[1].end_angle),
        (30.0, 90.0)
    );
}

#[test]
fn test_dial_clears_fifteen_minutes_after_routine() {
    let set = evening();
    let policy = WindowPolicy::default();

    let view = build_view(&set, &at(20, 29, 59), policy).unwrap();
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].task.name, "Story");

    assert!(build_view(&set, &at(20, 30, 0), policy).unwrap().is_idle());
}
