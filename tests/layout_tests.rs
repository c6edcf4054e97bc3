use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use gantt_timeline::surface::{Point, Shape};
use gantt_timeline::{
    ChronoCalendar, Gantt, GanttError, GanttEvents, GanttOptions, RenderState, Scene, Surface,
    Task, TaskRecord, ViewMode,
};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
}

fn calendar() -> ChronoCalendar {
    ChronoCalendar::pinned(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
}

fn two_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord::new("A", "Design", "01-01-2024", "03-01-2024"),
        TaskRecord::new("B", "Build", "05-01-2024", "07-01-2024").depends_on("A"),
    ]
}

fn chart(records: Vec<TaskRecord>) -> Gantt {
    Gantt::new(records, GanttOptions::default(), calendar(), GanttEvents::default()).unwrap()
}

fn rendered(records: Vec<TaskRecord>) -> (Gantt, Scene, RenderState) {
    let gantt = chart(records);
    let mut scene = Scene::new(1200.0);
    let state = gantt.render(&mut scene);
    (gantt, scene, state)
}

fn texts(scene: &Scene, class: &str) -> Vec<String> {
    scene
        .select_class(class)
        .into_iter()
        .filter_map(|id| match &scene.node(id)?.shape {
            Shape::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn day_mode_two_task_chart() {
    let (gantt, _scene, state) = rendered(two_tasks());

    assert_eq!(gantt.range().start, at(2023, 12, 1));
    assert_eq!(gantt.range().end, at(2024, 3, 1) - Duration::milliseconds(1));
    assert_eq!(gantt.ticks().len(), 92);
    assert_eq!(state.bars.len(), 2);
    assert_eq!(state.arrows.len(), 1);
    assert_eq!(state.arrows[0].from_id, "A");
    assert_eq!(state.arrows[0].to_id, "B");

    let a = state.bars[0].rect();
    let b = state.bars[1].rect();
    assert_eq!(a.x, 1216.0);
    assert_eq!(a.width, 76.0);
    assert_eq!(b.x, 1368.0);
    assert!(b.x > a.x + a.width);

    // Both bars know about the arrow between them.
    assert_eq!(state.bars[0].arrows, vec![0]);
    assert_eq!(state.bars[1].arrows, vec![0]);
}

#[test]
fn axis_origin_sits_at_label_width_in_every_mode() {
    let mut gantt = chart(two_tasks());
    let mut scene = Scene::new(1200.0);
    for mode in ViewMode::ALL {
        gantt.set_view_mode(&mut scene, mode).unwrap();
        let viewport = gantt.viewport();
        assert_eq!(viewport.date_to_x(gantt.range().start), gantt.options().label_width, "{mode}");
        assert_eq!(gantt.ticks()[0], gantt.range().start, "{mode}");
    }
}

#[test]
fn switching_modes_and_back_restores_the_layout() {
    let (mut gantt, mut scene, before) = rendered(two_tasks());

    let week = gantt.set_view_mode(&mut scene, ViewMode::Week).unwrap();
    assert_eq!(gantt.options().column_width, 140.0);
    assert_eq!(gantt.options().step, 168.0);
    for (day_bar, week_bar) in before.bars.iter().zip(&week.bars) {
        assert_eq!(day_bar.rect().y, week_bar.rect().y);
    }

    let after = gantt.set_view_mode(&mut scene, ViewMode::Day).unwrap();
    assert_eq!(gantt.ticks().len(), 92);
    for (x, y) in before.bars.iter().zip(&after.bars) {
        assert_eq!(x.rect(), y.rect());
    }
}

#[test]
fn rows_stack_by_insertion_order() {
    let (gantt, _scene, state) = rendered(two_tasks());
    let o = gantt.options();
    for (i, bar) in state.bars.iter().enumerate() {
        let expected = o.header_height + o.padding + i as f64 * (o.bar_height + o.padding);
        assert_eq!(bar.rect().y, expected);
        assert_eq!(bar.task.index, i);
    }
}

#[test]
fn adding_a_task_inside_the_range_keeps_it() {
    let (mut gantt, mut scene, _) = rendered(two_tasks());
    let range = gantt.range();

    let state = gantt
        .add_task(&mut scene, TaskRecord::new("C", "Test", "10-01-2024", "12-01-2024"))
        .unwrap();
    assert_eq!(gantt.range(), range);
    assert_eq!(state.bars.len(), 3);
    assert_eq!(state.bars[2].task.index, 2);
}

#[test]
fn adding_a_task_outside_the_range_widens_it() {
    let (mut gantt, mut scene, _) = rendered(two_tasks());

    gantt
        .add_task(&mut scene, TaskRecord::new("C", "Ship", "10-05-2024", "20-05-2024"))
        .unwrap();
    assert_eq!(gantt.range().start, at(2023, 12, 1));
    assert_eq!(gantt.range().end, at(2024, 7, 1) - Duration::milliseconds(1));
    assert!(gantt.ticks().len() > 92);
}

#[test]
fn adding_a_duplicate_id_is_rejected() {
    let (mut gantt, mut scene, _) = rendered(two_tasks());
    let err = gantt
        .add_task(&mut scene, TaskRecord::new("A", "Again", "10-01-2024", "12-01-2024"))
        .err()
        .expect("duplicate id accepted");
    assert!(matches!(err, GanttError::DuplicateTaskId(id) if id == "A"));
    assert_eq!(gantt.tasks().len(), 2);
}

#[test]
fn dependency_lists_tolerate_spacing() {
    let mut records = two_tasks();
    records[1].dependent = None;
    records.push(TaskRecord::new("C", "Test", "08-01-2024", "09-01-2024").depends_on("A,B"));
    records.push(TaskRecord::new("D", "Ship", "10-01-2024", "11-01-2024").depends_on("B, A"));
    let (_gantt, _scene, state) = rendered(records);

    assert_eq!(state.arrows.len(), 4);
    assert_eq!(state.bars[0].arrows.len(), 2);
    assert_eq!(state.bars[1].arrows.len(), 2);
}

#[test]
fn unknown_dependencies_are_skipped() {
    let mut records = two_tasks();
    records[1].dependent = Some("A, ghost".into());
    let (_gantt, _scene, state) = rendered(records);
    assert_eq!(state.arrows.len(), 1);
}

#[test]
fn invalid_task_renders_a_placeholder() {
    let mut records = two_tasks();
    records.push(TaskRecord {
        id: "C".into(),
        name: "Undated".into(),
        end: Some("09-01-2024".into()),
        ..Default::default()
    });
    let (gantt, scene, state) = rendered(records);

    let task: &Task = gantt.task("C").unwrap();
    assert!(task.invalid);
    assert_eq!(task.start, at(2024, 1, 2));
    assert_eq!(task.end, at(2024, 1, 4));
    assert_eq!(state.bars[2].rect().width, 76.0);
    assert_eq!(scene.select_class("bar-invalid").len(), 1);
}

#[test]
fn duplicate_ids_fail_construction() {
    let mut records = two_tasks();
    records[1].id = "A".into();
    let err = Gantt::new(records, GanttOptions::default(), calendar(), GanttEvents::default())
        .err()
        .expect("duplicate ids accepted");
    assert!(matches!(err, GanttError::DuplicateTaskId(_)));
}

#[test]
fn unknown_mode_name_leaves_the_chart_alone() {
    let (mut gantt, mut scene, _) = rendered(two_tasks());
    let err = gantt
        .set_view_mode_by_name(&mut scene, "Fortnight")
        .err()
        .expect("unknown mode accepted");
    assert!(matches!(err, GanttError::UnknownViewMode(name) if name == "Fortnight"));
    assert_eq!(gantt.view_mode(), ViewMode::Day);

    gantt.set_view_mode_by_name(&mut scene, "Half Day").unwrap();
    assert_eq!(gantt.view_mode(), ViewMode::HalfDay);
}

#[test]
fn disabled_modes_are_refused() {
    let options = GanttOptions {
        valid_view_modes: vec![ViewMode::Day, ViewMode::Week],
        ..GanttOptions::default()
    };
    let mut gantt = Gantt::new(two_tasks(), options.clone(), calendar(), GanttEvents::default()).unwrap();
    let mut scene = Scene::new(1200.0);
    assert!(matches!(
        gantt.set_view_mode(&mut scene, ViewMode::Month).err(),
        Some(GanttError::UnsupportedViewMode(ViewMode::Month))
    ));
    assert_eq!(gantt.view_mode(), ViewMode::Day);

    let start_in_month = GanttOptions {
        view_mode: ViewMode::Month,
        ..options
    };
    assert!(Gantt::new(two_tasks(), start_in_month, calendar(), GanttEvents::default()).is_err());
}

#[test]
fn week_header_names_iso_weeks() {
    let (mut gantt, mut scene, _) = rendered(two_tasks());
    gantt.set_view_mode(&mut scene, ViewMode::Week).unwrap();

    let primary = texts(&scene, "primary-text");
    assert_eq!(primary.len(), gantt.ticks().len());
    assert!(primary.contains(&"Week 1".to_string()));
    assert_eq!(primary[0], "Week 48");
}

#[test]
fn mondays_get_thick_ticks_in_day_mode() {
    let (gantt, scene, _) = rendered(two_tasks());
    let thick = scene.select_class("thick").len();
    let mondays = gantt
        .ticks()
        .iter()
        .filter(|t| chrono::Datelike::weekday(*t) == chrono::Weekday::Mon)
        .count();
    assert_eq!(thick, mondays);
    assert_eq!(scene.select_class("tick").len(), gantt.ticks().len());
}

#[test]
fn today_is_highlighted_only_in_day_mode() {
    let (mut gantt, mut scene, _) = rendered(two_tasks());
    let highlight = scene.select_class("today-highlight");
    assert_eq!(highlight.len(), 1);
    let x = scene.bbox(highlight[0]).unwrap().x;
    assert_eq!(x, gantt.viewport().date_to_x(at(2024, 1, 2)));

    gantt.set_view_mode(&mut scene, ViewMode::Week).unwrap();
    assert!(scene.select_class("today-highlight").is_empty());
}

#[test]
fn today_outside_the_range_is_not_highlighted() {
    let gantt = Gantt::new(
        two_tasks(),
        GanttOptions::default(),
        ChronoCalendar::pinned(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
        GanttEvents::default(),
    )
    .unwrap();
    let mut scene = Scene::new(1200.0);
    gantt.render(&mut scene);
    assert!(scene.select_class("today-highlight").is_empty());
}

#[test]
fn month_labels_past_the_grid_are_dropped() {
    let (_gantt, scene, _) = rendered(two_tasks());
    assert_eq!(texts(&scene, "secondary-text"), vec!["December", "January", "February"]);
}

#[test]
fn view_mode_callback_sees_the_new_mode() {
    let seen: Rc<RefCell<Vec<ViewMode>>> = Rc::default();
    let sink = seen.clone();
    let events = GanttEvents {
        on_view_mode_change: Some(Box::new(move |mode: ViewMode| sink.borrow_mut().push(mode))),
        ..GanttEvents::default()
    };
    let options = GanttOptions {
        valid_view_modes: vec![ViewMode::Day, ViewMode::Week],
        ..GanttOptions::default()
    };
    let mut gantt = Gantt::new(two_tasks(), options, calendar(), events).unwrap();
    let mut scene = Scene::new(1200.0);

    gantt.set_view_mode(&mut scene, ViewMode::Week).unwrap();
    assert!(gantt.set_view_mode(&mut scene, ViewMode::Month).is_err());
    assert_eq!(*seen.borrow(), vec![ViewMode::Week]);
}

#[test]
fn dragging_a_bar_reports_and_keeps_new_dates() {
    let moved: Rc<RefCell<Vec<(String, NaiveDateTime, NaiveDateTime)>>> = Rc::default();
    let sink = moved.clone();
    let events = GanttEvents {
        bar_on_date_change: Some(Rc::new(move |task: &Task, start: NaiveDateTime, end: NaiveDateTime| {
            sink.borrow_mut().push((task.id.clone(), start, end))
        })),
        ..GanttEvents::default()
    };
    let mut gantt = Gantt::new(two_tasks(), GanttOptions::default(), calendar(), events).unwrap();
    let mut scene = Scene::new(1200.0);
    let mut state = gantt.render(&mut scene);
    let arrow_before = state.arrows[0].path.clone();

    state.start_drag(0);
    state.drag_bar(&mut scene, 0, gantt_timeline::widgets::DragHandle::Move, 80.0);
    assert_ne!(state.arrows[0].path, arrow_before);

    let dates = gantt.release_bar(&mut state, 0);
    assert_eq!(dates, Some((at(2024, 1, 3), at(2024, 1, 5))));
    assert_eq!(gantt.task("A").unwrap().start, at(2024, 1, 3));
    assert_eq!(*moved.borrow(), vec![("A".to_string(), at(2024, 1, 3), at(2024, 1, 5))]);
}

#[test]
fn progress_changes_reach_the_task() {
    let (mut gantt, mut scene, mut state) = rendered(two_tasks());
    gantt.set_progress(&mut scene, &mut state, 1, 140.0);
    assert_eq!(gantt.task("B").unwrap().progress, 100.0);
}

#[test]
fn clicking_the_background_clears_the_selection() {
    let (_gantt, mut scene, mut state) = rendered(two_tasks());
    let bar = state.bars[0].rect();

    assert_eq!(state.click_at(&mut scene, bar.center()), Some(0));
    assert_eq!(state.active_bar(&scene), Some(0));
    assert!(!scene.select_class("details-container").is_empty());

    assert_eq!(state.click_at(&mut scene, Point::new(bar.x - 200.0, bar.center().y)), None);
    assert_eq!(state.active_bar(&scene), None);
    assert!(scene.select_class("details-container").is_empty());
}

#[test]
fn initial_scroll_targets_the_earliest_task() {
    let (_gantt, _scene, state) = rendered(two_tasks());
    assert_eq!(state.scroll_x, 1216.0);
}

#[test]
fn surface_widens_only_when_content_overflows() {
    let (gantt, scene, _) = rendered(two_tasks());
    let grid_width = gantt.options().label_width + gantt.ticks().len() as f64 * 38.0;
    assert!(scene.size().0 >= grid_width);

    let mut wide = Scene::new(10_000.0);
    gantt.render(&mut wide);
    assert_eq!(wide.size().0, 10_000.0);
}

#[test]
fn empty_chart_still_has_a_ruler() {
    let (gantt, scene, state) = rendered(Vec::new());
    assert!(state.bars.is_empty());
    assert_eq!(gantt.range().start, at(2023, 12, 1));
    assert!(!scene.select_class("tick").is_empty());
    assert_eq!(state.scroll_x, 0.0);
}

#[test]
fn month_columns_follow_calendar_months() {
    let (mut gantt, mut scene, _) = rendered(two_tasks());
    gantt.set_view_mode(&mut scene, ViewMode::Month).unwrap();

    assert_eq!(gantt.range().start, at(2024, 1, 1));
    assert_eq!(gantt.ticks().len(), 14);
    let xs: Vec<f64> = scene
        .select_class("tick")
        .into_iter()
        .filter_map(|id| match &scene.node(id)?.shape {
            Shape::Path(path) => path.bounds().map(|b| b.x),
            _ => None,
        })
        .collect();
    assert_eq!(xs.len(), gantt.ticks().len());
    assert_eq!(xs[0], gantt.options().label_width);
    for (pair, tick) in xs.windows(2).zip(gantt.ticks()) {
        let days = gantt_timeline::calendar::days_in_month(*tick) as f64;
        assert!((pair[1] - pair[0] - days * 120.0 / 30.0).abs() < 1e-9);
    }

    // The 2025 label would start past the last column.
    assert_eq!(texts(&scene, "secondary-text"), vec!["2024"]);
    assert_eq!(scene.select_class("thick").len(), 5);
}
