use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use gantt_timeline::calendar::Calendar;
use gantt_timeline::{
    ChronoCalendar, Gantt, GanttEvents, GanttOptions, RenderState, Scene, Task, TaskRecord,
    ViewMode,
};

use crate::ui;

/// Something the chart reported through its callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    ViewMode(ViewMode),
    DateChange { name: String, start: String, end: String },
    Progress { name: String, progress: f64 },
    Click { name: String },
}

/// Shared sink the chart callbacks push into; drained once per frame.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<ChartEvent>>>);

impl EventLog {
    pub fn gantt_events(&self) -> GanttEvents {
        let on_mode = self.clone();
        let on_date = self.clone();
        let on_progress = self.clone();
        let on_click = self.clone();
        GanttEvents {
            on_view_mode_change: Some(Box::new(move |mode: ViewMode| on_mode.push(ChartEvent::ViewMode(mode)))),
            bar_on_date_change: Some(Rc::new(move |task: &Task, start: NaiveDateTime, end: NaiveDateTime| {
                on_date.push(ChartEvent::DateChange {
                    name: task.name.clone(),
                    start: start.format("%Y-%m-%d").to_string(),
                    end: end.format("%Y-%m-%d").to_string(),
                })
            })),
            bar_on_progress_change: Some(Rc::new(move |task: &Task, progress: f64| {
                on_progress.push(ChartEvent::Progress {
                    name: task.name.clone(),
                    progress,
                })
            })),
            bar_on_click: Some(Rc::new(move |task: &Task| {
                on_click.push(ChartEvent::Click {
                    name: task.name.clone(),
                })
            })),
        }
    }

    fn push(&self, event: ChartEvent) {
        self.0.borrow_mut().push(event);
    }

    pub fn drain(&self) -> Vec<ChartEvent> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Main application state.
pub struct GanttApp {
    pub gantt: Gantt,
    pub scene: Scene,
    pub state: RenderState,
    pub events: EventLog,
    pub file_path: Option<PathBuf>,
    /// Horizontal scroll to apply on the next frame.
    pub pending_scroll: Option<f32>,

    // Dialog state
    pub show_add_task: bool,
    pub show_about: bool,
    pub new_task_name: String,
    pub new_task_dependency: String,
    pub new_task_start_date: NaiveDate,
    pub new_task_end_date: NaiveDate,

    // Status message
    pub status_message: String,
}

impl GanttApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        gantt: Gantt,
        events: EventLog,
        file_path: Option<PathBuf>,
    ) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let mut scene = Scene::new(gantt.options().container_width);
        let state = gantt.render(&mut scene);
        let today = gantt.calendar().today().date();

        Self {
            pending_scroll: Some(state.scroll_x as f32),
            gantt,
            scene,
            state,
            events,
            file_path,
            show_add_task: false,
            show_about: false,
            new_task_name: String::new(),
            new_task_dependency: String::new(),
            new_task_start_date: today,
            new_task_end_date: today + Duration::days(7),
            status_message: "Ready".to_string(),
        }
    }

    pub fn open_tasks(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Task files", &["json", "csv", "tsv", "txt"])
            .pick_file()
        else {
            return;
        };

        let chart = gantt_timeline::io::load_tasks(&path).and_then(|records| {
            Gantt::new(
                records,
                self.gantt.options().clone(),
                ChronoCalendar::new(),
                self.events.gantt_events(),
            )
        });
        match chart {
            Ok(gantt) => {
                self.status_message = format!(
                    "Loaded {} tasks from {}",
                    gantt.tasks().len(),
                    path.display()
                );
                self.gantt = gantt;
                self.file_path = Some(path);
                self.rerender();
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.status_message = format!("Error loading: {}", e);
            }
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        match self.gantt.set_view_mode(&mut self.scene, mode) {
            Ok(state) => self.replace_state(state),
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn create_task_from_dialog(&mut self) {
        let name = if self.new_task_name.trim().is_empty() {
            "New Task".to_string()
        } else {
            self.new_task_name.trim().to_string()
        };

        let start = self.new_task_start_date;
        let end = if self.new_task_end_date >= start {
            self.new_task_end_date
        } else {
            start + Duration::days(7)
        };

        let calendar = self.gantt.calendar();
        let format = &self.gantt.options().date_format;
        let midnight = |date: NaiveDate| date.and_time(chrono::NaiveTime::MIN);
        let mut record = TaskRecord::new(
            uuid::Uuid::new_v4().to_string(),
            name.clone(),
            calendar.format(midnight(start), format),
            calendar.format(midnight(end), format),
        );
        if !self.new_task_dependency.trim().is_empty() {
            record = record.depends_on(self.new_task_dependency.trim());
        }

        match self.gantt.add_task(&mut self.scene, record) {
            Ok(state) => {
                self.replace_state(state);
                self.reset_dialog_fields();
                self.status_message = format!("Task '{}' added", name);
            }
            Err(e) => self.status_message = format!("Could not add task: {}", e),
        }
    }

    fn reset_dialog_fields(&mut self) {
        let today = self.gantt.calendar().today().date();
        self.new_task_name.clear();
        self.new_task_dependency.clear();
        self.new_task_start_date = today;
        self.new_task_end_date = today + Duration::days(7);
    }

    fn rerender(&mut self) {
        let state = self.gantt.render(&mut self.scene);
        self.replace_state(state);
    }

    fn replace_state(&mut self, state: RenderState) {
        self.pending_scroll = Some(state.scroll_x as f32);
        self.state = state;
    }

    fn apply_events(&mut self) {
        for event in self.events.drain() {
            self.status_message = match event {
                ChartEvent::ViewMode(mode) => format!("View: {}", mode),
                ChartEvent::DateChange { name, start, end } => {
                    format!("Updated '{}' ({} → {})", name, start, end)
                }
                ChartEvent::Progress { name, progress } => {
                    format!("'{}' is {:.0}% done", name, progress)
                }
                ChartEvent::Click { name } => format!("Selected '{}'", name),
            };
        }
    }
}

/// Demonstration chart shown when no file is given.
pub fn sample_tasks(options: &GanttOptions, calendar: &dyn Calendar) -> Vec<TaskRecord> {
    let today = calendar.today();
    let day = |offset: i64| calendar.format(today + Duration::days(offset), &options.date_format);

    vec![
        TaskRecord::new("kickoff", "Project Kickoff", day(-5), day(-2)).with_progress(100.0),
        TaskRecord::new("requirements", "Requirements", day(-2), day(5))
            .depends_on("kickoff")
            .with_progress(60.0),
        TaskRecord::new("design", "Design", day(3), day(10))
            .depends_on("requirements")
            .with_progress(20.0),
        TaskRecord::new("build", "Build", day(9), day(24)).depends_on("design"),
        TaskRecord::new("docs", "Documentation", day(12), day(20)).depends_on("design"),
        TaskRecord::new("release", "Release", day(25), day(27)).depends_on("build, docs"),
    ]
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.gantt.tasks().len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!("View: {}", self.gantt.view_mode()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Central panel: Gantt chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::gantt_chart::show_gantt_chart(
                &mut self.gantt,
                &mut self.scene,
                &mut self.state,
                &mut self.pending_scroll,
                ui,
            );
            if interaction.cleared {
                self.status_message = "Selection cleared".to_string();
            }
            if let Some(index) = interaction.clicked {
                log::debug!("Bar {} selected", index);
            }
            if interaction.changed {
                log::debug!("Bar dates changed by drag");
            }
        });

        self.apply_events();

        // Dialogs
        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
