use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;

use super::arrows::{attach_arrows, build_arrows};
use super::ticks::{build_ticks, is_thick, tick_labels};
use super::{Layers, RenderState};
use crate::calendar::{Calendar, ChronoCalendar};
use crate::config::GanttOptions;
use crate::error::{GanttError, Result};
use crate::model::{Scale, Task, TaskRecord, TimelineRange, TimelineViewport, ViewMode};
use crate::surface::{Anchor, NodeId, Path, Point, Rect, Surface};
use crate::widgets::bar::{ClickHandler, DateChangeHandler, ProgressChangeHandler};
use crate::widgets::{Bar, BarEvents, BarLayout};

/// Hooks the embedding application can register.
///
/// The bar callbacks are shared by every bar of every render.
#[derive(Default)]
pub struct GanttEvents {
    /// Fired with the new mode before the chart is redrawn.
    pub on_view_mode_change: Option<Box<dyn FnMut(ViewMode)>>,
    pub bar_on_date_change: Option<DateChangeHandler>,
    pub bar_on_progress_change: Option<ProgressChangeHandler>,
    pub bar_on_click: Option<ClickHandler>,
}

impl GanttEvents {
    fn bar_events(&self) -> BarEvents {
        BarEvents {
            on_date_change: self.bar_on_date_change.clone(),
            on_progress_change: self.bar_on_progress_change.clone(),
            on_click: self.bar_on_click.clone(),
        }
    }
}

impl fmt::Debug for GanttEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GanttEvents")
            .field("on_view_mode_change", &self.on_view_mode_change.is_some())
            .field("bar_on_date_change", &self.bar_on_date_change.is_some())
            .field("bar_on_progress_change", &self.bar_on_progress_change.is_some())
            .field("bar_on_click", &self.bar_on_click.is_some())
            .finish()
    }
}

/// The chart: tasks, the active view mode, and the range and ticks derived
/// from them.
///
/// Every mutation re-renders the whole chart and hands back a fresh
/// [`RenderState`].
pub struct Gantt<C: Calendar = ChronoCalendar> {
    options: GanttOptions,
    calendar: C,
    events: GanttEvents,
    tasks: Vec<Task>,
    range: TimelineRange,
    ticks: Vec<NaiveDateTime>,
}

impl<C: Calendar> Gantt<C> {
    /// Normalize `records` and lay out the timeline for `options.view_mode`.
    pub fn new(
        records: Vec<TaskRecord>,
        options: GanttOptions,
        calendar: C,
        events: GanttEvents,
    ) -> Result<Self> {
        let mode = options.view_mode;
        if !options.is_valid_mode(mode) {
            return Err(GanttError::UnsupportedViewMode(mode));
        }
        check_unique_ids(&records)?;

        let tasks: Vec<Task> = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Task::from_record(record, i, &options.date_format, &calendar))
            .collect();
        let today = calendar.today();

        let mut gantt = Self {
            options,
            calendar,
            events,
            tasks,
            range: TimelineRange {
                start: today,
                end: today,
            },
            ticks: Vec::new(),
        };
        gantt.set_scale(mode);
        gantt.prepare();
        log::debug!(
            "Chart created with {} tasks in {} mode",
            gantt.tasks.len(),
            mode
        );
        Ok(gantt)
    }

    pub fn options(&self) -> &GanttOptions {
        &self.options
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn range(&self) -> TimelineRange {
        self.range
    }

    pub fn ticks(&self) -> &[NaiveDateTime] {
        &self.ticks
    }

    pub fn view_mode(&self) -> ViewMode {
        self.options.view_mode
    }

    /// Modes the chart may switch to.
    pub fn view_modes(&self) -> &[ViewMode] {
        &self.options.valid_view_modes
    }

    pub fn events_mut(&mut self) -> &mut GanttEvents {
        &mut self.events
    }

    /// The date-to-pixel mapping for the current range and scale.
    pub fn viewport(&self) -> TimelineViewport {
        let scale = Scale {
            step: self.options.step,
            column_width: self.options.column_width,
        };
        TimelineViewport::new(self.range.start, self.options.label_width, scale, self.view_mode())
    }

    /// Make `mode` active and load its column step and width.
    pub fn set_scale(&mut self, mode: ViewMode) {
        let scale = mode.scale();
        self.options.view_mode = mode;
        self.options.step = scale.step;
        self.options.column_width = scale.column_width;
    }

    /// Recompute the range and ticks from the tasks.
    pub fn prepare(&mut self) {
        let mode = self.view_mode();
        self.range = TimelineRange::resolve(&self.tasks, mode, &self.calendar);
        self.ticks = build_ticks(&self.range, mode, self.options.step, &self.calendar);
    }

    /// Append a task and redraw.
    pub fn add_task(&mut self, surface: &mut dyn Surface, record: TaskRecord) -> Result<RenderState> {
        if self.task(&record.id).is_some() {
            return Err(GanttError::DuplicateTaskId(record.id));
        }
        let index = self.tasks.len();
        let task = Task::from_record(record, index, &self.options.date_format, &self.calendar);
        log::debug!("Adding task '{}' at row {}", task.id, index);
        self.tasks.push(task);
        self.prepare();
        Ok(self.render(surface))
    }

    /// Switch zoom level and redraw.
    pub fn set_view_mode(&mut self, surface: &mut dyn Surface, mode: ViewMode) -> Result<RenderState> {
        if !self.options.is_valid_mode(mode) {
            return Err(GanttError::UnsupportedViewMode(mode));
        }
        if let Some(on_change) = self.events.on_view_mode_change.as_mut() {
            on_change(mode);
        }
        self.set_scale(mode);
        self.prepare();
        Ok(self.render(surface))
    }

    /// [`Gantt::set_view_mode`] by display name. An unknown name leaves the
    /// chart untouched.
    pub fn set_view_mode_by_name(&mut self, surface: &mut dyn Surface, name: &str) -> Result<RenderState> {
        let mode: ViewMode = name.parse()?;
        self.set_view_mode(surface, mode)
    }

    /// Finish a drag on bar `index` and keep the task list in step with it.
    pub fn release_bar(
        &mut self,
        state: &mut RenderState,
        index: usize,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (start, end) = state.release_bar(index)?;
        if let Some(task) = self.tasks.get_mut(index) {
            task.start = start;
            task.end = end;
        }
        Some((start, end))
    }

    pub fn set_progress(
        &mut self,
        surface: &mut dyn Surface,
        state: &mut RenderState,
        index: usize,
        progress: f64,
    ) {
        state.set_progress(surface, index, progress);
        if let (Some(task), Some(bar)) = (self.tasks.get_mut(index), state.bars.get(index)) {
            task.progress = bar.task.progress;
        }
    }

    /// Draw the whole chart into `surface`.
    pub fn render(&self, surface: &mut dyn Surface) -> RenderState {
        surface.clear();
        let layers = Layers::create(surface);
        let viewport = self.viewport();

        self.draw_grid(surface, &layers, &viewport);
        self.draw_dates(surface, &layers, &viewport);

        let mut bars = self.make_bars(surface, &layers, viewport);
        let arrows = build_arrows(
            surface,
            layers.arrow,
            &bars,
            self.options.arrow_curve,
            self.options.padding,
        );
        attach_arrows(&mut bars, &arrows);
        for bar in &mut bars {
            bar.events = self.events.bar_events();
        }

        self.fit_width(surface, &layers);
        let scroll_x = self
            .tasks
            .iter()
            .map(|t| t.start)
            .min()
            .map_or(0.0, |start| viewport.date_to_x(start));

        RenderState {
            layers,
            bars,
            arrows,
            scroll_x,
            background: layers.grid,
        }
    }

    fn draw_grid(&self, surface: &mut dyn Surface, layers: &Layers, viewport: &TimelineViewport) {
        let o = &self.options;
        let rows = self.tasks.len() as f64;
        let row_height = o.bar_height + o.padding;
        let grid_width = o.label_width + self.ticks.len() as f64 * o.column_width;
        let grid_height = o.header_height + o.padding + row_height * rows;

        surface.rect(
            layers.grid,
            Rect::new(0.0, 0.0, grid_width, grid_height),
            0.0,
            "grid-background",
        );
        surface.set_height(grid_height + o.padding);
        surface.rect(
            layers.grid,
            Rect::new(0.0, 0.0, grid_width, o.header_height + 10.0),
            0.0,
            "grid-header",
        );

        let row_group = surface.group(Some(layers.grid), None);
        let line_group = surface.group(Some(layers.grid), None);
        let mut row_y = o.header_height + o.padding / 2.0;
        for i in 0..self.tasks.len() {
            let class = if i % 2 == 1 { "row-odd" } else { "row-even" };
            surface.rect(row_group, Rect::new(0.0, row_y, grid_width, row_height), 0.0, class);
            let line_y = row_y + row_height;
            surface.line(
                line_group,
                Point::new(0.0, line_y),
                Point::new(grid_width, line_y),
                "row-line",
            );
            row_y += row_height;
        }

        let tick_y = o.header_height + o.padding / 2.0;
        let tick_height = row_height * rows;
        for &tick in &self.ticks {
            let x = viewport.date_to_x(tick);
            let path = Path::new().move_to(x, tick_y).vertical_by(tick_height);
            let class = if is_thick(tick, o.view_mode) { "tick thick" } else { "tick" };
            surface.path(layers.grid, path, class);
        }

        self.draw_today(surface, layers.grid, viewport, row_height * rows);
    }

    // Day mode only, and only when today is on the chart.
    fn draw_today(&self, surface: &mut dyn Surface, grid: NodeId, viewport: &TimelineViewport, rows_height: f64) {
        let today = self.calendar.today();
        if self.view_mode() != ViewMode::Day || !self.range.contains(today) {
            return;
        }
        let o = &self.options;
        let height = rows_height + o.header_height + o.padding / 2.0;
        let rect = Rect::new(viewport.date_to_x(today), 0.0, o.column_width, height);
        surface.rect(grid, rect, 0.0, "today-highlight");
    }

    fn draw_dates(&self, surface: &mut dyn Surface, layers: &Layers, viewport: &TimelineViewport) {
        let mode = self.view_mode();
        let labels = tick_labels(&self.ticks, mode, &self.calendar);
        let grid_width = surface.bbox(layers.grid).map_or(0.0, |b| b.width);
        let primary_y = self.options.header_height;
        let secondary_y = self.options.header_height - 25.0;
        let secondary_offset = viewport.column_width * mode.secondary_span() / 2.0;

        for (&tick, label) in self.ticks.iter().zip(labels) {
            let x = viewport.date_to_x(tick);
            if let Some(text) = label.primary {
                let primary_x = if mode.is_sub_day() {
                    x
                } else {
                    x + viewport.column_width_at(tick) / 2.0
                };
                surface.text(
                    layers.date,
                    Point::new(primary_x, primary_y),
                    &text,
                    Anchor::Middle,
                    "primary-text",
                );
            }
            if let Some(text) = label.secondary {
                let at = Point::new(x + secondary_offset, secondary_y);
                let node = surface.text(layers.date, at, &text, Anchor::Middle, "secondary-text");
                if surface.bbox(node).is_some_and(|b| b.right() > grid_width) {
                    log::debug!("Dropping header label '{}' past the grid edge", text);
                    surface.remove(node);
                }
            }
        }
    }

    fn make_bars(&self, surface: &mut dyn Surface, layers: &Layers, viewport: TimelineViewport) -> Vec<Bar> {
        let layout = BarLayout {
            viewport,
            header_height: self.options.header_height,
            padding: self.options.padding,
            bar_height: self.options.bar_height,
            corner_radius: self.options.bar_corner_radius,
        };
        self.tasks
            .iter()
            .map(|task| Bar::new(surface, layers.bar, task.clone(), layout, layers.details))
            .collect()
    }

    // Widen the surface when the drawing overflows its container.
    fn fit_width(&self, surface: &mut dyn Surface, layers: &Layers) {
        let content = [
            layers.grid,
            layers.date,
            layers.arrow,
            layers.progress,
            layers.bar,
            layers.details,
        ]
        .into_iter()
        .filter_map(|layer| surface.bbox(layer))
        .reduce(|acc, r| acc.union(&r));

        if let Some(content) = content {
            let width = content.right();
            if surface.container_width() < width {
                surface.set_width(width);
            }
        }
    }
}

fn check_unique_ids(records: &[TaskRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(GanttError::DuplicateTaskId(record.id.clone()));
        }
    }
    Ok(())
}
