use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;

use crate::model::{Task, TimelineViewport};
use crate::surface::{Anchor, NodeId, Point, Rect, Surface};

const HANDLE_WIDTH: f64 = 8.0;
const LABEL_GAP: f64 = 5.0;
const POPOVER_WIDTH: f64 = 180.0;
const POPOVER_HEIGHT: f64 = 44.0;

pub type DateChangeHandler = Rc<dyn Fn(&Task, NaiveDateTime, NaiveDateTime)>;
pub type ProgressChangeHandler = Rc<dyn Fn(&Task, f64)>;
pub type ClickHandler = Rc<dyn Fn(&Task)>;

/// Callbacks a bar fires when the user changes it.
#[derive(Clone, Default)]
pub struct BarEvents {
    pub on_date_change: Option<DateChangeHandler>,
    pub on_progress_change: Option<ProgressChangeHandler>,
    pub on_click: Option<ClickHandler>,
}

impl fmt::Debug for BarEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarEvents")
            .field("on_date_change", &self.on_date_change.is_some())
            .field("on_progress_change", &self.on_progress_change.is_some())
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Layout values a bar needs, snapshotted for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub viewport: TimelineViewport,
    pub header_height: f64,
    pub padding: f64,
    pub bar_height: f64,
    pub corner_radius: f64,
}

/// Which part of the bar is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    Move,
    Left,
    Right,
}

/// The draggable, resizable rectangle for one task.
#[derive(Debug)]
pub struct Bar {
    pub task: Task,
    pub group: NodeId,
    pub events: BarEvents,
    /// Indices into the render pass's arrows where this bar is an endpoint.
    pub arrows: Vec<usize>,
    layout: BarLayout,
    details_group: NodeId,
    bar: NodeId,
    progress: NodeId,
    label: NodeId,
    handle_left: NodeId,
    handle_right: NodeId,
    x: f64,
    y: f64,
    width: f64,
    drag_origin: Option<(f64, f64)>,
}

impl Bar {
    pub fn new(
        surface: &mut dyn Surface,
        parent: NodeId,
        task: Task,
        layout: BarLayout,
        details_group: NodeId,
    ) -> Self {
        let viewport = layout.viewport;
        let x = viewport.date_to_x(task.start);
        let width = viewport.span_width(task.start, task.end);
        let y = layout.header_height
            + layout.padding
            + task.index as f64 * (layout.bar_height + layout.padding);

        let group = surface.group(Some(parent), None);
        surface.add_class(group, "bar-wrapper");
        let bar_class = if task.invalid { "bar bar-invalid" } else { "bar" };
        let rect = Rect::new(x, y, width, layout.bar_height);
        let radius = layout.corner_radius;
        let bar = surface.rect(group, rect, radius, bar_class);
        let progress = surface.rect(group, progress_rect(rect, task.progress), radius, "bar-progress");
        let label = surface.text(group, rect.center(), &task.name, Anchor::Middle, "bar-label");
        let handle_left = surface.rect(group, left_handle(rect), 1.0, "handle left");
        let handle_right = surface.rect(group, right_handle(rect), 1.0, "handle right");

        let bar = Self {
            task,
            group,
            events: BarEvents::default(),
            arrows: Vec::new(),
            layout,
            details_group,
            bar,
            progress,
            label,
            handle_left,
            handle_right,
            x,
            y,
            width,
            drag_origin: None,
        };
        bar.place_label(surface);
        bar
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.layout.bar_height)
    }

    /// The part of the bar under `point`, if any.
    pub fn handle_at(&self, point: Point) -> Option<DragHandle> {
        let rect = self.rect();
        if !rect.contains(point) {
            None
        } else if left_handle(rect).contains(point) {
            Some(DragHandle::Left)
        } else if right_handle(rect).contains(point) {
            Some(DragHandle::Right)
        } else {
            Some(DragHandle::Move)
        }
    }

    pub fn is_active(&self, surface: &dyn Surface) -> bool {
        surface.has_class(self.group, "active")
    }

    /// Remember the geometry a drag is measured from.
    pub fn start_drag(&mut self) {
        self.drag_origin = Some((self.x, self.width));
    }

    /// Move or resize by `dx` pixels from where the drag started, snapped to
    /// whole units.
    pub fn drag(&mut self, surface: &mut dyn Surface, handle: DragHandle, dx: f64) {
        let (x0, width0) = *self.drag_origin.get_or_insert((self.x, self.width));
        let viewport = self.layout.viewport;
        let dx = viewport.snap(dx);
        let min_width = viewport.unit_width();

        match handle {
            DragHandle::Move => self.x = x0 + dx,
            DragHandle::Left => {
                let width = (width0 - dx).max(min_width);
                self.x = x0 + width0 - width;
                self.width = width;
            }
            DragHandle::Right => self.width = (width0 + dx).max(min_width),
        }
        self.update_geometry(surface);
    }

    /// Finish a drag. Fires `on_date_change` and returns the new dates when
    /// the bar landed somewhere else.
    pub fn release(&mut self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.drag_origin.take()?;
        let viewport = self.layout.viewport;
        let start = viewport.x_to_date(self.x);
        let end = viewport.x_to_date(self.x + self.width);
        if start == self.task.start && end == self.task.end {
            return None;
        }
        self.task.start = start;
        self.task.end = end;
        if let Some(handler) = &self.events.on_date_change {
            handler(&self.task, start, end);
        }
        Some((start, end))
    }

    pub fn set_progress(&mut self, surface: &mut dyn Surface, progress: f64) {
        let progress = progress.clamp(0.0, 100.0);
        self.task.progress = progress;
        surface.set_rect(self.progress, progress_rect(self.rect(), progress));
        if let Some(handler) = &self.events.on_progress_change {
            handler(&self.task, progress);
        }
    }

    /// Select the bar and show its details popover.
    pub fn click(&mut self, surface: &mut dyn Surface) {
        surface.add_class(self.group, "active");
        self.show_details(surface);
        if let Some(handler) = &self.events.on_click {
            handler(&self.task);
        }
    }

    pub fn deactivate(&self, surface: &mut dyn Surface) {
        surface.remove_class(self.group, "active");
    }

    fn show_details(&self, surface: &mut dyn Surface) {
        surface.clear_children(self.details_group);
        let rect = self.rect();
        let popover = Rect::new(rect.x, rect.bottom() + LABEL_GAP, POPOVER_WIDTH, POPOVER_HEIGHT);
        surface.rect(self.details_group, popover, 3.0, "details-container");
        surface.text(
            self.details_group,
            Point::new(popover.x + 10.0, popover.y + 18.0),
            &self.task.name,
            Anchor::Start,
            "details-heading",
        );
        let dates = format!(
            "{} - {}",
            self.task.start.format("%-d %b"),
            self.task.end.format("%-d %b")
        );
        surface.text(
            self.details_group,
            Point::new(popover.x + 10.0, popover.y + 36.0),
            &dates,
            Anchor::Start,
            "details-body",
        );
    }

    fn update_geometry(&mut self, surface: &mut dyn Surface) {
        let rect = self.rect();
        surface.set_rect(self.bar, rect);
        surface.set_rect(self.progress, progress_rect(rect, self.task.progress));
        surface.set_rect(self.handle_left, left_handle(rect));
        surface.set_rect(self.handle_right, right_handle(rect));
        self.place_label(surface);
    }

    // Names wider than the bar sit just right of it.
    fn place_label(&self, surface: &mut dyn Surface) {
        let rect = self.rect();
        surface.set_text(self.label, rect.center(), &self.task.name, Anchor::Middle);
        surface.remove_class(self.label, "big");
        let fits = surface
            .bbox(self.label)
            .map_or(true, |b| b.width <= rect.width);
        if !fits {
            let at = Point::new(rect.right() + LABEL_GAP, rect.center().y);
            surface.set_text(self.label, at, &self.task.name, Anchor::Start);
            surface.add_class(self.label, "big");
        }
    }
}

fn progress_rect(bar: Rect, progress: f64) -> Rect {
    Rect::new(bar.x, bar.y, bar.width * progress.clamp(0.0, 100.0) / 100.0, bar.height)
}

fn left_handle(bar: Rect) -> Rect {
    Rect::new(bar.x + 1.0, bar.y + 1.0, HANDLE_WIDTH, bar.height - 2.0)
}

fn right_handle(bar: Rect) -> Rect {
    Rect::new(bar.right() - HANDLE_WIDTH - 1.0, bar.y + 1.0, HANDLE_WIDTH, bar.height - 2.0)
}
