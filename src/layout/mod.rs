//! Turns tasks and a view mode into a drawn timeline.

pub mod arrows;
pub mod gantt;
pub mod ticks;

pub use gantt::{Gantt, GanttEvents};
pub use ticks::TickLabel;

use chrono::NaiveDateTime;

use crate::surface::{NodeId, Point, Surface};
use crate::widgets::{Arrow, Bar, DragHandle};

/// Top-level groups, created in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layers {
    pub grid: NodeId,
    pub date: NodeId,
    pub arrow: NodeId,
    pub progress: NodeId,
    pub bar: NodeId,
    pub details: NodeId,
}

impl Layers {
    pub fn create(surface: &mut dyn Surface) -> Self {
        Self {
            grid: surface.group(None, Some("grid")),
            date: surface.group(None, Some("date")),
            arrow: surface.group(None, Some("arrow")),
            progress: surface.group(None, Some("progress")),
            bar: surface.group(None, Some("bar")),
            details: surface.group(None, Some("details")),
        }
    }
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Bar { index: usize, handle: DragHandle },
    Background,
}

/// Everything one render pass produced.
///
/// Replaced wholesale by the next render; interaction goes through here so
/// bars and their arrows stay in sync.
#[derive(Debug)]
pub struct RenderState {
    pub layers: Layers,
    /// Indexed by task index.
    pub bars: Vec<Bar>,
    pub arrows: Vec<Arrow>,
    /// Horizontal scroll that brings the earliest task into view.
    pub scroll_x: f64,
    /// Node whose clicks clear the selection.
    pub background: NodeId,
}

impl RenderState {
    /// Topmost bar under `point`, or the background.
    pub fn hit(&self, surface: &dyn Surface, point: Point) -> Option<Hit> {
        let bar = self
            .bars
            .iter()
            .rev()
            .find_map(|bar| bar.handle_at(point).map(|handle| (bar.task.index, handle)));
        if let Some((index, handle)) = bar {
            return Some(Hit::Bar { index, handle });
        }
        surface
            .bbox(self.background)
            .filter(|area| area.contains(point))
            .map(|_| Hit::Background)
    }

    /// Dispatch a click. Selects the bar under `point` and returns its index;
    /// a background click clears the selection.
    pub fn click_at(&mut self, surface: &mut dyn Surface, point: Point) -> Option<usize> {
        match self.hit(surface, point)? {
            Hit::Bar { index, .. } => {
                self.clear_active(surface);
                self.bars[index].click(surface);
                Some(index)
            }
            Hit::Background => {
                self.clear_active(surface);
                None
            }
        }
    }

    /// Deselect every bar and hide the details popover.
    pub fn clear_active(&self, surface: &mut dyn Surface) {
        for bar in &self.bars {
            bar.deactivate(surface);
        }
        surface.clear_children(self.layers.details);
    }

    pub fn active_bar(&self, surface: &dyn Surface) -> Option<usize> {
        self.bars.iter().position(|bar| bar.is_active(surface))
    }

    pub fn start_drag(&mut self, index: usize) {
        if let Some(bar) = self.bars.get_mut(index) {
            bar.start_drag();
        }
    }

    /// Drag a bar and re-route the arrows touching it.
    pub fn drag_bar(&mut self, surface: &mut dyn Surface, index: usize, handle: DragHandle, dx: f64) {
        let Some(bar) = self.bars.get_mut(index) else {
            return;
        };
        bar.drag(surface, handle, dx);
        self.update_arrows(surface, index);
    }

    pub fn release_bar(&mut self, index: usize) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.bars.get_mut(index)?.release()
    }

    pub fn set_progress(&mut self, surface: &mut dyn Surface, index: usize, progress: f64) {
        if let Some(bar) = self.bars.get_mut(index) {
            bar.set_progress(surface, progress);
        }
    }

    fn update_arrows(&mut self, surface: &mut dyn Surface, index: usize) {
        for &a in &self.bars[index].arrows {
            let arrow = &mut self.arrows[a];
            let (Some(from), Some(to)) = (self.bars.get(arrow.from_index), self.bars.get(arrow.to_index)) else {
                continue;
            };
            arrow.update(surface, from, to);
        }
    }
}
