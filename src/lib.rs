//! Layout engine for interactive Gantt timelines.
//!
//! Tasks with start and end dates become bars on a date-ruled grid, with
//! dependency arrows between them and five zoom levels. [`Gantt`] resolves
//! the visible range, generates the ticks and header labels, maps dates to
//! pixels and draws everything into a [`surface::Surface`]. Each render
//! returns a [`layout::RenderState`] that handles later pointer input.

pub mod calendar;
pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod surface;
pub mod widgets;

pub use calendar::{Calendar, ChronoCalendar};
pub use config::GanttOptions;
pub use error::{GanttError, Result};
pub use layout::{Gantt, GanttEvents, RenderState};
pub use model::{Task, TaskRecord, TimelineRange, TimelineViewport, ViewMode};
pub use surface::{Scene, Surface};
