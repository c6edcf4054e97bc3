//! Interactive pieces drawn on top of the grid.

pub mod arrow;
pub mod bar;

pub use arrow::Arrow;
pub use bar::{Bar, BarEvents, BarLayout, DragHandle};
