pub mod task;
pub mod timeline;
pub mod view_mode;

pub use task::{Task, TaskRecord};
pub use timeline::{TimelineRange, TimelineViewport};
pub use view_mode::{Scale, ViewMode};
