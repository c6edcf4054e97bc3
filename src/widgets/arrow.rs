use crate::surface::{NodeId, Path, Rect, Surface};

use super::bar::Bar;

/// Rounded connector from the bottom of a dependency's bar to the left edge
/// of the dependent bar.
#[derive(Debug, Clone)]
pub struct Arrow {
    /// Row index of the dependency.
    pub from_index: usize,
    /// Row index of the dependent task.
    pub to_index: usize,
    pub from_id: String,
    pub to_id: String,
    pub element: NodeId,
    pub path: Path,
    curve: f64,
    padding: f64,
}

impl Arrow {
    pub fn new(
        surface: &mut dyn Surface,
        parent: NodeId,
        from: &Bar,
        to: &Bar,
        curve: f64,
        padding: f64,
    ) -> Self {
        let from_index = from.task.index;
        let to_index = to.task.index;
        let path = route(from.rect(), from_index, to.rect(), to_index, curve, padding);
        let element = surface.path(parent, path.clone(), "arrow");
        Self {
            from_index,
            to_index,
            from_id: from.task.id.clone(),
            to_id: to.task.id.clone(),
            element,
            path,
            curve,
            padding,
        }
    }

    /// Re-route after either endpoint moved.
    pub fn update(&mut self, surface: &mut dyn Surface, from: &Bar, to: &Bar) {
        self.path = route(
            from.rect(),
            self.from_index,
            to.rect(),
            self.to_index,
            self.curve,
            self.padding,
        );
        surface.set_path(self.element, self.path.clone());
    }
}

/// Connector geometry between two bar rectangles.
///
/// The path leaves the bottom of `from` near its middle and enters `to` from
/// the left with an arrowhead. When `to` starts left of `from`, the path
/// drops below `from`, runs back left and climbs to `to`.
pub fn route(from: Rect, from_index: usize, to: Rect, to_index: usize, curve: f64, padding: f64) -> Path {
    let mut start_x = from.x + from.width / 2.0;
    while to.x < start_x + padding && start_x > from.x + padding {
        start_x -= 10.0;
    }
    let start_y = from.bottom();
    let end_x = to.x - padding / 2.0;
    let end_y = to.y + to.height / 2.0;

    let from_is_below_to = from_index > to_index;
    let clockwise = from_is_below_to;
    let curve_y = if from_is_below_to { -curve } else { curve };

    let path = Path::new().move_to(start_x, start_y);
    let path = if to.x < from.x + padding {
        path.vertical_by(padding / 2.0 - curve)
            .arc_by(curve, true, -curve, curve)
            .horizontal_to(to.x - padding)
            .arc_by(curve, clockwise, -curve, curve_y)
            .vertical_to(end_y - curve_y)
            .arc_by(curve, clockwise, curve, curve_y)
    } else {
        path.vertical_to(end_y - curve_y)
            .arc_by(curve, clockwise, curve, curve_y)
    };
    path.line_to(end_x, end_y)
        .move_by(-5.0, -5.0)
        .line_by(5.0, 5.0)
        .line_by(-5.0, 5.0)
}
