use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// One segment of a [`Path`], in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc of `radius` ending at `to`.
    Arc {
        radius: f64,
        clockwise: bool,
        to: Point,
    },
}

/// A connector or tick outline, built with relative helpers like an SVG path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
    cursor: Point,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.cursor = Point::new(x, y);
        self.commands.push(PathCommand::MoveTo(self.cursor));
        self
    }

    pub fn move_by(self, dx: f64, dy: f64) -> Self {
        let Point { x, y } = self.cursor;
        self.move_to(x + dx, y + dy)
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.cursor = Point::new(x, y);
        self.commands.push(PathCommand::LineTo(self.cursor));
        self
    }

    pub fn line_by(self, dx: f64, dy: f64) -> Self {
        let Point { x, y } = self.cursor;
        self.line_to(x + dx, y + dy)
    }

    pub fn vertical_to(self, y: f64) -> Self {
        let x = self.cursor.x;
        self.line_to(x, y)
    }

    pub fn vertical_by(self, dy: f64) -> Self {
        self.line_by(0.0, dy)
    }

    pub fn horizontal_to(self, x: f64) -> Self {
        let y = self.cursor.y;
        self.line_to(x, y)
    }

    pub fn arc_by(mut self, radius: f64, clockwise: bool, dx: f64, dy: f64) -> Self {
        self.cursor = Point::new(self.cursor.x + dx, self.cursor.y + dy);
        self.commands.push(PathCommand::Arc {
            radius,
            clockwise,
            to: self.cursor,
        });
        self
    }

    /// SVG path data with absolute commands.
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            let _ = match command {
                PathCommand::MoveTo(p) => write!(d, "M {} {}", p.x, p.y),
                PathCommand::LineTo(p) => write!(d, "L {} {}", p.x, p.y),
                PathCommand::Arc {
                    radius,
                    clockwise,
                    to,
                } => write!(
                    d,
                    "A {r} {r} 0 0 {} {} {}",
                    u8::from(*clockwise),
                    to.x,
                    to.y,
                    r = radius
                ),
            };
        }
        d
    }

    /// Flatten into polylines, one per sub-path. Arcs become quadratic
    /// curves through the corner they round.
    pub fn polylines(&self) -> Vec<Vec<Point>> {
        const ARC_SEGMENTS: usize = 8;

        let mut lines: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut vertical = true;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    if current.len() > 1 {
                        lines.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathCommand::LineTo(p) => {
                    let from = current.last().copied().unwrap_or(p);
                    vertical = (p.x - from.x).abs() < (p.y - from.y).abs();
                    current.push(p);
                }
                PathCommand::Arc { to, .. } => {
                    let from = current.last().copied().unwrap_or(to);
                    let corner = if vertical {
                        Point::new(from.x, to.y)
                    } else {
                        Point::new(to.x, from.y)
                    };
                    for step in 1..=ARC_SEGMENTS {
                        let t = step as f64 / ARC_SEGMENTS as f64;
                        let u = 1.0 - t;
                        current.push(Point::new(
                            u * u * from.x + 2.0 * u * t * corner.x + t * t * to.x,
                            u * u * from.y + 2.0 * u * t * corner.y + t * t * to.y,
                        ));
                    }
                    vertical = !vertical;
                }
            }
        }
        if current.len() > 1 {
            lines.push(current);
        }
        lines
    }

    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.commands.iter().map(|c| match *c {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
            PathCommand::Arc { to, .. } => to,
        });
        let first = points.next()?;
        Some(points.fold(Rect::new(first.x, first.y, 0.0, 0.0), |acc, p| {
            acc.union(&Rect::new(p.x, p.y, 0.0, 0.0))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_helpers_track_cursor() {
        let path = Path::new().move_to(10.0, 20.0).vertical_by(30.0).horizontal_to(40.0);
        assert_eq!(path.to_svg(), "M 10 20 L 10 50 L 40 50");
        assert_eq!(path.bounds(), Some(Rect::new(10.0, 20.0, 30.0, 30.0)));
    }

    #[test]
    fn arcs_flatten_through_corner() {
        let path = Path::new().move_to(0.0, 0.0).vertical_to(10.0).arc_by(5.0, false, 5.0, 5.0);
        let lines = path.polylines();
        assert_eq!(lines.len(), 1);
        let last = *lines[0].last().unwrap();
        assert_eq!(last, Point::new(5.0, 15.0));
        assert!(path.to_svg().ends_with("A 5 5 0 0 0 5 15"));
    }

    #[test]
    fn move_starts_new_polyline() {
        let path = Path::new()
            .move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .move_by(-5.0, -5.0)
            .line_by(5.0, 5.0)
            .line_by(-5.0, 5.0);
        assert_eq!(path.polylines().len(), 2);
    }
}
