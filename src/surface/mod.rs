//! The drawing surface the layout engine renders into.

pub mod geometry;
pub mod scene;

pub use geometry::{Path, PathCommand, Point, Rect};
pub use scene::{Node, Scene, Shape};

/// Handle to a node created on a [`Surface`].
pub type NodeId = usize;

/// Horizontal alignment of a text node relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

/// A 2D scene of grouped primitives styled by class names.
///
/// `classes` arguments are whitespace-separated, like an HTML class
/// attribute. Nodes created with a `parent` paint above it and above earlier
/// siblings.
pub trait Surface {
    /// Drop every node and reset the explicit size.
    fn clear(&mut self);

    fn group(&mut self, parent: Option<NodeId>, name: Option<&str>) -> NodeId;
    fn rect(&mut self, parent: NodeId, rect: Rect, radius: f64, classes: &str) -> NodeId;
    fn line(&mut self, parent: NodeId, from: Point, to: Point, classes: &str) -> NodeId;
    fn path(&mut self, parent: NodeId, path: Path, classes: &str) -> NodeId;
    fn text(
        &mut self,
        parent: NodeId,
        at: Point,
        content: &str,
        anchor: Anchor,
        classes: &str,
    ) -> NodeId;

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Remove a node and its descendants.
    fn remove(&mut self, node: NodeId);
    fn clear_children(&mut self, node: NodeId);

    fn set_rect(&mut self, node: NodeId, rect: Rect);
    fn set_path(&mut self, node: NodeId, path: Path);
    fn set_text(&mut self, node: NodeId, at: Point, content: &str, anchor: Anchor);

    /// Bounding box of a node; groups report the union of their children.
    fn bbox(&self, node: NodeId) -> Option<Rect>;
    fn select_class(&self, class: &str) -> Vec<NodeId>;

    /// Width of the container the surface is mounted in.
    fn container_width(&self) -> f64;
    /// Current surface size; width defaults to the container width.
    fn size(&self) -> (f64, f64);
    fn set_width(&mut self, width: f64);
    fn set_height(&mut self, height: f64);
}
