use super::geometry::{Path, Point, Rect};
use super::{Anchor, NodeId, Surface};

/// Approximate advance of one character of the default 12px UI font.
pub const DEFAULT_CHAR_WIDTH: f64 = 7.0;
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group,
    Rect { rect: Rect, radius: f64 },
    Line { from: Point, to: Point },
    Path(Path),
    Text {
        at: Point,
        content: String,
        anchor: Anchor,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Name given to a group (`grid`, `bar`, ...).
    pub name: Option<String>,
    pub shape: Shape,
    pub classes: Vec<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    removed: bool,
}

impl Node {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Retained scene graph: the in-memory drawing surface.
///
/// Painters walk it with [`Scene::visit`]; children paint after their
/// parent and later siblings paint on top.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    container_width: f64,
    width: Option<f64>,
    height: f64,
    char_width: f64,
    font_size: f64,
}

impl Scene {
    /// A scene inside a container `container_width` pixels wide.
    pub fn new(container_width: f64) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            container_width,
            width: None,
            height: 0.0,
            char_width: DEFAULT_CHAR_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    /// Override the text metrics used for text bounding boxes.
    pub fn with_text_metrics(mut self, char_width: f64, font_size: f64) -> Self {
        self.char_width = char_width;
        self.font_size = font_size;
        self
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).filter(|n| !n.removed)
    }

    /// Live nodes in paint order.
    pub fn visit(&self, mut f: impl FnMut(NodeId, &Node)) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            f(id, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Group created with `name`, if any.
    pub fn find_group(&self, name: &str) -> Option<NodeId> {
        let mut found = None;
        self.visit(|id, node| {
            if found.is_none() && node.name.as_deref() == Some(name) {
                found = Some(id);
            }
        });
        found
    }

    /// Union of every root's bounding box.
    pub fn content_bbox(&self) -> Option<Rect> {
        union_all(self.roots.iter().filter_map(|&id| self.bbox(id)))
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| !n.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, parent: Option<NodeId>, shape: Shape, classes: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: None,
            shape,
            classes: classes.split_whitespace().map(str::to_string).collect(),
            parent,
            children: Vec::new(),
            removed: false,
        });
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn text_bounds(&self, at: Point, content: &str, anchor: Anchor) -> Rect {
        let width = content.chars().count() as f64 * self.char_width;
        let x = match anchor {
            Anchor::Start => at.x,
            Anchor::Middle => at.x - width / 2.0,
            Anchor::End => at.x - width,
        };
        Rect::new(x, at.y - self.font_size * 0.8, width, self.font_size)
    }
}

fn union_all(rects: impl Iterator<Item = Rect>) -> Option<Rect> {
    rects.reduce(|acc, r| acc.union(&r))
}

impl Surface for Scene {
    fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.width = None;
        self.height = 0.0;
    }

    fn group(&mut self, parent: Option<NodeId>, name: Option<&str>) -> NodeId {
        let id = self.push(parent, Shape::Group, "");
        self.nodes[id].name = name.map(str::to_string);
        id
    }

    fn rect(&mut self, parent: NodeId, rect: Rect, radius: f64, classes: &str) -> NodeId {
        self.push(Some(parent), Shape::Rect { rect, radius }, classes)
    }

    fn line(&mut self, parent: NodeId, from: Point, to: Point, classes: &str) -> NodeId {
        self.push(Some(parent), Shape::Line { from, to }, classes)
    }

    fn path(&mut self, parent: NodeId, path: Path, classes: &str) -> NodeId {
        self.push(Some(parent), Shape::Path(path), classes)
    }

    fn text(
        &mut self,
        parent: NodeId,
        at: Point,
        content: &str,
        anchor: Anchor,
        classes: &str,
    ) -> NodeId {
        let shape = Shape::Text {
            at,
            content: content.to_string(),
            anchor,
        };
        self.push(Some(parent), shape, classes)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            if !n.has_class(class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|n| n.has_class(class))
    }

    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).map(|n| n.parent) else {
            return;
        };
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.children.retain(|&c| c != node),
            None => self.roots.retain(|&c| c != node),
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.get_mut(id) {
                n.removed = true;
                stack.extend(n.children.iter().copied());
            }
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = self
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.remove(child);
        }
    }

    fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(Node {
            shape: Shape::Rect { rect: r, .. },
            ..
        }) = self.nodes.get_mut(node)
        {
            *r = rect;
        }
    }

    fn set_path(&mut self, node: NodeId, path: Path) {
        if let Some(Node {
            shape: Shape::Path(p),
            ..
        }) = self.nodes.get_mut(node)
        {
            *p = path;
        }
    }

    fn set_text(&mut self, node: NodeId, at: Point, content: &str, anchor: Anchor) {
        if let Some(Node {
            shape: Shape::Text {
                at: a,
                content: c,
                anchor: an,
            },
            ..
        }) = self.nodes.get_mut(node)
        {
            *a = at;
            *c = content.to_string();
            *an = anchor;
        }
    }

    fn bbox(&self, node: NodeId) -> Option<Rect> {
        let n = self.node(node)?;
        match &n.shape {
            Shape::Group => union_all(n.children.iter().filter_map(|&c| self.bbox(c))),
            Shape::Rect { rect, .. } => Some(*rect),
            Shape::Line { from, to } => Some(Rect::from_points(*from, *to)),
            Shape::Path(path) => path.bounds(),
            Shape::Text {
                at,
                content,
                anchor,
            } => Some(self.text_bounds(*at, content, *anchor)),
        }
    }

    fn select_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.visit(|id, node| {
            if node.has_class(class) {
                found.push(id);
            }
        });
        found
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn size(&self) -> (f64, f64) {
        (self.width.unwrap_or(self.container_width), self.height)
    }

    fn set_width(&mut self, width: f64) {
        self.width = Some(width);
    }

    fn set_height(&mut self, height: f64) {
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_union_child_bounds() {
        let mut scene = Scene::new(800.0);
        let g = scene.group(None, Some("grid"));
        scene.rect(g, Rect::new(0.0, 0.0, 100.0, 50.0), 0.0, "grid-background");
        scene.line(g, Point::new(0.0, 80.0), Point::new(150.0, 80.0), "row-line");
        assert_eq!(scene.bbox(g), Some(Rect::new(0.0, 0.0, 150.0, 80.0)));
        assert_eq!(scene.find_group("grid"), Some(g));
    }

    #[test]
    fn text_bounds_follow_anchor() {
        let mut scene = Scene::new(800.0).with_text_metrics(10.0, 10.0);
        let g = scene.group(None, None);
        let t = scene.text(g, Point::new(100.0, 50.0), "abcd", Anchor::Middle, "secondary-text");
        let bbox = scene.bbox(t).unwrap();
        assert_eq!(bbox.x, 80.0);
        assert_eq!(bbox.right(), 120.0);
    }

    #[test]
    fn classes_and_removal() {
        let mut scene = Scene::new(800.0);
        let g = scene.group(None, None);
        let r = scene.rect(g, Rect::new(0.0, 0.0, 1.0, 1.0), 0.0, "tick thick");
        assert!(scene.has_class(r, "thick"));
        scene.add_class(r, "active");
        assert_eq!(scene.select_class("active"), vec![r]);
        scene.remove_class(r, "active");
        assert!(scene.select_class("active").is_empty());

        scene.clear_children(g);
        assert!(scene.node(r).is_none());
        assert_eq!(scene.bbox(g), None);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn clear_resets_size() {
        let mut scene = Scene::new(640.0);
        scene.set_width(2000.0);
        scene.set_height(300.0);
        assert_eq!(scene.size(), (2000.0, 300.0));
        scene.clear();
        assert_eq!(scene.size(), (640.0, 0.0));
        assert!(scene.is_empty());
    }
}
