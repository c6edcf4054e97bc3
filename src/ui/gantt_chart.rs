use egui::{Align, Align2, Id, Painter, Pos2, Sense, Ui, Vec2};
use gantt_timeline::layout::{Hit, RenderState};
use gantt_timeline::surface::{Anchor, Node, Point, Scene, Shape, Surface};
use gantt_timeline::widgets::DragHandle;
use gantt_timeline::Gantt;

use crate::ui::theme;

#[derive(Debug, Clone)]
struct DragSnapshot {
    index: usize,
    handle: DragHandle,
    start_pointer_x: f32,
}

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A bar was dropped on new dates.
    pub changed: bool,
    pub clicked: Option<usize>,
    /// The background was clicked and the selection cleared.
    pub cleared: bool,
}

/// Render the chart scene and route pointer input to its bars.
pub fn show_gantt_chart(
    gantt: &mut Gantt,
    scene: &mut Scene,
    state: &mut RenderState,
    scroll_to: &mut Option<f32>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let (width, height) = scene.size();
    let canvas = Vec2::new((width as f32).max(available.x), (height as f32).max(available.y));

    let mut area = egui::ScrollArea::both().auto_shrink([false, false]);
    if let Some(x) = scroll_to.take() {
        area = area.horizontal_scroll_offset(x);
    }

    area.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(canvas, Sense::click_and_drag());
        let origin = response.rect.min;
        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

        {
            let scene: &Scene = scene;
            scene.visit(|_, node| paint_node(&painter, origin, scene, node));
        }

        let to_scene = |p: Pos2| Point::new((p.x - origin.x) as f64, (p.y - origin.y) as f64);
        let drag_id = Id::new("gantt-bar-drag");

        if response.drag_started() {
            let press = ui.input(|i| i.pointer.press_origin());
            if let Some(press) = press {
                if let Some(Hit::Bar { index, handle }) = state.hit(&*scene, to_scene(press)) {
                    state.start_drag(index);
                    ui.ctx().data_mut(|data| {
                        data.insert_temp(
                            drag_id,
                            DragSnapshot {
                                index,
                                handle,
                                start_pointer_x: press.x,
                            },
                        );
                    });
                }
            }
        }

        if response.dragged() {
            let snapshot = ui.ctx().data(|data| data.get_temp::<DragSnapshot>(drag_id));
            if let (Some(snapshot), Some(ptr)) = (snapshot, response.interact_pointer_pos()) {
                let icon = match snapshot.handle {
                    DragHandle::Move => egui::CursorIcon::Grabbing,
                    DragHandle::Left | DragHandle::Right => egui::CursorIcon::ResizeHorizontal,
                };
                ui.ctx().set_cursor_icon(icon);
                let dx = (ptr.x - snapshot.start_pointer_x) as f64;
                state.drag_bar(scene, snapshot.index, snapshot.handle, dx);
            }
        }

        if response.drag_stopped() {
            let snapshot = ui.ctx().data_mut(|data| {
                let snapshot = data.get_temp::<DragSnapshot>(drag_id);
                data.remove::<DragSnapshot>(drag_id);
                snapshot
            });
            if let Some(snapshot) = snapshot {
                interaction.changed = gantt.release_bar(state, snapshot.index).is_some();
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                match state.click_at(scene, to_scene(pos)) {
                    Some(index) => interaction.clicked = Some(index),
                    None => interaction.cleared = true,
                }
            }
        }

        if let Some(pos) = response.hover_pos() {
            match state.hit(&*scene, to_scene(pos)) {
                Some(Hit::Bar {
                    handle: DragHandle::Left | DragHandle::Right,
                    ..
                }) => ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal),
                Some(Hit::Bar { .. }) => ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand),
                _ => {}
            }
        }
    });

    interaction
}

fn paint_node(painter: &Painter, origin: Pos2, scene: &Scene, node: &Node) {
    let to_pos = |p: Point| Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32);
    let active = node
        .parent
        .and_then(|p| scene.node(p))
        .is_some_and(|parent| parent.has_class("active"));

    match &node.shape {
        Shape::Group => {}
        Shape::Rect { rect, radius } => {
            let style = theme::shape_style(&node.classes, active);
            let min = to_pos(Point::new(rect.x, rect.y));
            let size = Vec2::new(rect.width as f32, rect.height as f32);
            painter.rect(
                egui::Rect::from_min_size(min, size),
                *radius as f32,
                style.fill,
                style.stroke,
            );
        }
        Shape::Line { from, to } => {
            let style = theme::shape_style(&node.classes, active);
            painter.line_segment([to_pos(*from), to_pos(*to)], style.stroke);
        }
        Shape::Path(path) => {
            let style = theme::shape_style(&node.classes, active);
            for line in path.polylines() {
                let points = line.into_iter().map(to_pos).collect();
                painter.add(egui::Shape::line(points, style.stroke));
            }
        }
        Shape::Text {
            at,
            content,
            anchor,
        } => {
            let style = theme::text_style(&node.classes);
            let h = match anchor {
                Anchor::Start => Align::Min,
                Anchor::Middle => Align::Center,
                Anchor::End => Align::Max,
            };
            // Non-centred text sits on its point like an SVG baseline.
            let (v, pos) = if style.centered {
                (Align::Center, to_pos(*at))
            } else {
                let descent = style.font.size * 0.2;
                (Align::Max, to_pos(*at) + Vec2::new(0.0, descent))
            };
            painter.text(pos, Align2([h, v]), content, style.font, style.color);
        }
    }
}
