use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_ROW_EVEN: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 6);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const TODAY_FILL: Color32 = Color32::from_rgba_premultiplied(60, 19, 19, 60);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const GRID_LINE_THICK: Color32 = Color32::from_rgb(70, 73, 88);
pub const HANDLE_COLOR: Color32 = Color32::from_rgba_premultiplied(200, 200, 200, 200);

pub const BAR_FILL: Color32 = Color32::from_rgb(88, 96, 122);
pub const PROGRESS_FILL: Color32 = Color32::from_rgb(66, 133, 244);
pub const ARROW_COLOR: Color32 = Color32::from_rgb(155, 160, 178);

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Scene classes ────────────────────────────────────────────────────────────

/// Fill and outline for a rect, line or path node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color32,
    pub stroke: Stroke,
}

impl ShapeStyle {
    const NONE: ShapeStyle = ShapeStyle {
        fill: Color32::TRANSPARENT,
        stroke: Stroke::NONE,
    };

    fn fill(fill: Color32) -> Self {
        Self { fill, ..Self::NONE }
    }

    fn stroke(width: f32, color: Color32) -> Self {
        Self {
            fill: Color32::TRANSPARENT,
            stroke: Stroke::new(width, color),
        }
    }
}

/// How a text node is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color32,
    pub font: FontId,
    /// Vertically centred on its anchor point instead of sitting on it.
    pub centered: bool,
}

/// Style for a shape node given its classes. `active` is set when the
/// enclosing bar is selected.
pub fn shape_style(classes: &[String], active: bool) -> ShapeStyle {
    let has = |class: &str| classes.iter().any(|c| c == class);

    if has("grid-background") {
        ShapeStyle::fill(BG_DARK)
    } else if has("grid-header") {
        ShapeStyle {
            fill: BG_HEADER,
            stroke: Stroke::new(1.0, BORDER_SUBTLE),
        }
    } else if has("row-even") {
        ShapeStyle::fill(BG_PANEL)
    } else if has("row-odd") {
        ShapeStyle::fill(BG_DARK)
    } else if has("row-line") {
        ShapeStyle::stroke(0.5, BORDER_SUBTLE)
    } else if has("tick") {
        if has("thick") {
            ShapeStyle::stroke(1.5, GRID_LINE_THICK)
        } else {
            ShapeStyle::stroke(1.0, GRID_LINE)
        }
    } else if has("today-highlight") {
        ShapeStyle::fill(TODAY_FILL)
    } else if has("bar-invalid") {
        ShapeStyle::stroke(1.0, TEXT_DIM)
    } else if has("bar") {
        ShapeStyle {
            fill: BAR_FILL,
            stroke: if active {
                Stroke::new(1.5, BORDER_ACCENT)
            } else {
                Stroke::NONE
            },
        }
    } else if has("bar-progress") {
        ShapeStyle::fill(PROGRESS_FILL)
    } else if has("handle") {
        if active {
            ShapeStyle::fill(HANDLE_COLOR)
        } else {
            ShapeStyle::NONE
        }
    } else if has("arrow") {
        ShapeStyle::stroke(1.4, ARROW_COLOR)
    } else if has("details-container") {
        ShapeStyle {
            fill: BG_HEADER,
            stroke: Stroke::new(1.0, BORDER_ACCENT),
        }
    } else {
        ShapeStyle::NONE
    }
}

pub fn text_style(classes: &[String]) -> TextStyle {
    let has = |class: &str| classes.iter().any(|c| c == class);

    let (color, font, centered) = if has("bar-label") {
        let color = if has("big") { TEXT_PRIMARY } else { TEXT_ON_BAR };
        (color, font_bar(), true)
    } else if has("primary-text") {
        (TEXT_SECONDARY, font_sub(), false)
    } else if has("secondary-text") {
        (TEXT_PRIMARY, font_header(), false)
    } else if has("details-heading") {
        (TEXT_PRIMARY, font_header(), false)
    } else if has("details-body") {
        (TEXT_SECONDARY, font_small(), false)
    } else {
        (TEXT_PRIMARY, font_sub(), false)
    };
    TextStyle {
        color,
        font,
        centered,
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 28);
    visuals.faint_bg_color = BG_ROW_EVEN;

    visuals.widgets.noninteractive.bg_fill = BG_PANEL;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(42, 44, 56);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 54, 68);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = Color32::from_rgb(60, 62, 76);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn handles_show_only_when_active() {
        assert_eq!(shape_style(&classes("handle left"), false), ShapeStyle::NONE);
        assert_eq!(shape_style(&classes("handle left"), true).fill, HANDLE_COLOR);
    }

    #[test]
    fn invalid_bars_are_outlined() {
        let style = shape_style(&classes("bar bar-invalid"), false);
        assert_eq!(style.fill, Color32::TRANSPARENT);
        assert_eq!(style.stroke.color, TEXT_DIM);
    }

    #[test]
    fn overflowing_labels_change_colour() {
        assert_eq!(text_style(&classes("bar-label")).color, TEXT_ON_BAR);
        assert_eq!(text_style(&classes("bar-label big")).color, TEXT_PRIMARY);
        assert!(!text_style(&classes("secondary-text")).centered);
    }
}
