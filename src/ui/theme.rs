use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::timeline::palette::{parse_hex, FREE_TIME_COLOR};
use crate::timeline::TrackStatus;

/// Font family for filled Phosphor icons
pub fn phosphor_fill_family() -> FontFamily {
    FontFamily::Name("phosphor-fill".into())
}

/// Font family for bold text
pub fn bold_family() -> FontFamily {
    FontFamily::Name("bold".into())
}

pub fn setup_fonts(ctx: &egui::Context) {
    ctx.set_fonts(font_definitions());
}

/// Phosphor icons in the proportional family, plus the bold and filled-icon families
fn font_definitions() -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();

    // Phosphor Regular as fallback in the proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    let proportional = fonts
        .families
        .get(&FontFamily::Proportional)
        .cloned()
        .unwrap_or_default();

    // No bundled bold face; the named family keeps call sites uniform
    fonts.families.insert(bold_family(), proportional.clone());

    fonts.font_data.insert(
        "phosphor-fill".into(),
        egui_phosphor::Variant::Fill.font_data(),
    );
    let mut fill = vec!["phosphor-fill".to_owned()];
    fill.extend(proportional);
    fonts.families.insert(phosphor_fill_family(), fill);

    fonts
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();

    // Night-sky background
    let bg = Color32::from_rgb(0x12, 0x14, 0x1c);
    visuals.panel_fill = bg;
    visuals.window_fill = Color32::from_rgb(0x1a, 0x1d, 0x28);
    visuals.faint_bg_color = Color32::from_rgb(0x18, 0x1b, 0x24);
    visuals.extreme_bg_color = Color32::from_rgb(0x0c, 0x0e, 0x14);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(0x24, 0x28, 0x34);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(176, 180, 192));

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(0x2e, 0x33, 0x42);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(208, 210, 220));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(0x3c, 0x42, 0x55);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    // Sunset orange accent
    let accent = Color32::from_rgb(0xf3, 0x9c, 0x4a);
    visuals.widgets.active.bg_fill = accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::BLACK);

    visuals.selection.bg_fill = accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::BLACK);
    visuals.hyperlink_color = accent;

    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(20.0);

    ctx.set_style(style);
}

/// Fill for a block or swatch. Unparsable colors render as free time.
pub fn hex_color(color: &str) -> Color32 {
    let [r, g, b] = parse_hex(color)
        .or_else(|| parse_hex(FREE_TIME_COLOR))
        .unwrap_or([0x2c, 0x3e, 0x50]);
    Color32::from_rgb(r, g, b)
}

/// Dark or light text, whichever reads better on `bg`
pub fn text_on(bg: Color32) -> Color32 {
    let luma = 0.299 * bg.r() as f32 + 0.587 * bg.g() as f32 + 0.114 * bg.b() as f32;
    if luma > 160.0 {
        Color32::from_rgb(0x1e, 0x1e, 0x24)
    } else {
        Color32::WHITE
    }
}

pub fn status_color(status: TrackStatus) -> Color32 {
    match status {
        TrackStatus::Green => Color32::from_rgb(0x2e, 0xcc, 0x71),
        TrackStatus::Yellow => Color32::from_rgb(0xf1, 0xc4, 0x0f),
        TrackStatus::Red => Color32::from_rgb(0xe7, 0x4c, 0x3c),
        TrackStatus::Free => Color32::from_rgb(0x95, 0xa5, 0xa6),
    }
}

/// Returns (grid_line, hour_line, label) colors for the timeline axis
pub fn grid_colors() -> (Color32, Color32, Color32) {
    (
        Color32::from_rgb(0x22, 0x26, 0x32),
        Color32::from_rgb(0x34, 0x3a, 0x4a),
        Color32::from_rgb(0x80, 0x86, 0x96),
    )
}

pub fn prayer_color() -> Color32 {
    Color32::from_rgb(0xf3, 0x9c, 0x4a)
}

/// Returns (bg_color, text_color) for button-like elements to ensure consistency
pub fn button_colors() -> (Color32, Color32) {
    (
        Color32::from_rgb(0x2e, 0x33, 0x42),
        Color32::from_rgb(208, 210, 220),
    )
}

/// Returns (content_bg, frame_color, frame_text) for dialogs
pub fn dialog_colors() -> (Color32, Color32, Color32) {
    (
        Color32::from_rgb(0x1a, 0x1d, 0x28),
        Color32::from_rgb(0x34, 0x3a, 0x4a),
        Color32::from_rgb(176, 180, 192),
    )
}
