use std::time::Instant;

use egui::{Color32, RichText, Ui};

use crate::api::EntryId;
use crate::board::NewTaskForm;
use crate::sunset::{LocationStatus, SunsetContext};
use crate::timeline::palette::{is_free_time, same_color, to_hex, COLOR_PALETTE, FREE_TIME_COLOR};
use crate::timeline::{
    Block, DragController, DropAction, HourMarker, ItemKind, ItemRef, PrayerMarker, TimeMap,
    TimelineId, TrackingView, Viewport, MINUTES_PER_DAY,
};

use super::theme::{self, hex_color, text_on};

const HOUR_LABEL_WIDTH: f32 = 52.0;
const ICON_SIZE: f32 = 16.0;

/// Result from timeline interactions
#[derive(Default)]
pub struct TimelineResult {
    pub drop: Option<DropAction>,
    pub delete: Option<ItemRef>,
    pub pick_color: Option<ItemRef>,
    pub toggle_complete: Option<(EntryId, bool)>,
    /// Scroll offset after this frame
    pub scroll_offset: f32,
}

pub struct TimelineView<'a> {
    pub id: TimelineId,
    pub title: &'a str,
    pub blocks: &'a [Block],
    pub hours: &'a [HourMarker],
    pub prayers: &'a [PrayerMarker],
    pub map: TimeMap,
    /// Scroll to this offset this frame (auto-scroll while dragging)
    pub scroll_to: Option<f32>,
}

/// Header with the resolved sun and prayer times. Returns true when sync was clicked.
pub fn render_header(ui: &mut Ui, sunset: &SunsetContext, location: Option<&LocationStatus>, busy: bool) -> bool {
    let mut sync_clicked = false;

    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("{} Duskboard", egui_phosphor::regular::SUN_HORIZON))
                .size(20.0)
                .family(theme::bold_family())
                .color(Color32::WHITE),
        );

        ui.add_space(16.0);

        let times = [
            (egui_phosphor::regular::SUN_HORIZON, "Sunrise", &sunset.sunrise_time),
            (egui_phosphor::regular::SUN, "Dhuhr", &sunset.dhuhr_time),
            (egui_phosphor::regular::CLOUD_SUN, "Asr", &sunset.asr_time),
            (egui_phosphor::regular::SUN_HORIZON, "Sunset", &sunset.sunset_time),
            (egui_phosphor::regular::MOON_STARS, "Isha", &sunset.isha_time),
        ];
        let (_, label_color) = theme::button_colors();
        for (icon, name, time) in times {
            ui.label(RichText::new(format!("{} {}", icon, name)).color(label_color));
            ui.label(RichText::new(time.as_str()).family(theme::bold_family()).color(Color32::WHITE));
            ui.add_space(6.0);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let sync = ui.add_enabled(
                !busy,
                egui::Button::new(format!("{} Sync to today", egui_phosphor::regular::ARROWS_CLOCKWISE)),
            );
            if sync.on_hover_text("Replace today's schedule with the optimal one").clicked() {
                sync_clicked = true;
            }
        });
    });

    let (text, color) = match location {
        None => ("Detecting location...".to_string(), Color32::from_rgb(176, 180, 192)),
        Some(status) if status.is_fallback() => (status.describe(), Color32::from_rgb(0xf3, 0x9c, 0x4a)),
        Some(status) => (status.describe(), Color32::from_rgb(152, 195, 121)),
    };
    ui.label(RichText::new(format!("{} {}", egui_phosphor::regular::MAP_PIN, text)).size(12.0).color(color));

    sync_clicked
}

/// Colored square for palettes. Free time gets a "FREE" caption.
pub fn color_swatch(ui: &mut Ui, color: &str, selected: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(24.0, 24.0), egui::Sense::click());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let fill = hex_color(color);
        painter.rect_filled(rect, 4.0, fill);

        if is_free_time(color) {
            painter.rect_stroke(rect, 4.0, egui::Stroke::new(1.0, Color32::from_rgb(0x55, 0x55, 0x55)));
            painter.text(rect.center(), egui::Align2::CENTER_CENTER, "FREE", egui::FontId::proportional(7.0), Color32::WHITE);
        }
        if selected {
            painter.rect_stroke(rect.expand(2.0), 5.0, egui::Stroke::new(2.0, Color32::WHITE));
        } else if response.hovered() {
            painter.rect_stroke(rect.expand(1.0), 5.0, egui::Stroke::new(1.0, Color32::from_gray(180)));
        }
    }
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

/// Palette, free time and a custom color button. Returns the chosen color
/// when one was picked this frame.
pub fn render_color_choices(ui: &mut Ui, current: &str, custom: &mut [u8; 3]) -> Option<String> {
    let mut chosen = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);
        for color in COLOR_PALETTE.iter().copied().chain([FREE_TIME_COLOR]) {
            if color_swatch(ui, color, same_color(color, current)).on_hover_text(color).clicked() {
                chosen = Some(color.to_string());
            }
        }

        ui.add_space(6.0);
        if ui.color_edit_button_srgb(custom).changed() {
            chosen = Some(to_hex(*custom));
        }
    });

    chosen
}

/// New-task form. Returns true when the user asked to add the task.
pub fn render_task_form(ui: &mut Ui, form: &mut NewTaskForm, custom: &mut [u8; 3], busy: bool) -> bool {
    let mut submit = false;

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut form.name)
                .hint_text("Task name")
                .desired_width(200.0),
        );

        let duration = ui.add(
            egui::TextEdit::singleline(&mut form.duration)
                .hint_text("Minutes")
                .desired_width(70.0),
        );
        if duration.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }

        if let Some(color) = render_color_choices(ui, &form.color, custom) {
            form.color = color;
        }

        let add = ui.add_enabled(!busy, egui::Button::new(format!("{} Add task", egui_phosphor::regular::PLUS)));
        if add.clicked() {
            submit = true;
        }
    });

    submit && !busy
}

/// Flat painted button used in dialogs
pub fn dialog_button(ui: &mut Ui, text: &str, text_color: Color32) -> egui::Response {
    let (btn_bg, _) = theme::button_colors();
    let btn_hover = Color32::from_rgb(0x3c, 0x42, 0x55);
    let font_id = egui::FontId::proportional(16.0);
    let padding = egui::vec2(18.0, 10.0);

    let size = ui.fonts(|f| f.layout_no_wrap(text.to_string(), font_id.clone(), text_color).size());
    let (rect, response) = ui.allocate_exact_size(size + padding * 2.0, egui::Sense::click());
    let bg = if response.hovered() { btn_hover } else { btn_bg };
    ui.painter().rect_filled(rect, 6.0, bg);
    ui.painter().text(rect.center(), egui::Align2::CENTER_CENTER, text, font_id, text_color);
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

/// Render one sunset-anchored timeline and feed pointer movement to the drag controller
pub fn render_timeline(ui: &mut Ui, view: TimelineView<'_>, drag: &mut DragController) -> TimelineResult {
    let mut result = TimelineResult::default();

    ui.label(RichText::new(view.title).size(16.0).family(theme::bold_family()).color(Color32::WHITE));

    let mut area = egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .drag_to_scroll(false);
    if let Some(offset) = view.scroll_to {
        area = area.vertical_scroll_offset(offset);
    }

    let output = ui.push_id(view.id, |ui| {
        area.show(ui, |ui| {
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(ui.available_width(), MINUTES_PER_DAY as f32),
                egui::Sense::hover(),
            );
            let grid_rect = egui::Rect::from_min_max(
                egui::pos2(rect.min.x + HOUR_LABEL_WIDTH, rect.min.y),
                rect.max,
            );

            paint_grid(ui, rect, grid_rect, view.hours, view.prayers);

            if let Some(zone) = drag.drop_zone().filter(|z| z.timeline == view.id) {
                let zone_rect = egui::Rect::from_min_size(
                    egui::pos2(grid_rect.min.x + 2.0, grid_rect.min.y + zone.top),
                    egui::vec2(grid_rect.width() - 4.0, zone.height),
                );
                ui.painter().rect(
                    zone_rect,
                    4.0,
                    Color32::from_rgba_unmultiplied(0xf3, 0x9c, 0x4a, 40),
                    egui::Stroke::new(2.0, Color32::from_rgba_unmultiplied(0xf3, 0x9c, 0x4a, 160)),
                );
            }

            for block in view.blocks {
                let block_rect = egui::Rect::from_min_size(
                    egui::pos2(grid_rect.min.x + 2.0, grid_rect.min.y + block.top),
                    egui::vec2(grid_rect.width() - 4.0, (block.height - 1.0).max(4.0)),
                );
                render_block(ui, block_rect, block, drag, &mut result);
            }

            let clip = ui.clip_rect();
            let viewport = Viewport {
                top: clip.min.y,
                height: clip.height(),
                scroll_offset: clip.min.y - grid_rect.min.y,
                content_height: grid_rect.height(),
            };
            track_pointer(ui, view.id, clip, viewport, &view.map, drag, &mut result);
        })
    });

    result.scroll_offset = output.inner.state.offset.y;
    result
}

fn paint_grid(ui: &Ui, rect: egui::Rect, grid_rect: egui::Rect, hours: &[HourMarker], prayers: &[PrayerMarker]) {
    let painter = ui.painter();
    let (grid_line, hour_line, label_color) = theme::grid_colors();

    painter.rect_filled(grid_rect, 0.0, Color32::from_rgb(0x16, 0x19, 0x22));

    for (i, marker) in hours.iter().enumerate() {
        let y = rect.min.y + marker.top;
        painter.text(
            egui::pos2(rect.min.x + HOUR_LABEL_WIDTH - 8.0, y),
            egui::Align2::RIGHT_TOP,
            &marker.label,
            egui::FontId::proportional(11.0),
            label_color,
        );
        painter.line_segment(
            [egui::pos2(grid_rect.min.x, y), egui::pos2(grid_rect.max.x, y)],
            egui::Stroke::new(1.0, if i == 0 { hour_line } else { grid_line }),
        );
    }

    for marker in prayers {
        let y = rect.min.y + marker.top;
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(grid_rect.min.x, y), egui::pos2(grid_rect.max.x, y)],
            egui::Stroke::new(1.0, theme::prayer_color()),
            6.0,
            4.0,
        ));
        painter.text(
            egui::pos2(grid_rect.max.x - 4.0, y - 1.0),
            egui::Align2::RIGHT_BOTTOM,
            &marker.label,
            egui::FontId::proportional(10.0),
            theme::prayer_color(),
        );
    }
}

fn render_block(ui: &mut Ui, rect: egui::Rect, block: &Block, drag: &mut DragController, result: &mut TimelineResult) {
    let id = ui.id().with(("block", block.item, block.continued));
    let response = ui.interact(rect, id, egui::Sense::click_and_drag());

    if response.drag_started() {
        drag.begin(block.item, block.duration);
    }
    if response.hovered() && !drag.is_active() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }

    paint_block(ui, rect, block, drag.is_dragging(block.item));

    // Action icons sit on top of the block, right-aligned
    let size = ICON_SIZE.min(rect.height() - 2.0).max(8.0);
    let mut x = rect.max.x - 4.0 - size;
    let y = rect.min.y + 3.0;
    let mut icon = |ui: &mut Ui, glyph: &str, family: egui::FontFamily, tag: &str| -> bool {
        let icon_rect = egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(size, size));
        x -= size + 4.0;
        let icon_response = ui.interact(icon_rect, id.with(tag), egui::Sense::click());
        let color = text_on(hex_color(&block.color));
        let color = if icon_response.hovered() { color } else { color.gamma_multiply(0.7) };
        ui.painter().text(icon_rect.center(), egui::Align2::CENTER_CENTER, glyph, egui::FontId::new(size, family), color);
        if icon_response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        icon_response.clicked()
    };

    if block.actions.delete && icon(ui, egui_phosphor::regular::X, egui::FontFamily::Proportional, "delete") {
        result.delete = Some(block.item);
    }
    if block.actions.color && icon(ui, egui_phosphor::regular::PALETTE, egui::FontFamily::Proportional, "color") {
        result.pick_color = Some(block.item);
    }
    if block.actions.checkbox {
        let (glyph, family) = if block.completed {
            (egui_phosphor::fill::CHECK_SQUARE, theme::phosphor_fill_family())
        } else {
            (egui_phosphor::regular::SQUARE, egui::FontFamily::Proportional)
        };
        if icon(ui, glyph, family, "complete") && block.item.kind == ItemKind::Schedule {
            result.toggle_complete = Some((block.item.id, !block.completed));
        }
    }
}

fn paint_block(ui: &Ui, rect: egui::Rect, block: &Block, highlighted: bool) {
    if !ui.is_rect_visible(rect) {
        return;
    }

    let mut fill = hex_color(&block.color);
    if block.completed {
        fill = fill.gamma_multiply(0.55);
    }
    if highlighted {
        fill = fill.gamma_multiply(0.6);
    }
    let text_color = text_on(hex_color(&block.color));
    let stroke = if highlighted {
        egui::Stroke::new(2.0, Color32::WHITE)
    } else {
        egui::Stroke::new(1.0, Color32::from_black_alpha(80))
    };

    let painter = ui.painter().with_clip_rect(rect.intersect(ui.clip_rect()));
    painter.rect(rect, 4.0, fill, stroke);

    let left = rect.min.x + 8.0;
    let mut y = rect.min.y + 4.0;
    let name_size = if block.small { 12.0 } else { 13.0 };
    painter.text(
        egui::pos2(left, y),
        egui::Align2::LEFT_TOP,
        &block.name,
        egui::FontId::new(name_size, theme::bold_family()),
        text_color,
    );
    y += name_size + 3.0;

    if rect.height() >= 28.0 {
        painter.text(
            egui::pos2(left, y),
            egui::Align2::LEFT_TOP,
            &block.time_label,
            egui::FontId::proportional(11.0),
            text_color.gamma_multiply(0.85),
        );
        y += 14.0;
    }

    match &block.tracking {
        None => {}
        Some(TrackingView::Flexible) => {
            painter.text(
                egui::pos2(rect.max.x - 8.0, rect.max.y - 4.0),
                egui::Align2::RIGHT_BOTTOM,
                format!("{} Flexible", egui_phosphor::fill::LIGHTNING),
                egui::FontId::new(11.0, theme::phosphor_fill_family()),
                text_color,
            );
        }
        Some(TrackingView::Counts { tracking, compact, progress }) => {
            let dot = theme::status_color(tracking.status);
            if *compact {
                // Two short lines at the right edge, left of the action icons
                let right = rect.max.x - 8.0 - 3.0 * (ICON_SIZE + 4.0);
                let mid = rect.center().y;
                painter.circle_filled(egui::pos2(right - 40.0, mid), 4.0, dot);
                painter.text(
                    egui::pos2(right, mid),
                    egui::Align2::RIGHT_BOTTOM,
                    format!("S:{}", tracking.scheduled),
                    egui::FontId::proportional(10.0),
                    text_color,
                );
                painter.text(
                    egui::pos2(right, mid),
                    egui::Align2::RIGHT_TOP,
                    format!("C:{}", tracking.completed),
                    egui::FontId::proportional(10.0),
                    text_color,
                );
            } else {
                painter.circle_filled(egui::pos2(left + 4.0, y + 7.0), 4.0, dot);
                painter.text(
                    egui::pos2(left + 14.0, y),
                    egui::Align2::LEFT_TOP,
                    format!("Scheduled: {}m  Completed: {}m", tracking.scheduled, tracking.completed),
                    egui::FontId::proportional(11.0),
                    text_color,
                );
                painter.text(
                    egui::pos2(left + 14.0, y + 13.0),
                    egui::Align2::LEFT_TOP,
                    &tracking.status_text,
                    egui::FontId::proportional(10.0),
                    text_color.gamma_multiply(0.85),
                );
            }

            if let Some(percent) = progress {
                let bar = egui::Rect::from_min_size(
                    egui::pos2(left, rect.max.y - 8.0),
                    egui::vec2(rect.width() - 16.0, 4.0),
                );
                painter.rect_filled(bar, 2.0, Color32::from_black_alpha(70));
                let filled = egui::Rect::from_min_size(bar.min, egui::vec2(bar.width() * *percent as f32 / 100.0, 4.0));
                painter.rect_filled(filled, 2.0, text_color);
            }
        }
    }
}

fn track_pointer(
    ui: &Ui,
    timeline: TimelineId,
    clip: egui::Rect,
    viewport: Viewport,
    map: &TimeMap,
    drag: &mut DragController,
    result: &mut TimelineResult,
) {
    if !drag.is_active() {
        return;
    }

    let (pointer, released) = ui.ctx().input(|i| (i.pointer.latest_pos(), i.pointer.any_released()));
    match pointer {
        Some(pos) if clip.contains(pos) => {
            if released {
                result.drop = Some(drag.drop(timeline, pos.y, viewport, map));
            } else {
                drag.drag_over(timeline, pos.y, viewport, Instant::now());
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            }
        }
        _ => drag.drag_leave(timeline, false),
    }
}
