use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use chrono::Local;
use eframe::egui;
use egui::{Color32, RichText};

use crate::api::{BoardApi, BoardClient};
use crate::board::{self, Alert, AlertKind, BoardEvent, BoardState, Command, PendingKey};
use crate::config::Config;
use crate::sunset::{self, ConfiguredLocation, LocationStatus, SunsetCache, SunsetContext};
use crate::timeline::palette::{parse_hex, DEFAULT_COLOR};
use crate::timeline::{self, ItemRef, TimelineId};
use super::views::{self, TimelineView};

pub struct DuskboardApp {
    config: Config,
    board: BoardState,

    // Custom color last chosen in the new-task form
    form_custom: [u8; 3],

    // Dialogs
    confirm: Option<Confirm>,
    color_picker: Option<ColorPicker>,

    // Last scroll offset per timeline, and a forced offset for the next frame
    scroll_offsets: HashMap<TimelineId, f32>,
    scroll_to: HashMap<TimelineId, f32>,

    // Async communication
    api: Option<Arc<dyn BoardApi>>,
    ctx: egui::Context,
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Confirm {
    Delete(ItemRef),
    Sync,
}

struct ColorPicker {
    item: ItemRef,
    current: String,
    custom: [u8; 3],
}

enum AsyncResult {
    SunsetResolved(SunsetContext, LocationStatus),
    Board(PendingKey, BoardEvent),
}

impl DuskboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> anyhow::Result<Self> {
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let (result_tx, result_rx) = channel();

        let api: Option<Arc<dyn BoardApi>> = match BoardClient::new(&config) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build API client");
                None
            }
        };

        let today = Local::now().date_naive();
        let mut app = Self {
            board: BoardState::new(today, config.grid_minutes),
            form_custom: parse_hex(DEFAULT_COLOR).unwrap_or([0x4e, 0xcd, 0xc4]),
            confirm: None,
            color_picker: None,
            scroll_offsets: HashMap::new(),
            scroll_to: HashMap::new(),
            api,
            ctx: cc.egui_ctx.clone(),
            runtime,
            result_rx,
            result_tx,
            config,
        };

        app.initialize();
        Ok(app)
    }

    /// Resolve the sunset context, then load tasks and schedule
    fn initialize(&mut self) {
        let Some(api) = self.api.clone() else {
            self.board.set_sunset(
                self.board.sunset.clone(),
                LocationStatus::Fallback("Error fetching sunset time. Using default.".to_string()),
            );
            self.board.alert = Some(Alert::error("Failed to load data. Please refresh the page."));
            return;
        };

        let load = Command::LoadAll;
        if !self.board.begin(&load) {
            return;
        }

        let location = ConfiguredLocation::from_config(&self.config);
        let cache = SunsetCache::new(Config::sunset_cache_path());
        let timeout = Duration::from_secs(self.config.location_timeout_secs);
        let tx = self.result_tx.clone();
        let ctx = self.ctx.clone();

        self.runtime.spawn(async move {
            let today = Local::now().date_naive();
            let (context, status) = sunset::resolve(api.as_ref(), &location, &cache, timeout, today).await;
            let _ = tx.send(AsyncResult::SunsetResolved(context, status));
            ctx.request_repaint();

            let event = board::execute(api.as_ref(), load).await;
            let _ = tx.send(AsyncResult::Board(PendingKey::All, event));
            ctx.request_repaint();
        });
    }

    /// Send `command` to the backend unless one for the same item is in flight
    fn dispatch(&mut self, command: Command) {
        let Some(api) = self.api.clone() else {
            self.board.alert = Some(Alert::error("No backend configured. Check api_base_url in the config file."));
            return;
        };
        if !self.board.begin(&command) {
            return;
        }

        tracing::debug!(?command, "Dispatching");
        let key = command.key();
        let tx = self.result_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = board::execute(api.as_ref(), command).await;
            let _ = tx.send(AsyncResult::Board(key, event));
            ctx.request_repaint();
        });
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::SunsetResolved(context, status) => {
                    tracing::info!(sunset = %context.sunset_time, status = %status.describe(), "Sunset context ready");
                    self.board.set_sunset(context, status);
                }
                AsyncResult::Board(key, event) => self.board.apply(&key, event),
            }
        }
    }

    fn submit_form(&mut self) {
        // The form is cleared once the backend has the task
        let form = &self.board.form;
        match form.validate(self.config.min_task_duration, self.config.max_task_duration) {
            Ok(task) => self.dispatch(Command::CreateTask(task)),
            Err(e) => self.board.alert = Some(Alert::error(e.to_string())),
        }
    }

    fn open_color_picker(&mut self, item: ItemRef) {
        let current = self
            .board
            .task_blocks()
            .into_iter()
            .chain(self.board.schedule_blocks())
            .find(|b| b.item == item)
            .map(|b| b.color)
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let custom = parse_hex(&current).unwrap_or(self.form_custom);
        self.color_picker = Some(ColorPicker { item, current, custom });
    }

    /// Apply the pending auto-scroll step, if its timer fired
    fn tick_auto_scroll(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if let Some((timeline, delta)) = self.board.drag.auto_scroll_tick(now) {
            let offset = self.scroll_offsets.get(&timeline).copied().unwrap_or(0.0);
            self.scroll_to.insert(timeline, (offset + delta).max(0.0));
        }
        if let Some(wait) = self.board.drag.next_tick_in(now) {
            ctx.request_repaint_after(wait);
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        let map = self.board.time_map();
        let hours = timeline::hour_markers(&map);
        let prayers = timeline::prayer_markers(&self.board.sunset);
        let task_blocks = self.board.task_blocks();
        let schedule_blocks = self.board.schedule_blocks();

        let mut results = Vec::with_capacity(2);
        ui.columns(2, |columns| {
            let panes = [
                (TimelineId::Optimal, "Optimal Timeline", &task_blocks),
                (TimelineId::Daily, "Daily Timeline", &schedule_blocks),
            ];
            for ((id, title, blocks), column) in panes.into_iter().zip(columns.iter_mut()) {
                let view = TimelineView {
                    id,
                    title,
                    blocks,
                    hours: &hours,
                    prayers: &prayers,
                    map,
                    scroll_to: self.scroll_to.remove(&id),
                };
                results.push((id, views::render_timeline(column, view, &mut self.board.drag)));
            }
        });

        let released = ui.input(|i| i.pointer.any_released());
        for (id, result) in results {
            self.scroll_offsets.insert(id, result.scroll_offset);

            if let Some(action) = result.drop {
                if let Some(command) = Command::from_drop(action, &self.board.tasks) {
                    self.dispatch(command);
                }
            }
            if let Some(item) = result.delete {
                self.confirm = Some(Confirm::Delete(item));
            }
            if let Some(item) = result.pick_color {
                self.open_color_picker(item);
            }
            if let Some((id, completed)) = result.toggle_complete {
                self.dispatch(Command::SetCompleted { id, completed });
            }
        }

        // Released anywhere, including outside both timelines
        if self.board.drag.is_active() && released {
            self.board.drag.end();
        }
    }

    fn render_confirm(&mut self, ctx: &egui::Context) {
        let Some(confirm) = self.confirm else {
            return;
        };

        let (title, message, action) = match confirm {
            Confirm::Delete(_) => ("Confirm Delete", "Are you sure you want to delete this item?", "Delete"),
            Confirm::Sync => ("Sync Schedule", "This will replace your current schedule. Continue?", "Sync"),
        };

        let mut accepted = false;
        let mut cancelled = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .default_width(400.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame())
            .show(ctx, |ui| {
                ui.add_space(10.0);
                ui.label(RichText::new(message).size(14.0));
                ui.add_space(20.0);
                ui.horizontal(|ui| {
                    let action_color = match confirm {
                        Confirm::Delete(_) => Color32::from_rgb(224, 108, 117),
                        Confirm::Sync => Color32::from_rgb(0xf3, 0x9c, 0x4a),
                    };
                    if views::dialog_button(ui, action, action_color).clicked() {
                        accepted = true;
                    }
                    let (_, text_color) = super::theme::button_colors();
                    if views::dialog_button(ui, "Cancel", text_color).clicked() {
                        cancelled = true;
                    }
                });
            });

        if accepted {
            self.confirm = None;
            match confirm {
                Confirm::Delete(item) => self.dispatch(Command::delete(item)),
                Confirm::Sync => self.dispatch(Command::Sync),
            }
        } else if cancelled {
            self.confirm = None;
        }
    }

    fn render_color_picker(&mut self, ctx: &egui::Context) {
        let Some(picker) = self.color_picker.as_mut() else {
            return;
        };

        let mut chosen = None;
        let mut cancelled = false;
        egui::Window::new("Choose a color")
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame())
            .show(ctx, |ui| {
                chosen = views::render_color_choices(ui, &picker.current, &mut picker.custom);
                ui.add_space(16.0);
                let (_, text_color) = super::theme::button_colors();
                if views::dialog_button(ui, "Cancel", text_color).clicked() {
                    cancelled = true;
                }
            });

        if let Some(color) = chosen {
            let item = picker.item;
            self.color_picker = None;
            self.dispatch(Command::set_color(item, color));
        } else if cancelled {
            self.color_picker = None;
        }
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = &self.board.alert else {
            return;
        };

        let (title, color) = match alert.kind {
            AlertKind::Info => ("Done", Color32::from_rgb(152, 195, 121)),
            AlertKind::Error => ("Error", Color32::from_rgb(224, 108, 117)),
        };
        let message = alert.message.clone();

        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame())
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.label(RichText::new(message).size(14.0).color(color));
                ui.add_space(16.0);
                let (_, text_color) = super::theme::button_colors();
                if views::dialog_button(ui, "OK", text_color).clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.board.dismiss_alert();
        }
    }
}

fn dialog_frame() -> egui::Frame {
    let (content_bg, frame_color, _) = super::theme::dialog_colors();
    egui::Frame::none()
        .fill(content_bg)
        .stroke(egui::Stroke::new(2.0, frame_color))
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::same(20.0))
}

impl eframe::App for DuskboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(e) = self.config.save() {
                    tracing::warn!(error = %e, "Failed to save font scale");
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.board.drag.end();
        }
        self.tick_auto_scroll(ctx);

        let modal_open = self.confirm.is_some() || self.color_picker.is_some() || self.board.alert.is_some();

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(ctx.style().visuals.panel_fill).inner_margin(egui::Margin::symmetric(16.0, 10.0)))
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal_open, |ui| {
                    let sync_busy = self.board.is_pending(&PendingKey::Schedule);
                    if views::render_header(ui, &self.board.sunset, self.board.location.as_ref(), sync_busy) {
                        self.confirm = Some(Confirm::Sync);
                    }
                    ui.add_space(6.0);

                    let form_busy = self.board.is_pending(&PendingKey::NewTask);
                    if views::render_task_form(ui, &mut self.board.form, &mut self.form_custom, form_busy) {
                        self.submit_form();
                    }
                });
            });

        egui::TopBottomPanel::bottom("status")
            .frame(egui::Frame::none().fill(ctx.style().visuals.panel_fill).inner_margin(egui::Margin::symmetric(16.0, 4.0)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.board.is_busy() {
                        ui.spinner();
                        ui.label(RichText::new("Working...").size(11.0));
                    }
                    if let Some(item) = self.board.drag.dragged() {
                        ui.label(
                            RichText::new(format!("{} Dragging {:?} {}", egui_phosphor::regular::HAND_GRABBING, item.kind, item.id))
                                .size(11.0)
                                .color(Color32::from_rgb(0xf3, 0x9c, 0x4a)),
                        );
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| self.render_main(ui));
        });

        self.render_confirm(ctx);
        self.render_color_picker(ctx);
        self.render_alert(ctx);
    }
}
