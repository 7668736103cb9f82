//! Sunset-anchored timeline model: coordinates, markers, blocks, tracking and
//! drag-and-drop. Nothing here touches the network or the UI.

pub mod blocks;
pub mod drag;
pub mod grid;
pub mod palette;
pub mod time_map;
pub mod tracking;

pub use blocks::{render_schedule, render_tasks, Block, ItemKind, ItemRef, TrackingView};
pub use drag::{DragController, DropAction, TimelineId, Viewport};
pub use grid::{hour_markers, prayer_markers, HourMarker, PrayerMarker};
pub use time_map::{TimeMap, MINUTES_PER_DAY};
pub use tracking::TrackStatus;
