//! Drag-and-drop between the optimal and daily timelines.
//!
//! The controller is a plain state machine fed with pointer positions by the
//! view. It owns the drop-zone indicator and the auto-scroll timer, and turns
//! a drop into a [`DropAction`] without touching any data itself.

use std::time::{Duration, Instant};

use super::blocks::{ItemKind, ItemRef};
use super::time_map::{snap, TimeMap, MINUTES_PER_DAY};

/// Distance from a viewport edge that starts auto-scrolling
pub const EDGE_MARGIN: f32 = 50.0;
pub const SCROLL_INTERVAL: Duration = Duration::from_millis(16);
pub const SCROLL_STEP: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineId {
    /// The planned day, holding tasks
    Optimal,
    /// Today's actual schedule
    Daily,
}

/// Visible window of a scrolling timeline, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub height: f32,
    pub scroll_offset: f32,
    pub content_height: f32,
}

impl Viewport {
    /// Pointer position in timeline content coordinates
    pub fn content_y(&self, pointer_y: f32) -> f32 {
        pointer_y - self.top + self.scroll_offset
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height - self.height).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScroll {
    pub timeline: TimelineId,
    pub direction: ScrollDirection,
    next_tick: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZone {
    pub timeline: TimelineId,
    pub top: f32,
    pub height: f32,
}

/// What a drop asks the board to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    MoveTask { id: i64, start_time: String },
    MoveEntry { id: i64, start_time: String },
    /// Copy a planned task onto today's schedule
    CommitTask { task_id: i64, start_time: String },
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging { item: ItemRef, duration: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    grid_minutes: u32,
    drop_zone: Option<DropZone>,
    auto_scroll: Option<AutoScroll>,
}

impl DragController {
    pub fn new(grid_minutes: u32) -> Self {
        Self {
            grid_minutes,
            ..Self::default()
        }
    }

    pub fn begin(&mut self, item: ItemRef, duration: u32) {
        tracing::debug!(?item, duration, "Drag started");
        self.state = DragState::Dragging { item, duration };
        self.drop_zone = None;
        self.auto_scroll = None;
    }

    pub fn dragged(&self) -> Option<ItemRef> {
        match self.state {
            DragState::Dragging { item, .. } => Some(item),
            DragState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.dragged().is_some()
    }

    /// True for every segment of the dragged item, so split blocks
    /// highlight together.
    pub fn is_dragging(&self, item: ItemRef) -> bool {
        self.dragged() == Some(item)
    }

    pub fn drop_zone(&self) -> Option<DropZone> {
        self.drop_zone
    }

    pub fn auto_scroll(&self) -> Option<AutoScroll> {
        self.auto_scroll
    }

    pub fn drag_over(&mut self, timeline: TimelineId, pointer_y: f32, viewport: Viewport, now: Instant) {
        let DragState::Dragging { duration, .. } = self.state else {
            return;
        };

        let y = viewport.content_y(pointer_y);
        self.update_auto_scroll(timeline, pointer_y - viewport.top, viewport, now);

        let top = self.snapped(y);
        self.drop_zone = Some(DropZone {
            timeline,
            top: top as f32,
            height: duration as f32,
        });
    }

    fn update_auto_scroll(&mut self, timeline: TimelineId, visible_y: f32, viewport: Viewport, now: Instant) {
        let direction = if visible_y < EDGE_MARGIN && viewport.scroll_offset > 0.0 {
            Some(ScrollDirection::Up)
        } else if visible_y > viewport.height - EDGE_MARGIN && viewport.scroll_offset < viewport.max_scroll() {
            Some(ScrollDirection::Down)
        } else {
            None
        };

        match direction {
            None => self.auto_scroll = None,
            Some(direction) => {
                let unchanged = self
                    .auto_scroll
                    .is_some_and(|s| s.timeline == timeline && s.direction == direction);
                if !unchanged {
                    self.auto_scroll = Some(AutoScroll {
                        timeline,
                        direction,
                        next_tick: now + SCROLL_INTERVAL,
                    });
                }
            }
        }
    }

    /// Scroll delta due at `now`, if the auto-scroll timer fired
    pub fn auto_scroll_tick(&mut self, now: Instant) -> Option<(TimelineId, f32)> {
        let scroll = self.auto_scroll.as_mut()?;
        if now < scroll.next_tick {
            return None;
        }
        scroll.next_tick = now + SCROLL_INTERVAL;
        let delta = match scroll.direction {
            ScrollDirection::Up => -SCROLL_STEP,
            ScrollDirection::Down => SCROLL_STEP,
        };
        Some((scroll.timeline, delta))
    }

    /// Time until the auto-scroll timer next fires
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.auto_scroll
            .map(|s| s.next_tick.saturating_duration_since(now))
    }

    /// Pointer left `timeline`. Moving onto a child element of the same
    /// timeline is reported with `still_inside` and changes nothing.
    pub fn drag_leave(&mut self, timeline: TimelineId, still_inside: bool) {
        if still_inside {
            return;
        }
        if self.auto_scroll.is_some_and(|s| s.timeline == timeline) {
            self.auto_scroll = None;
        }
        if self.drop_zone.is_some_and(|z| z.timeline == timeline) {
            self.drop_zone = None;
        }
    }

    pub fn drop(&mut self, timeline: TimelineId, pointer_y: f32, viewport: Viewport, map: &TimeMap) -> DropAction {
        self.drop_zone = None;
        self.auto_scroll = None;

        let DragState::Dragging { item, .. } = self.state else {
            return DropAction::None;
        };

        let minutes = self.snapped(viewport.content_y(pointer_y));
        let start_time = map.to_time(minutes);

        let action = match (item.kind, timeline) {
            (ItemKind::Task, TimelineId::Optimal) => DropAction::MoveTask { id: item.id, start_time },
            (ItemKind::Schedule, TimelineId::Daily) => DropAction::MoveEntry { id: item.id, start_time },
            (ItemKind::Task, TimelineId::Daily) => DropAction::CommitTask { task_id: item.id, start_time },
            (ItemKind::Schedule, TimelineId::Optimal) => DropAction::None,
        };
        tracing::debug!(?item, ?timeline, ?action, "Dropped");
        action
    }

    /// Grid line for content offset `y`. Offsets past the end of the day
    /// land on the last grid line before it.
    fn snapped(&self, y: f32) -> u32 {
        let last = match self.grid_minutes {
            0 => MINUTES_PER_DAY - 1,
            grid => (MINUTES_PER_DAY - 1) / grid * grid,
        };
        snap(y, self.grid_minutes).min(last)
    }

    pub fn end(&mut self) {
        self.state = DragState::Idle;
        self.drop_zone = None;
        self.auto_scroll = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 600px tall window onto the full day, scrolled to `offset`
    fn viewport(offset: f32) -> Viewport {
        Viewport {
            top: 100.0,
            height: 600.0,
            scroll_offset: offset,
            content_height: 1440.0,
        }
    }

    #[test]
    fn task_dropped_on_daily_is_committed() {
        let map = TimeMap::new(12);
        let mut drag = DragController::new(5);
        drag.begin(ItemRef::task(7), 30);

        // 14:05 is 125 minutes after a 12:00 anchor
        let action = drag.drop(TimelineId::Daily, 100.0 + 124.0, viewport(0.0), &map);
        assert_eq!(
            action,
            DropAction::CommitTask { task_id: 7, start_time: "14:05".to_string() }
        );
    }

    #[test]
    fn drops_dispatch_by_kind_and_target() {
        let map = TimeMap::new(18);
        let mut drag = DragController::new(5);

        drag.begin(ItemRef::task(1), 30);
        assert_eq!(
            drag.drop(TimelineId::Optimal, 160.0, viewport(0.0), &map),
            DropAction::MoveTask { id: 1, start_time: "19:00".to_string() }
        );

        drag.begin(ItemRef::schedule(2), 30);
        assert_eq!(
            drag.drop(TimelineId::Daily, 160.0, viewport(300.0), &map),
            DropAction::MoveEntry { id: 2, start_time: "00:00".to_string() }
        );

        drag.begin(ItemRef::schedule(2), 30);
        assert_eq!(drag.drop(TimelineId::Optimal, 160.0, viewport(0.0), &map), DropAction::None);
    }

    #[test]
    fn drop_without_drag_does_nothing() {
        let mut drag = DragController::new(5);
        let action = drag.drop(TimelineId::Daily, 200.0, viewport(0.0), &TimeMap::new(18));
        assert_eq!(action, DropAction::None);
    }

    #[test]
    fn drop_past_the_end_clamps_to_last_grid_line() {
        let map = TimeMap::new(18);
        let mut drag = DragController::new(5);
        drag.begin(ItemRef::task(1), 30);
        let action = drag.drop(TimelineId::Optimal, 100.0 + 599.0, viewport(840.0), &map);
        assert_eq!(action, DropAction::MoveTask { id: 1, start_time: "17:55".to_string() });

        drag.begin(ItemRef::task(1), 30);
        drag.drag_over(TimelineId::Optimal, 100.0 + 599.0, viewport(840.0), Instant::now());
        assert_eq!(drag.drop_zone().map(|z| z.top), Some(1435.0));
    }

    proptest! {
        #[test]
        fn drops_land_on_the_grid(y in 0.0f32..2000.0, grid in 1u32..=60) {
            let map = TimeMap::new(18);
            let mut drag = DragController::new(grid);
            drag.begin(ItemRef::task(1), 30);

            let action = drag.drop(TimelineId::Optimal, 100.0 + y, viewport(0.0), &map);
            let DropAction::MoveTask { start_time, .. } = action else {
                panic!("unexpected drop {:?}", action);
            };
            let minutes = map.to_minutes(&start_time).unwrap();
            prop_assert!(minutes < MINUTES_PER_DAY);
            prop_assert_eq!(minutes % grid, 0);
        }
    }

    #[test]
    fn drag_over_moves_snapped_indicator() {
        let now = Instant::now();
        let mut drag = DragController::new(5);
        drag.begin(ItemRef::schedule(3), 45);

        drag.drag_over(TimelineId::Daily, 100.0 + 203.0, viewport(60.0), now);
        assert_eq!(
            drag.drop_zone(),
            Some(DropZone { timeline: TimelineId::Daily, top: 265.0, height: 45.0 })
        );
        assert!(drag.auto_scroll().is_none());
    }

    #[test]
    fn auto_scroll_near_edges_with_room() {
        let now = Instant::now();
        let mut drag = DragController::new(5);
        drag.begin(ItemRef::task(1), 30);

        // At the top with nothing above: no scrolling
        drag.drag_over(TimelineId::Optimal, 110.0, viewport(0.0), now);
        assert!(drag.auto_scroll().is_none());

        drag.drag_over(TimelineId::Optimal, 110.0, viewport(200.0), now);
        assert_eq!(drag.auto_scroll().map(|s| s.direction), Some(ScrollDirection::Up));

        drag.drag_over(TimelineId::Optimal, 680.0, viewport(200.0), now);
        assert_eq!(drag.auto_scroll().map(|s| s.direction), Some(ScrollDirection::Down));

        // Already at the bottom
        drag.drag_over(TimelineId::Optimal, 680.0, viewport(840.0), now);
        assert!(drag.auto_scroll().is_none());
    }

    #[test]
    fn auto_scroll_timer_is_singular() {
        let start = Instant::now();
        let mut drag = DragController::new(5);
        drag.begin(ItemRef::task(1), 30);

        drag.drag_over(TimelineId::Optimal, 680.0, viewport(200.0), start);
        assert_eq!(drag.auto_scroll_tick(start), None);

        let later = start + SCROLL_INTERVAL;
        assert_eq!(drag.auto_scroll_tick(later), Some((TimelineId::Optimal, SCROLL_STEP)));
        assert_eq!(drag.auto_scroll_tick(later), None);

        // Hovering the other timeline's top edge replaces the timer
        drag.drag_over(TimelineId::Daily, 110.0, viewport(200.0), later);
        let scroll = drag.auto_scroll().unwrap();
        assert_eq!((scroll.timeline, scroll.direction), (TimelineId::Daily, ScrollDirection::Up));
        assert_eq!(
            drag.auto_scroll_tick(later + SCROLL_INTERVAL),
            Some((TimelineId::Daily, -SCROLL_STEP))
        );
    }

    #[test]
    fn leaving_for_a_child_keeps_state() {
        let now = Instant::now();
        let mut drag = DragController::new(5);
        drag.begin(ItemRef::task(1), 30);
        drag.drag_over(TimelineId::Daily, 680.0, viewport(200.0), now);

        drag.drag_leave(TimelineId::Daily, true);
        assert!(drag.drop_zone().is_some());
        assert!(drag.auto_scroll().is_some());

        drag.drag_leave(TimelineId::Daily, false);
        assert!(drag.drop_zone().is_none());
        assert!(drag.auto_scroll().is_none());
        assert!(drag.is_active());
    }

    #[test]
    fn end_always_returns_to_idle() {
        let now = Instant::now();
        let mut drag = DragController::new(5);
        drag.begin(ItemRef::schedule(9), 120);
        assert!(drag.is_dragging(ItemRef::schedule(9)));
        assert!(!drag.is_dragging(ItemRef::task(9)));

        drag.drag_over(TimelineId::Daily, 680.0, viewport(200.0), now);
        drag.end();
        assert!(!drag.is_active());
        assert!(drag.drop_zone().is_none());
        assert!(drag.auto_scroll_tick(now + SCROLL_INTERVAL).is_none());
    }
}
