//! Turning tasks and schedule entries into positioned blocks.
//!
//! A block's top and height are in timeline pixels, one per minute. Items
//! running past the end of the day are split in two: the remainder continues
//! at the top of the timeline.

use crate::api::{ScheduleEntry, Task};
use super::time_map::{TimeMap, MINUTES_PER_DAY};
use super::tracking::{color_tracking, ColorTracking};

/// Blocks shorter than this use the compact layout
pub const SMALL_BLOCK_HEIGHT: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Task,
    Schedule,
}

/// Identifies a task or schedule entry across both halves of a split block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: i64,
}

impl ItemRef {
    pub fn task(id: i64) -> Self {
        Self { kind: ItemKind::Task, id }
    }

    pub fn schedule(id: i64) -> Self {
        Self { kind: ItemKind::Schedule, id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockActions {
    pub checkbox: bool,
    pub color: bool,
    pub delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackingView {
    Flexible,
    Counts {
        tracking: ColorTracking,
        /// Two-line "S:n" / "C:n" form
        compact: bool,
        /// Completion bar, only on blocks tall enough for it
        progress: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub item: ItemRef,
    pub top: f32,
    pub height: f32,
    /// Full duration of the item, not of this segment
    pub duration: u32,
    pub color: String,
    pub name: String,
    pub time_label: String,
    pub continued: bool,
    pub completed: bool,
    pub small: bool,
    pub actions: BlockActions,
    pub tracking: Option<TrackingView>,
}

/// Fields shared by tasks and schedule entries
struct Placement<'a> {
    item: ItemRef,
    name: &'a str,
    duration: u32,
    color: &'a str,
    start_time: Option<&'a str>,
    completed: bool,
}

impl<'a> Placement<'a> {
    fn of_task(task: &'a Task) -> Self {
        Self {
            item: ItemRef::task(task.id),
            name: &task.name,
            duration: task.duration,
            color: &task.color,
            start_time: task.start_time.as_deref(),
            completed: false,
        }
    }

    fn of_entry(entry: &'a ScheduleEntry) -> Self {
        Self {
            item: ItemRef::schedule(entry.id),
            name: &entry.name,
            duration: entry.duration,
            color: &entry.color,
            start_time: entry.start_time.as_deref(),
            completed: entry.completed,
        }
    }

    fn start(&self, map: &TimeMap) -> u32 {
        let Some(time) = self.start_time else {
            return 0;
        };
        map.to_minutes(time).unwrap_or_else(|e| {
            tracing::debug!(item = ?self.item, error = %e, "Unparsable start time, placing at sunset");
            0
        })
    }

    fn time_label(&self, continued: bool) -> String {
        let mut label = format!("{} min", self.duration);
        if let Some(time) = self.start_time {
            label.push_str(" • ");
            label.push_str(time);
        }
        if continued {
            label.push_str(" (continued)");
        }
        label
    }

    fn segment(&self, top: u32, height: u32, continued: bool, schedule: &[ScheduleEntry]) -> Block {
        let height = height as f32;
        let is_task = self.item.kind == ItemKind::Task;

        let tracking = (is_task && !continued).then(|| {
            let tracking = color_tracking(self.color, self.duration, schedule);
            if tracking.is_free_time {
                TrackingView::Flexible
            } else {
                let tall = height >= SMALL_BLOCK_HEIGHT;
                let progress = tall.then_some(tracking.completion_percent);
                TrackingView::Counts { tracking, compact: !tall, progress }
            }
        });

        Block {
            item: self.item,
            top: top as f32,
            height,
            duration: self.duration,
            color: self.color.to_string(),
            name: self.name.to_string(),
            time_label: self.time_label(continued),
            continued,
            completed: self.completed,
            small: height < SMALL_BLOCK_HEIGHT,
            actions: BlockActions {
                checkbox: !is_task && !continued,
                color: !continued,
                delete: true,
            },
            tracking,
        }
    }

    fn blocks(&self, map: &TimeMap, schedule: &[ScheduleEntry]) -> Vec<Block> {
        let start = self.start(map);
        let end = start.saturating_add(self.duration);

        if end > MINUTES_PER_DAY {
            // The continuation never wraps a second time
            let rest = (end - MINUTES_PER_DAY).min(MINUTES_PER_DAY);
            vec![
                self.segment(start, MINUTES_PER_DAY - start, false, schedule),
                self.segment(0, rest, true, schedule),
            ]
        } else {
            vec![self.segment(start, self.duration, false, schedule)]
        }
    }
}

/// Blocks for one planned task; tracking is computed against `schedule`
pub fn task_blocks(task: &Task, map: &TimeMap, schedule: &[ScheduleEntry]) -> Vec<Block> {
    Placement::of_task(task).blocks(map, schedule)
}

pub fn entry_blocks(entry: &ScheduleEntry, map: &TimeMap) -> Vec<Block> {
    Placement::of_entry(entry).blocks(map, &[])
}

pub fn render_tasks(tasks: &[Task], map: &TimeMap, schedule: &[ScheduleEntry]) -> Vec<Block> {
    tasks
        .iter()
        .flat_map(|task| task_blocks(task, map, schedule))
        .collect()
}

pub fn render_schedule(entries: &[ScheduleEntry], map: &TimeMap) -> Vec<Block> {
    entries.iter().flat_map(|entry| entry_blocks(entry, map)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::palette::FREE_TIME_COLOR;
    use crate::timeline::tracking::TrackStatus;

    fn task(id: i64, duration: u32, color: &str, start: Option<&str>) -> Task {
        Task {
            id,
            name: format!("task {}", id),
            duration,
            color: color.to_string(),
            start_time: start.map(str::to_string),
            order_index: 0,
            template_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn entry(id: i64, duration: u32, color: &str, start: &str, completed: bool) -> ScheduleEntry {
        ScheduleEntry {
            id,
            task_id: None,
            name: format!("entry {}", id),
            duration,
            color: color.to_string(),
            start_time: Some(start.to_string()),
            completed,
            date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn block_past_end_of_day_is_split() {
        let map = TimeMap::new(0);
        let blocks = task_blocks(&task(1, 120, "#FF6B6B", Some("23:00")), &map, &[]);

        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].top, blocks[0].height), (1380.0, 60.0));
        assert_eq!((blocks[1].top, blocks[1].height), (0.0, 60.0));
        assert_eq!(blocks[0].height + blocks[1].height, 120.0);
        assert!(blocks.iter().all(|b| b.duration == 120 && b.item == ItemRef::task(1)));

        assert!(!blocks[0].continued);
        assert!(blocks[1].continued);
        assert_eq!(blocks[1].time_label, "120 min • 23:00 (continued)");
        assert!(blocks[1].tracking.is_none());
        assert_eq!(blocks[1].actions, BlockActions { checkbox: false, color: false, delete: true });
    }

    #[test]
    fn oversized_durations_stay_inside_the_day() {
        let map = TimeMap::new(18);

        let huge = task_blocks(&task(1, u32::MAX, "#FF6B6B", Some("19:00")), &map, &[]);
        let long = task_blocks(&task(2, 3000, "#FF6B6B", Some("19:00")), &map, &[]);

        for blocks in [&huge, &long] {
            assert_eq!(blocks.len(), 2);
            assert_eq!((blocks[0].top, blocks[0].height), (60.0, 1380.0));
            assert_eq!((blocks[1].top, blocks[1].height), (0.0, 1440.0));
            assert!(blocks.iter().all(|b| b.top + b.height <= MINUTES_PER_DAY as f32));
        }
        assert_eq!(huge[1].duration, u32::MAX);
    }

    #[test]
    fn block_ending_exactly_at_end_of_day_is_not_split() {
        let map = TimeMap::new(18);
        let blocks = entry_blocks(&entry(1, 60, "#FF6B6B", "17:00", false), &map);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].top, 1380.0);
    }

    #[test]
    fn missing_start_time_anchors_at_sunset() {
        let map = TimeMap::new(18);
        let blocks = task_blocks(&task(1, 30, "#FF6B6B", None), &map, &[]);
        assert_eq!(blocks[0].top, 0.0);
        assert_eq!(blocks[0].time_label, "30 min");
        assert!(blocks[0].small);
    }

    #[test]
    fn schedule_blocks_carry_checkbox_and_completion() {
        let map = TimeMap::new(18);
        let blocks = entry_blocks(&entry(4, 90, "#45B7D1", "19:30", true), &map);

        assert_eq!(blocks[0].top, 90.0);
        assert!(blocks[0].completed);
        assert!(!blocks[0].small);
        assert!(blocks[0].tracking.is_none());
        assert_eq!(blocks[0].actions, BlockActions { checkbox: true, color: true, delete: true });
        assert_eq!(blocks[0].time_label, "90 min • 19:30");
    }

    #[test]
    fn task_tracking_switches_layout_by_height() {
        let map = TimeMap::new(18);
        let schedule = vec![
            entry(1, 30, "#FF6B6B", "20:00", true),
            entry(2, 30, "#FF6B6B", "21:00", false),
        ];

        let tall = task_blocks(&task(1, 60, "#FF6B6B", Some("19:00")), &map, &schedule);
        match &tall[0].tracking {
            Some(TrackingView::Counts { tracking, compact, progress }) => {
                assert_eq!(tracking.scheduled, 60);
                assert_eq!(tracking.completed, 30);
                assert_eq!(tracking.status, TrackStatus::Green);
                assert!(!compact);
                assert_eq!(*progress, Some(50));
            }
            other => panic!("unexpected tracking view {:?}", other),
        }

        let short = task_blocks(&task(2, 45, "#FF6B6B", Some("19:00")), &map, &schedule);
        match &short[0].tracking {
            Some(TrackingView::Counts { compact, progress, .. }) => {
                assert!(compact);
                assert_eq!(*progress, None);
            }
            other => panic!("unexpected tracking view {:?}", other),
        }
    }

    #[test]
    fn free_time_task_is_flexible() {
        let map = TimeMap::new(18);
        let blocks = task_blocks(&task(1, 60, FREE_TIME_COLOR, Some("19:00")), &map, &[]);
        assert_eq!(blocks[0].tracking, Some(TrackingView::Flexible));
    }

    #[test]
    fn lists_render_in_order() {
        let map = TimeMap::new(0);
        let tasks = vec![
            task(1, 30, "#FF6B6B", Some("01:00")),
            task(2, 120, "#4ECDC4", Some("23:00")),
            task(3, 15, "#45B7D1", Some("05:00")),
        ];
        let ids: Vec<i64> = render_tasks(&tasks, &map, &[]).iter().map(|b| b.item.id).collect();
        assert_eq!(ids, [1, 2, 2, 3]);
    }
}
