//! Plan-versus-actual aggregation per color.

use crate::api::ScheduleEntry;
use super::palette::{is_free_time, same_color};

/// Scheduled time within this many minutes of the plan counts as on track
const ON_TRACK_TOLERANCE: u32 = 15;
/// Beyond the on-track tolerance but within this many minutes is a warning
const WARNING_TOLERANCE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    Green,
    Yellow,
    Red,
    Free,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTracking {
    pub scheduled: u32,
    pub completed: u32,
    pub status: TrackStatus,
    pub status_text: String,
    pub completion_percent: u32,
    pub is_free_time: bool,
}

impl ColorTracking {
    fn flexible() -> Self {
        Self {
            scheduled: 0,
            completed: 0,
            status: TrackStatus::Free,
            status_text: "Flexible".to_string(),
            completion_percent: 0,
            is_free_time: true,
        }
    }
}

/// Share of scheduled minutes already completed, capped at 100
pub fn completion_percent(scheduled: u32, completed: u32) -> u32 {
    if scheduled == 0 {
        return 0;
    }
    let ratio = (completed as f64 / scheduled as f64 * 100.0).min(100.0);
    ratio.round() as u32
}

/// Status for a color given its planned minutes and what today's schedule holds
pub fn track_status(scheduled: u32, optimal: u32) -> (TrackStatus, String) {
    let diff = scheduled.abs_diff(optimal);
    if scheduled == 0 {
        (TrackStatus::Red, "Not scheduled".to_string())
    } else if diff <= ON_TRACK_TOLERANCE {
        (TrackStatus::Green, "On track".to_string())
    } else if diff <= WARNING_TOLERANCE {
        (TrackStatus::Yellow, format!("Off by {} min", diff))
    } else {
        (TrackStatus::Red, format!("Off by {} min", diff))
    }
}

pub fn color_tracking(color: &str, optimal_duration: u32, schedule: &[ScheduleEntry]) -> ColorTracking {
    if is_free_time(color) {
        return ColorTracking::flexible();
    }

    let matching = || schedule.iter().filter(|entry| same_color(&entry.color, color));
    let scheduled: u32 = matching().map(|entry| entry.duration).sum();
    let completed: u32 = matching()
        .filter(|entry| entry.completed)
        .map(|entry| entry.duration)
        .sum();

    let (status, status_text) = track_status(scheduled, optimal_duration);

    ColorTracking {
        scheduled,
        completed,
        status,
        status_text,
        completion_percent: completion_percent(scheduled, completed),
        is_free_time: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::palette::FREE_TIME_COLOR;

    fn entry(id: i64, color: &str, duration: u32, completed: bool) -> ScheduleEntry {
        ScheduleEntry {
            id,
            task_id: None,
            name: format!("entry {}", id),
            duration,
            color: color.to_string(),
            start_time: Some("09:00".to_string()),
            completed,
            date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn status_thresholds_against_a_sixty_minute_plan() {
        assert_eq!(track_status(0, 60), (TrackStatus::Red, "Not scheduled".to_string()));
        assert_eq!(track_status(55, 60).0, TrackStatus::Green);
        assert_eq!(track_status(75, 60).0, TrackStatus::Green);
        assert_eq!(track_status(80, 60), (TrackStatus::Yellow, "Off by 20 min".to_string()));
        assert_eq!(track_status(90, 60).0, TrackStatus::Yellow);
        assert_eq!(track_status(100, 60), (TrackStatus::Red, "Off by 40 min".to_string()));
    }

    #[test]
    fn completion_percent_is_capped_and_rounded() {
        assert_eq!(completion_percent(50, 25), 50);
        assert_eq!(completion_percent(0, 30), 0);
        assert_eq!(completion_percent(30, 60), 100);
        assert_eq!(completion_percent(3, 1), 33);
        assert_eq!(completion_percent(3, 2), 67);
    }

    #[test]
    fn sums_only_matching_colors() {
        let schedule = vec![
            entry(1, "#FF6B6B", 30, true),
            entry(2, "#ff6b6b", 25, false),
            entry(3, "#4ECDC4", 90, true),
            entry(4, FREE_TIME_COLOR, 120, true),
        ];

        let tracking = color_tracking("#FF6B6B", 60, &schedule);
        assert_eq!(tracking.scheduled, 55);
        assert_eq!(tracking.completed, 30);
        assert_eq!(tracking.status, TrackStatus::Green);
        assert_eq!(tracking.completion_percent, 55);
        assert!(!tracking.is_free_time);
    }

    #[test]
    fn free_time_is_flexible_and_never_aggregated() {
        let schedule = vec![
            entry(1, FREE_TIME_COLOR, 120, true),
            entry(2, "#45B7D1", 45, false),
        ];

        let free = color_tracking(FREE_TIME_COLOR, 60, &schedule);
        assert!(free.is_free_time);
        assert_eq!(free.status, TrackStatus::Free);
        assert_eq!(free.scheduled, 0);
        assert_eq!(free.status_text, "Flexible");

        let other = color_tracking("#45B7D1", 45, &schedule);
        assert_eq!(other.scheduled, 45);
        assert_eq!(other.completed, 0);
    }

    #[test]
    fn unscheduled_color_is_red() {
        let tracking = color_tracking("#A29BFE", 60, &[]);
        assert_eq!(tracking.status, TrackStatus::Red);
        assert_eq!(tracking.status_text, "Not scheduled");
        assert_eq!(tracking.completion_percent, 0);
    }
}
