use crate::sunset::SunsetContext;
use super::time_map::TimeMap;

pub const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct HourMarker {
    pub top: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrayerMarker {
    pub top: f32,
    pub name: &'static str,
    pub time: String,
    pub label: String,
}

pub fn hour_markers(map: &TimeMap) -> Vec<HourMarker> {
    (0..HOURS_PER_DAY)
        .map(|offset| HourMarker {
            top: (offset * 60) as f32,
            label: map.hour_label(offset),
        })
        .collect()
}

/// Sunrise and the daytime prayers, placed on the sunset-anchored axis.
/// Times that fail to parse are left off the grid.
pub fn prayer_markers(context: &SunsetContext) -> Vec<PrayerMarker> {
    let map = context.time_map();
    [
        ("Sunrise", &context.sunrise_time),
        ("Dhuhr", &context.dhuhr_time),
        ("Asr", &context.asr_time),
        ("Isha", &context.isha_time),
    ]
    .into_iter()
    .filter_map(|(name, time)| match map.to_minutes(time) {
        Ok(minutes) => Some(PrayerMarker {
            top: minutes as f32,
            name,
            time: time.clone(),
            label: format!("{} {}", name, time),
        }),
        Err(e) => {
            tracing::debug!(marker = name, error = %e, "Skipping marker");
            None
        }
    })
    .collect()
}
