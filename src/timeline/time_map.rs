//! Conversion between wall-clock "HH:MM" strings and sunset-relative minutes.
//!
//! Both timelines use the same vertical coordinate: minute 0 is the sunset
//! hour, and one minute is one pixel.

use crate::error::TimeParseError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Snap a minute offset to the nearest multiple of `grid` (ties round up).
pub fn snap(minutes: f32, grid: u32) -> u32 {
    if grid == 0 {
        return minutes.max(0.0).round() as u32;
    }
    let grid = grid as f32;
    ((minutes / grid).round() * grid).max(0.0) as u32
}

/// Parse "HH:MM" (seconds suffix tolerated) into minutes since midnight
pub fn parse_clock(time: &str) -> Result<u32, TimeParseError> {
    let err = || TimeParseError(time.to_string());
    let mut parts = time.trim().split(':');
    let hours: u32 = parts.next().and_then(|h| h.parse().ok()).ok_or_else(err)?;
    let minutes: u32 = parts.next().and_then(|m| m.parse().ok()).ok_or_else(err)?;
    if hours > 23 || minutes > 59 {
        return Err(err());
    }
    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as "HH:MM"
pub fn format_clock(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Sunset-anchored coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeMap {
    sunset_hour: u32,
}

impl TimeMap {
    pub fn new(sunset_hour: u32) -> Self {
        Self {
            sunset_hour: sunset_hour % 24,
        }
    }

    pub fn sunset_hour(&self) -> u32 {
        self.sunset_hour
    }

    fn anchor(&self) -> u32 {
        self.sunset_hour * 60
    }

    /// "HH:MM" -> minutes since sunset. A time before sunset belongs to the
    /// following day in this coordinate system.
    pub fn to_minutes(&self, time: &str) -> Result<u32, TimeParseError> {
        let total = parse_clock(time)? as i64;
        let mut from_sunset = total - self.anchor() as i64;
        if from_sunset < 0 {
            from_sunset += MINUTES_PER_DAY as i64;
        }
        Ok(from_sunset as u32)
    }

    /// Minutes since sunset -> "HH:MM"
    pub fn to_time(&self, minutes_from_sunset: u32) -> String {
        format_clock(self.anchor() + minutes_from_sunset)
    }

    /// Label for the hour marker `offset_hours` after sunset
    pub fn hour_label(&self, offset_hours: u32) -> String {
        format!("{:02}:00", (self.sunset_hour + offset_hours) % 24)
    }
}
