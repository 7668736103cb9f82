use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::api::SunsetResponse;
use crate::error::TimeParseError;
use crate::sunset::Coordinates;
use crate::timeline::TimeMap;

pub const DEFAULT_SUNSET_HOUR: u32 = 18;
pub const DEFAULT_SUNSET_TIME: &str = "18:00";
pub const DEFAULT_SUNRISE_HOUR: u32 = 6;
pub const DEFAULT_SUNRISE_TIME: &str = "06:00";
pub const DEFAULT_DHUHR_TIME: &str = "12:00";
pub const DEFAULT_ASR_TIME: &str = "15:30";
pub const DEFAULT_ISHA_TIME: &str = "20:00";

/// Sun and prayer times for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunsetContext {
    pub date: NaiveDate,
    pub sunset_hour: u32,
    pub sunset_time: String,
    pub sunrise_hour: u32,
    pub sunrise_time: String,
    pub dhuhr_time: String,
    pub asr_time: String,
    pub isha_time: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl SunsetContext {
    /// Fixed times used whenever the real ones cannot be determined
    pub fn defaults(date: NaiveDate) -> Self {
        Self {
            date,
            sunset_hour: DEFAULT_SUNSET_HOUR,
            sunset_time: DEFAULT_SUNSET_TIME.to_string(),
            sunrise_hour: DEFAULT_SUNRISE_HOUR,
            sunrise_time: DEFAULT_SUNRISE_TIME.to_string(),
            dhuhr_time: DEFAULT_DHUHR_TIME.to_string(),
            asr_time: DEFAULT_ASR_TIME.to_string(),
            isha_time: DEFAULT_ISHA_TIME.to_string(),
            coordinates: None,
        }
    }

    /// Build from a `/sunset` lookup, converting the ISO timestamps into
    /// wall-clock times in `tz`.
    pub fn from_lookup<Tz: TimeZone>(
        response: &SunsetResponse,
        coordinates: Coordinates,
        date: NaiveDate,
        tz: &Tz,
    ) -> Result<Self, TimeParseError> {
        let (sunset_hour, sunset_time) = local_clock(&response.sunset, tz)?;
        let (sunrise_hour, sunrise_time) = local_clock(&response.sunrise, tz)?;

        Ok(Self {
            date,
            sunset_hour,
            sunset_time,
            sunrise_hour,
            sunrise_time,
            dhuhr_time: prayer_or(&response.dhuhr_time, DEFAULT_DHUHR_TIME),
            asr_time: prayer_or(&response.asr_time, DEFAULT_ASR_TIME),
            isha_time: prayer_or(&response.isha_time, DEFAULT_ISHA_TIME),
            coordinates: Some(coordinates),
        })
    }

    pub fn time_map(&self) -> TimeMap {
        TimeMap::new(self.sunset_hour)
    }
}

fn prayer_or(time: &Option<String>, fallback: &str) -> String {
    // Upstream values may carry a zone suffix such as "15:40 (+03)"
    time.as_deref()
        .and_then(|t| t.split_whitespace().next())
        .unwrap_or(fallback)
        .to_string()
}

/// Hour and "HH:MM" of an ISO 8601 timestamp in the given zone
fn local_clock<Tz: TimeZone>(iso: &str, tz: &Tz) -> Result<(u32, String), TimeParseError> {
    let parsed = DateTime::parse_from_rfc3339(iso.trim())
        .map_err(|_| TimeParseError(iso.to_string()))?;
    let local = parsed.with_timezone(tz);
    Ok((local.hour(), format!("{:02}:{:02}", local.hour(), local.minute())))
}
