use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::context::{SunsetContext, DEFAULT_ASR_TIME, DEFAULT_ISHA_TIME};
use super::Coordinates;
use crate::error::Result;

/// On-disk record. Fields are optional so records written by older versions
/// (without prayer times) still parse and can be detected as incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedSunset {
    date: NaiveDate,
    sunset_hour: u32,
    sunset_time: String,
    #[serde(default)]
    sunrise_hour: Option<u32>,
    #[serde(default)]
    sunrise_time: Option<String>,
    #[serde(default)]
    dhuhr_time: Option<String>,
    #[serde(default)]
    asr_time: Option<String>,
    #[serde(default)]
    isha_time: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

impl CachedSunset {
    fn into_context(self) -> Option<SunsetContext> {
        let coordinates = match (self.lat, self.lng) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        };
        Some(SunsetContext {
            date: self.date,
            sunset_hour: self.sunset_hour,
            sunset_time: self.sunset_time,
            sunrise_hour: self.sunrise_hour?,
            sunrise_time: self.sunrise_time?,
            dhuhr_time: self.dhuhr_time?,
            asr_time: self.asr_time.unwrap_or_else(|| DEFAULT_ASR_TIME.to_string()),
            isha_time: self.isha_time.unwrap_or_else(|| DEFAULT_ISHA_TIME.to_string()),
            coordinates,
        })
    }
}

impl From<&SunsetContext> for CachedSunset {
    fn from(context: &SunsetContext) -> Self {
        Self {
            date: context.date,
            sunset_hour: context.sunset_hour,
            sunset_time: context.sunset_time.clone(),
            sunrise_hour: Some(context.sunrise_hour),
            sunrise_time: Some(context.sunrise_time.clone()),
            dhuhr_time: Some(context.dhuhr_time.clone()),
            asr_time: Some(context.asr_time.clone()),
            isha_time: Some(context.isha_time.clone()),
            lat: context.coordinates.map(|c| c.latitude),
            lng: context.coordinates.map(|c| c.longitude),
        }
    }
}

/// Single sunset record valid for one calendar day
#[derive(Debug, Clone)]
pub struct SunsetCache {
    path: PathBuf,
}

impl SunsetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Today's context, if a complete record for `today` exists. Stale and
    /// incomplete records are removed; unreadable ones count as a miss.
    pub fn load(&self, today: NaiveDate) -> Option<SunsetContext> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Error reading cached sunset data");
                return None;
            }
        };

        let record: CachedSunset = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Malformed cached sunset data");
                return None;
            }
        };

        if record.date != today {
            tracing::debug!(cached = %record.date, %today, "Sunset cache is stale");
            self.clear();
            return None;
        }

        let context = record.into_context();
        if context.is_none() {
            tracing::debug!("Sunset cache is missing prayer times");
            self.clear();
        }
        context
    }

    pub fn store(&self, context: &SunsetContext) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&CachedSunset::from(context))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove sunset cache");
            }
        }
    }
}
