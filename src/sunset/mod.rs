//! Resolving today's sunset and prayer times.
//!
//! Order of preference: today's cached record, then a fresh lookup for the
//! user's location, then fixed defaults. Resolution never fails; it reports
//! how the times were obtained through [`LocationStatus`].

mod cache;
mod context;
mod location;

use std::time::Duration;

use chrono::{Local, NaiveDate};

pub use cache::SunsetCache;
pub use context::*;
pub use location::{locate_within, ConfiguredLocation, Coordinates, GeolocationError, LocationProvider};

use crate::api::BoardApi;
use crate::error::{BoardError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum LocationStatus {
    /// Looked up just now for these coordinates
    Detected(Coordinates),
    /// Today's record was already cached
    Cached,
    /// Default times in use, with the reason shown to the user
    Fallback(String),
}

impl LocationStatus {
    pub fn describe(&self) -> String {
        match self {
            Self::Detected(c) => format!("Location: {:.2}, {:.2}", c.latitude, c.longitude),
            Self::Cached => "Using cached sunset time".to_string(),
            Self::Fallback(reason) => reason.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

pub async fn resolve(
    api: &dyn BoardApi,
    location: &dyn LocationProvider,
    cache: &SunsetCache,
    timeout: Duration,
    today: NaiveDate,
) -> (SunsetContext, LocationStatus) {
    if let Some(context) = cache.load(today) {
        tracing::info!(sunset = %context.sunset_time, "Using cached sunset time");
        return (context, LocationStatus::Cached);
    }

    match lookup(api, location, timeout, today).await {
        Ok((context, coordinates)) => {
            if let Err(e) = cache.store(&context) {
                tracing::warn!(error = %e, "Failed to cache sunset data");
            }
            tracing::info!(sunset = %context.sunset_time, sunrise = %context.sunrise_time, "Sunset time resolved");
            (context, LocationStatus::Detected(coordinates))
        }
        Err(BoardError::Geolocation(e)) => {
            tracing::warn!(error = %e, "Geolocation failed");
            (SunsetContext::defaults(today), LocationStatus::Fallback(e.to_string()))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sunset lookup failed");
            (
                SunsetContext::defaults(today),
                LocationStatus::Fallback("Error fetching sunset time. Using default.".to_string()),
            )
        }
    }
}

/// Locate, then ask the backend for today's times
async fn lookup(
    api: &dyn BoardApi,
    location: &dyn LocationProvider,
    timeout: Duration,
    today: NaiveDate,
) -> Result<(SunsetContext, Coordinates)> {
    let coordinates = locate_within(location, timeout).await?;
    let response = api.sunset(coordinates.latitude, coordinates.longitude).await?;
    let context = SunsetContext::from_lookup(&response, coordinates, today, &Local)?;
    Ok((context, coordinates))
}
