use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Why the user's location could not be determined. Every variant degrades
/// to the default sunset time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Location permission denied. Using default sunset time.")]
    PermissionDenied,

    #[error("Location unavailable. Using default sunset time.")]
    Unavailable,

    #[error("Location request timeout. Using default sunset time.")]
    Timeout,

    #[error("Unknown error. Using default sunset time.")]
    Unknown,
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Location taken from the user's config file
#[derive(Debug, Clone)]
pub struct ConfiguredLocation {
    enabled: bool,
    coordinates: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(enabled: bool, coordinates: Option<Coordinates>) -> Self {
        Self { enabled, coordinates }
    }

    pub fn from_config(config: &Config) -> Self {
        let coordinates = config
            .coordinates()
            .map(|(latitude, longitude)| Coordinates { latitude, longitude });
        Self::new(config.location_enabled, coordinates)
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        if !self.enabled {
            return Err(GeolocationError::PermissionDenied);
        }
        let coordinates = self.coordinates.ok_or(GeolocationError::Unavailable)?;
        if !coordinates.is_valid() {
            return Err(GeolocationError::Unknown);
        }
        Ok(coordinates)
    }
}

/// Ask the provider, giving up after `timeout`
pub async fn locate_within(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> Result<Coordinates, GeolocationError> {
    match tokio::time::timeout(timeout, provider.locate()).await {
        Ok(result) => result,
        Err(_) => Err(GeolocationError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverAnswers;

    #[async_trait]
    impl LocationProvider for NeverAnswers {
        async fn locate(&self) -> Result<Coordinates, GeolocationError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn configured_coordinates_are_returned() {
        let here = Coordinates { latitude: 51.5, longitude: -0.12 };
        let provider = ConfiguredLocation::new(true, Some(here));
        assert_eq!(provider.locate().await, Ok(here));
    }

    #[tokio::test]
    async fn disabled_location_is_permission_denied() {
        let provider = ConfiguredLocation::new(false, Some(Coordinates { latitude: 1.0, longitude: 1.0 }));
        assert_eq!(provider.locate().await, Err(GeolocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn missing_or_invalid_coordinates_fail() {
        assert_eq!(
            ConfiguredLocation::new(true, None).locate().await,
            Err(GeolocationError::Unavailable)
        );
        let nowhere = Coordinates { latitude: 120.0, longitude: 0.0 };
        assert_eq!(
            ConfiguredLocation::new(true, Some(nowhere)).locate().await,
            Err(GeolocationError::Unknown)
        );
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let result = locate_within(&NeverAnswers, Duration::from_millis(10)).await;
        assert_eq!(result, Err(GeolocationError::Timeout));
    }

    #[test]
    fn messages_mention_the_fallback() {
        assert!(GeolocationError::Timeout.to_string().ends_with("Using default sunset time."));
    }
}
