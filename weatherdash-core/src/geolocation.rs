use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::Coordinates};

/// Device position capability.
///
/// Failures are reported as [`WeatherError::GeolocationDenied`] regardless of
/// cause; callers only show that the position could not be obtained.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, WeatherError>;
}

/// Reports a position configured up front (flags or config file).
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    position: Coordinates,
}

impl FixedGeolocator {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        // Config values bypass `Coordinates::new`, so check them here.
        Coordinates::new(self.position.latitude, self.position.longitude)
            .map_err(|_| WeatherError::GeolocationDenied)
    }
}
