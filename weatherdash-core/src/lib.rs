//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather data fetcher behind the [`WeatherProvider`] trait
//! - The [`Dashboard`] state coordinator and its fetch operations
//! - Last-city persistence and the geolocation capability
//! - Display helpers, threshold warnings and the particle background
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod alerts;
pub mod animation;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod format;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod session;

#[cfg(test)]
mod test_fixtures;

pub use config::Config;
pub use coordinator::{Dashboard, DashboardState, FetchOutcome};
pub use error::{ErrorKind, WeatherError};
pub use geolocation::{FixedGeolocator, Geolocator};
pub use model::{
    Coordinates, ForecastSample, ForecastSeries, LocationQuery, UnitPreference, WeatherBundle,
    WeatherSnapshot,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
