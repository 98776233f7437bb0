use crate::{
    Config,
    error::WeatherError,
    model::{LocationQuery, UnitPreference, WeatherBundle},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of current conditions and forecast for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the forecast as one bundle.
    async fn fetch(
        &self,
        query: &LocationQuery,
        unit: UnitPreference,
    ) -> Result<WeatherBundle, WeatherError>;
}

/// Construct the OpenWeather provider from config, or `None` when no API key is available.
pub fn provider_from_config(config: &Config) -> Option<Arc<dyn WeatherProvider>> {
    provider_with_key(config.api_key(), config.base_url())
}

fn provider_with_key(api_key: Option<String>, base_url: &str) -> Option<Arc<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::with_base_url(api_key?, base_url);
    Some(Arc::new(provider))
}
