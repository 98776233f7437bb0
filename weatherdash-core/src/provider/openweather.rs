use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    config::DEFAULT_BASE_URL,
    error::WeatherError,
    model::{
        Condition, ForecastSample, ForecastSeries, LocationQuery, Temperature, UnitPreference,
        WeatherBundle, WeatherSnapshot, Wind,
    },
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn params(&self, query: &LocationQuery, unit: UnitPreference) -> Vec<(&'static str, String)> {
        let mut params = query.query_pairs();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", unit.as_query().to_string()));
        params.push(("lang", "en".to_string()));
        params
    }

    #[instrument(skip_all, fields(query = %query, unit = %unit))]
    async fn fetch_current(
        &self,
        query: &LocationQuery,
        unit: UnitPreference,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&self.params(query, unit))
            .send()
            .await
            .map_err(WeatherError::NetworkFailure)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::NetworkFailure)?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "current conditions request rejected");
            return Err(WeatherError::NotFound(not_found_message(query).to_string()));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        debug!(city = %parsed.name, "current conditions received");

        Ok(parsed.into_snapshot())
    }

    /// The forecast body is decoded whatever the status; an error body fails to decode.
    #[instrument(skip_all, fields(query = %query, unit = %unit))]
    async fn fetch_forecast(
        &self,
        query: &LocationQuery,
        unit: UnitPreference,
    ) -> Result<ForecastSeries, WeatherError> {
        let url = format!("{}/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&self.params(query, unit))
            .send()
            .await
            .map_err(WeatherError::NetworkFailure)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::NetworkFailure)?;
        debug!(%status, "forecast received");

        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        Ok(parsed.into_series())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(
        &self,
        query: &LocationQuery,
        unit: UnitPreference,
    ) -> Result<WeatherBundle, WeatherError> {
        let weather = self.fetch_current(query, unit).await?;
        let forecast = self.fetch_forecast(query, unit).await?;
        Ok(WeatherBundle { weather, forecast })
    }
}

fn not_found_message(query: &LocationQuery) -> &'static str {
    match query {
        LocationQuery::City(_) => "City not found",
        LocationQuery::Coordinates(_) => "Location not found",
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

impl OwMain {
    fn temperature(&self) -> Temperature {
        Temperature {
            current: self.temp,
            min: self.temp_min,
            max: self.temp_max,
            feels_like: self.feels_like,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    visibility: Option<u32>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    #[serde(default)]
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: self.main.temperature(),
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            city: self.name,
            country: self.sys.country,
            timezone_offset: self.timezone,
            observed_at: unix_to_utc(self.dt),
            visibility_m: self.visibility,
            cloudiness: self.clouds.all,
            wind: Wind { speed: self.wind.speed, direction_deg: self.wind.deg },
            condition: first_condition(self.weather),
            sunrise: unix_to_utc(self.sys.sunrise),
            sunset: unix_to_utc(self.sys.sunset),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastResponse {
    fn into_series(self) -> ForecastSeries {
        let samples = self
            .list
            .into_iter()
            .map(|entry| ForecastSample {
                at: unix_to_utc(entry.dt),
                temperature: entry.main.temperature(),
                humidity: entry.main.humidity,
                pressure: entry.main.pressure,
                cloudiness: entry.clouds.all,
                wind: Wind { speed: entry.wind.speed, direction_deg: entry.wind.deg },
                condition: first_condition(entry.weather),
            })
            .collect();

        ForecastSeries {
            city: self.city.name,
            country: self.city.country,
            timezone_offset: self.city.timezone,
            samples,
        }
    }
}

fn first_condition(weather: Vec<OwWeather>) -> Condition {
    weather
        .into_iter()
        .next()
        .map(|w| Condition { id: w.id, main: w.main, description: w.description, icon: w.icon })
        .unwrap_or_else(|| Condition {
            id: 0,
            main: "Unknown".to_string(),
            description: "unknown".to_string(),
            icon: String::new(),
        })
}

fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
