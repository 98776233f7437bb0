use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Unit system used both for the request and for formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    /// Value of the `units` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "metric",
            UnitPreference::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Metric => UnitPreference::Imperial,
            UnitPreference::Imperial => UnitPreference::Metric,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "m/s",
            UnitPreference::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitPreference::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::InvalidInput(format!(
                "Latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidInput(format!(
                "Longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

/// What to ask the weather service about.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Location part of the query string; the shared parameters are appended by the provider.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates(c) => write!(f, "{:.4},{:.4}", c.latitude, c.longitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub feels_like: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    /// Meteorological direction the wind blows from, in degrees.
    pub direction_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    /// Condition group such as "Rain", "Snow" or "Clear".
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Current conditions for one place at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    /// Shift from UTC in seconds for the location.
    pub timezone_offset: i32,
    pub observed_at: DateTime<Utc>,
    pub temperature: Temperature,
    pub humidity: u8,
    pub pressure: u32,
    pub visibility_m: Option<u32>,
    pub cloudiness: u8,
    pub wind: Wind,
    pub condition: Condition,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn offset(&self) -> FixedOffset {
        offset_from_seconds(self.timezone_offset)
    }

    /// Observation time on the location's wall clock.
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        self.observed_at.with_timezone(&self.offset())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub at: DateTime<Utc>,
    pub temperature: Temperature,
    pub humidity: u8,
    pub pressure: u32,
    pub cloudiness: u8,
    pub wind: Wind,
    pub condition: Condition,
}

/// Three-hourly forecast, oldest sample first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub city: String,
    pub country: String,
    pub timezone_offset: i32,
    pub samples: Vec<ForecastSample>,
}

impl ForecastSeries {
    /// Samples per day at a three hour resolution.
    pub const SAMPLES_PER_DAY: usize = 8;
    pub const DAYS: usize = 5;

    /// One sample per day: every eighth entry, at most five.
    pub fn daily(&self) -> Vec<&ForecastSample> {
        self.samples
            .iter()
            .step_by(Self::SAMPLES_PER_DAY)
            .take(Self::DAYS)
            .collect()
    }

    /// The next 24 hours.
    pub fn next_hours(&self) -> &[ForecastSample] {
        let end = self.samples.len().min(Self::SAMPLES_PER_DAY);
        &self.samples[..end]
    }

    pub fn offset(&self) -> FixedOffset {
        offset_from_seconds(self.timezone_offset)
    }
}

/// Result of one combined current + forecast fetch. Always applied as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherBundle {
    pub weather: WeatherSnapshot,
    pub forecast: ForecastSeries,
}

pub(crate) fn offset_from_seconds(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}
