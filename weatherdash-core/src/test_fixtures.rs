//! Canned weather data and a scriptable provider for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::Notify;

use crate::{
    error::WeatherError,
    model::{
        Condition, ForecastSample, ForecastSeries, LocationQuery, Temperature, UnitPreference,
        WeatherBundle, WeatherSnapshot, Wind,
    },
    provider::WeatherProvider,
};

/// Metric reading every fixture starts from.
pub const BASE_TEMP_C: f64 = 21.6;

pub fn to_unit(celsius: f64, unit: UnitPreference) -> f64 {
    match unit {
        UnitPreference::Metric => celsius,
        UnitPreference::Imperial => celsius * 9.0 / 5.0 + 32.0,
    }
}

pub fn condition(main: &str) -> Condition {
    Condition {
        id: 800,
        main: main.to_string(),
        description: format!("{} sky", main.to_lowercase()),
        icon: "01d".to_string(),
    }
}

pub fn snapshot(city: &str, unit: UnitPreference) -> WeatherSnapshot {
    let observed_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default();
    WeatherSnapshot {
        city: city.to_string(),
        country: "AZ".to_string(),
        timezone_offset: 14_400,
        observed_at,
        temperature: Temperature {
            current: to_unit(BASE_TEMP_C, unit),
            min: to_unit(BASE_TEMP_C - 2.0, unit),
            max: to_unit(BASE_TEMP_C + 3.0, unit),
            feels_like: to_unit(BASE_TEMP_C - 0.5, unit),
        },
        humidity: 60,
        pressure: 1015,
        visibility_m: Some(10_000),
        cloudiness: 20,
        wind: Wind { speed: 4.1, direction_deg: 90.0 },
        condition: condition("Clear"),
        sunrise: observed_at - Duration::hours(6),
        sunset: observed_at + Duration::hours(5),
    }
}

pub fn series(city: &str, unit: UnitPreference, len: usize) -> ForecastSeries {
    let start = DateTime::from_timestamp(1_700_006_400, 0).unwrap_or_default();
    let samples = (0..len)
        .map(|i| ForecastSample {
            at: start + Duration::hours(3 * i as i64),
            temperature: Temperature {
                current: to_unit(BASE_TEMP_C + i as f64 * 0.1, unit),
                min: to_unit(BASE_TEMP_C - 1.0, unit),
                max: to_unit(BASE_TEMP_C + 1.0, unit),
                feels_like: to_unit(BASE_TEMP_C, unit),
            },
            humidity: 55,
            pressure: 1013,
            cloudiness: 40,
            wind: Wind { speed: 3.0, direction_deg: 180.0 },
            condition: condition("Clouds"),
        })
        .collect();

    ForecastSeries {
        city: city.to_string(),
        country: "AZ".to_string(),
        timezone_offset: 14_400,
        samples,
    }
}

pub fn sample_bundle(city: &str, unit: UnitPreference) -> WeatherBundle {
    WeatherBundle { weather: snapshot(city, unit), forecast: series(city, unit, 40) }
}

/// Capitalise each word, the way the service echoes city names back.
fn resolve_name(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Provider answering from fixtures.
///
/// "Nowhere" is unknown, coordinates resolve to "Baku", and gated cities wait
/// for their [`Notify`] before answering.
#[derive(Debug, Default)]
pub struct FakeProvider {
    calls: Mutex<Vec<(LocationQuery, UnitPreference)>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    fail_next: Mutex<bool>,
}

impl FakeProvider {
    pub fn calls(&self) -> Vec<(LocationQuery, UnitPreference)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gate(&self, city: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(city.to_string(), notify.clone());
        notify
    }

    pub fn ungate(&self, city: &str) {
        self.gates.lock().unwrap().remove(city);
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch(
        &self,
        query: &LocationQuery,
        unit: UnitPreference,
    ) -> Result<WeatherBundle, WeatherError> {
        self.calls.lock().unwrap().push((query.clone(), unit));

        let name = match query {
            LocationQuery::City(name) => resolve_name(name),
            LocationQuery::Coordinates(_) => "Baku".to_string(),
        };

        let gate = self.gates.lock().unwrap().get(&name).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let fail = std::mem::take(&mut *self.fail_next.lock().unwrap());
        if fail || name == "Nowhere" {
            return Err(WeatherError::NotFound("City not found".to_string()));
        }

        Ok(sample_bundle(&name, unit))
    }
}
