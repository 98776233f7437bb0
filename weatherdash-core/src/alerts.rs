//! Warnings derived from fixed thresholds on the current conditions.

use crate::{
    format,
    model::{UnitPreference, WeatherSnapshot},
};

pub const EXTREME_HEAT_C: f64 = 35.0;
pub const FREEZING_C: f64 = 0.0;
pub const STRONG_WIND_MPS: f64 = 13.9;
pub const LOW_VISIBILITY_M: u32 = 1_000;
pub const HIGH_HUMIDITY_PCT: u8 = 90;

const MPS_PER_MPH: f64 = 0.447_04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    ExtremeHeat,
    Freezing,
    StrongWind,
    LowVisibility,
    HighHumidity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

fn to_celsius(value: f64, unit: UnitPreference) -> f64 {
    match unit {
        UnitPreference::Metric => value,
        UnitPreference::Imperial => (value - 32.0) * 5.0 / 9.0,
    }
}

fn to_mps(value: f64, unit: UnitPreference) -> f64 {
    match unit {
        UnitPreference::Metric => value,
        UnitPreference::Imperial => value * MPS_PER_MPH,
    }
}

/// Warnings for `weather`, whose readings are in `unit`.
pub fn warnings(weather: &WeatherSnapshot, unit: UnitPreference) -> Vec<Warning> {
    let mut out = Vec::new();
    let feels_like = to_celsius(weather.temperature.feels_like, unit);
    let temp = to_celsius(weather.temperature.current, unit);

    if temp >= EXTREME_HEAT_C || feels_like >= EXTREME_HEAT_C {
        out.push(Warning {
            kind: WarningKind::ExtremeHeat,
            message: format!(
                "Extreme heat: feels like {}",
                format::temperature(weather.temperature.feels_like, unit)
            ),
        });
    }

    if temp <= FREEZING_C {
        out.push(Warning {
            kind: WarningKind::Freezing,
            message: format!(
                "Freezing temperatures: {}",
                format::temperature(weather.temperature.current, unit)
            ),
        });
    }

    if to_mps(weather.wind.speed, unit) >= STRONG_WIND_MPS {
        out.push(Warning {
            kind: WarningKind::StrongWind,
            message: format!(
                "Strong wind: {} from the {}",
                format::wind_speed(weather.wind.speed, unit),
                format::wind_direction(weather.wind.direction_deg)
            ),
        });
    }

    if let Some(visibility) = weather.visibility_m.filter(|v| *v < LOW_VISIBILITY_M) {
        out.push(Warning {
            kind: WarningKind::LowVisibility,
            message: format!("Low visibility: {} km", format::visibility_km(visibility)),
        });
    }

    if weather.humidity >= HIGH_HUMIDITY_PCT {
        out.push(Warning {
            kind: WarningKind::HighHumidity,
            message: format!("High humidity: {}%", weather.humidity),
        });
    }

    out
}
