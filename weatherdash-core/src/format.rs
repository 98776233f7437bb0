//! Pure formatting helpers shared by every renderer.

use chrono::{DateTime, FixedOffset, Utc};

use crate::model::UnitPreference;

const DIRECTIONS: [&str; 8] = [
    "North",
    "North-East",
    "East",
    "South-East",
    "South",
    "South-West",
    "West",
    "North-West",
];

/// Rounded temperature with its unit symbol, e.g. `23°C`.
pub fn temperature(value: f64, unit: UnitPreference) -> String {
    format!("{}{}", round(value), unit.temperature_symbol())
}

/// Halves round up towards positive infinity, so -2.5 becomes -2.
/// Going through `i64` also turns `-0` into `0`.
fn round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn wind_speed(value: f64, unit: UnitPreference) -> String {
    format!("{value} {}", unit.speed_unit())
}

/// Eight-point compass name for a direction in degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    let index = (degrees.rem_euclid(360.0) / 45.0).round() as usize % DIRECTIONS.len();
    DIRECTIONS[index]
}

/// Visibility in kilometres with one decimal.
pub fn visibility_km(metres: u32) -> String {
    format!("{:.1}", f64::from(metres) / 1000.0)
}

/// `HH:MM` on the location's clock.
pub fn clock_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%H:%M").to_string()
}

/// Heading of a daily forecast card: "Today" first, then e.g. "Tue, 14 Nov".
pub fn day_label(index: usize, at: DateTime<Utc>, offset: FixedOffset) -> String {
    if index == 0 {
        "Today".to_string()
    } else {
        at.with_timezone(&offset).format("%a, %-d %b").to_string()
    }
}

/// Long local date, e.g. "Tuesday, 14 November 2023".
pub fn long_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%A, %-d %B %Y").to_string()
}

pub fn icon_url(code: &str, scale: u8) -> String {
    format!("https://openweathermap.org/img/wn/{code}@{scale}x.png")
}

/// Upper-case the first letter of each word.
pub fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch == ' ';
    }
    out
}
