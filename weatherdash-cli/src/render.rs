//! Plain-text rendering of the dashboard state.

use std::fmt::Write;

use weatherdash_core::{
    DashboardState, ForecastSeries, UnitPreference, WeatherSnapshot, alerts, format,
};

/// Whole dashboard: status line, current card, warnings and both forecast views.
pub fn dashboard(state: &DashboardState) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if let Some(weather) = &state.weather {
        out.push_str(&card(weather, state.unit));

        let warnings = alerts::warnings(weather, state.unit);
        if !warnings.is_empty() {
            out.push('\n');
            for warning in warnings {
                let _ = writeln!(out, "! {}", warning.message);
            }
        }
    }

    if let Some(forecast) = &state.forecast {
        out.push('\n');
        out.push_str(&daily(forecast, state.unit));
        out.push('\n');
        out.push_str(&hourly(forecast, state.unit));
    }

    if out.is_empty() {
        out.push_str("Search for a city to see its weather.\n");
    }
    out
}

pub fn card(weather: &WeatherSnapshot, unit: UnitPreference) -> String {
    let offset = weather.offset();
    let t = &weather.temperature;
    let mut out = String::new();

    let _ = writeln!(out, "{}, {}", weather.city, weather.country);
    let _ = writeln!(
        out,
        "{}  {}",
        format::long_date(weather.observed_at, offset),
        format::clock_time(weather.observed_at, offset)
    );
    let _ = writeln!(
        out,
        "{}  {}  (feels like {})",
        format::temperature(t.current, unit),
        format::capitalize(&weather.condition.description),
        format::temperature(t.feels_like, unit)
    );
    let _ = writeln!(
        out,
        "H: {}  L: {}",
        format::temperature(t.max, unit),
        format::temperature(t.min, unit)
    );

    let visibility = weather
        .visibility_m
        .map(|v| format!("{} km", format::visibility_km(v)))
        .unwrap_or_else(|| "n/a".to_string());
    let _ = writeln!(
        out,
        "Humidity {}%  Pressure {} hPa  Visibility {}",
        weather.humidity, weather.pressure, visibility
    );
    let _ = writeln!(
        out,
        "Wind {} from the {}  Clouds {}%",
        format::wind_speed(weather.wind.speed, unit),
        format::wind_direction(weather.wind.direction_deg),
        weather.cloudiness
    );
    let _ = writeln!(
        out,
        "Sunrise {}  Sunset {}",
        format::clock_time(weather.sunrise, offset),
        format::clock_time(weather.sunset, offset)
    );
    let _ = writeln!(out, "Icon {}", format::icon_url(&weather.condition.icon, 2));

    out
}

pub fn daily(forecast: &ForecastSeries, unit: UnitPreference) -> String {
    let offset = forecast.offset();
    let mut out = String::from("5-day forecast\n");

    for (index, sample) in forecast.daily().into_iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<12} {:>6} / {:<6} {}",
            format::day_label(index, sample.at, offset),
            format::temperature(sample.temperature.max, unit),
            format::temperature(sample.temperature.min, unit),
            format::capitalize(&sample.condition.description)
        );
    }
    out
}

pub fn hourly(forecast: &ForecastSeries, unit: UnitPreference) -> String {
    let offset = forecast.offset();
    let mut out = String::from("Next hours\n");

    for sample in forecast.next_hours() {
        let _ = writeln!(
            out,
            "  {}  {:>6}  {}",
            format::clock_time(sample.at, offset),
            format::temperature(sample.temperature.current, unit),
            sample.condition.main
        );
    }
    out
}
