use rand::Rng;

use super::Viewport;
use crate::model::WeatherSnapshot;

/// Precipitation effect drawn over the particle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overlay {
    #[default]
    None,
    Rain,
    Snow,
}

/// Streaks per overlay.
pub const STREAK_COUNT: usize = 50;

impl Overlay {
    /// Picked from the condition group of the shown weather, if any.
    pub fn for_weather(weather: Option<&WeatherSnapshot>) -> Self {
        match weather.map(|w| w.condition.main.as_str()) {
            Some("Rain") => Overlay::Rain,
            Some("Snow") => Overlay::Snow,
            _ => Overlay::None,
        }
    }

    pub fn streaks<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<Streak> {
        let (delay_max, duration_min, duration_span) = match self {
            Overlay::None => return Vec::new(),
            Overlay::Rain => (2.0, 0.5, 0.5),
            Overlay::Snow => (3.0, 2.0, 3.0),
        };

        (0..count)
            .map(|_| Streak {
                left: rng.random_range(0.0..1.0),
                delay: rng.random_range(0.0..delay_max),
                duration: duration_min + rng.random_range(0.0..duration_span),
            })
            .collect()
    }
}

/// One falling drop or flake, looping top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Streak {
    /// Horizontal position as a fraction of the width.
    pub left: f64,
    /// Seconds before the first fall starts.
    pub delay: f64,
    /// Seconds per fall.
    pub duration: f64,
}

impl Streak {
    /// Where the streak is `elapsed` seconds after the overlay appeared.
    pub fn position(&self, elapsed: f64, viewport: Viewport) -> Option<(f64, f64)> {
        if elapsed < self.delay || self.duration <= 0.0 {
            return None;
        }
        let phase = ((elapsed - self.delay) % self.duration) / self.duration;
        Some((self.left * viewport.width(), phase * viewport.height()))
    }
}
