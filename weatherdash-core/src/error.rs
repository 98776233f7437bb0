use thiserror::Error;

/// Coarse classification of a [`WeatherError`], stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigMissing,
    InvalidInput,
    NotFound,
    NetworkFailure,
    GeolocationDenied,
    Decode,
}

/// Errors surfaced by dashboard operations.
///
/// The `Display` text is what ends up in the dashboard's error line, so it is
/// written for the person looking at the screen.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("API key not configured")]
    ConfigMissing,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to fetch weather data. Please try again.")]
    NetworkFailure(#[source] reqwest::Error),

    #[error("Failed to get your location")]
    GeolocationDenied,

    #[error("Geolocation is not supported on this device")]
    GeolocationUnavailable,

    #[error("Failed to read weather data: {0}")]
    Decode(String),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigMissing => ErrorKind::ConfigMissing,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NetworkFailure(_) => ErrorKind::NetworkFailure,
            Self::GeolocationDenied | Self::GeolocationUnavailable => {
                ErrorKind::GeolocationDenied
            }
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    pub(crate) fn blank_city() -> Self {
        Self::InvalidInput("Please enter a city name".to_string())
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::NetworkFailure(err)
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
