//! Single source of truth for what the dashboard shows.
//!
//! [`Dashboard`] owns the city, the last fetched weather/forecast pair, the
//! unit preference and the loading/error flags. Presentation code reads a
//! cloned [`DashboardState`] or subscribes to changes; it never writes.
//!
//! Operations may overlap. Each fetch takes a generation token and its result
//! is applied only while that token is still the newest one, so the latest
//! request wins and late responses from older requests are dropped.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::WeatherError,
    geolocation::{FixedGeolocator, Geolocator},
    model::{
        Coordinates, ForecastSeries, LocationQuery, UnitPreference, WeatherBundle,
        WeatherSnapshot,
    },
    provider::{WeatherProvider, provider_from_config},
    session::SessionStore,
};

/// Error shown at start when no key could be found anywhere.
pub const STARTUP_CONFIG_MISSING: &str =
    "API key not configured. Set OPENWEATHER_API_KEY or run `weatherdash configure`";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub city: Option<String>,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: Option<ForecastSeries>,
    pub unit: UnitPreference,
    pub loading: bool,
    pub error: Option<String>,
}

/// What happened to the state after an operation finished without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New data is on screen.
    Applied,
    /// A newer request was issued meanwhile; this result was dropped.
    Superseded,
    /// Nothing to fetch (no city loaded yet).
    Skipped,
}

#[derive(Debug)]
pub struct Dashboard {
    provider: Option<Arc<dyn WeatherProvider>>,
    session: Arc<dyn SessionStore>,
    geolocator: Option<Arc<dyn Geolocator>>,
    default_city: String,
    state: watch::Sender<DashboardState>,
    generation: AtomicU64,
}

impl Dashboard {
    pub const DEFAULT_CITY: &'static str = "Baku";

    /// `provider` is `None` when no API key is configured.
    pub fn new(provider: Option<Arc<dyn WeatherProvider>>, session: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            provider,
            session,
            geolocator: None,
            default_city: Self::DEFAULT_CITY.to_string(),
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Wire provider, unit, default city and fixed location from config.
    pub fn from_config(config: &Config, session: Arc<dyn SessionStore>) -> Self {
        let mut dashboard = Self::new(provider_from_config(config), session).with_unit(config.units);

        if let Some(city) = config.default_city.as_deref().filter(|c| !c.trim().is_empty()) {
            dashboard = dashboard.with_default_city(city);
        }
        if let Some(position) = config.location {
            dashboard = dashboard.with_geolocator(Arc::new(FixedGeolocator::new(position)));
        }

        dashboard
    }

    pub fn with_geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    pub fn with_unit(self, unit: UnitPreference) -> Self {
        self.state.send_modify(|state| state.unit = unit);
        self
    }

    pub fn with_default_city(mut self, city: &str) -> Self {
        self.default_city = city.trim().to_string();
        self
    }

    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn has_geolocation(&self) -> bool {
        self.geolocator.is_some()
    }

    /// First load: the remembered city, or the default one.
    pub async fn start(&self) -> Result<FetchOutcome, WeatherError> {
        if self.provider.is_none() {
            self.state
                .send_modify(|state| state.error = Some(STARTUP_CONFIG_MISSING.to_string()));
            return Err(WeatherError::ConfigMissing);
        }

        let city = self.session.last_city().unwrap_or_else(|| self.default_city.clone());
        self.search_city(&city).await
    }

    /// Look up a city by name. Clears the current data before fetching.
    pub async fn search_city(&self, name: &str) -> Result<FetchOutcome, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.fail(WeatherError::blank_city()));
        }
        let provider = self.provider()?;

        let (token, unit) = self.begin(true);
        let result = provider.fetch(&LocationQuery::City(name.to_string()), unit).await;
        self.finish(token, result)
    }

    /// Look up by position. Current data stays visible until the result arrives.
    pub async fn search_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<FetchOutcome, WeatherError> {
        let coordinates = Coordinates::new(latitude, longitude).map_err(|err| self.fail(err))?;
        let provider = self.provider()?;

        let (token, unit) = self.begin(false);
        let result = provider.fetch(&LocationQuery::Coordinates(coordinates), unit).await;
        self.finish(token, result)
    }

    /// Ask the device for its position and show the weather there.
    pub async fn use_current_location(&self) -> Result<FetchOutcome, WeatherError> {
        let Some(geolocator) = self.geolocator.clone() else {
            return Err(self.fail(WeatherError::GeolocationUnavailable));
        };
        self.provider()?;

        let (token, _) = self.begin(false);
        match geolocator.current_position().await {
            Ok(_) if self.generation.load(Ordering::SeqCst) != token => {
                debug!(token, "dropping superseded position");
                Ok(FetchOutcome::Superseded)
            }
            Ok(position) => self.search_by_coordinates(position.latitude, position.longitude).await,
            Err(err) => self.finish(token, Err(err)),
        }
    }

    /// Flip metric/imperial and re-fetch the loaded city in the new unit.
    ///
    /// Unlike [`Dashboard::search_city`] the old data stays on screen while
    /// fetching, and stays there if the fetch fails. The unit is flipped
    /// either way.
    pub async fn toggle_unit(&self) -> Result<FetchOutcome, WeatherError> {
        let mut city = None;
        self.state.send_modify(|state| {
            state.unit = state.unit.toggled();
            city = state.city.clone();
        });

        let Some(city) = city else {
            return Ok(FetchOutcome::Skipped);
        };
        let provider = self.provider()?;

        let (token, unit) = self.begin(false);
        let result = provider.fetch(&LocationQuery::City(city), unit).await;
        self.finish(token, result)
    }

    /// Search the loaded city again.
    pub async fn refresh(&self) -> Result<FetchOutcome, WeatherError> {
        let city = self.state.borrow().city.clone();
        match city {
            Some(city) => self.search_city(&city).await,
            None => Ok(FetchOutcome::Skipped),
        }
    }

    fn provider(&self) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
        self.provider.clone().ok_or_else(|| self.fail(WeatherError::ConfigMissing))
    }

    /// Record an error that happened before any fetch was started.
    fn fail(&self, err: WeatherError) -> WeatherError {
        self.state.send_modify(|state| state.error = Some(err.to_string()));
        err
    }

    /// Start a fetch: issue a new generation token and raise the loading flag.
    fn begin(&self, clear: bool) -> (u64, UnitPreference) {
        let mut token = 0;
        let mut unit = UnitPreference::default();

        // Issued inside the state lock so tokens and state changes stay in step.
        self.state.send_modify(|state| {
            token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            unit = state.unit;
            state.loading = true;
            state.error = None;
            if clear {
                state.weather = None;
                state.forecast = None;
            }
        });

        (token, unit)
    }

    fn finish(
        &self,
        token: u64,
        result: Result<WeatherBundle, WeatherError>,
    ) -> Result<FetchOutcome, WeatherError> {
        let is_latest = |generation: &AtomicU64| generation.load(Ordering::SeqCst) == token;

        match result {
            Ok(bundle) => {
                let city = bundle.weather.city.clone();
                let applied = self.state.send_if_modified(|state| {
                    if !is_latest(&self.generation) {
                        return false;
                    }
                    state.city = Some(bundle.weather.city.clone());
                    state.weather = Some(bundle.weather);
                    state.forecast = Some(bundle.forecast);
                    state.loading = false;
                    true
                });

                if !applied {
                    debug!(token, %city, "dropping superseded weather result");
                    return Ok(FetchOutcome::Superseded);
                }

                info!(%city, "weather updated");
                if let Err(err) = self.session.remember_city(&city) {
                    warn!(error = %format!("{err:#}"), "failed to remember last city");
                }
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                let message = err.to_string();
                let applied = self.state.send_if_modified(|state| {
                    if !is_latest(&self.generation) {
                        return false;
                    }
                    state.error = Some(message);
                    state.loading = false;
                    true
                });

                if !applied {
                    debug!(token, error = %err, "dropping superseded weather error");
                    return Ok(FetchOutcome::Superseded);
                }

                warn!(error = %err, "weather request failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        session::MemorySessionStore,
        test_fixtures::{FakeProvider, sample_bundle},
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn dashboard(provider: &Arc<FakeProvider>) -> (Dashboard, Arc<MemorySessionStore>) {
        let session = Arc::new(MemorySessionStore::default());
        let provider: Arc<dyn WeatherProvider> = provider.clone();
        (Dashboard::new(Some(provider), session.clone()), session)
    }

    #[tokio::test]
    async fn search_city_stores_pair_and_resolved_name() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, session) = dashboard(&provider);

        let outcome = dash.search_city("  baku ").await.expect("search should succeed");
        assert_eq!(outcome, FetchOutcome::Applied);

        let state = dash.state();
        assert_eq!(state.city.as_deref(), Some("Baku"));
        assert_eq!(state.weather.as_ref().map(|w| w.city.as_str()), Some("Baku"));
        assert_eq!(state.forecast.as_ref().map(|f| f.city.as_str()), Some("Baku"));
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(session.last_city().as_deref(), Some("Baku"));
        assert_eq!(provider.calls(), vec![(LocationQuery::City("baku".into()), UnitPreference::Metric)]);
    }

    #[tokio::test]
    async fn blank_search_is_rejected_without_network() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);

        for blank in ["", "   "] {
            let err = dash.search_city(blank).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }

        assert!(provider.calls().is_empty());
        let state = dash.state();
        assert_eq!(state.error.as_deref(), Some("Please enter a city name"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn missing_key_fails_before_loading() {
        let session = Arc::new(MemorySessionStore::default());
        let dash = Dashboard::new(None, session);
        let mut rx = dash.subscribe();

        let err = dash.search_city("Baku").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigMissing);

        // Exactly one change was published and it never raised the loading flag.
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("API key not configured"));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn failed_search_clears_previous_data() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, session) = dashboard(&provider);
        dash.search_city("London").await.expect("search should succeed");

        let err = dash.search_city("Nowhere").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let state = dash.state();
        assert_eq!(state.error.as_deref(), Some("City not found"));
        assert!(state.weather.is_none());
        assert!(state.forecast.is_none());
        assert!(!state.loading);
        // The city of the last successful fetch is kept for refresh and persistence.
        assert_eq!(state.city.as_deref(), Some("London"));
        assert_eq!(session.last_city().as_deref(), Some("London"));
    }

    #[tokio::test]
    async fn loading_is_raised_while_in_flight() {
        let provider = Arc::new(FakeProvider::default());
        let gate = provider.gate("Slow");
        let (dash, _) = dashboard(&provider);
        let mut rx = dash.subscribe();

        let search = dash.search_city("Slow");
        let observe = async {
            rx.changed().await.expect("sender alive");
            let state = rx.borrow_and_update().clone();
            assert!(state.loading);
            assert!(state.weather.is_none());
            gate.notify_one();
        };
        let (result, ()) = tokio::join!(search, observe);

        assert_eq!(result.unwrap(), FetchOutcome::Applied);
        assert!(!dash.state().loading);
    }

    #[tokio::test]
    async fn latest_search_wins() {
        let provider = Arc::new(FakeProvider::default());
        let gate = provider.gate("Slow");
        let (dash, session) = dashboard(&provider);

        let slow = dash.search_city("Slow");
        let fast = async {
            let outcome = dash.search_city("Fast").await;
            gate.notify_one();
            outcome
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow.unwrap(), FetchOutcome::Superseded);
        assert_eq!(fast.unwrap(), FetchOutcome::Applied);

        let state = dash.state();
        assert_eq!(state.city.as_deref(), Some("Fast"));
        assert_eq!(state.weather.map(|w| w.city), Some("Fast".to_string()));
        assert!(!state.loading);
        assert_eq!(session.last_city().as_deref(), Some("Fast"));
    }

    #[tokio::test]
    async fn stale_error_is_dropped() {
        let provider = Arc::new(FakeProvider::default());
        let gate = provider.gate("Nowhere");
        let (dash, _) = dashboard(&provider);

        let stale = dash.search_city("Nowhere");
        let fresh = async {
            let outcome = dash.search_city("Paris").await;
            gate.notify_one();
            outcome
        };
        let (stale, fresh) = tokio::join!(stale, fresh);

        assert_eq!(stale.unwrap(), FetchOutcome::Superseded);
        assert_eq!(fresh.unwrap(), FetchOutcome::Applied);
        assert_eq!(dash.state().error, None);
    }

    #[tokio::test]
    async fn toggle_twice_restores_unit_and_temperature() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        dash.search_city("Baku").await.expect("search should succeed");
        let original = dash.state();

        dash.toggle_unit().await.expect("toggle should succeed");
        let toggled = dash.state();
        assert_eq!(toggled.unit, UnitPreference::Imperial);
        assert_ne!(
            toggled.weather.as_ref().map(|w| w.temperature.current.round()),
            original.weather.as_ref().map(|w| w.temperature.current.round())
        );

        dash.toggle_unit().await.expect("toggle should succeed");
        let restored = dash.state();
        assert_eq!(restored.unit, original.unit);
        assert_eq!(
            restored.weather.map(|w| w.temperature.current.round()),
            original.weather.map(|w| w.temperature.current.round())
        );
    }

    #[tokio::test]
    async fn toggle_without_city_only_flips() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);

        assert_eq!(dash.toggle_unit().await.unwrap(), FetchOutcome::Skipped);
        assert_eq!(dash.state().unit, UnitPreference::Imperial);
        assert!(provider.calls().is_empty());
    }

    // Pins the asymmetry with search_city: a failed toggle keeps the old data
    // on screen while the unit stays flipped.
    #[tokio::test]
    async fn failed_toggle_keeps_previous_data() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        dash.search_city("Tokyo").await.expect("search should succeed");
        let before = dash.state();

        provider.fail_next();
        let err = dash.toggle_unit().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let after = dash.state();
        assert_eq!(after.unit, UnitPreference::Imperial);
        assert_eq!(after.weather, before.weather);
        assert_eq!(after.forecast, before.forecast);
        assert_eq!(after.error.as_deref(), Some("City not found"));
        assert!(!after.loading);
    }

    #[tokio::test]
    async fn toggle_keeps_data_visible_while_fetching() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        dash.search_city("Dubai").await.expect("search should succeed");

        let gate = provider.gate("Dubai");
        let mut rx = dash.subscribe();
        rx.borrow_and_update();

        let toggle = dash.toggle_unit();
        let observe = async {
            loop {
                rx.changed().await.expect("sender alive");
                let state = rx.borrow_and_update().clone();
                if state.loading {
                    assert!(state.weather.is_some());
                    assert!(state.forecast.is_some());
                    break;
                }
            }
            gate.notify_one();
        };
        let (result, ()) = tokio::join!(toggle, observe);
        assert_eq!(result.unwrap(), FetchOutcome::Applied);
    }

    #[tokio::test]
    async fn unit_change_discards_in_flight_result() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        dash.search_city("Paris").await.expect("search should succeed");

        let gate = provider.gate("Paris");
        let refresh = dash.refresh();
        let toggle = async {
            provider.ungate("Paris");
            let outcome = dash.toggle_unit().await;
            gate.notify_one();
            outcome
        };
        let (refresh, toggle) = tokio::join!(refresh, toggle);

        assert_eq!(refresh.unwrap(), FetchOutcome::Superseded);
        assert_eq!(toggle.unwrap(), FetchOutcome::Applied);
        let state = dash.state();
        assert_eq!(state.unit, UnitPreference::Imperial);
        assert_eq!(
            state.weather.map(|w| w.temperature.current),
            Some(sample_bundle("Paris", UnitPreference::Imperial).weather.temperature.current)
        );
    }

    #[tokio::test]
    async fn refresh_without_city_is_noop() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);

        assert_eq!(dash.refresh().await.unwrap(), FetchOutcome::Skipped);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_searches_loaded_city() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        dash.search_city("new york").await.expect("search should succeed");

        dash.refresh().await.expect("refresh should succeed");
        let calls = provider.calls();
        assert_eq!(calls.last().map(|c| c.0.clone()), Some(LocationQuery::City("New York".into())));
    }

    #[tokio::test]
    async fn coordinates_resolve_city_name() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, session) = dashboard(&provider);

        dash.search_by_coordinates(40.41, 49.87).await.expect("search should succeed");

        assert_eq!(dash.state().city.as_deref(), Some("Baku"));
        assert_eq!(session.last_city().as_deref(), Some("Baku"));
    }

    #[tokio::test]
    async fn invalid_coordinates_are_rejected() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);

        let err = dash.search_by_coordinates(120.0, 0.0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(provider.calls().is_empty());
    }

    #[derive(Debug)]
    struct DenyingGeolocator;

    #[async_trait]
    impl Geolocator for DenyingGeolocator {
        async fn current_position(&self) -> Result<Coordinates, WeatherError> {
            Err(WeatherError::GeolocationDenied)
        }
    }

    #[tokio::test]
    async fn location_without_capability_never_loads() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        let mut rx = dash.subscribe();

        let err = dash.use_current_location().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeolocationDenied);

        let state = rx.borrow_and_update().clone();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Geolocation is not supported on this device"));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn denied_location_reports_error() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        let dash = dash.with_geolocator(Arc::new(DenyingGeolocator));

        let err = dash.use_current_location().await.unwrap_err();
        assert!(matches!(err, WeatherError::GeolocationDenied));

        let state = dash.state();
        assert_eq!(state.error.as_deref(), Some("Failed to get your location"));
        assert!(!state.loading);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn granted_location_fetches_by_coordinates() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        let position = Coordinates::new(35.68, 139.69).unwrap();
        let dash = dash.with_geolocator(Arc::new(FixedGeolocator::new(position)));

        dash.use_current_location().await.expect("location search should succeed");

        assert_eq!(provider.calls(), vec![(LocationQuery::Coordinates(position), UnitPreference::Metric)]);
        assert_eq!(dash.state().city.as_deref(), Some("Baku"));
    }

    /// Answers only once its gate is opened.
    #[derive(Debug)]
    struct GatedGeolocator {
        position: Coordinates,
        gate: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl Geolocator for GatedGeolocator {
        async fn current_position(&self) -> Result<Coordinates, WeatherError> {
            self.gate.notified().await;
            Ok(self.position)
        }
    }

    #[tokio::test]
    async fn search_issued_while_locating_wins() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);
        let gate = Arc::new(tokio::sync::Notify::new());
        let position = Coordinates::new(40.38, 49.89).unwrap();
        let dash = dash.with_geolocator(Arc::new(GatedGeolocator { position, gate: gate.clone() }));

        let (located, searched) = tokio::join!(dash.use_current_location(), async {
            let outcome = dash.search_city("Paris").await;
            gate.notify_one();
            outcome
        });

        assert_eq!(located.expect("superseded, not failed"), FetchOutcome::Superseded);
        assert_eq!(searched.expect("search should succeed"), FetchOutcome::Applied);
        assert_eq!(dash.state().city.as_deref(), Some("Paris"));
        assert!(!dash.state().loading);
        assert_eq!(provider.calls(), vec![(LocationQuery::City("Paris".into()), UnitPreference::Metric)]);
    }

    #[tokio::test]
    async fn start_prefers_remembered_city() {
        let provider = Arc::new(FakeProvider::default());
        let session = Arc::new(MemorySessionStore::with_city("Tokyo"));
        let dash = Dashboard::new(Some(provider.clone() as Arc<dyn WeatherProvider>), session);

        dash.start().await.expect("start should succeed");
        assert_eq!(dash.state().city.as_deref(), Some("Tokyo"));
    }

    #[tokio::test]
    async fn start_falls_back_to_default_city() {
        let provider = Arc::new(FakeProvider::default());
        let (dash, _) = dashboard(&provider);

        dash.start().await.expect("start should succeed");
        assert_eq!(provider.calls()[0].0, LocationQuery::City(Dashboard::DEFAULT_CITY.into()));
    }

    #[tokio::test]
    async fn start_without_key_explains_how_to_configure() {
        let dash = Dashboard::new(None, Arc::new(MemorySessionStore::default()));

        let err = dash.start().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigMissing);
        assert_eq!(dash.state().error.as_deref(), Some(STARTUP_CONFIG_MISSING));
    }

    #[derive(Debug, Default)]
    struct FailingSession {
        attempts: Mutex<u32>,
    }

    impl SessionStore for FailingSession {
        fn last_city(&self) -> Option<String> {
            None
        }

        fn remember_city(&self, _city: &str) -> anyhow::Result<()> {
            *self.attempts.lock().unwrap() += 1;
            anyhow::bail!("disk full")
        }
    }

    #[tokio::test]
    async fn persistence_failure_does_not_fail_search() {
        let provider = Arc::new(FakeProvider::default());
        let session = Arc::new(FailingSession::default());
        let dash = Dashboard::new(Some(provider as Arc<dyn WeatherProvider>), session.clone());

        assert_eq!(dash.search_city("Paris").await.unwrap(), FetchOutcome::Applied);
        assert_eq!(*session.attempts.lock().unwrap(), 1);
    }

    #[test]
    fn from_config_applies_preferences() {
        let config = Config {
            units: UnitPreference::Imperial,
            default_city: Some("Paris".into()),
            location: Some(Coordinates { latitude: 1.0, longitude: 2.0 }),
            ..Config::default()
        };

        let dash = Dashboard::from_config(&config, Arc::new(MemorySessionStore::default()));
        assert_eq!(dash.state().unit, UnitPreference::Imperial);
        assert_eq!(dash.default_city, "Paris");
        assert!(dash.has_geolocation());
    }
}
