use std::{fmt, io, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crossterm::{cursor, execute, terminal};
use inquire::{Confirm, CustomType, InquireError, Password, Select, Text};
use tracing::{debug, info};
use weatherdash_core::{
    Config, Coordinates, Dashboard, ErrorKind, FileSessionStore, UnitPreference,
    animation::{DEFAULT_PARTICLE_COUNT, Overlay, ParticleField, spawn_animation},
    coordinator::STARTUP_CONFIG_MISSING,
};

use crate::{
    canvas::{self, TerminalCanvas},
    render,
};

const QUICK_CITIES: [&str; 6] = ["Baku", "London", "New York", "Tokyo", "Paris", "Dubai"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city, units and an optional fixed location.
    Configure,

    /// Show current weather and the forecast once.
    Show {
        /// City name. Without one the last shown (or default) city is used.
        city: Option<String>,

        /// Fahrenheit and mph instead of the configured units.
        #[arg(long)]
        imperial: bool,

        /// Latitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true, requires = "lon", conflicts_with = "city")]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        /// Use the fixed location from the config file.
        #[arg(long, conflicts_with_all = ["city", "lat"])]
        here: bool,
    },

    /// Interactive dashboard: search, quick cities, units, refresh.
    Dashboard,

    /// Draw the particle background until Ctrl-C.
    Background {
        /// Pick the rain/snow overlay from this city's current weather.
        #[arg(long)]
        city: Option<String>,

        #[arg(long, default_value_t = DEFAULT_PARTICLE_COUNT)]
        particles: usize,

        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=120))]
        fps: u32,

        /// Stop after this many seconds.
        #[arg(long)]
        seconds: Option<u64>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, imperial, lat, lon, here } => {
                show(city, imperial, lat.zip(lon), here).await
            }
            Command::Dashboard => interactive().await,
            Command::Background { city, particles, fps, seconds } => {
                background(city, particles, fps, seconds).await
            }
        }
    }
}

fn open_dashboard(config: &Config) -> Result<Dashboard> {
    let session = FileSessionStore::open_default()?;
    debug!(path = %session.path().display(), "using session file");
    Ok(Dashboard::from_config(config, Arc::new(session)))
}

/// Cancelled prompts become `None`.
fn answer<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read answer"),
    }
}

fn configure() -> Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let Some(key) = answer(
        Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_help_message("Leave empty to keep the current key")
            .prompt(),
    )?
    else {
        return Ok(());
    };
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }

    let current_city = config.default_city.clone().unwrap_or_else(|| Dashboard::DEFAULT_CITY.into());
    let Some(city) = answer(Text::new("Default city:").with_default(&current_city).prompt())? else {
        return Ok(());
    };
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let units = vec![UnitPreference::Metric, UnitPreference::Imperial];
    let cursor = units.iter().position(|u| *u == config.units).unwrap_or(0);
    let Some(unit) = answer(Select::new("Units:", units).with_starting_cursor(cursor).prompt())?
    else {
        return Ok(());
    };
    config.units = unit;

    let Some(wants_location) = answer(
        Confirm::new("Set a fixed position for \"my location\"?")
            .with_default(config.location.is_some())
            .prompt(),
    )?
    else {
        return Ok(());
    };
    config.location = if wants_location {
        let Some(lat) = answer(CustomType::<f64>::new("Latitude:").prompt())? else {
            return Ok(());
        };
        let Some(lon) = answer(CustomType::<f64>::new("Longitude:").prompt())? else {
            return Ok(());
        };
        Some(Coordinates::new(lat, lon)?)
    } else {
        None
    };

    config.save_to(&path)?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn show(
    city: Option<String>,
    imperial: bool,
    position: Option<(f64, f64)>,
    here: bool,
) -> Result<()> {
    let config = Config::load()?;
    let mut dashboard = open_dashboard(&config)?;
    if imperial {
        dashboard = dashboard.with_unit(UnitPreference::Imperial);
    }

    let result = if here {
        dashboard.use_current_location().await
    } else if let Some((lat, lon)) = position {
        dashboard.search_by_coordinates(lat, lon).await
    } else if let Some(city) = city {
        dashboard.search_city(&city).await
    } else {
        dashboard.start().await
    };

    match result {
        Ok(outcome) => {
            debug!(?outcome, "fetch finished");
            print!("{}", render::dashboard(&dashboard.state()));
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::ConfigMissing => bail!(STARTUP_CONFIG_MISSING),
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Search,
    Quick(&'static str),
    MyLocation,
    ToggleUnit,
    Refresh,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("Search a city"),
            Action::Quick(city) => write!(f, "{city}"),
            Action::MyLocation => f.write_str("My location"),
            Action::ToggleUnit => f.write_str("Toggle °C / °F"),
            Action::Refresh => f.write_str("Refresh"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn actions() -> Vec<Action> {
    let mut actions = vec![Action::Search];
    actions.extend(QUICK_CITIES.map(Action::Quick));
    actions.extend([Action::MyLocation, Action::ToggleUnit, Action::Refresh, Action::Quit]);
    actions
}

async fn interactive() -> Result<()> {
    let config = Config::load()?;
    let dashboard = open_dashboard(&config)?;

    // Failures end up in the state's error line.
    if let Err(err) = dashboard.start().await {
        debug!(kind = ?err.kind(), "initial load failed");
    }

    loop {
        println!();
        print!("{}", render::dashboard(&dashboard.state()));

        let Some(action) = answer(Select::new("What next?", actions()).prompt())? else {
            break;
        };

        let result = match action {
            Action::Search => match answer(Text::new("City:").prompt())? {
                Some(name) => dashboard.search_city(&name).await,
                None => continue,
            },
            Action::Quick(city) => dashboard.search_city(city).await,
            Action::MyLocation => dashboard.use_current_location().await,
            Action::ToggleUnit => dashboard.toggle_unit().await,
            Action::Refresh => dashboard.refresh().await,
            Action::Quit => break,
        };

        match result {
            Ok(outcome) => debug!(?action, ?outcome, "action finished"),
            Err(err) => debug!(?action, kind = ?err.kind(), "action failed"),
        }
    }

    Ok(())
}

/// Leaves the alternate screen even when the animation exits early.
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> Result<Self> {
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("Failed to prepare the terminal")?;
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    }
}

async fn background(
    city: Option<String>,
    particles: usize,
    fps: u32,
    seconds: Option<u64>,
) -> Result<()> {
    let overlay = match city {
        Some(city) => {
            let config = Config::load()?;
            let dashboard = open_dashboard(&config)?;
            dashboard.search_city(&city).await?;
            Overlay::for_weather(dashboard.state().weather.as_ref())
        }
        None => Overlay::None,
    };

    let mut size = terminal::size().context("Failed to read the terminal size")?;
    let field = ParticleField::new(particles, canvas::viewport_for(size.0, size.1), &mut rand::rng());
    debug!(particles, fps, ?overlay, "starting background");

    let _screen = ScreenGuard::enter()?;
    let handle = spawn_animation(
        field,
        TerminalCanvas::new(io::stdout()),
        Duration::from_secs_f64(1.0 / f64::from(fps)),
    );
    handle.set_overlay(overlay);

    let deadline = async {
        match seconds {
            Some(seconds) => tokio::time::sleep(Duration::from_secs(seconds)).await,
            None => std::future::pending().await,
        }
    };
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(deadline, ctrl_c);

    let mut size_check = tokio::time::interval(Duration::from_millis(250));
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = &mut deadline => break,
            _ = size_check.tick() => match terminal::size() {
                Ok(current) if current != size => {
                    size = current;
                    handle.resize(canvas::viewport_for(size.0, size.1));
                }
                _ => {}
            },
        }
    }

    handle.stop().await.context("Background animation task failed")?;
    Ok(())
}
