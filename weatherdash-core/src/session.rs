//! Remembers the last city shown, so the next start opens on it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};
use tracing::warn;

use crate::config::project_dirs;

pub trait SessionStore: Send + Sync + Debug {
    fn last_city(&self) -> Option<String>;

    fn remember_city(&self, city: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub last_city: Option<String>,
}

/// Session kept as a small TOML file in the platform data directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data dir>/session.toml`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("session.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SessionState> {
        if !self.path.exists() {
            return Ok(SessionState::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn last_city(&self) -> Option<String> {
        match self.read() {
            Ok(state) => state.last_city.filter(|city| !city.trim().is_empty()),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "ignoring unreadable session");
                None
            }
        }
    }

    fn remember_city(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let state = SessionState { last_city: Some(city.to_string()) };
        let toml = toml::to_string_pretty(&state).context("Failed to serialize session")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }
}

/// In-process session, forgotten on exit.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: RwLock<SessionState>,
}

impl MemorySessionStore {
    pub fn with_city(city: &str) -> Self {
        Self { state: RwLock::new(SessionState { last_city: Some(city.to_string()) }) }
    }
}

impl SessionStore for MemorySessionStore {
    fn last_city(&self) -> Option<String> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).last_city.clone()
    }

    fn remember_city(&self, city: &str) -> Result<()> {
        self.state.write().unwrap_or_else(PoisonError::into_inner).last_city = Some(city.to_string());
        Ok(())
    }
}
