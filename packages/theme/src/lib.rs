#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Light/dark theme preference.
//!
//! The theme is the only piece of state that outlives a session. It is
//! owned by a [`ThemeController`] created at startup and persisted through
//! the [`ThemeStore`] trait, so callers never touch storage directly.
//!
//! Initial theme resolution order: persisted value, then the OS-level dark
//! mode preference, then [`Theme::Light`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use scenebay_config::ThemeSettings;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Color theme.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    /// Light theme.
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Returns the opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether this is [`Theme::Dark`].
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Errors from theme persistence.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Reading or writing the theme file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The theme file could not be serialized.
    #[error("Failed to serialize theme: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The theme file is not valid TOML.
    #[error("Failed to parse theme file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The in-memory store's lock was poisoned.
    #[error("Theme store lock poisoned")]
    Poisoned,
}

/// Persistence for the theme preference.
pub trait ThemeStore: Send + Sync {
    /// Returns the persisted theme, or `None` if nothing usable is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the backing storage cannot be read.
    fn load(&self) -> Result<Option<Theme>, ThemeError>;

    /// Persists `theme`.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the backing storage cannot be written.
    fn save(&self, theme: Theme) -> Result<(), ThemeError>;
}

/// On-disk layout of the theme file.
#[derive(Serialize, Deserialize)]
struct ThemeFile {
    theme: String,
}

/// Stores the theme as `theme = "light" | "dark"` in a TOML file.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    /// Creates a store backed by the file at `path`. The file is created on
    /// the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, ThemeError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: ThemeFile = toml::de::from_str(&text)?;
        let theme = file.theme.parse::<Theme>().ok();
        if theme.is_none() {
            log::warn!(
                "Ignoring unknown theme {:?} in {}",
                file.theme,
                self.path.display()
            );
        }
        Ok(theme)
    }

    fn save(&self, theme: Theme) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::ser::to_string(&ThemeFile {
            theme: theme.to_string(),
        })?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Keeps the theme in memory only.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    theme: Mutex<Option<Theme>>,
}

impl MemoryThemeStore {
    /// Creates a store holding `theme`.
    #[must_use]
    pub const fn new(theme: Option<Theme>) -> Self {
        Self {
            theme: Mutex::new(theme),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>, ThemeError> {
        Ok(*self.theme.lock().map_err(|_| ThemeError::Poisoned)?)
    }

    fn save(&self, theme: Theme) -> Result<(), ThemeError> {
        *self.theme.lock().map_err(|_| ThemeError::Poisoned)? = Some(theme);
        Ok(())
    }
}

/// Picks the startup theme from the persisted value and the OS preference.
#[must_use]
pub const fn resolve_initial_theme(stored: Option<Theme>, prefers_dark: bool) -> Theme {
    match stored {
        Some(theme) => theme,
        None if prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}

/// Owns the current theme and writes every change through a [`ThemeStore`].
pub struct ThemeController {
    theme: Theme,
    store: Arc<dyn ThemeStore>,
}

impl ThemeController {
    /// Creates a controller, resolving the initial theme from `store` and
    /// `prefers_dark`. A store that fails to load is logged and treated as
    /// empty.
    #[must_use]
    pub fn new(store: Arc<dyn ThemeStore>, prefers_dark: bool) -> Self {
        let stored = store.load().unwrap_or_else(|e| {
            log::warn!("Failed to load theme preference: {e}");
            None
        });
        let theme = resolve_initial_theme(stored, prefers_dark);
        log::debug!("Initial theme: {theme}");
        Self { theme, store }
    }

    /// Creates a controller backed by a [`FileThemeStore`] at the configured
    /// path.
    #[must_use]
    pub fn from_settings(settings: &ThemeSettings) -> Self {
        Self::new(
            Arc::new(FileThemeStore::new(settings.file.clone())),
            settings.prefers_dark,
        )
    }

    /// The current theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Switches to the opposite theme and persists it.
    ///
    /// The in-memory theme changes even if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the store cannot be written.
    pub fn toggle(&mut self) -> Result<Theme, ThemeError> {
        self.set(self.theme.toggled())
    }

    /// Sets and persists `theme`.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the store cannot be written.
    pub fn set(&mut self, theme: Theme) -> Result<Theme, ThemeError> {
        self.theme = theme;
        self.store.save(theme)?;
        Ok(theme)
    }
}
