//! Configuration module for DashVis-RS
//!
//! This module handles:
//! - Dashboard settings (`dashboard.toml`): precision, axis options, redraw
//!   rate, history lengths and the theme to load
//! - Application state (`app_state.json`): what was shown last time
//!
//! # App Data Location
//!
//! Both files live in the platform-appropriate data directory:
//! - **Linux**: `~/.local/share/dev.dashvis.dashvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.dashvis.dashvis-rs/`
//! - **Windows**: `%APPDATA%\dev.dashvis.dashvis-rs\`
//!
//! # Example
//!
//! ```ignore
//! use dashvis_rs::config::{AppState, DashboardConfig};
//!
//! let config = DashboardConfig::load_or_default();
//! let mut state = AppState::load_or_default();
//!
//! state.last_theme = Some(config.theme.clone());
//! state.save()?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result, ResultExt};
use crate::id::GlobalIndex;
use crate::store::DEFAULT_PLOT_POINTS;
use crate::throttle::DEFAULT_REDRAW_RATE_HZ;
use crate::types::AxisVisibility;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.dashvis.dashvis-rs";

/// Dashboard settings filename
pub const CONFIG_FILE: &str = "dashboard.toml";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Default number of decimals for numeric readings
pub const DEFAULT_PRECISION: usize = 2;

/// Default FFT window length for generated datasets
pub const DEFAULT_FFT_SAMPLES: usize = 256;

/// Default sampling rate for generated datasets, in Hz
pub const DEFAULT_SAMPLING_RATE_HZ: f64 = 100.0;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        DashboardError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            DashboardError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the dashboard settings file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

// ==================== Dashboard Config ====================

/// Settings shared by every widget on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Decimals used when formatting numeric readings
    pub precision: usize,

    /// Axis option for plotting widgets
    pub axis_visibility: AxisVisibility,

    /// Repaint rate in Hz
    pub redraw_rate_hz: f64,

    /// History length of time plots
    pub plot_points: usize,

    /// FFT window length for datasets that don't set one
    pub default_fft_samples: usize,

    /// Sampling rate for datasets that don't set one
    pub default_sampling_rate: f64,

    /// Built-in theme name or path to a JSON theme file
    pub theme: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            axis_visibility: AxisVisibility::default(),
            redraw_rate_hz: DEFAULT_REDRAW_RATE_HZ,
            plot_points: DEFAULT_PLOT_POINTS,
            default_fft_samples: DEFAULT_FFT_SAMPLES,
            default_sampling_rate: DEFAULT_SAMPLING_RATE_HZ,
            theme: "Default".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load settings from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            DashboardError::Config("Could not determine config path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validated()
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load dashboard config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write config {:?}", path))
    }

    fn validated(self) -> Result<Self> {
        if !(self.redraw_rate_hz.is_finite() && self.redraw_rate_hz > 0.0) {
            return Err(DashboardError::Config(format!(
                "redraw_rate_hz must be positive, got {}",
                self.redraw_rate_hz
            )));
        }
        if !(self.default_sampling_rate.is_finite() && self.default_sampling_rate > 0.0) {
            return Err(DashboardError::Config(format!(
                "default_sampling_rate must be positive, got {}",
                self.default_sampling_rate
            )));
        }
        Ok(self)
    }
}

// ==================== App State ====================

/// Persistent application state.
///
/// Remembers what the dashboard showed when it was last closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Theme active at exit
    #[serde(default)]
    pub last_theme: Option<String>,

    /// Global index shown by each host, in host order
    #[serde(default)]
    pub last_indices: Vec<GlobalIndex>,

    /// Time of the last save
    #[serde(default)]
    pub saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            last_theme: None,
            last_indices: Vec::new(),
            saved_at: None,
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            DashboardError::Config("Could not determine app state path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load app state from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DashboardError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| DashboardError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&mut self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    /// Save app state to a specific file
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.saved_at = Some(chrono::Utc::now());
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| DashboardError::Config(format!("Failed to write app state: {}", e)))
    }
}

// ==================== Tests ====================
