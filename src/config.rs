use crate::core::Coordinate;
use crate::playback::{PlaybackConfig, DEFAULT_HISTORY_MAX_ZOOM, DEFAULT_TICK_INTERVAL, MIN_TICK_INTERVAL};
use crate::render::{Icon, PolylineStyle};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Initial map placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_url: String,
    /// Notional viewport size in pixels, used when reporting fit zoom levels
    pub viewport: [u32; 2],
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: Coordinate::new(20.5937, 78.9629),
            zoom: 5,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            viewport: [1024, 768],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSettings {
    /// The moving vehicle
    pub vehicle: Icon,
    /// Start and end of the route
    pub endpoint: Icon,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            vehicle: Icon::new("./assets/images/moving.svg", 48, 48)
                .with_anchor(20, 25)
                .with_popup_anchor(0, -32),
            endpoint: Icon::new("./assets/images/marker-icon.png", 24, 36),
        }
    }
}

/// Replay settings, persisted as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tick_interval_ms: u64,
    /// Zoom cap when following the traveled route
    pub history_max_zoom: u8,
    pub map: MapSettings,
    pub icons: IconSettings,
    pub route: PolylineStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            history_max_zoom: DEFAULT_HISTORY_MAX_ZOOM,
            map: MapSettings::default(),
            icons: IconSettings::default(),
            route: PolylineStyle::default(),
        }
    }
}

impl AppConfig {
    /// Default location: `<config dir>/trip-replay/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trip-replay").join("config.json"))
    }

    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file gives the defaults. A file that exists but can't be
    /// read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                debug!("No config directory on this platform, using defaults");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms).max(MIN_TICK_INTERVAL)
    }

    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            tick_interval: self.tick_interval(),
            history_max_zoom: self.history_max_zoom,
        }
    }
}
