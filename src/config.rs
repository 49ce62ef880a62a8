use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::info;

use crate::buffer::MAX_DATA_POINTS;
use crate::pose::ViewDescriptor;

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "POSE_DASHBOARD_CONFIG";
/// Environment variable overriding `service.base_url`.
pub const SERVICE_URL_ENV: &str = "POSE_SERVICE_URL";

/// Application configuration. Every section falls back to its defaults, so a
/// file only needs the keys it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub service: ServiceConfig,
    pub polling: PollingConfig,
    pub chart: ChartConfig,
    pub scene: SceneConfig,
    pub status: StatusConfig,
    pub channels: ChannelConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
}

/// Remote pose service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub video_feed_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
}

/// Rolling angle chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub max_data_points: usize,
    pub plot_height: f32,
    pub colors: ChartColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartColors {
    pub joint1: [u8; 3],
    pub joint2: [u8; 3],
    pub joint3: [u8; 3],
}

/// The two skeleton views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub plot_height: f32,
    pub marker_radius: f32,
    pub marker_color: [u8; 3],
    pub line_width: f32,
    pub line_color: [u8; 3],
    pub primary_view: ViewDescriptor,
    pub secondary_view: ViewDescriptor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub display_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub event_channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            title: "Pose Dashboard".to_string(),
            resizable: true,
            vsync: true,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 2000,
            video_feed_path: "/video_feed".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_data_points: MAX_DATA_POINTS,
            plot_height: 300.0,
            colors: ChartColors::default(),
        }
    }
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            joint1: [255, 0, 0],
            joint2: [0, 255, 0],
            joint3: [0, 0, 255],
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            plot_height: 280.0,
            marker_radius: 2.5,
            marker_color: [0, 200, 100],
            line_width: 3.0,
            line_color: [100, 150, 250],
            primary_view: ViewDescriptor::front_right(),
            secondary_view: ViewDescriptor::front_left(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { display_ms: 3000 }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { event_channel_capacity: 1024 }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { worker_threads: 2 }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.service.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("Service base URL must not be empty".to_string()));
        }

        if self.service.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError("Request timeout must be positive".to_string()));
        }

        if self.polling.interval_ms == 0 {
            return Err(ConfigError::ValidationError("Polling interval must be positive".to_string()));
        }

        if self.chart.max_data_points == 0 {
            return Err(ConfigError::ValidationError("Chart capacity must be positive".to_string()));
        }

        if !self.scene.primary_view.is_valid() || !self.scene.secondary_view.is_valid() {
            return Err(ConfigError::ValidationError(
                "View eye must be non-zero and axis ranges increasing".to_string(),
            ));
        }

        if self.channels.event_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Event channel capacity must be positive".to_string()));
        }

        if self.runtime.worker_threads == 0 {
            return Err(ConfigError::ValidationError("Runtime needs at least one worker thread".to_string()));
        }

        Ok(())
    }

    /// Applies `POSE_SERVICE_URL` on top of the loaded values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(SERVICE_URL_ENV) {
            if !url.trim().is_empty() {
                info!("Service URL overridden from {}: {}", SERVICE_URL_ENV, url);
                self.service.base_url = url;
            }
        }
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    pub fn status_duration(&self) -> Duration {
        Duration::from_millis(self.status.display_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Loads the file named by `POSE_DASHBOARD_CONFIG`, else `config.toml` when
    /// it exists, else defaults. Environment overrides apply in every case.
    pub fn discover() -> Result<Self, ConfigError> {
        let mut manager = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from_file(DEFAULT_CONFIG_FILE)?,
            Err(_) => Self::new(),
        };

        match &manager.config_path {
            Some(path) => info!("Configuration loaded from {}", path.display()),
            None => info!("No configuration file, using defaults"),
        }

        manager.config.apply_env_overrides();
        manager.config.validate()?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
