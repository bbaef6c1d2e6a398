//! Application configuration
//!
//! Loaded from a TOML file; every section and field falls back to its
//! default when omitted.

use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::error::ConfigError;
use crate::math::{CameraFrame, Projection, Quat};
use crate::tracking::SmoothingConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub smoothing: SmoothingConfig,
    pub mapping: MappingConfig,
    pub tick: TickConfig,
    pub ui: UiConfig,
}

/// Landmark socket settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub bind_host: String,
    /// 0 binds an ephemeral port
    pub port: u16,
    /// Larger datagrams are discarded
    pub max_datagram_size: usize,
    /// Kernel receive buffer size, system default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recv_buffer_size: Option<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_UDP_PORT,
            max_datagram_size: MAX_DATAGRAM_SIZE,
            recv_buffer_size: None,
        }
    }
}

impl NetworkConfig {
    /// Resolve `bind_host:port` to a socket address
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.bind_host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::Invalid {
                field: "network.bind_host",
                reason: format!("cannot resolve {:?}", self.bind_host),
            })
    }
}

/// Landmark to world-space mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub depth_scale: f64,
    pub camera_position: [f64; 3],
    /// Camera orientation as `[w, x, y, z]`
    pub camera_rotation: [f64; 4],
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            depth_scale: DEFAULT_DEPTH_SCALE,
            camera_position: [0.0, 0.0, 0.0],
            camera_rotation: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

impl MappingConfig {
    pub fn camera(&self) -> CameraFrame {
        let [x, y, z] = self.camera_position;
        let [qw, qx, qy, qz] = self.camera_rotation;
        CameraFrame::from_pose(
            Vector3::new(x, y, z),
            Quat::from_quaternion(Quaternion::new(qw, qx, qy, qz)),
        )
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.camera(), self.depth_scale)
    }
}

/// Tick loop timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: DEFAULT_TICK_INTERVAL_MS }
    }
}

impl TickConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Status API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub enabled: bool,
    pub bind_address: String,
    pub http_port: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "127.0.0.1".to_string(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

impl AppConfig {
    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "hand-pose-receiver")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Load `path` if given, else the per-user file if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }
        std::fs::write(path, text)
            .map_err(|e| ConfigError::Write(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.bind_addr()?;
        if self.network.max_datagram_size == 0 || self.network.max_datagram_size > MAX_DATAGRAM_SIZE {
            return Err(ConfigError::Invalid {
                field: "network.max_datagram_size",
                reason: format!("must be in 1..={}", MAX_DATAGRAM_SIZE),
            });
        }

        validate_factor("smoothing.position", self.smoothing.position)?;
        validate_factor("smoothing.rotation", self.smoothing.rotation)?;
        validate_depth_scale(self.mapping.depth_scale)?;

        let rotation_norm = self.mapping.camera_rotation.iter().map(|c| c * c).sum::<f64>().sqrt();
        if !rotation_norm.is_finite() || rotation_norm < 1e-9 {
            return Err(ConfigError::Invalid {
                field: "mapping.camera_rotation",
                reason: "must be a non-zero quaternion".to_string(),
            });
        }
        if self.mapping.camera_position.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "mapping.camera_position",
                reason: "must be finite".to_string(),
            });
        }

        if self.tick.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tick.interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Smoothing factors must lie in [0, 1]
pub fn validate_factor(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} is outside [0, 1]", value),
        })
    }
}

/// Depth scale must lie in (0, MAX_DEPTH_SCALE]
pub fn validate_depth_scale(value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= MAX_DEPTH_SCALE {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: "mapping.depth_scale",
            reason: format!("{} is outside (0, {}]", value, MAX_DEPTH_SCALE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.network.bind_host, "0.0.0.0");
        assert_eq!(config.network.port, 5005);
        assert_eq!(config.network.max_datagram_size, 65535);
        assert_eq!(config.smoothing.position, 0.5);
        assert_eq!(config.smoothing.rotation, 0.5);
        assert_eq!(config.mapping.depth_scale, 0.5);
        assert_eq!(config.tick.interval(), Duration::from_millis(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [network]
            port = 6000

            [smoothing]
            rotation = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.network.port, 6000);
        assert_eq!(config.network.bind_host, "0.0.0.0");
        assert_eq!(config.smoothing.rotation, 0.8);
        assert_eq!(config.smoothing.position, 0.5);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            AppConfig::from_toml("[smoothing]\nposition = 1.5"),
            Err(ConfigError::Invalid { field: "smoothing.position", .. })
        ));
        assert!(matches!(
            AppConfig::from_toml("[mapping]\ndepth_scale = 0.0"),
            Err(ConfigError::Invalid { field: "mapping.depth_scale", .. })
        ));
        assert!(matches!(
            AppConfig::from_toml("[mapping]\ndepth_scale = 10.5"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml("[tick]\ninterval_ms = 0"),
            Err(ConfigError::Invalid { field: "tick.interval_ms", .. })
        ));
        assert!(matches!(
            AppConfig::from_toml("[network]\nmax_datagram_size = 70000"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml("[network]\nport = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_camera_from_mapping() {
        let mapping = MappingConfig {
            camera_position: [1.0, 2.0, 3.0],
            // Unnormalized identity
            camera_rotation: [2.0, 0.0, 0.0, 0.0],
            ..Default::default()
        };
        let camera = mapping.camera();
        assert_eq!(camera.position, Vector3::new(1.0, 2.0, 3.0));
        assert!((camera.forward - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
        assert_eq!(mapping.projection().depth_scale, DEFAULT_DEPTH_SCALE);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("hand-pose-receiver-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.network.port = 7007;
        config.ui.enabled = true;
        config.save(&path).unwrap();

        let loaded = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
