use crate::{
    capture::AxisSettings,
    constants::DEFAULT_PORT,
    poller_worker::{PollerConfig, WireMode},
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf, time::Duration};
use tracing::debug;

/// A full dead zone would zero every axis short of the rim.
const MAX_DEADZONE: f32 = 0.95;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub target_ip: String,
    pub target_port: u16,
    pub wire_mode: WireMode,
    pub send_interval_ms: u64,
    pub invert_lx: bool,
    pub invert_ly: bool,
    pub invert_rx: bool,
    pub invert_ry: bool,
    pub deadzone_lstick: f32,
    pub deadzone_rstick: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_ip: "127.0.0.1".into(),
            target_port: DEFAULT_PORT,
            wire_mode: WireMode::Raw,
            send_interval_ms: 8,
            invert_lx: false,
            // gamepads report up as positive, the wire uses 0x00 for up
            invert_ly: true,
            invert_rx: false,
            invert_ry: true,
            deadzone_lstick: 0.10, // 10%
            deadzone_rstick: 0.10, // 10%
        }
    }
}

fn config_path() -> io::Result<PathBuf> {
    ProjectDirs::from("com", "SwitchPadLink", "SwitchPadLink")
        .map(|d| d.config_dir().join("config.toml"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Could not determine config dir"))
}

impl AppConfig {
    pub fn load() -> io::Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let txt = fs::read_to_string(&path)?;
        Self::from_toml(&txt)
    }

    pub fn from_toml(txt: &str) -> io::Result<Self> {
        toml::from_str(txt).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("TOML parse error: {e}"))
        })
    }

    pub fn save(&self) -> io::Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let toml = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, toml)
    }

    pub fn axis_settings(&self) -> AxisSettings {
        AxisSettings {
            deadzone_lstick: self.deadzone_lstick.clamp(0.0, MAX_DEADZONE),
            deadzone_rstick: self.deadzone_rstick.clamp(0.0, MAX_DEADZONE),
            invert_lx: self.invert_lx,
            invert_ly: self.invert_ly,
            invert_rx: self.invert_rx,
            invert_ry: self.invert_ry,
        }
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            wire_mode: self.wire_mode,
            send_interval: Duration::from_millis(self.send_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            target_ip = "192.168.1.40"
            wire_mode = "command"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.target_ip, "192.168.1.40");
        assert_eq!(cfg.wire_mode, WireMode::Command);
        assert_eq!(cfg.target_port, DEFAULT_PORT);
        assert_eq!(cfg.send_interval_ms, 8);
        assert!(cfg.invert_ly);
    }

    #[test]
    fn test_toml_round_trip() {
        let cfg = AppConfig {
            target_port: 4000,
            deadzone_rstick: 0.25,
            ..AppConfig::default()
        };
        let txt = toml::to_string_pretty(&cfg).unwrap();
        assert!(txt.contains("wire_mode = \"raw\""));
        assert_eq!(AppConfig::from_toml(&txt).unwrap(), cfg);
    }

    #[test]
    fn test_invalid_toml_is_invalid_data() {
        let err = AppConfig::from_toml("target_port = \"nope\"").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_derived_settings() {
        let cfg = AppConfig {
            deadzone_lstick: 3.0,
            deadzone_rstick: 1.0,
            send_interval_ms: 16,
            ..AppConfig::default()
        };
        let axes = cfg.axis_settings();
        assert_eq!(axes.deadzone_lstick, MAX_DEADZONE);
        assert!(axes.deadzone_rstick < 1.0);
        assert_eq!(cfg.poller_config().send_interval, Duration::from_millis(16));
    }
}
