use std::{env, path::PathBuf};

use thiserror::Error;

use super::schema::Settings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("audio.initial_volume must be <= 100 (got {0})")]
    Volume(u8),
    #[error("audio.tick_ms must be >= 10 (got {0})")]
    Tick(u64),
    #[error("controls.volume_step must be >= 1")]
    VolumeStep,
}

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `MARQUEE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MARQUEE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.audio.initial_volume > 100 {
            return Err(ValidationError::Volume(self.audio.initial_volume));
        }
        if self.audio.tick_ms < 10 {
            return Err(ValidationError::Tick(self.audio.tick_ms));
        }
        if self.controls.volume_step == 0 {
            return Err(ValidationError::VolumeStep);
        }
        Ok(())
    }
}

/// Resolve the config path from `MARQUEE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MARQUEE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/marquee/config.toml`
/// or `~/.config/marquee/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("marquee").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/marquee/marquee.log`
/// or `~/.local/state/marquee/marquee.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("marquee").join("marquee.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
