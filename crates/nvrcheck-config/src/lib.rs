//! Configuration for the `nvrcheck` binary.
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `NVRCHECK_*` environment variables (`__` separates nested keys).
//! The result is translated into `nvrcheck_core` settings. Connection
//! credentials and the target address are never read from here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nvrcheck_core::{PollPolicy, RunSettings, TlsVerification, WebSdkConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "NVRCHECK_CONFIG";
const ENV_PREFIX: &str = "NVRCHECK_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Everything configurable about a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// NVR service port; unset uses the binding's default.
    pub port: Option<u16>,

    /// `https` when true, `http` otherwise.
    pub secure: bool,

    /// Accept self-signed certificates.
    pub insecure: bool,

    /// Custom CA certificate (PEM). Takes precedence over `insecure`.
    pub ca_cert: Option<PathBuf>,

    pub request_timeout_secs: u64,

    pub session_wait: WaitSettings,

    pub device_wait: WaitSettings,

    /// Snapshot directory; unset means next to the executable.
    pub output_dir: Option<PathBuf>,

    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: None,
            secure: true,
            insecure: true,
            ca_cert: None,
            request_timeout_secs: 30,
            session_wait: WaitSettings::default(),
            device_wait: WaitSettings::default(),
            output_dir: None,
            log_level: "warn".into(),
        }
    }
}

/// Poll interval and overall bound of one wait, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitSettings {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            timeout_ms: 10_000,
        }
    }
}

impl WaitSettings {
    fn policy(self, field: &str) -> Result<PollPolicy, ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: format!("{field}.interval_ms"),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(PollPolicy::new(
            Duration::from_millis(self.interval_ms),
            Duration::from_millis(self.timeout_ms),
        ))
    }
}

impl Settings {
    /// Workflow settings. The output directory falls back to the
    /// executable's directory.
    pub fn run_settings(&self) -> Result<RunSettings, ConfigError> {
        let output_dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => nvrcheck_core::snapshot::executable_dir().map_err(|e| {
                ConfigError::Validation {
                    field: "output_dir".into(),
                    reason: e.to_string(),
                }
            })?,
        };

        Ok(RunSettings {
            session_wait: self.session_wait.policy("session_wait")?,
            device_wait: self.device_wait.policy("device_wait")?,
            ..RunSettings::new(output_dir)
        })
    }

    /// Connection settings for the web-endpoint binding.
    pub fn web_sdk_config(&self) -> Result<WebSdkConfig, ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "request_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let tls = if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(WebSdkConfig {
            port: self.port,
            secure: self.secure,
            tls,
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$NVRCHECK_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }

    ProjectDirs::from("com", "nvrcheck", "nvrcheck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nvrcheck");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load settings from `path` plus environment. A missing file is fine.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"));

    let settings: Settings = figment.extract()?;
    Ok(settings)
}
