// ── Runtime configuration ──
//
// These types describe *how* a run behaves and how the web binding talks
// to the NVR. They never touch disk: the binary builds them from its
// configuration layer and hands them in.

use std::path::PathBuf;
use std::time::Duration;

use nvrcheck_api::{TlsMode, TransportConfig};

use crate::sdk::InitParams;
use crate::wait::PollPolicy;

/// Knobs of a single provisioning check.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub init: InitParams,
    /// Wait for the NVR to come up as a live session handle.
    pub session_wait: PollPolicy,
    /// Wait for the device list to reach the expected count.
    pub device_wait: PollPolicy,
    /// Directory the snapshot file is written to.
    pub output_dir: PathBuf,
}

impl RunSettings {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            init: InitParams::default(),
            session_wait: PollPolicy::default(),
            device_wait: PollPolicy::default(),
            output_dir,
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for NVRs.
    #[default]
    DangerAcceptInvalid,
}

/// Connection settings for the web-endpoint binding.
#[derive(Debug, Clone)]
pub struct WebSdkConfig {
    /// Port override; `None` uses the binding's default.
    pub port: Option<u16>,
    /// `https` when true, `http` otherwise.
    pub secure: bool,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for WebSdkConfig {
    fn default() -> Self {
        Self {
            port: None,
            secure: true,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl WebSdkConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
