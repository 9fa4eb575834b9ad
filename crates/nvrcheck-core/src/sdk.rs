// ── NVR SDK seam ──
//
// What the workflow needs from a vendor binding: create a control-center
// client, register an NVR endpoint, obtain a session handle for an
// address, log in, list devices, and tear everything down again.

use std::fmt;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;

use crate::error::CoreError;
use crate::model::Device;

/// Client SDK version the binding is asked to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkVersion {
    pub major: u16,
    pub minor: u16,
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parameters for [`Sdk::create_instance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitParams {
    pub version: SdkVersion,
    /// Discover other NVRs on the network. When off, NVRs are only
    /// known once registered through [`ControlCenter::add_nvr`].
    pub auto_discover_nvrs: bool,
    pub service_mode: bool,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            version: SdkVersion { major: 6, minor: 2 },
            auto_discover_nvrs: false,
            service_mode: true,
        }
    }
}

/// Result of a login attempt. Only [`Successful`](Self::Successful) is
/// a success; every other variant maps to a non-zero result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LoginResult {
    Successful,
    InvalidCredentials,
    ServerUnreachable,
    Unknown,
}

impl LoginResult {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Successful)
    }

    /// Numeric result code; `0` means success.
    pub fn code(self) -> i32 {
        match self {
            Self::Successful => 0,
            Self::InvalidCredentials => 1,
            Self::ServerUnreachable => 2,
            Self::Unknown => -1,
        }
    }
}

/// Entry point of a vendor binding.
pub trait Sdk {
    type Center: ControlCenter;

    /// Create the control-center client.
    fn create_instance(&self, params: &InitParams) -> Result<Self::Center, CoreError>;

    /// Shut the SDK down. Called after the control center is disposed.
    fn shutdown(&self) -> impl Future<Output = ()> + Send;
}

/// A control-center client that knows about zero or more NVRs.
pub trait ControlCenter: Send + Sync {
    type Session: NvrSession;

    /// Port NVRs listen on unless told otherwise.
    fn default_port(&self) -> u16;

    /// Register an NVR endpoint with the client.
    fn add_nvr(&self, endpoint: SocketAddr) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Session handle for a registered address, once the NVR is live.
    fn get_nvr(&self, address: IpAddr) -> impl Future<Output = Option<Self::Session>> + Send;

    /// Release the client and anything it holds.
    fn dispose(self) -> impl Future<Output = ()> + Send;
}

/// A session handle on one NVR.
pub trait NvrSession: Send + Sync {
    fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = LoginResult> + Send;

    /// Current device list with connection state.
    fn devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;
}
