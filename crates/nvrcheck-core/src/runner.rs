// ── Provisioning check runner ──
//
// One linear pass: register the NVR, wait for a live session handle, log
// in, wait for the expected device count, write the snapshot once. The
// control center is disposed and the SDK shut down on every path once the
// SDK instance exists.

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::RunSettings;
use crate::error::CoreError;
use crate::model::{ConnectionTarget, Device};
use crate::sdk::{ControlCenter, LoginResult, NvrSession, Sdk};
use crate::snapshot::{self, WriteOutcome};
use crate::wait::{WaitOutcome, poll_until};

/// Where a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The NVR never showed up as a live session handle.
    ConnectFailed,
    /// Login returned a non-success result; devices were never polled.
    LoginFailed(LoginResult),
    /// The device count never matched; nothing was written.
    DevicesNotReady,
    SnapshotWritten(PathBuf),
    /// A snapshot for this address already exists and was left untouched.
    SnapshotExists(PathBuf),
    /// Interrupted while waiting.
    Cancelled,
}

/// Everything the caller needs to report a run.
#[derive(Debug)]
pub struct RunReport {
    pub endpoint: SocketAddr,
    pub outcome: Outcome,
}

/// Called as soon as registering the NVR fails; the run carries on.
pub type RegistrationHook = Box<dyn Fn(SocketAddr, &CoreError) + Send + Sync>;

/// Drives a single provisioning check against one NVR.
pub struct Runner<S> {
    sdk: S,
    settings: RunSettings,
    cancel: CancellationToken,
    on_registration_error: Option<RegistrationHook>,
}

impl<S: Sdk> Runner<S> {
    pub fn new(sdk: S, settings: RunSettings) -> Self {
        Self {
            sdk,
            settings,
            cancel: CancellationToken::new(),
            on_registration_error: None,
        }
    }

    /// Report a failed registration the moment it happens.
    pub fn on_registration_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(SocketAddr, &CoreError) + Send + Sync + 'static,
    {
        self.on_registration_error = Some(Box::new(hook));
        self
    }

    /// Token that interrupts the waits of an in-flight run. Teardown still runs.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the check, then dispose the control center and shut the SDK down.
    pub async fn run(&self, target: &ConnectionTarget) -> Result<RunReport, CoreError> {
        let center = match self.sdk.create_instance(&self.settings.init) {
            Ok(center) => center,
            Err(e) => {
                self.sdk.shutdown().await;
                return Err(e);
            }
        };

        let result = self.drive(&center, target).await;

        center.dispose().await;
        self.sdk.shutdown().await;
        debug!("teardown complete");

        result
    }

    async fn drive(
        &self,
        center: &S::Center,
        target: &ConnectionTarget,
    ) -> Result<RunReport, CoreError> {
        let endpoint = SocketAddr::new(target.address, center.default_port());

        if let Err(e) = center.add_nvr(endpoint).await {
            warn!(%endpoint, error = %e, "registering NVR failed, continuing");
            if let Some(hook) = &self.on_registration_error {
                hook(endpoint, &e);
            }
        }

        let outcome = self.check(center, target).await?;

        Ok(RunReport { endpoint, outcome })
    }

    async fn check(
        &self,
        center: &S::Center,
        target: &ConnectionTarget,
    ) -> Result<Outcome, CoreError> {
        let address = target.address;

        let session = match poll_until(self.settings.session_wait, &self.cancel, move || {
            center.get_nvr(address)
        })
        .await
        {
            WaitOutcome::Ready(session) => session,
            WaitOutcome::TimedOut => {
                warn!(%address, timeout = ?self.settings.session_wait.timeout, "NVR never became available");
                return Ok(Outcome::ConnectFailed);
            }
            WaitOutcome::Cancelled => return Ok(Outcome::Cancelled),
        };

        let login = session.login(&target.username, &target.password).await;
        if !login.is_success() {
            warn!(%address, result = %login, code = login.code(), "login failed");
            return Ok(Outcome::LoginFailed(login));
        }
        info!(%address, "logged in");

        let session = &session;
        let devices = match poll_until(self.settings.device_wait, &self.cancel, move || {
            matching_devices(session, target)
        })
        .await
        {
            WaitOutcome::Ready(devices) => devices,
            WaitOutcome::TimedOut => {
                info!(
                    expected = target.expected_devices,
                    "device count not reached, no snapshot written"
                );
                return Ok(Outcome::DevicesNotReady);
            }
            WaitOutcome::Cancelled => return Ok(Outcome::Cancelled),
        };

        let path = snapshot::snapshot_path(&self.settings.output_dir, address);
        Ok(match snapshot::write_if_absent(&path, &devices)? {
            WriteOutcome::Written(path) => Outcome::SnapshotWritten(path),
            WriteOutcome::AlreadyExists(path) => Outcome::SnapshotExists(path),
        })
    }
}

/// One device poll: the list if it has the expected size, otherwise `None`.
async fn matching_devices<N: NvrSession>(
    session: &N,
    target: &ConnectionTarget,
) -> Option<Vec<Device>> {
    match session.devices().await {
        Ok(devices) if target.expects(devices.len()) => Some(devices),
        Ok(devices) => {
            debug!(
                found = devices.len(),
                expected = target.expected_devices,
                "device count not reached yet"
            );
            None
        }
        Err(e) => {
            warn!(error = %e, transient = e.is_transient(), "listing devices failed, will retry");
            None
        }
    }
}
