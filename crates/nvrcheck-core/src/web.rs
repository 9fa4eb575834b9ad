// ── Web-endpoint SDK binding ──
//
// Implements the SDK seam over the NVR's HTTP web endpoint. Registering an
// NVR creates a client for its base URL; the NVR becomes a live session
// handle once its health check answers. Sessions are logged out when the
// control center is disposed.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use nvrcheck_api::{SessionToken, WebClient};
use secrecy::SecretString;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::WebSdkConfig;
use crate::error::CoreError;
use crate::model::Device;
use crate::sdk::{ControlCenter, InitParams, LoginResult, NvrSession, Sdk};

/// Port the web endpoint listens on out of the box.
pub const DEFAULT_PORT: u16 = 8443;

// ── WebSdk ───────────────────────────────────────────────────────

/// SDK binding speaking JSON over HTTP(S) to the NVR.
#[derive(Debug, Clone, Default)]
pub struct WebSdk {
    config: WebSdkConfig,
}

impl WebSdk {
    pub fn new(config: WebSdkConfig) -> Self {
        Self { config }
    }
}

impl Sdk for WebSdk {
    type Center = WebControlCenter;

    fn create_instance(&self, params: &InitParams) -> Result<WebControlCenter, CoreError> {
        if params.auto_discover_nvrs {
            warn!("NVR auto-discovery is not available over the web endpoint; ignoring");
        }

        let http = self.config.transport().build_client()?;
        debug!(version = %params.version, service_mode = params.service_mode, "web SDK instance created");

        Ok(WebControlCenter {
            http,
            client_name: format!("nvrcheck/{}", params.version),
            port: self.config.port.unwrap_or(DEFAULT_PORT),
            secure: self.config.secure,
            nvrs: Mutex::new(HashMap::new()),
        })
    }

    async fn shutdown(&self) {
        debug!("web SDK shut down");
    }
}

// ── WebControlCenter ─────────────────────────────────────────────

/// Registry of NVRs reachable through the web endpoint.
pub struct WebControlCenter {
    http: reqwest::Client,
    client_name: String,
    port: u16,
    secure: bool,
    nvrs: Mutex<HashMap<IpAddr, WebNvr>>,
}

impl ControlCenter for WebControlCenter {
    type Session = WebNvr;

    fn default_port(&self) -> u16 {
        self.port
    }

    async fn add_nvr(&self, endpoint: SocketAddr) -> Result<(), CoreError> {
        let base_url = WebClient::endpoint_url(endpoint, self.secure).map_err(|e| {
            CoreError::Registration {
                endpoint,
                reason: e.to_string(),
            }
        })?;

        debug!(%base_url, "registering NVR");
        let client = WebClient::with_client(self.http.clone(), base_url, self.client_name.clone());
        self.nvrs
            .lock()
            .await
            .insert(endpoint.ip(), WebNvr::new(client));
        Ok(())
    }

    async fn get_nvr(&self, address: IpAddr) -> Option<WebNvr> {
        let nvr = self.nvrs.lock().await.get(&address).cloned()?;

        match nvr.client.health().await {
            Ok(()) => {
                debug!(%address, "NVR is live");
                Some(nvr)
            }
            Err(e) => {
                debug!(%address, error = %e, "NVR not reachable yet");
                None
            }
        }
    }

    async fn dispose(self) {
        let nvrs = self.nvrs.into_inner();
        for (address, nvr) in nvrs {
            if let Err(e) = nvr.logout().await {
                warn!(%address, error = %e, "logout failed (non-fatal)");
            }
        }
        debug!("control center disposed");
    }
}

// ── WebNvr ───────────────────────────────────────────────────────

/// Session handle on one NVR. Clones share the session token.
#[derive(Debug, Clone)]
pub struct WebNvr {
    client: WebClient,
    session: Arc<RwLock<Option<SessionToken>>>,
}

impl WebNvr {
    fn new(client: WebClient) -> Self {
        Self {
            client,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// End the session, if one was established.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let Some(token) = self.session.write().await.take() else {
            return Ok(());
        };
        self.client.logout(&token).await?;
        Ok(())
    }
}

impl NvrSession for WebNvr {
    async fn login(&self, username: &str, password: &SecretString) -> LoginResult {
        match self.client.login(username, password).await {
            Ok(token) => {
                *self.session.write().await = Some(token);
                info!(base_url = %self.client.base_url(), "logged in to NVR");
                LoginResult::Successful
            }
            Err(e) if e.is_auth_failure() => {
                debug!(error = %e, "login rejected");
                LoginResult::InvalidCredentials
            }
            Err(nvrcheck_api::Error::Transport(e)) => {
                debug!(error = %e, "login request failed");
                LoginResult::ServerUnreachable
            }
            Err(e) => {
                warn!(error = %e, "unexpected login failure");
                LoginResult::Unknown
            }
        }
    }

    async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        let token = self
            .session
            .read()
            .await
            .clone()
            .ok_or(nvrcheck_api::Error::NotLoggedIn)?;

        let cameras = self.client.list_cameras(&token).await?;
        Ok(cameras.into_iter().map(Device::from).collect())
    }
}
