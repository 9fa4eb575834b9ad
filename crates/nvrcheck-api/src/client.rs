// Web endpoint HTTP client
//
// Wraps `reqwest::Client` with NVR-specific URL construction and envelope
// unwrapping. Endpoint groups (session auth, cameras) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::net::SocketAddr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::Envelope;

/// Path prefix of the REST surface on the NVR.
const API_PREFIX: &str = "/mt/api/rest/v1";

/// Error codes the NVR uses for rejected credentials or sessions.
const AUTH_ERROR_CODES: &[&str] = &["invalid-credentials", "session-expired", "not-authorized"];

/// Raw HTTP client for one NVR's web endpoint.
///
/// Handles the `{ status, result }` envelope and URL construction. All
/// methods return unwrapped `result` payloads.
#[derive(Debug, Clone)]
pub struct WebClient {
    http: reqwest::Client,
    base_url: Url,
    client_name: String,
}

impl WebClient {
    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// `base_url` is the NVR root (e.g. `https://10.0.0.1:8443`).
    /// `client_name` is announced on login.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        client_name: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            client_name: client_name.into(),
        }
    }

    /// Build the root URL for an NVR endpoint.
    pub fn endpoint_url(endpoint: SocketAddr, secure: bool) -> Result<Url, Error> {
        let scheme = if secure { "https" } else { "http" };
        Ok(Url::parse(&format!("{scheme}://{endpoint}"))?)
    }

    /// The NVR base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Name announced to the NVR on login.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/mt/api/rest/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{API_PREFIX}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url.path());

        let resp = self.http.get(url).send().await?;
        let envelope = Self::parse_envelope(resp).await?;
        Self::require_result(envelope)
    }

    /// Send a POST request with JSON body and return the raw envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        debug!("POST {}", url.path());

        let resp = self.http.post(url).json(body).send().await?;
        Self::parse_envelope(resp).await
    }

    /// Bare GET on a path; any 2xx counts as healthy.
    pub(crate) async fn ping(&self, url: Url) -> Result<(), Error> {
        debug!("probing {}", url.path());

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Api {
            message: preview(&body),
            code: None,
            status: status.as_u16(),
        })
    }

    /// Extract `result` from a success envelope.
    pub(crate) fn require_result<T>(envelope: Envelope<T>) -> Result<T, Error> {
        envelope.result.ok_or_else(|| Error::Deserialization {
            message: "success envelope without result".into(),
            body: String::new(),
        })
    }

    /// Parse the `{ status, result }` envelope, returning it on success
    /// or an error if the HTTP status or `status` field signals failure.
    async fn parse_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("rejected by NVR (HTTP {status})"),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", preview(&body)),
                code: None,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        if envelope.is_success() {
            return Ok(envelope);
        }

        let message = envelope
            .message
            .clone()
            .unwrap_or_else(|| format!("status={}", envelope.status));

        match envelope.code {
            Some(code) if AUTH_ERROR_CODES.contains(&code.as_str()) => {
                Err(Error::Authentication { message })
            }
            code => Err(Error::Api {
                message,
                code,
                status: status.as_u16(),
            }),
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
