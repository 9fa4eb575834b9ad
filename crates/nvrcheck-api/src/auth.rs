// Web endpoint session authentication
//
// Login exchanges username/password for a session token that every
// session-scoped endpoint takes as a `session` query parameter.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::WebClient;
use crate::error::Error;
use crate::models::LoginPayload;

/// Session token returned by a successful login.
///
/// Redacted in `Debug` output.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl WebClient {
    /// Check that the NVR answers on its web endpoint.
    ///
    /// `GET /mt/api/rest/v1/health`
    pub async fn health(&self) -> Result<(), Error> {
        let url = self.api_url("health")?;
        self.ping(url).await
    }

    /// Authenticate with username/password.
    ///
    /// `POST /mt/api/rest/v1/login`
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        let url = self.api_url("login")?;

        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
            "clientName": self.client_name(),
        });

        let envelope = self.post::<LoginPayload>(url, &body).await?;
        let payload = Self::require_result(envelope)?;

        debug!("login successful");
        Ok(SessionToken::new(payload.session))
    }

    /// End a session.
    ///
    /// `POST /mt/api/rest/v1/logout`
    pub async fn logout(&self, session: &SessionToken) -> Result<(), Error> {
        let url = self.api_url("logout")?;

        debug!("logging out at {}", url);

        let body = json!({ "session": session.expose() });
        let _ = self.post::<serde_json::Value>(url, &body).await?;

        debug!("logout complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let token = SessionToken::new("abc123");
        assert_eq!(format!("{token:?}"), "SessionToken(<redacted>)");
        assert_eq!(token.expose(), "abc123");
    }
}
