// Web endpoint camera listing

use tracing::debug;

use crate::auth::SessionToken;
use crate::client::WebClient;
use crate::error::Error;
use crate::models::{Camera, CameraList};

impl WebClient {
    /// List every camera attached to the NVR, with its connection state.
    ///
    /// `GET /mt/api/rest/v1/cameras?session={token}`
    pub async fn list_cameras(&self, session: &SessionToken) -> Result<Vec<Camera>, Error> {
        let mut url = self.api_url("cameras")?;
        url.query_pairs_mut().append_pair("session", session.expose());

        debug!("listing cameras");
        let list: CameraList = self.get(url).await?;
        Ok(list.cameras)
    }
}
