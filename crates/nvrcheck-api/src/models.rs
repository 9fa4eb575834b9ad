// Web endpoint wire models
//
// Every response is wrapped in `{ status, result, code?, message? }`.
// The payload types below are the `result` shapes for each endpoint.

use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// `"success"` or `"error"`.
    pub status: String,
    pub result: Option<T>,
    /// Machine-readable error code on `"error"` responses.
    pub code: Option<String>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// `result` of `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub session: String,
}

/// `result` of `GET /cameras`.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraList {
    #[serde(default)]
    pub cameras: Vec<Camera>,
}

/// A camera (device) as reported by the NVR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub connected: bool,
    /// Sub-entities of the device; the first one carries the logical id.
    #[serde(default)]
    pub entities: Vec<CameraEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraEntity {
    pub logical_id: Option<u32>,
}
