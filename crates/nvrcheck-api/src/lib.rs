// nvrcheck-api: Async Rust client for the NVR web endpoint

pub mod auth;
pub mod cameras;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::SessionToken;
pub use client::WebClient;
pub use error::Error;
pub use models::{Camera, CameraEntity};
pub use transport::{TlsMode, TransportConfig};
