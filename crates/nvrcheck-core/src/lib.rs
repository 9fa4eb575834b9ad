//! Provisioning-check workflow between an NVR SDK binding and the CLI.
//!
//! This crate owns the domain model and the single linear workflow of
//! `nvrcheck`:
//!
//! - **[`Runner`]**: drives connect → await session → login → poll devices
//!   → write snapshot, and always tears the SDK down afterwards.
//!
//! - **SDK seam** ([`sdk`]): [`Sdk`], [`ControlCenter`] and [`NvrSession`]
//!   describe what the workflow needs from a vendor binding. [`WebSdk`] is the
//!   bundled binding over the NVR's HTTP web endpoint.
//!
//! - **[`poll_until`]**: the single cancellable bounded-wait primitive. Both the
//!   session wait and the device poll go through it.
//!
//! - **[`snapshot`]**: file naming, XML rendering, and write-once persistence.

pub mod config;
pub mod error;
pub mod model;
pub mod runner;
pub mod sdk;
pub mod snapshot;
pub mod wait;
pub mod web;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{RunSettings, TlsVerification, WebSdkConfig};
pub use error::CoreError;
pub use model::{ConnectionTarget, Device, Entity, LogicalId};
pub use runner::{Outcome, RegistrationHook, RunReport, Runner};
pub use sdk::{ControlCenter, InitParams, LoginResult, NvrSession, Sdk, SdkVersion};
pub use snapshot::WriteOutcome;
pub use wait::{PollPolicy, WaitOutcome, poll_until};
pub use web::{WebControlCenter, WebNvr, WebSdk};
