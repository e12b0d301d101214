//! iCloud account client for the find-my-device skill.
//!
//! Logs in through the setup service, then lists devices and plays sounds
//! through the account's Find My web service.

pub mod auth;
pub mod devices;
pub mod service;

pub use service::{Endpoints, ICloudService};
