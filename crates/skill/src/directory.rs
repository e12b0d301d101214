use tracing::{debug, info};

use crate::{
    account::AccountLink,
    error::Result,
    session::{DeviceDirectory, DeviceList},
};

/// Result of resolving the caller's devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Devices(DeviceList),
    /// The account has no devices; the turn ends here.
    NoDevice,
}

/// Reuse the session's device list when it has one, otherwise fetch it from
/// the account service. Does not write the session; the caller persists the
/// list through the turn's attributes.
pub async fn resolve(directory: DeviceDirectory, link: &AccountLink<'_>) -> Result<Resolution> {
    match directory {
        DeviceDirectory::Resolved(devices) => {
            debug!(device_count = devices.len(), "using devices from session");
            Ok(Resolution::Devices(devices))
        },
        DeviceDirectory::Unresolved => {
            let devices = link.enumerate_devices().await?;
            info!(device_count = devices.len(), "fetched devices from account");
            Ok(DeviceList::new(devices).map_or(Resolution::NoDevice, Resolution::Devices))
        },
    }
}
