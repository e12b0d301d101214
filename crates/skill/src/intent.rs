use crate::{
    envelope::RawIntent,
    error::{Error, Result},
};

/// Slot carrying the spoken device number.
pub const TARGET_DEVICE_NUMBER_SLOT: &str = "TargetDeviceNumber";

/// The skill's closed interaction model. Names outside it are rejected when
/// the inbound intent is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// "Find number N". `selection` is `None` when the slot is missing or
    /// does not hold a non-negative integer.
    TargetDeviceIs { selection: Option<usize> },
    ListMyDevices,
    Help,
    Cancel,
    Stop,
}

impl Intent {
    pub const TARGET_DEVICE_IS: &'static str = "TargetDeviceIsIntent";
    pub const LIST_MY_DEVICES: &'static str = "ListMyDevicesIntent";
    pub const HELP: &'static str = "AMAZON.HelpIntent";
    pub const CANCEL: &'static str = "AMAZON.CancelIntent";
    pub const STOP: &'static str = "AMAZON.StopIntent";

    pub fn parse(raw: &RawIntent) -> Result<Self> {
        match raw.name.as_str() {
            Self::TARGET_DEVICE_IS => Ok(Self::TargetDeviceIs {
                selection: raw
                    .slot_value(TARGET_DEVICE_NUMBER_SLOT)
                    .and_then(parse_device_index),
            }),
            Self::LIST_MY_DEVICES => Ok(Self::ListMyDevices),
            Self::HELP => Ok(Self::Help),
            Self::CANCEL => Ok(Self::Cancel),
            Self::STOP => Ok(Self::Stop),
            other => Err(Error::UnrecognizedIntent { name: other.into() }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TargetDeviceIs { .. } => Self::TARGET_DEVICE_IS,
            Self::ListMyDevices => Self::LIST_MY_DEVICES,
            Self::Help => Self::HELP,
            Self::Cancel => Self::CANCEL,
            Self::Stop => Self::STOP,
        }
    }
}

/// Spoken number to list index. Negative, fractional and non-numeric values
/// are "no selection", not errors.
pub fn parse_device_index(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
