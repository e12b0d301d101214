use {
    serde::{Deserialize, Serialize},
    tracing::warn,
};

/// Opaque, host-persisted session attributes echoed back on the next turn.
pub type SessionAttributes = serde_json::Map<String, serde_json::Value>;

/// Attribute key holding the resolved device list.
pub const DEVICES_ATTRIBUTE: &str = "devices";

/// A device on the account. Stored in session attributes as an
/// `[id, name]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct DeviceRecord {
    /// Stable handle for remote actions.
    pub id: String,
    /// Presentation name. Not guaranteed unique.
    pub name: String,
}

impl DeviceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<(String, String)> for DeviceRecord {
    fn from((id, name): (String, String)) -> Self {
        Self { id, name }
    }
}

impl From<DeviceRecord> for (String, String) {
    fn from(record: DeviceRecord) -> Self {
        (record.id, record.name)
    }
}

/// Non-empty device list in presentation order. Position in the list is the
/// number the user speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::len_without_is_empty)]
pub struct DeviceList(Vec<DeviceRecord>);

impl DeviceList {
    /// `None` for an empty list: an empty account is a terminal outcome, not
    /// a list.
    pub fn new(devices: Vec<DeviceRecord>) -> Option<Self> {
        if devices.is_empty() {
            None
        } else {
            Some(Self(devices))
        }
    }

    pub fn get(&self, index: usize) -> Option<&DeviceRecord> {
        self.0.get(index)
    }

    /// First device whose display name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&DeviceRecord> {
        self.0.iter().find(|device| device.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Session attributes carrying this list for the following turns.
    pub fn to_attributes(&self) -> SessionAttributes {
        let mut attributes = SessionAttributes::new();
        attributes.insert(
            DEVICES_ATTRIBUTE.into(),
            serde_json::Value::Array(
                self.0
                    .iter()
                    .map(|d| serde_json::json!([d.id, d.name]))
                    .collect(),
            ),
        );
        attributes
    }
}

/// Whether the session already holds a device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceDirectory {
    Unresolved,
    Resolved(DeviceList),
}

impl DeviceDirectory {
    /// Read the `devices` attribute. Absent, empty, or malformed lists all
    /// mean the directory has to be fetched again.
    pub fn from_attributes(attributes: Option<&SessionAttributes>) -> Self {
        let Some(raw) = attributes.and_then(|a| a.get(DEVICES_ATTRIBUTE)) else {
            return Self::Unresolved;
        };
        match serde_json::from_value::<Vec<DeviceRecord>>(raw.clone()) {
            Ok(devices) => DeviceList::new(devices).map_or(Self::Unresolved, Self::Resolved),
            Err(e) => {
                warn!(error = %e, "ignoring malformed devices session attribute");
                Self::Unresolved
            },
        }
    }
}
