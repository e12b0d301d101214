use std::collections::HashMap;

use serde::Deserialize;

use crate::session::SessionAttributes;

/// Inbound turn as delivered by the voice platform.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillEvent {
    #[serde(default)]
    pub version: Option<String>,
    pub session: SkillSession,
    pub request: SkillRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillSession {
    #[serde(rename = "new", default)]
    pub is_new: bool,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub application: SkillApplication,
    #[serde(default)]
    pub attributes: Option<SessionAttributes>,
    #[serde(default)]
    pub user: Option<SkillUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillApplication {
    #[serde(rename = "applicationId")]
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillUser {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Request body, discriminated by its `type` field. Any other request type
/// fails to parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SkillRequest {
    LaunchRequest {
        #[serde(rename = "requestId")]
        request_id: String,
    },
    IntentRequest {
        #[serde(rename = "requestId")]
        request_id: String,
        intent: RawIntent,
    },
    SessionEndedRequest {
        #[serde(rename = "requestId")]
        request_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIntent {
    pub name: String,
    #[serde(default)]
    pub slots: Option<HashMap<String, RawSlot>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSlot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl SkillEvent {
    pub fn application_id(&self) -> &str {
        &self.session.application.application_id
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.user.as_ref()?.user_id.as_deref()
    }
}

impl SkillRequest {
    pub fn request_id(&self) -> &str {
        match self {
            Self::LaunchRequest { request_id }
            | Self::IntentRequest { request_id, .. }
            | Self::SessionEndedRequest { request_id, .. } => request_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::LaunchRequest { .. } => "LaunchRequest",
            Self::IntentRequest { .. } => "IntentRequest",
            Self::SessionEndedRequest { .. } => "SessionEndedRequest",
        }
    }
}

impl RawIntent {
    /// Value of a slot, if the slot was sent and filled.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.as_ref()?.get(name)?.value.as_deref()
    }
}
