use std::sync::Arc;

use {
    findmy_config::SkillConfig,
    tracing::{info, warn},
};

use crate::{
    account::{AccountLink, AccountService},
    dispatch::Dispatcher,
    envelope::{SkillEvent, SkillRequest},
    error::{Error, Result},
    intent::Intent,
    response::{ResponseEnvelope, render},
};

const APPLICATION_ID_POINTER: &str = "/session/application/applicationId";

/// Entry point for inbound turns. Holds only immutable configuration and the
/// account service, so one handler serves every session.
#[derive(Clone)]
pub struct SkillHandler {
    config: Arc<SkillConfig>,
    service: Arc<dyn AccountService>,
}

impl SkillHandler {
    pub fn new(config: Arc<SkillConfig>, service: Arc<dyn AccountService>) -> Self {
        Self { config, service }
    }

    /// Parse and handle a raw JSON envelope. The declared application id is
    /// checked before the rest of the envelope is interpreted.
    pub async fn handle_value(&self, payload: serde_json::Value) -> Result<ResponseEnvelope> {
        let application_id = payload
            .pointer(APPLICATION_ID_POINTER)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::invalid_input("missing session.application.applicationId"))?;
        self.verify_application(application_id)?;

        let event: SkillEvent = serde_json::from_value(payload)?;
        self.run_turn(event).await
    }

    pub async fn handle_event(&self, event: SkillEvent) -> Result<ResponseEnvelope> {
        self.verify_application(event.application_id())?;
        self.run_turn(event).await
    }

    async fn run_turn(&self, event: SkillEvent) -> Result<ResponseEnvelope> {
        let request_id = event.request.request_id();
        let session_id = event.session_id();
        if event.session.is_new {
            info!(
                request_id,
                session_id,
                user_id = event.user_id().unwrap_or_default(),
                version = event.version.as_deref().unwrap_or_default(),
                "session started"
            );
        }

        let attributes = event.session.attributes.as_ref();
        let dispatcher = Dispatcher::new(
            AccountLink::new(self.service.as_ref(), &self.config.account),
            self.config.default_target(),
        );

        let request_type = event.request.kind();
        let turn = match &event.request {
            SkillRequest::LaunchRequest { .. } => {
                info!(request_id, session_id, request_type, "launch");
                dispatcher.dispatch(None, attributes).await?
            },
            SkillRequest::IntentRequest { intent, .. } => {
                info!(request_id, session_id, request_type, intent = %intent.name, "intent");
                let intent = Intent::parse(intent)?;
                dispatcher.dispatch(Some(&intent), attributes).await?
            },
            SkillRequest::SessionEndedRequest { reason, .. } => {
                info!(request_id, session_id, request_type, reason = ?reason, "session ended");
                Dispatcher::end_session()
            },
        };

        Ok(render(&turn.outcome, turn.attributes))
    }

    fn verify_application(&self, application_id: &str) -> Result<()> {
        info!(application_id, "skill event");
        if application_id != self.config.application_id {
            warn!(application_id, "rejecting request for another application");
            return Err(Error::InvalidApplication {
                application_id: application_id.to_string(),
            });
        }
        Ok(())
    }
}
