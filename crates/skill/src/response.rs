use serde::{Deserialize, Serialize};

use crate::{
    dispatch::TurnOutcome,
    session::{DeviceList, SessionAttributes},
};

pub const RESPONSE_VERSION: &str = "1.0";

pub const HELP_TEXT: &str = "I will find your Apple device. Say 'List devices'.";
pub const NO_DEVICE_TEXT: &str = "No device on your account.";
pub const FAREWELL_TEXT: &str = "Have a nice day!";

/// Reply envelope returned to the voice platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: SessionAttributes,
    pub response: SpeechletResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    pub output_speech: OutputSpeech,
    pub card: Card,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl OutputSpeech {
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
        }
    }
}

impl ResponseEnvelope {
    pub fn speech(&self) -> &str {
        self.response.output_speech.text()
    }
}

/// Spoken list: each device with the number that selects it.
pub fn selection_prompt(devices: &DeviceList) -> String {
    let mut prompt = String::from("Tell me which device you want to find");
    for (index, device) in devices.iter().enumerate() {
        prompt.push_str(&format!(", {} is Number {index}", device.name));
    }
    prompt.push('.');
    prompt
}

/// Render a turn's outcome. Non-terminal outcomes repeat their prompt as the
/// reprompt; terminal ones carry none.
pub fn render(outcome: &TurnOutcome, attributes: SessionAttributes) -> ResponseEnvelope {
    let (title, speech) = match outcome {
        TurnOutcome::AwaitingSelection(devices) => {
            ("Select your device", selection_prompt(devices))
        },
        TurnOutcome::DeviceFound(device) => ("Done", format!("{} will sound soon.", device.name)),
        TurnOutcome::NoDevice => ("Done", NO_DEVICE_TEXT.to_string()),
        TurnOutcome::Help => ("Help", HELP_TEXT.to_string()),
        TurnOutcome::SessionEnded => ("Session Ended", FAREWELL_TEXT.to_string()),
    };
    let should_end_session = outcome.ends_session();

    ResponseEnvelope {
        version: RESPONSE_VERSION.into(),
        session_attributes: attributes,
        response: SpeechletResponse {
            output_speech: OutputSpeech::PlainText {
                text: speech.clone(),
            },
            card: Card::Simple {
                title: title.into(),
                content: speech.clone(),
            },
            reprompt: (!should_end_session).then(|| Reprompt {
                output_speech: OutputSpeech::PlainText { text: speech },
            }),
            should_end_session,
        },
    }
}
