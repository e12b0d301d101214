//! Device selection state machine.
//!
//! A conversation moves between these states across turns, with the device
//! list carried in session attributes:
//!
//! - `AwaitingSelection`: the numbered list was spoken, the session stays
//!   open and the next turn may pick a number.
//! - `DeviceFound`: a device was picked and told to sound; the session ends.
//! - `NoDevice`: the account has nothing to ring; the session ends.
//! - idle (help, or before launch): attributes untouched.

use tracing::info;

use crate::{
    account::AccountLink,
    directory::{Resolution, resolve},
    error::Result,
    intent::Intent,
    session::{DeviceDirectory, DeviceList, DeviceRecord, SessionAttributes},
};

/// What the turn decided, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Prompt with the numbered device list.
    AwaitingSelection(DeviceList),
    /// The device was told to play its sound.
    DeviceFound(DeviceRecord),
    NoDevice,
    Help,
    SessionEnded,
}

impl TurnOutcome {
    /// Terminal outcomes end the session.
    pub fn ends_session(&self) -> bool {
        !matches!(self, Self::AwaitingSelection(_) | Self::Help)
    }
}

/// Outcome plus the attributes the host should hand back next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub attributes: SessionAttributes,
    pub outcome: TurnOutcome,
}

impl Turn {
    fn terminal(outcome: TurnOutcome) -> Self {
        Self {
            attributes: SessionAttributes::new(),
            outcome,
        }
    }

    fn awaiting_selection(devices: DeviceList) -> Self {
        Self {
            attributes: devices.to_attributes(),
            outcome: TurnOutcome::AwaitingSelection(devices),
        }
    }
}

/// How the target device is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection<'a> {
    /// Launch shortcut: exact display-name match.
    ByName(&'a str),
    /// Spoken number, not yet bounds-checked.
    ByIndex(Option<usize>),
}

pub struct Dispatcher<'a> {
    link: AccountLink<'a>,
    default_target: Option<&'a str>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(link: AccountLink<'a>, default_target: Option<&'a str>) -> Self {
        Self {
            link,
            default_target,
        }
    }

    /// Run one turn. `None` is a launch without an intent.
    pub async fn dispatch(
        &self,
        intent: Option<&Intent>,
        attributes: Option<&SessionAttributes>,
    ) -> Result<Turn> {
        match intent {
            None => match self.default_target {
                Some(name) => self.play(Selection::ByName(name), attributes).await,
                None => self.select(attributes).await,
            },
            Some(Intent::TargetDeviceIs { selection }) => {
                self.play(Selection::ByIndex(*selection), attributes).await
            },
            Some(Intent::ListMyDevices) => self.select(attributes).await,
            Some(Intent::Help) => Ok(Self::help(attributes)),
            Some(Intent::Cancel | Intent::Stop) => Ok(Self::end_session()),
        }
    }

    /// Terminal farewell: clears attributes, touches nothing remote.
    pub fn end_session() -> Turn {
        Turn::terminal(TurnOutcome::SessionEnded)
    }

    fn help(attributes: Option<&SessionAttributes>) -> Turn {
        Turn {
            attributes: attributes.cloned().unwrap_or_default(),
            outcome: TurnOutcome::Help,
        }
    }

    async fn select(&self, attributes: Option<&SessionAttributes>) -> Result<Turn> {
        match self.devices(attributes).await? {
            Resolution::NoDevice => Ok(Turn::terminal(TurnOutcome::NoDevice)),
            Resolution::Devices(devices) => Ok(Turn::awaiting_selection(devices)),
        }
    }

    async fn play(
        &self,
        selection: Selection<'_>,
        attributes: Option<&SessionAttributes>,
    ) -> Result<Turn> {
        let devices = match self.devices(attributes).await? {
            Resolution::NoDevice => return Ok(Turn::terminal(TurnOutcome::NoDevice)),
            Resolution::Devices(devices) => devices,
        };

        let target = match selection {
            Selection::ByName(name) => devices.find_by_name(name),
            Selection::ByIndex(index) => index.and_then(|i| devices.get(i)),
        };
        let Some(target) = target.cloned() else {
            info!(?selection, device_count = devices.len(), "no device selected, prompting");
            return Ok(Turn::awaiting_selection(devices));
        };

        self.link.trigger_sound(&target).await?;
        info!(device_id = %target.id, device = %target.name, "device sound triggered");
        Ok(Turn::terminal(TurnOutcome::DeviceFound(target)))
    }

    async fn devices(&self, attributes: Option<&SessionAttributes>) -> Result<Resolution> {
        resolve(DeviceDirectory::from_attributes(attributes), &self.link).await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use {
        super::*,
        crate::{
            session::DEVICES_ATTRIBUTE,
            test_support::{RecordingAccountService, account_config},
        },
    };

    const TWO: &[(&str, &str)] = &[("id-phone", "iPhone"), ("id-watch", "Watch")];

    fn cached(devices: &[(&str, &str)]) -> SessionAttributes {
        DeviceList::new(
            devices
                .iter()
                .map(|(id, name)| DeviceRecord::new(*id, *name))
                .collect(),
        )
        .unwrap()
        .to_attributes()
    }

    async fn run(
        service: &RecordingAccountService,
        default_target: Option<&str>,
        intent: Option<Intent>,
        attributes: Option<&SessionAttributes>,
    ) -> Turn {
        let account = account_config();
        let dispatcher = Dispatcher::new(AccountLink::new(service, &account), default_target);
        dispatcher.dispatch(intent.as_ref(), attributes).await.unwrap()
    }

    #[tokio::test]
    async fn launch_without_default_prompts_and_stores_devices() {
        let service = RecordingAccountService::with_devices(TWO);
        let turn = run(&service, None, None, None).await;

        let TurnOutcome::AwaitingSelection(devices) = &turn.outcome else {
            panic!("expected selection prompt, got {:?}", turn.outcome);
        };
        assert_eq!(devices.len(), 2);
        assert_eq!(turn.attributes, cached(TWO));
        assert!(!turn.outcome.ends_session());
        assert!(service.calls().sounds.is_empty());
    }

    #[tokio::test]
    async fn launch_with_matching_default_rings_it() {
        let service = RecordingAccountService::with_devices(TWO);
        let turn = run(&service, Some("Watch"), None, None).await;

        assert_eq!(
            turn.outcome,
            TurnOutcome::DeviceFound(DeviceRecord::new("id-watch", "Watch"))
        );
        assert!(turn.attributes.is_empty());
        assert_eq!(service.calls().sounds, vec!["id-watch".to_string()]);
        assert_eq!(service.calls().authenticate, 1);
    }

    #[tokio::test]
    async fn launch_with_unmatched_default_prompts() {
        let service = RecordingAccountService::with_devices(TWO);
        let turn = run(&service, Some("iPad"), None, None).await;

        assert!(matches!(turn.outcome, TurnOutcome::AwaitingSelection(_)));
        assert!(service.calls().sounds.is_empty());
    }

    #[tokio::test]
    async fn valid_number_rings_cached_device() {
        let service = RecordingAccountService::with_devices(&[("other", "Other")]);
        let attributes = cached(TWO);
        let turn = run(
            &service,
            None,
            Some(Intent::TargetDeviceIs { selection: Some(1) }),
            Some(&attributes),
        )
        .await;

        assert_eq!(
            turn.outcome,
            TurnOutcome::DeviceFound(DeviceRecord::new("id-watch", "Watch"))
        );
        assert!(turn.attributes.is_empty());
        assert!(turn.outcome.ends_session());
        let calls = service.calls();
        assert_eq!(calls.enumerate, 0);
        assert_eq!(calls.sounds, vec!["id-watch".to_string()]);
    }

    #[rstest]
    #[case(Some(2))]
    #[case(Some(99))]
    #[case(Some(usize::MAX))]
    #[case(None)]
    #[tokio::test]
    async fn invalid_number_reprompts(#[case] selection: Option<usize>) {
        let service = RecordingAccountService::with_devices(TWO);
        let attributes = cached(TWO);
        let turn = run(
            &service,
            None,
            Some(Intent::TargetDeviceIs { selection }),
            Some(&attributes),
        )
        .await;

        let TurnOutcome::AwaitingSelection(devices) = &turn.outcome else {
            panic!("expected selection prompt, got {:?}", turn.outcome);
        };
        assert_eq!(devices.to_attributes(), attributes);
        assert_eq!(turn.attributes, attributes);
        assert!(service.calls().sounds.is_empty());
    }

    #[tokio::test]
    async fn listing_twice_is_stable() {
        let service = RecordingAccountService::with_devices(TWO);
        let first = run(&service, None, Some(Intent::ListMyDevices), None).await;
        let second = run(
            &service,
            None,
            Some(Intent::ListMyDevices),
            Some(&first.attributes),
        )
        .await;

        assert_eq!(first, second);
        assert_eq!(service.calls().enumerate, 1);
    }

    #[tokio::test]
    async fn empty_account_ends_without_sound() {
        let service = RecordingAccountService::with_devices(&[]);
        for intent in [
            None,
            Some(Intent::ListMyDevices),
            Some(Intent::TargetDeviceIs { selection: Some(0) }),
        ] {
            let turn = run(&service, None, intent, None).await;
            assert_eq!(turn.outcome, TurnOutcome::NoDevice);
            assert!(turn.attributes.is_empty());
        }
        assert!(service.calls().sounds.is_empty());
    }

    #[tokio::test]
    async fn help_preserves_attributes_without_remote_calls() {
        let service = RecordingAccountService::with_devices(TWO);
        let mut attributes = cached(TWO);
        attributes.insert("extra".into(), serde_json::json!(true));

        let turn = run(&service, None, Some(Intent::Help), Some(&attributes)).await;

        assert_eq!(turn.outcome, TurnOutcome::Help);
        assert_eq!(turn.attributes, attributes);
        assert!(turn.attributes.contains_key(DEVICES_ATTRIBUTE));
        assert!(!turn.outcome.ends_session());
        assert_eq!(service.calls(), Default::default());
    }

    #[rstest]
    #[case(Intent::Cancel)]
    #[case(Intent::Stop)]
    #[tokio::test]
    async fn cancel_and_stop_end_the_session(#[case] intent: Intent) {
        let service = RecordingAccountService::with_devices(TWO);
        let attributes = cached(TWO);
        let turn = run(&service, None, Some(intent), Some(&attributes)).await;

        assert_eq!(turn.outcome, TurnOutcome::SessionEnded);
        assert!(turn.attributes.is_empty());
        assert_eq!(service.calls(), Default::default());
    }
}
