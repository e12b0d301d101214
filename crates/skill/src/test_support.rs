//! In-memory account service used by the unit tests.

use std::sync::Mutex;

use {
    async_trait::async_trait,
    findmy_config::{AccountConfig, SkillConfig},
    secrecy::{ExposeSecret, Secret},
};

use crate::{
    account::{AccountHandle, AccountService},
    error::{Error, Result},
    session::DeviceRecord,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calls {
    pub authenticate: usize,
    pub enumerate: usize,
    pub sounds: Vec<String>,
}

pub struct RecordingAccountService {
    devices: Vec<DeviceRecord>,
    fail_login: bool,
    calls: Mutex<Calls>,
    last_login: Mutex<Option<(String, String)>>,
}

impl RecordingAccountService {
    pub fn with_devices(devices: &[(&str, &str)]) -> Self {
        Self {
            devices: devices
                .iter()
                .map(|(id, name)| DeviceRecord::new(*id, *name))
                .collect(),
            fail_login: false,
            calls: Mutex::new(Calls::default()),
            last_login: Mutex::new(None),
        }
    }

    pub fn failing_login() -> Self {
        Self {
            fail_login: true,
            ..Self::with_devices(&[])
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_login(&self) -> Option<(String, String)> {
        self.last_login
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AccountService for RecordingAccountService {
    async fn authenticate(&self, login: &str, password: &Secret<String>) -> Result<AccountHandle> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .authenticate += 1;
        *self.last_login.lock().unwrap_or_else(|e| e.into_inner()) =
            Some((login.to_string(), password.expose_secret().clone()));
        if self.fail_login {
            return Err(Error::account_service("login rejected (401)"));
        }
        Ok(AccountHandle {
            account_id: "dsid-1".into(),
            service_url: "https://fmip.example.com".into(),
            token: Secret::new("session=1".into()),
        })
    }

    async fn enumerate_devices(&self, _handle: &AccountHandle) -> Result<Vec<DeviceRecord>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).enumerate += 1;
        Ok(self.devices.clone())
    }

    async fn trigger_sound(&self, _handle: &AccountHandle, device_id: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sounds
            .push(device_id.to_string());
        Ok(())
    }
}

pub fn account_config() -> AccountConfig {
    AccountConfig {
        apple_id: "me@example.com".into(),
        password: Secret::new("pw".into()),
        ..Default::default()
    }
}

pub fn skill_config(default_target: Option<&str>) -> SkillConfig {
    SkillConfig {
        application_id: "amzn1.ask.skill.test".into(),
        default_target_device: default_target.map(str::to_string),
        account: account_config(),
        ..Default::default()
    }
}
