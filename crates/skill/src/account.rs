use {
    async_trait::async_trait,
    findmy_config::AccountConfig,
    secrecy::Secret,
    tokio::sync::OnceCell,
    tracing::debug,
};

use crate::{error::Result, session::DeviceRecord};

/// Authenticated session with the remote account service.
#[derive(Clone)]
pub struct AccountHandle {
    /// Account identifier assigned by the service (e.g. the iCloud `dsid`).
    pub account_id: String,
    /// Base URL of the device-location service for this account.
    pub service_url: String,
    /// Session credential replayed on every follow-up call.
    pub token: Secret<String>,
}

impl std::fmt::Debug for AccountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountHandle")
            .field("account_id", &self.account_id)
            .field("service_url", &self.service_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Remote account/device service the skill drives.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn authenticate(&self, login: &str, password: &Secret<String>) -> Result<AccountHandle>;

    /// Devices in the service's native enumeration order.
    async fn enumerate_devices(&self, handle: &AccountHandle) -> Result<Vec<DeviceRecord>>;

    /// Ask the device to play its locating sound.
    async fn trigger_sound(&self, handle: &AccountHandle, device_id: &str) -> Result<()>;
}

/// Per-turn connection to the account. Logs in lazily, at most once, and
/// only when the turn actually needs the service.
pub struct AccountLink<'a> {
    service: &'a dyn AccountService,
    account: &'a AccountConfig,
    handle: OnceCell<AccountHandle>,
}

impl<'a> AccountLink<'a> {
    pub fn new(service: &'a dyn AccountService, account: &'a AccountConfig) -> Self {
        Self {
            service,
            account,
            handle: OnceCell::new(),
        }
    }

    async fn handle(&self) -> Result<&AccountHandle> {
        self.handle
            .get_or_try_init(|| async {
                debug!(login = %self.account.apple_id, "authenticating to account service");
                self.service
                    .authenticate(&self.account.apple_id, &self.account.password)
                    .await
            })
            .await
    }

    pub async fn enumerate_devices(&self) -> Result<Vec<DeviceRecord>> {
        let handle = self.handle().await?;
        self.service.enumerate_devices(handle).await
    }

    pub async fn trigger_sound(&self, device: &DeviceRecord) -> Result<()> {
        let handle = self.handle().await?;
        self.service.trigger_sound(handle, &device.id).await
    }
}
