use std::time::Duration;

use {
    async_trait::async_trait,
    findmy_config::AccountConfig,
    findmy_skill::{AccountHandle, AccountService, DeviceRecord, Error, Result},
    reqwest::Client,
    secrecy::Secret,
    tracing::info,
};

use crate::{auth, devices};

/// Build number the web client reports; the service rejects requests
/// without one.
const CLIENT_BUILD_NUMBER: &str = "2021Project52";

/// Where the account service lives and how this client identifies itself.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub setup_url: String,
    pub home_url: String,
    pub client_id: String,
}

impl Endpoints {
    pub(crate) fn client_query(&self) -> [(&'static str, &str); 2] {
        [
            ("clientBuildNumber", CLIENT_BUILD_NUMBER),
            ("clientId", self.client_id.as_str()),
        ]
    }
}

/// iCloud Find My client.
pub struct ICloudService {
    http: Client,
    endpoints: Endpoints,
}

impl ICloudService {
    pub fn new(config: &AccountConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| Error::external("building HTTP client", source))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: &AccountConfig) -> Self {
        Self {
            http,
            endpoints: Endpoints {
                setup_url: config.setup_url.clone(),
                home_url: config.home_url.clone(),
                client_id: uuid::Uuid::new_v4().to_string().to_uppercase(),
            },
        }
    }
}

#[async_trait]
impl AccountService for ICloudService {
    async fn authenticate(&self, login: &str, password: &Secret<String>) -> Result<AccountHandle> {
        let handle = auth::login(&self.http, &self.endpoints, login, password).await?;
        info!(dsid = %handle.account_id, "account session established");
        Ok(handle)
    }

    async fn enumerate_devices(&self, handle: &AccountHandle) -> Result<Vec<DeviceRecord>> {
        devices::refresh_client(&self.http, &self.endpoints, handle).await
    }

    async fn trigger_sound(&self, handle: &AccountHandle, device_id: &str) -> Result<()> {
        devices::play_sound(&self.http, &self.endpoints, handle, device_id).await
    }
}
