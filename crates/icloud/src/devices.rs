use {
    findmy_skill::{AccountHandle, DeviceRecord, Error, Result},
    reqwest::{Client, header},
    secrecy::ExposeSecret,
    serde::Deserialize,
    tracing::debug,
};

use crate::service::Endpoints;

/// Subject shown on the device while the sound plays.
const SOUND_SUBJECT: &str = "Find My iPhone Alert";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    content: Vec<FmipDevice>,
}

#[derive(Debug, Deserialize)]
struct FmipDevice {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "deviceDisplayName")]
    device_display_name: Option<String>,
}

impl FmipDevice {
    /// "<model>: <name>", or the bare name when the model is unknown.
    fn label(&self) -> String {
        match self.device_display_name.as_deref().filter(|d| !d.is_empty()) {
            Some(model) => format!("{model}: {}", self.name),
            None => self.name.clone(),
        }
    }
}

/// List the account's devices in the order the service reports them.
pub async fn refresh_client(
    client: &Client,
    endpoints: &Endpoints,
    handle: &AccountHandle,
) -> Result<Vec<DeviceRecord>> {
    let body = serde_json::json!({
        "clientContext": {
            "fmly": true,
            "shouldLocate": false,
            "selectedDevice": "all",
        }
    });
    let resp: RefreshResponse = post(client, endpoints, handle, "refreshClient", &body)
        .await?
        .json()
        .await
        .map_err(|source| Error::external("device list response", source))?;

    debug!(device_count = resp.content.len(), "device list received");
    Ok(resp
        .content
        .iter()
        .map(|device| DeviceRecord::new(device.id.clone(), device.label()))
        .collect())
}

/// Ask one device to play its locating sound.
pub async fn play_sound(
    client: &Client,
    endpoints: &Endpoints,
    handle: &AccountHandle,
    device_id: &str,
) -> Result<()> {
    let body = serde_json::json!({
        "device": device_id,
        "subject": SOUND_SUBJECT,
        "clientContext": { "fmly": true },
    });
    post(client, endpoints, handle, "playSound", &body).await?;
    Ok(())
}

async fn post(
    client: &Client,
    endpoints: &Endpoints,
    handle: &AccountHandle,
    operation: &str,
    body: &serde_json::Value,
) -> Result<reqwest::Response> {
    let url = format!(
        "{}/fmipservice/client/web/{operation}",
        handle.service_url.trim_end_matches('/')
    );
    let mut query = endpoints.client_query().to_vec();
    query.push(("dsid", handle.account_id.as_str()));

    let resp = client
        .post(&url)
        .query(&query)
        .header(header::ORIGIN, &endpoints.home_url)
        .header(header::COOKIE, handle.token.expose_secret())
        .json(body)
        .send()
        .await
        .map_err(|source| Error::external(format!("{operation} request"), source))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::account_service(format!(
            "{operation} failed ({status}): {body}"
        )));
    }
    Ok(resp)
}
