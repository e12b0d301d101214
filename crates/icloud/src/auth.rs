use {
    findmy_skill::{AccountHandle, Error, Result},
    reqwest::{Client, header},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::service::Endpoints;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "dsInfo")]
    ds_info: DsInfo,
    webservices: WebServices,
}

#[derive(Debug, Deserialize)]
struct DsInfo {
    dsid: String,
}

#[derive(Debug, Deserialize)]
struct WebServices {
    findme: Option<WebService>,
}

#[derive(Debug, Deserialize)]
struct WebService {
    url: String,
}

/// Log in through the setup service and capture the session cookies and
/// the account's Find My service URL.
pub async fn login(
    client: &Client,
    endpoints: &Endpoints,
    apple_id: &str,
    password: &Secret<String>,
) -> Result<AccountHandle> {
    let url = format!("{}/login", endpoints.setup_url.trim_end_matches('/'));
    debug!(url = %url, "logging in to account service");

    let body = serde_json::json!({
        "apple_id": apple_id,
        "password": password.expose_secret(),
        "extended_login": false,
    });
    let resp = client
        .post(&url)
        .query(&endpoints.client_query())
        .header(header::ORIGIN, &endpoints.home_url)
        .header(header::REFERER, format!("{}/", endpoints.home_url))
        .json(&body)
        .send()
        .await
        .map_err(|source| Error::external("account login request", source))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::account_service(format!(
            "login failed ({status}): {body}"
        )));
    }

    let cookies = session_cookies(resp.headers());
    let body: LoginResponse = resp
        .json()
        .await
        .map_err(|source| Error::external("account login response", source))?;
    let findme = body
        .webservices
        .findme
        .ok_or_else(|| Error::account_service("account has no Find My service"))?;

    Ok(AccountHandle {
        account_id: body.ds_info.dsid,
        service_url: findme.url,
        token: Secret::new(cookies),
    })
}

/// Fold `Set-Cookie` headers into a single `Cookie` header value.
fn session_cookies(headers: &header::HeaderMap) -> String {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
