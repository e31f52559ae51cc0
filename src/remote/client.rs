use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::{ConnectionSettings, Credentials};
use crate::error::{RemoteError, SweepError};
use crate::remote::{ItemsPage, RemoteItem, RemoteUser, Session, SessionProvider};
use crate::types::ItemKind;

const CLIENT_NAME: &str = "mediasweep";
const MAX_ERROR_BODY: usize = 200;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthResponse {
    access_token: String,
}

/// Authenticates against a Jellyfin-compatible server over HTTP.
#[derive(Debug, Default, Clone)]
pub struct JellyfinProvider;

impl JellyfinProvider {
    pub fn new() -> Self { Self }
}

#[async_trait]
impl SessionProvider for JellyfinProvider {
    async fn authenticate(&self, settings: &ConnectionSettings) -> Result<Box<dyn Session>, SweepError> {
        let auth_err = |source: RemoteError| SweepError::Authentication {
            endpoint: settings.endpoint.to_string(),
            source,
        };

        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| auth_err(e.into()))?;
        let device = Device::new(&settings.username);
        let mut session = JellyfinSession {
            http,
            base: settings.endpoint.clone(),
            auth_header: auth_header(&device, None),
        };

        match &settings.credentials {
            Credentials::Password(password) => {
                let body = serde_json::json!({ "Username": settings.username, "Pw": password });
                let resp = session
                    .request(Method::POST, &["Users", "AuthenticateByName"])
                    .map_err(auth_err)?
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| auth_err(e.into()))?;
                let auth: AuthResponse = decode(check(resp).await.map_err(auth_err)?).await.map_err(auth_err)?;
                session.auth_header = auth_header(&device, Some(&auth.access_token));
            }
            Credentials::ApiKey(key) => {
                session.auth_header = auth_header(&device, Some(key));
                let resp = session
                    .request(Method::GET, &["System", "Info"])
                    .map_err(auth_err)?
                    .send()
                    .await
                    .map_err(|e| auth_err(e.into()))?;
                check(resp).await.map_err(auth_err)?;
            }
        }

        tracing::debug!(endpoint = %settings.endpoint, "authenticated");
        Ok(Box::new(session))
    }
}

pub struct JellyfinSession {
    http: Client,
    base: Url,
    auth_header: String,
}

impl JellyfinSession {
    fn url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Decode(format!("endpoint cannot be a base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RemoteError> {
        let url = self.url(segments)?;
        tracing::debug!(%method, %url, "remote call");
        Ok(self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .header(reqwest::header::ACCEPT, "application/json"))
    }
}

#[async_trait]
impl Session for JellyfinSession {
    async fn list_users(&self) -> Result<Vec<RemoteUser>, RemoteError> {
        let resp = self.request(Method::GET, &["Users"])?.send().await?;
        decode(check(resp).await?).await
    }

    async fn query_watched_items(
        &self,
        user_id: &str,
        kinds: &BTreeSet<ItemKind>,
    ) -> Result<Vec<RemoteItem>, RemoteError> {
        let kinds = kinds.iter().map(ItemKind::as_str).collect::<Vec<_>>().join(",");
        let resp = self
            .request(Method::GET, &["Users", user_id, "Items"])?
            .query(&[
                ("Recursive", "true"),
                ("IsPlayed", "true"),
                ("IncludeItemTypes", kinds.as_str()),
                ("SortBy", "DatePlayed"),
                ("SortOrder", "Ascending"),
                ("Fields", "CanDelete,ProductionYear"),
            ])
            .send()
            .await?;
        let page: ItemsPage = decode(check(resp).await?).await?;
        tracing::debug!(count = page.items.len(), total = ?page.total_record_count, "watched items fetched");
        Ok(page.items)
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), RemoteError> {
        let resp = self.request(Method::DELETE, &["Items", item_id])?.send().await?;
        check(resp).await?;
        Ok(())
    }
}

async fn check(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let body = body.trim();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unexpected status").to_string()
    } else {
        body.chars().take(MAX_ERROR_BODY).collect()
    };
    Err(RemoteError::Status { status: status.as_u16(), message })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, RemoteError> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// How this client identifies itself to the server.
struct Device {
    name: String,
    id: String,
}

impl Device {
    fn new(username: &str) -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        Self::named(&host, username)
    }

    fn named(host: &str, username: &str) -> Self {
        let name = header_safe(host);
        Self {
            name: if name.is_empty() { "unknown".to_string() } else { name },
            id: format!("{}-{}", CLIENT_NAME, header_safe(username)),
        }
    }
}

fn header_safe(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')).collect()
}

fn auth_header(device: &Device, token: Option<&str>) -> String {
    let mut header = format!(
        "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
        CLIENT_NAME,
        device.name,
        device.id,
        env!("CARGO_PKG_VERSION")
    );
    if let Some(token) = token {
        header.push_str(&format!(", Token=\"{}\"", token));
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(base: &str) -> JellyfinSession {
        JellyfinSession { http: Client::new(), base: Url::parse(base).unwrap(), auth_header: String::new() }
    }

    #[test]
    fn joins_paths_under_a_prefix() {
        let s = session("http://host:8096/jellyfin/");
        assert_eq!(s.url(&["Items", "abc"]).unwrap().as_str(), "http://host:8096/jellyfin/Items/abc");
        let s = session("http://host:8096");
        assert_eq!(s.url(&["Users"]).unwrap().as_str(), "http://host:8096/Users");
    }

    #[test]
    fn escapes_item_ids() {
        let s = session("http://host");
        assert_eq!(s.url(&["Items", "a/b c"]).unwrap().as_str(), "http://host/Items/a%2Fb%20c");
    }

    #[test]
    fn auth_header_carries_host_and_token() {
        let device = Device::named("media-box.lan", "admin");
        let h = auth_header(&device, Some("tok"));
        assert!(h.starts_with("MediaBrowser Client=\"mediasweep\", Device=\"media-box.lan\", DeviceId=\"mediasweep-admin\""));
        assert!(h.ends_with(", Token=\"tok\""));
        assert!(!auth_header(&device, None).contains("Token"));
    }

    #[test]
    fn device_fields_strip_quotes() {
        let device = Device::named("bad\"host", "we\"ird name");
        assert_eq!(device.name, "badhost");
        assert_eq!(device.id, "mediasweep-weirdname");
        assert_eq!(Device::named("\"\"", "x").name, "unknown");
    }
}
