use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{catalog::CatalogUser, track::TrackRecord};
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{ApiUser, TrackPage};
use crate::{
    error::{ArchiveError, Result},
    traits::CatalogSource,
};

const DEFAULT_BASE_URL: &str = "https://api-v2.soundcloud.com/";
const PROFILE_BASE_URL: &str = "https://soundcloud.com/";
/// Any public profile works for validating a client id.
const PROBE_PROFILE: &str = "soundcloud";
const PAGE_SIZE: &str = "200";
const MAX_PAGES: usize = 100;

/// Read a client id saved by the token grabber. Blank files count as missing.
pub fn read_client_id(path: &Path) -> Result<String> {
    let client_id = std::fs::read_to_string(path)?.trim().to_string();
    if client_id.is_empty() {
        return Err(ArchiveError::NotConfigured);
    }
    Ok(client_id)
}

#[derive(Debug, Clone)]
pub struct SoundCloudClient {
    base_url: Url,
    client_id: String,
    client: Client,
}

#[derive(Default)]
pub struct SoundCloudClientBuilder {
    base_url: Option<String>,
    client_id: Option<String>,
}

impl SoundCloudClientBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn client_id(mut self, client_id: &str) -> Self {
        self.client_id = Some(client_id.trim().to_string());
        self
    }

    pub fn build(self) -> Result<SoundCloudClient> {
        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or(ArchiveError::NotConfigured)?;
        let base = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        // Url::join drops the last path segment unless the base ends with '/'
        let base_url = Url::parse(&format!("{}/", base.trim_end_matches('/')))?;

        Ok(SoundCloudClient {
            base_url,
            client_id,
            client: Client::new(),
        })
    }
}

impl SoundCloudClient {
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(self.with_client_id(url))
    }

    fn with_client_id(&self, mut url: Url) -> Url {
        if !url.query_pairs().any(|(k, _)| k == "client_id") {
            url.query_pairs_mut()
                .append_pair("client_id", &self.client_id);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Request: GET {}", url.path());
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(|e| ArchiveError::Api {
                status: status.as_u16(),
                message: format!("JSON parse error: {e}"),
            })
        } else {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            Err(ArchiveError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    fn profile_url(username: &str) -> String {
        format!("{PROFILE_BASE_URL}{}", username.trim_matches('/'))
    }

    pub async fn resolve_user(&self, username: &str) -> Result<CatalogUser> {
        let profile = Self::profile_url(username);
        let url = self.endpoint("resolve", &[("url", profile.as_str())])?;
        let user: ApiUser = self.get(url).await?;
        info!(
            "Found user: {} (ID: {}, {} tracks)",
            user.username,
            user.id,
            user.track_count.unwrap_or_default()
        );
        Ok(user.into())
    }

    /// All uploads of a user, following the catalog's pagination links.
    pub async fn user_tracks(&self, user_id: u64) -> Result<Vec<TrackRecord>> {
        let mut next = Some(self.endpoint(
            &format!("users/{user_id}/tracks"),
            &[("limit", PAGE_SIZE), ("linked_partitioning", "1")],
        )?);
        let mut records = Vec::new();

        for page_number in 1..=MAX_PAGES {
            let Some(url) = next.take() else {
                break;
            };
            let page: TrackPage = self.get(url).await?;
            debug!("Page {}: {} tracks", page_number, page.collection.len());

            let empty = page.collection.is_empty();
            records.extend(page.collection.into_iter().map(TrackRecord::from));
            if empty {
                break;
            }
            next = match page.next_href {
                Some(href) => Some(self.with_client_id(Url::parse(&href)?)),
                None => None,
            };
        }

        if next.is_some() {
            warn!("Stopped after {} pages, listing may be incomplete", MAX_PAGES);
        }
        info!("Downloaded {} tracks", records.len());
        Ok(records)
    }

    /// Whether the configured client id is still accepted by the API.
    pub async fn check_client_id(&self) -> bool {
        let profile = Self::profile_url(PROBE_PROFILE);
        let url = match self.endpoint("resolve", &[("url", profile.as_str())]) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build probe URL: {}", e);
                return false;
            }
        };
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                info!("Client id rejected (HTTP {})", response.status().as_u16());
                false
            }
            Err(e) => {
                warn!("Error testing client id: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl CatalogSource for SoundCloudClient {
    fn name(&self) -> &'static str {
        "SoundCloud"
    }

    async fn fetch(&self, username: &str) -> Result<(CatalogUser, Vec<TrackRecord>)> {
        let user = self.resolve_user(username).await?;
        let tracks = self.user_tracks(user.id).await?;
        Ok((user, tracks))
    }

    async fn health_check(&self) -> bool {
        self.check_client_id().await
    }
}
