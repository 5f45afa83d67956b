//! External Video Host
//!
//! Sections reference videos by URL; the host ingests the source and
//! returns asset/playback ids. Every call is best-effort from the
//! caller's perspective: failures are logged and the catalog keeps
//! working without playback ids.

use serde::Deserialize;
use serde_json::json;

use crate::error::{CatalogError, CatalogResult};

/// A successfully ingested video
#[derive(Debug, Clone)]
pub struct HostedVideo {
    pub asset_id: String,
    pub playback_id: Option<String>,
}

/// Video host interface
#[trait_variant::make(VideoHost: Send)]
pub trait LocalVideoHost {
    /// Ingest a source URL. `None` means hosting is disabled.
    async fn create_asset(&self, source_url: &str) -> CatalogResult<Option<HostedVideo>>;

    /// Remove an asset from the host
    async fn delete_asset(&self, asset_id: &str) -> CatalogResult<()>;
}

/// HTTP client for the video host API
#[derive(Clone)]
pub struct RemoteVideoHost {
    http: reqwest::Client,
    base_url: String,
    token_id: String,
    token_secret: String,
}

#[derive(Deserialize)]
struct AssetEnvelope {
    data: AssetData,
}

#[derive(Deserialize)]
struct AssetData {
    id: String,
    #[serde(default)]
    playback_ids: Vec<PlaybackId>,
}

#[derive(Deserialize)]
struct PlaybackId {
    id: String,
}

const DEFAULT_BASE_URL: &str = "https://api.mux.com";

impl RemoteVideoHost {
    pub fn new(token_id: String, token_secret: String, base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token_id,
            token_secret,
        }
    }

    /// Build from `VIDEO_HOST_TOKEN_ID` / `VIDEO_HOST_TOKEN_SECRET`.
    /// Missing credentials disable the integration.
    pub fn from_env() -> Option<Self> {
        let token_id = std::env::var("VIDEO_HOST_TOKEN_ID").ok()?;
        let token_secret = std::env::var("VIDEO_HOST_TOKEN_SECRET").ok()?;
        let base_url = std::env::var("VIDEO_HOST_BASE_URL").ok();

        Some(Self::new(token_id, token_secret, base_url))
    }
}

impl VideoHost for RemoteVideoHost {
    async fn create_asset(&self, source_url: &str) -> CatalogResult<Option<HostedVideo>> {
        let response = self
            .http
            .post(format!("{}/video/v1/assets", self.base_url))
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .json(&json!({
                "input": source_url,
                "playback_policy": ["public"],
            }))
            .send()
            .await
            .map_err(|e| CatalogError::Internal(format!("Video host request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CatalogError::Internal(format!(
                "Video host returned {}",
                response.status()
            )));
        }

        let envelope: AssetEnvelope = response
            .json()
            .await
            .map_err(|e| CatalogError::Internal(format!("Video host response malformed: {e}")))?;

        let playback_id = envelope.data.playback_ids.into_iter().next().map(|p| p.id);

        tracing::info!(asset_id = %envelope.data.id, "Video asset created");

        Ok(Some(HostedVideo {
            asset_id: envelope.data.id,
            playback_id,
        }))
    }

    async fn delete_asset(&self, asset_id: &str) -> CatalogResult<()> {
        let response = self
            .http
            .delete(format!("{}/video/v1/assets/{}", self.base_url, asset_id))
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .send()
            .await
            .map_err(|e| CatalogError::Internal(format!("Video host request failed: {e}")))?;

        // 404 is fine, the asset is gone either way
        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(CatalogError::Internal(format!(
                "Video host returned {}",
                response.status()
            )));
        }

        tracing::info!(asset_id = %asset_id, "Video asset deleted");
        Ok(())
    }
}

/// No-op host used when credentials are absent
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledVideoHost;

impl VideoHost for DisabledVideoHost {
    async fn create_asset(&self, _source_url: &str) -> CatalogResult<Option<HostedVideo>> {
        tracing::debug!("Video hosting disabled, skipping asset creation");
        Ok(None)
    }

    async fn delete_asset(&self, _asset_id: &str) -> CatalogResult<()> {
        Ok(())
    }
}

/// The host configured at startup: remote when credentials exist,
/// disabled otherwise
#[derive(Clone)]
pub enum ConfiguredVideoHost {
    Remote(RemoteVideoHost),
    Disabled(DisabledVideoHost),
}

impl ConfiguredVideoHost {
    pub fn from_env() -> Self {
        match RemoteVideoHost::from_env() {
            Some(host) => {
                tracing::info!("Video hosting enabled");
                ConfiguredVideoHost::Remote(host)
            }
            None => {
                tracing::warn!("Video host credentials absent, hosting disabled");
                ConfiguredVideoHost::Disabled(DisabledVideoHost)
            }
        }
    }
}

impl VideoHost for ConfiguredVideoHost {
    async fn create_asset(&self, source_url: &str) -> CatalogResult<Option<HostedVideo>> {
        match self {
            ConfiguredVideoHost::Remote(host) => VideoHost::create_asset(host, source_url).await,
            ConfiguredVideoHost::Disabled(host) => VideoHost::create_asset(host, source_url).await,
        }
    }

    async fn delete_asset(&self, asset_id: &str) -> CatalogResult<()> {
        match self {
            ConfiguredVideoHost::Remote(host) => VideoHost::delete_asset(host, asset_id).await,
            ConfiguredVideoHost::Disabled(host) => VideoHost::delete_asset(host, asset_id).await,
        }
    }
}
