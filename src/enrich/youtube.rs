use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::enrich::{EnrichError, VideoLookup, VideoMetadata};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideosResponse {
    page_info: PageInfo,
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
}

/// Blocking client for the YouTube Data API `videos` endpoint.
pub struct YoutubeClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    part: String,
    api_key: String,
    max_retries: u32,
}

impl std::fmt::Debug for YoutubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeClient")
            .field("endpoint", &self.endpoint)
            .field("part", &self.part)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl YoutubeClient {
    pub fn new(cfg: &EnrichmentConfig) -> Result<Self, EnrichError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self::with_client(cfg, client))
    }

    pub fn with_client(cfg: &EnrichmentConfig, client: reqwest::blocking::Client) -> Self {
        Self {
            client,
            endpoint: cfg.endpoint.clone(),
            part: cfg.part.clone(),
            api_key: cfg.api_key.clone(),
            max_retries: cfg.max_retries,
        }
    }

    fn fetch(&self, video_id: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("part", self.part.as_str()),
                ("id", video_id),
            ])
            .send()?
            .error_for_status()?
            .text()
    }
}

impl VideoLookup for YoutubeClient {
    fn lookup(&mut self, video_id: &str) -> Result<Option<VideoMetadata>, EnrichError> {
        let mut attempt = 0;
        let body = loop {
            match self.fetch(video_id) {
                Ok(body) => break body,
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "video {video_id}: lookup failed ({err}), retry {attempt}/{}",
                        self.max_retries
                    );
                }
                Err(err) => return Err(err.into()),
            }
        };
        debug!("video {video_id}: {} bytes of metadata", body.len());
        parse_videos_response(&body)
    }
}

fn parse_videos_response(body: &str) -> Result<Option<VideoMetadata>, EnrichError> {
    let response: VideosResponse = serde_json::from_str(body)?;
    if response.page_info.total_results == 0 {
        return Ok(None);
    }
    let item = response
        .items
        .into_iter()
        .next()
        .ok_or(EnrichError::MissingItem(response.page_info.total_results))?;
    Ok(Some(VideoMetadata {
        title: item.snippet.title,
        channel: item.snippet.channel_title,
    }))
}
