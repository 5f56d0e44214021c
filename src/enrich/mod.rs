//! # Metadata Enricher
//!
//! Resolves video ids to a title and channel name. The report only depends
//! on the [`VideoLookup`] trait; the network client lives in [`youtube`].

pub mod youtube;

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::config::EnrichmentConfig;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response reported {0} results but carried no item")]
    MissingItem(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
}

/// Resolves a video id. `Ok(None)` means the service knows no such video.
pub trait VideoLookup {
    fn lookup(&mut self, video_id: &str) -> Result<Option<VideoMetadata>, EnrichError>;
}

impl<L: VideoLookup + ?Sized> VideoLookup for &mut L {
    fn lookup(&mut self, video_id: &str) -> Result<Option<VideoMetadata>, EnrichError> {
        (**self).lookup(video_id)
    }
}

impl<L: VideoLookup + ?Sized> VideoLookup for Box<L> {
    fn lookup(&mut self, video_id: &str) -> Result<Option<VideoMetadata>, EnrichError> {
        (**self).lookup(video_id)
    }
}

/// Issues at most one lookup per distinct video id.
#[derive(Debug)]
pub struct CachedLookup<L> {
    inner: L,
    cache: HashMap<String, Option<VideoMetadata>>,
    misses: u64,
}

impl<L: VideoLookup> CachedLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            misses: 0,
        }
    }

    /// Number of lookups forwarded to the wrapped collaborator.
    pub fn lookups(&self) -> u64 {
        self.misses
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: VideoLookup> VideoLookup for CachedLookup<L> {
    fn lookup(&mut self, video_id: &str) -> Result<Option<VideoMetadata>, EnrichError> {
        if let Some(hit) = self.cache.get(video_id) {
            debug!("video {video_id}: cached");
            return Ok(hit.clone());
        }
        self.misses += 1;
        let found = self.inner.lookup(video_id)?;
        self.cache.insert(video_id.to_string(), found.clone());
        Ok(found)
    }
}

/// Builds the lookup described by the configuration, `None` when enrichment is off.
pub fn build_lookup(
    cfg: &EnrichmentConfig,
) -> Result<Option<Box<dyn VideoLookup>>, EnrichError> {
    if !cfg.enabled {
        return Ok(None);
    }
    Ok(Some(Box::new(youtube::YoutubeClient::new(cfg)?)))
}
