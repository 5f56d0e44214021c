//! # URL Normalizer
//!
//! Two independent recognizers over raw history URLs:
//! video-watch links (whose id is handed to the enricher) and search-engine
//! click-through links (which are rewritten down to their destination query).

use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_WATCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://www\.youtube\.com/watch\?v=([A-Za-z0-9_-]{11})$")
        .expect("video watch pattern")
});

static SEARCH_REDIRECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https://www\.google\.com/(?:search|url)\?)(\S*)").expect("search pattern")
});

/// Keys whose value is the meaningful destination of a search redirect.
const DESTINATION_KEYS: [&str; 2] = ["url", "q"];

/// A recognised search click-through link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRedirect<'a> {
    /// Scheme, host, path and the `?`.
    pub prefix: &'a str,
    /// The first `url=` or `q=` parameter, key included.
    pub param: &'a str,
}

impl SearchRedirect<'_> {
    pub fn canonical(&self) -> String {
        format!("{}{}", self.prefix, self.param)
    }
}

/// Returns the 11-character video id of an exact video-watch link.
pub fn is_video_watch(url: &str) -> Option<&str> {
    VIDEO_WATCH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_search_redirect(url: &str) -> Option<SearchRedirect<'_>> {
    let caps = SEARCH_REDIRECT.captures(url)?;
    let prefix = caps.get(1)?.as_str();
    let query = caps.get(2)?;

    let mut offset = query.start();
    for pair in query.as_str().split('&') {
        let start = offset;
        offset += pair.len() + 1;

        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if !DESTINATION_KEYS.contains(&key) {
            continue;
        }
        let value_len = value
            .bytes()
            .take_while(|b| is_destination_byte(*b))
            .count();
        if value_len == 0 {
            continue;
        }
        let end = start + key.len() + 1 + value_len;
        return Some(SearchRedirect {
            prefix,
            param: &url[start..end],
        });
    }
    None
}

fn is_destination_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'%' | b'+' | b'_' | b'.' | b'-')
}

/// Strips tracking parameters from search redirects; any other URL is returned as is.
pub fn normalize(url: &str) -> String {
    match is_search_redirect(url) {
        Some(redirect) => redirect.canonical(),
        None => url.to_string(),
    }
}
