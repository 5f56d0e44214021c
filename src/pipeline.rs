//! # Pipeline Module
//!
//! Runs one report: open the store, extract visits, release the store,
//! render with enrichment, and write the output file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::enrich::{CachedLookup, VideoLookup};
use crate::parsers::places;
use crate::report::{self, Report};
use crate::store::PlacesStore;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub visits: u64,
    pub videos: u64,
    pub lookups: u64,
    pub enriched: u64,
    pub session_breaks: u64,
}

/// Builds the report without touching the output file.
///
/// `lookup` is `None` when enrichment is switched off.
pub fn build_report<L: VideoLookup>(
    cfg: &Config,
    store_path: &Path,
    lookup: Option<L>,
) -> Result<(Report, RunSummary)> {
    let visits = {
        let store = PlacesStore::open(store_path, &cfg.store)
            .with_context(|| format!("opening history store {}", store_path.display()))?;
        places::extract_visits(&store, cfg.cutoff_micros).context("extracting visits")?
    };
    info!("extracted {} visits since cutoff {}", visits.len(), cfg.cutoff_micros);

    let mut lookup = lookup.map(CachedLookup::new);
    let report = report::render(&visits, lookup.as_mut()).context("rendering report")?;

    let summary = RunSummary {
        visits: visits.len() as u64,
        videos: visits.iter().filter(|v| v.video_id.is_some()).count() as u64,
        lookups: lookup.as_ref().map_or(0, CachedLookup::lookups),
        enriched: report.enriched() as u64,
        session_breaks: report.session_breaks() as u64,
    };
    Ok((report, summary))
}

pub fn run<L: VideoLookup>(
    cfg: &Config,
    store_path: &Path,
    output_path: &Path,
    lookup: Option<L>,
) -> Result<RunSummary> {
    let (report, summary) = build_report(cfg, store_path, lookup)?;
    report::write_report(&report, output_path)
        .with_context(|| format!("writing report {}", output_path.display()))?;
    info!(
        "wrote {} (visits={} videos={} lookups={} enriched={} session_breaks={})",
        output_path.display(),
        summary.visits,
        summary.videos,
        summary.lookups,
        summary.enriched,
        summary.session_breaks
    );
    Ok(summary)
}
