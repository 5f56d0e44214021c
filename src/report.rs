//! # Report Formatter
//!
//! Renders annotated visits into the fixed-width text report:
//!
//! ```text
//!  ID | PREV |       TIME       |  TRANSITION   | URL
//! ```
//!
//! Each visit gets one line, video-watch visits get an indented metadata
//! line, and a blank line follows every visit that ends a session block
//! (see [`VisitRecord::ends_session`](crate::parsers::visit::VisitRecord::ends_session)).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::debug;

use crate::enrich::{EnrichError, VideoLookup, VideoMetadata};
use crate::parsers::visit::AnnotatedVisit;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("enrichment failed for video {video_id}: {source}")]
    Enrich {
        video_id: String,
        #[source]
        source: EnrichError,
    },
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

/// A visit line, plus the metadata line for video-watch visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedLine {
    pub visit: String,
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub line: EnrichedLine,
    pub session_break: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub header: String,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Output lines in order, without terminators. Session breaks are empty lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.header.as_str()).chain(self.entries.iter().flat_map(|entry| {
            std::iter::once(entry.line.visit.as_str())
                .chain(entry.line.metadata.as_deref())
                .chain(entry.session_break.then_some(""))
        }))
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for line in self.lines() {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    pub fn session_breaks(&self) -> usize {
        self.entries.iter().filter(|e| e.session_break).count()
    }

    pub fn enriched(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.line.metadata.is_some())
            .count()
    }
}

pub fn header_line() -> String {
    format!(
        "{:^4}| {} | {:^16} | {:^13} | {}",
        "ID", "PREV", "TIME", "TRANSITION", "URL"
    )
}

/// Formats a microsecond timestamp as `YYYY-MM-DD HH:MM` in UTC, truncating seconds.
pub fn format_timestamp(micros: i64) -> Result<String, ReportError> {
    let secs = micros.div_euclid(1_000_000);
    let date = DateTime::<Utc>::from_timestamp(secs, 0)
        .filter(|dt| (1..=9999).contains(&dt.year()))
        .ok_or(ReportError::TimestampOutOfRange(micros))?;
    Ok(date.format("%Y-%m-%d %H:%M").to_string())
}

pub fn visit_line(visit: &AnnotatedVisit) -> Result<String, ReportError> {
    let date = format_timestamp(visit.record.timestamp)?;
    Ok(format!(
        "{:^4}| {:^4} | {} | {:^13} | {}",
        visit.record.id, visit.record.from_id, date, visit.transition, visit.url
    ))
}

pub fn metadata_line(meta: &VideoMetadata) -> String {
    format!("\t Channel Name: {} Title: {}", meta.channel, meta.title)
}

/// Renders visits in the given order, looking up each video as it is reached.
///
/// With a lookup, every video-watch visit gets a metadata line; a video the
/// service does not know gets one with empty fields. Without a lookup no
/// metadata lines are written.
pub fn render<L: VideoLookup + ?Sized>(
    visits: &[AnnotatedVisit],
    mut lookup: Option<&mut L>,
) -> Result<Report, ReportError> {
    let mut entries = Vec::with_capacity(visits.len());
    for visit in visits {
        let visit_text = visit_line(visit)?;
        let metadata = match (visit.video_id.as_deref(), lookup.as_deref_mut()) {
            (Some(video_id), Some(lookup)) => {
                let found = lookup.lookup(video_id).map_err(|source| ReportError::Enrich {
                    video_id: video_id.to_string(),
                    source,
                })?;
                if found.is_none() {
                    debug!("video {video_id}: no metadata");
                }
                Some(metadata_line(&found.unwrap_or_default()))
            }
            _ => None,
        };
        entries.push(ReportEntry {
            line: EnrichedLine {
                visit: visit_text,
                metadata,
            },
            session_break: visit.record.ends_session(),
        });
    }
    Ok(Report {
        header: header_line(),
        entries,
    })
}

/// Writes the report to `path`, replacing any previous contents.
pub fn write_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    report.write_to(BufWriter::new(file))?;
    Ok(())
}
