//! On-disk layout of fetched episode records: one pretty-printed JSON file per
//! episode plus a `_summary.json` aggregate in the same directory.

use std::path::Path;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use shared::catalog::{ArchiveSummary, CatalogUser, SummaryTrack};
use shared::track::TrackRecord;
use tracing::{debug, info};

use crate::error::{ArchiveError, Result};

pub const SUMMARY_FILE: &str = "_summary.json";

const MAX_STEM_LEN: usize = 50;

static RE_NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());
static RE_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// A record file and the outcome of parsing it.
#[derive(Debug)]
pub struct LoadedRecord {
    pub file_name: String,
    pub record: Result<TrackRecord>,
}

/// Title reduced to `[a-z0-9_]`, at most 50 characters.
pub fn sanitize_filename(title: &str) -> String {
    let replaced = RE_NON_ALNUM.replace_all(title, "_");
    let collapsed = RE_UNDERSCORES.replace_all(&replaced, "_");
    collapsed
        .chars()
        .take(MAX_STEM_LEN)
        .collect::<String>()
        .to_lowercase()
}

pub fn record_file_name(record: &TrackRecord) -> String {
    let id = record
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "noid".to_string());
    format!("{}_{}.json", id, sanitize_filename(&record.title))
}

pub fn read_record(path: &Path) -> Result<TrackRecord> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let text = std::fs::read_to_string(path).map_err(|e| ArchiveError::MalformedRecord {
        file: file.clone(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| ArchiveError::MalformedRecord {
        file,
        reason: e.to_string(),
    })
}

/// Read every `*.json` record in `dir` except the summary, in filename order.
///
/// Failing to list the directory is an error; a bad individual file is not,
/// it is returned as a failed [`LoadedRecord`].
pub fn load_records(dir: &Path) -> Result<Vec<LoadedRecord>> {
    let mut files = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some(SUMMARY_FILE))
        .collect::<Vec<_>>();
    files.sort();

    info!("Found {} record files in {}", files.len(), dir.display());

    Ok(files
        .into_iter()
        .map(|path| LoadedRecord {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            record: read_record(&path),
        })
        .collect())
}

/// Write fetched records and their summary into `dir`.
pub fn write_records(
    dir: &Path,
    user: &CatalogUser,
    records: &[TrackRecord],
) -> Result<ArchiveSummary> {
    std::fs::create_dir_all(dir)?;

    let mut tracks = Vec::with_capacity(records.len());
    for record in records {
        let path = dir.join(record_file_name(record));
        std::fs::write(&path, serde_json::to_string_pretty(record)?)?;
        debug!("Saved {}", path.display());
        tracks.push(SummaryTrack {
            id: record.id,
            title: record.title.clone(),
            url: record.permalink_url.clone(),
        });
    }

    let summary = ArchiveSummary {
        user: user.clone(),
        download_date: Utc::now(),
        track_count: records.len(),
        tracks,
    };
    std::fs::write(
        dir.join(SUMMARY_FILE),
        serde_json::to_string_pretty(&summary)?,
    )?;
    info!("Saved {} records to {}", records.len(), dir.display());

    Ok(summary)
}
