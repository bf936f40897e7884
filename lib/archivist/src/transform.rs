use std::collections::HashMap;
use std::path::{Path, PathBuf};

use shared::track::TrackRecord;
use tracing::{info, warn};

use crate::archive::{self, LoadedRecord};
use crate::corrections::Corrections;
use crate::error::{ArchiveError, Result};
use crate::header::HeaderRenderer;
use crate::normalize;
use crate::period::{self, ResolvedPeriod};

/// A rendered playlist file, ready to be written once.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    pub period: ResolvedPeriod,
    pub header: String,
    pub body: String,
    pub path: PathBuf,
}

impl NormalizedDocument {
    pub fn contents(&self) -> String {
        format!("{}\n\n{}", self.header, self.body)
    }
}

#[derive(Debug)]
pub struct RecordFailure {
    pub file_name: String,
    pub error: ArchiveError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<RecordFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct RecordTransformer {
    output_root: PathBuf,
    corrections: Corrections,
    header: HeaderRenderer,
}

impl RecordTransformer {
    pub fn new(
        output_root: impl Into<PathBuf>,
        corrections: Corrections,
        header: HeaderRenderer,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            corrections,
            header,
        }
    }

    pub fn transform(&self, record: &TrackRecord) -> NormalizedDocument {
        let period = period::resolve(&record.title, record.created_at);
        NormalizedDocument {
            period,
            header: self.header.render(&period, &record.permalink_url),
            body: normalize::normalize(&record.description, &self.corrections),
            path: self.output_root.join(period.relative_path()),
        }
    }

    fn write(&self, document: &NormalizedDocument) -> Result<()> {
        if let Some(parent) = document.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&document.path, document.contents())?;
        Ok(())
    }

    /// Transform and write every record. Failures are collected per record;
    /// the first record to claim an output path keeps it and later claimants
    /// are reported as collisions.
    pub fn run(&self, records: Vec<LoadedRecord>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut claimed: HashMap<PathBuf, String> = HashMap::new();

        for LoadedRecord { file_name, record } in records {
            let record = match record {
                Ok(record) => record,
                Err(error) => {
                    warn!("Skipping {}: {}", file_name, error);
                    report.failures.push(RecordFailure { file_name, error });
                    continue;
                }
            };

            let document = self.transform(&record);

            if let Some(first) = claimed.get(&document.path) {
                let error = ArchiveError::PathCollision {
                    path: document.path.clone(),
                    first: first.clone(),
                    second: file_name.clone(),
                };
                warn!("{}", error);
                report.failures.push(RecordFailure { file_name, error });
                continue;
            }

            if let Err(error) = self.write(&document) {
                warn!("Failed to write {}: {}", document.path.display(), error);
                report.failures.push(RecordFailure { file_name, error });
                continue;
            }

            info!(
                "{} - {}",
                document
                    .path
                    .strip_prefix(&self.output_root)
                    .unwrap_or(&document.path)
                    .display(),
                record.title
            );
            claimed.insert(document.path.clone(), file_name);
            report.written.push(document.path);
        }

        info!(
            "Wrote {} files to {} ({} failed)",
            report.written.len(),
            self.output_root.display(),
            report.failures.len()
        );
        report
    }

    pub fn run_directory(&self, input_dir: &Path) -> Result<BatchReport> {
        Ok(self.run(archive::load_records(input_dir)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str, description: &str) -> TrackRecord {
        TrackRecord {
            id: Some(1),
            title: title.to_string(),
            description: description.to_string(),
            permalink_url: "https://soundcloud.com/euphonic/episode".to_string(),
            created_at: Utc.with_ymd_and_hms(2021, 4, 1, 0, 0, 0).unwrap(),
            duration: None,
            playback_count: None,
            likes_count: None,
            comment_count: None,
            genre: None,
            tag_list: None,
            artwork_url: None,
        }
    }

    #[test]
    fn document_layout() {
        let transformer =
            RecordTransformer::new("/out", Corrections::empty(), HeaderRenderer::default());
        let doc = transformer.transform(&record(
            "Euphonic Sessions March 2021",
            "Tracklist:\n1 A - B",
        ));

        assert_eq!(doc.path, PathBuf::from("/out/2021/2021-03-March.txt"));
        assert_eq!(
            doc.contents(),
            "Euphonic Sessions with Kyau & Albert\n\
             March 2021 Edition\n\
             https://soundcloud.com/euphonic/episode\n\
             \n\
             1. A - \"B\""
        );
    }

    #[test]
    fn empty_description_still_has_header() {
        let transformer =
            RecordTransformer::new("/out", Corrections::empty(), HeaderRenderer::default());
        let doc = transformer.transform(&record("Best Of 2020", ""));

        assert_eq!(
            doc.path,
            PathBuf::from("/out/2021/2021-01-January (Best of 2020).txt")
        );
        assert!(doc.contents().ends_with("episode\n\n"));
        assert!(doc.header.contains("\nBest Of 2020\n"));
    }
}
