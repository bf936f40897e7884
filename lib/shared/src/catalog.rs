use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The catalog account whose uploads are archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogUser {
    pub username: String,
    pub id: u64,
    #[serde(default)]
    pub permalink_url: String,
}

/// Entry of the `_summary.json` aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTrack {
    pub id: Option<u64>,
    pub title: String,
    pub url: String,
}

/// Aggregate written next to the per-episode record files after a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSummary {
    pub user: CatalogUser,
    pub download_date: DateTime<Utc>,
    pub track_count: usize,
    pub tracks: Vec<SummaryTrack>,
}
