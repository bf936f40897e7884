use async_trait::async_trait;
use shared::{catalog::CatalogUser, track::TrackRecord};
use std::path::Path;

use crate::error::Result;

/// Remote catalog the episode records are fetched from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, username: &str) -> Result<(CatalogUser, Vec<TrackRecord>)>;
    async fn health_check(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// Destination already matched the generated tree
    NoChanges,
    /// A reviewable branch was pushed
    Published { branch: String, files: usize },
}

/// Destination the generated playlist tree is handed to.
#[async_trait]
pub trait Publisher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn publish(&self, source: &Path) -> Result<PublishOutcome>;
}
