//! Centralized configuration management.
//!
//! All environment variables are read once at startup through this module.
//! Command-line flags take precedence over anything loaded here.

use std::path::PathBuf;

use archivist::header::DEFAULT_PROGRAM_NAME;
use archivist::publish::{DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME, DEFAULT_DEST_SUBDIR};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Catalog account to archive (no default)
    pub soundcloud_user: Option<String>,
    /// File holding the catalog client id (default: "client_id.txt")
    pub client_id_file: PathBuf,
    /// Directory of fetched record files (default: "tracks")
    pub tracks_dir: PathBuf,
    /// Root of the generated playlist tree (default: "out-playlists")
    pub playlists_dir: PathBuf,
    /// Spelling corrections JSON (default: "corrections.json")
    pub corrections_file: PathBuf,
    /// Playlists repository to publish into (no default)
    pub publish_repo_url: Option<String>,
    /// Scratch directory for the publish clone (default: system temp dir)
    pub publish_work_dir: PathBuf,
    /// Directory inside the repository that receives the tree (default: "years")
    pub publish_subdir: String,
    pub git_author_name: String,
    pub git_author_email: String,
    /// First line of every playlist header
    pub program_name: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env_or(key, default))
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            soundcloud_user: std::env::var("SOUNDCLOUD_USER").ok(),
            client_id_file: env_path("CLIENT_ID_FILE", "client_id.txt"),
            tracks_dir: env_path("TRACKS_DIR", "tracks"),
            playlists_dir: env_path("PLAYLISTS_DIR", "out-playlists"),
            corrections_file: env_path("CORRECTIONS_FILE", "corrections.json"),
            publish_repo_url: std::env::var("PUBLISH_REPO_URL").ok(),
            publish_work_dir: std::env::var("PUBLISH_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir().join("euphonic-archive")),
            publish_subdir: env_or("PUBLISH_SUBDIR", DEFAULT_DEST_SUBDIR),
            git_author_name: env_or("GIT_AUTHOR_NAME", DEFAULT_AUTHOR_NAME),
            git_author_email: env_or("GIT_AUTHOR_EMAIL", DEFAULT_AUTHOR_EMAIL),
            program_name: env_or("PROGRAM_NAME", DEFAULT_PROGRAM_NAME),
        }
    }
}
