//! euphonic-archive - fetches the show's episode records, turns them into
//! monthly playlist files and publishes the result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use archivist::publish::GitPublisher;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "euphonic-archive")]
#[command(about = "Archive Euphonic Sessions episodes as monthly playlist files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download every episode record of a catalog user
    Fetch {
        /// Catalog username
        #[arg(short, long)]
        user: Option<String>,
        /// File containing the catalog client id
        #[arg(long)]
        client_id_file: Option<PathBuf>,
        /// Directory to write record files into
        #[arg(short, long)]
        tracks_dir: Option<PathBuf>,
    },
    /// Check that the saved client id is still accepted
    CheckToken {
        #[arg(long)]
        client_id_file: Option<PathBuf>,
    },
    /// Generate playlist files from fetched records
    Process {
        /// Directory of record files
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Root of the playlist tree
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Spelling corrections JSON
        #[arg(short, long)]
        corrections: Option<PathBuf>,
        /// Exit with an error if any record fails
        #[arg(long)]
        strict: bool,
    },
    /// Push the playlist tree to a new branch of the playlists repository
    Publish {
        /// Root of the playlist tree
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Repository to clone and push to
        #[arg(long)]
        repo_url: Option<String>,
        /// Scratch directory for the clone
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "archivist=info,euphonic_archive=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Command::Fetch {
            user,
            client_id_file,
            tracks_dir,
        } => {
            let user = user
                .or(config.soundcloud_user)
                .context("SOUNDCLOUD_USER environment variable or --user required")?;
            commands::fetch(
                &user,
                &client_id_file.unwrap_or(config.client_id_file),
                &tracks_dir.unwrap_or(config.tracks_dir),
            )
            .await
        }
        Command::CheckToken { client_id_file } => {
            commands::check_token(&client_id_file.unwrap_or(config.client_id_file)).await
        }
        Command::Process {
            input,
            output,
            corrections,
            strict,
        } => commands::process(
            &input.unwrap_or(config.tracks_dir),
            &output.unwrap_or(config.playlists_dir),
            &corrections.unwrap_or(config.corrections_file),
            &config.program_name,
            strict,
        ),
        Command::Publish {
            source,
            repo_url,
            work_dir,
        } => {
            let repo_url = repo_url
                .or(config.publish_repo_url)
                .context("PUBLISH_REPO_URL environment variable or --repo-url required")?;
            let publisher =
                GitPublisher::new(repo_url, work_dir.unwrap_or(config.publish_work_dir))
                    .dest_subdir(&config.publish_subdir)
                    .author(&config.git_author_name, &config.git_author_email);
            commands::publish(&source.unwrap_or(config.playlists_dir), &publisher).await
        }
    }
}
