use std::path::Path;

use anyhow::{bail, Context, Result};
use archivist::{
    archive,
    publish::GitPublisher,
    soundcloud::{read_client_id, SoundCloudClientBuilder},
    CatalogSource, Corrections, HeaderRenderer, PublishOutcome, Publisher, RecordTransformer,
};
use tracing::{error, info, warn};

pub async fn fetch(username: &str, client_id_file: &Path, tracks_dir: &Path) -> Result<()> {
    let client_id = read_client_id(client_id_file).with_context(|| {
        format!(
            "Failed to read client id from {} (run the token grabber first)",
            client_id_file.display()
        )
    })?;
    let client = SoundCloudClientBuilder::new()
        .client_id(&client_id)
        .build()
        .context("Failed to create catalog client")?;

    info!("Fetching user {} from {}", username, client.name());
    let (user, tracks) = client
        .fetch(username)
        .await
        .with_context(|| format!("Failed to fetch tracks for {username}"))?;

    for track in &tracks {
        info!("  {}", track.title);
    }
    let summary = archive::write_records(tracks_dir, &user, &tracks)?;
    info!(
        "Downloaded {} tracks to {}",
        summary.track_count,
        tracks_dir.display()
    );
    Ok(())
}

/// Fails when the file is missing or the id is rejected; a rejected id's file
/// is deleted so the token grabber runs again.
pub async fn check_token(client_id_file: &Path) -> Result<()> {
    if !client_id_file.exists() {
        bail!("No client id found at {}", client_id_file.display());
    }

    let client_id = read_client_id(client_id_file)?;
    let client = SoundCloudClientBuilder::new().client_id(&client_id).build()?;

    if client.health_check().await {
        info!("Existing client id is valid");
        return Ok(());
    }

    std::fs::remove_file(client_id_file)
        .with_context(|| format!("Failed to delete {}", client_id_file.display()))?;
    bail!(
        "Client id is no longer valid, deleted {}",
        client_id_file.display()
    )
}

pub fn process(
    input: &Path,
    output: &Path,
    corrections_file: &Path,
    program_name: &str,
    strict: bool,
) -> Result<()> {
    let corrections = Corrections::load(corrections_file).context("Cannot load corrections")?;
    let transformer =
        RecordTransformer::new(output, corrections, HeaderRenderer::new(program_name));

    let report = transformer
        .run_directory(input)
        .with_context(|| format!("Failed to read records from {}", input.display()))?;

    for failure in &report.failures {
        error!("{}: {}", failure.file_name, failure.error);
    }

    if !report.is_clean() && strict {
        bail!("{} records failed", report.failures.len());
    }
    Ok(())
}

pub async fn publish(source: &Path, publisher: &GitPublisher) -> Result<()> {
    info!("Publishing {} via {}", source.display(), publisher.name());

    match publisher
        .publish(source)
        .await
        .context("Integration failed")?
    {
        PublishOutcome::NoChanges => warn!("Nothing to publish, repository is up to date"),
        PublishOutcome::Published { branch, files } => {
            info!("Pushed {} files on branch {}", files, branch);
        }
    }
    Ok(())
}
