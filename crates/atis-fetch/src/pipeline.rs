//! One run, start to finish: handshake, locate, extract, persist.

use std::path::PathBuf;

use tracing::info;

use crate::artifact::{write_artifact, Clock, StatusArtifact};
use crate::config::FetchConfig;
use crate::error::AtisResult;
use crate::extractor::{extract_detailed, Strategy};
use crate::locator::locate;
use crate::session::{open_session, zone_update_headers};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub artifact: StatusArtifact,
    pub strategy: Strategy,
    pub output_path: PathBuf,
}

/// Run the whole pipeline once.
///
/// Every stage fails fast. The artifact is only touched after a letter has
/// been extracted, so a failed run leaves the previous artifact in place.
pub async fn run(config: &FetchConfig, clock: &dyn Clock) -> AtisResult<RunReport> {
    config.validate()?;
    let headers = zone_update_headers(config)?;

    let session = open_session(config)?;
    session.prime(&config.landing_url).await?;
    let envelope = session
        .request_zone_update(&config.update_url, &headers)
        .await?;

    let fragment = locate(&envelope, &config.zone_id)?;
    let extraction = extract_detailed(fragment)?;
    info!(
        letter = %extraction.letter,
        strategy = %extraction.strategy,
        zone = %config.zone_id,
        "ATIS letter extracted"
    );

    let artifact = write_artifact(&config.output_path, extraction.letter, clock)?;

    Ok(RunReport {
        artifact,
        strategy: extraction.strategy,
        output_path: config.output_path.clone(),
    })
}
