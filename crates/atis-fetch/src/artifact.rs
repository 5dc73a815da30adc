//! Status artifact: the letter plus the time it was observed.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::AtisResult;
use crate::types::AtisLetter;

/// A source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock: always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The persisted document. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusArtifact {
    pub letter: AtisLetter,
    #[serde(serialize_with = "serialize_utc_seconds")]
    pub updated_utc: DateTime<Utc>,
}

impl StatusArtifact {
    /// Stamp `letter` with the clock's current instant, truncated to seconds.
    pub fn new(letter: AtisLetter, clock: &dyn Clock) -> Self {
        let now = clock.now();
        let updated_utc = DateTime::<Utc>::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        Self {
            letter,
            updated_utc,
        }
    }

    /// `updated_utc` as ISO-8601 with an explicit `+00:00` offset.
    pub fn updated_utc_string(&self) -> String {
        format_utc_seconds(&self.updated_utc)
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> AtisResult<String> {
        let mut out = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        out.push('\n');
        Ok(out)
    }
}

fn format_utc_seconds(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn serialize_utc_seconds<S: Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_utc_seconds(ts))
}

/// Write the artifact for `letter` to `path`, replacing any previous one.
///
/// The document is written to a temporary file in the same directory and
/// renamed over `path`, so readers see either the old or the new artifact.
pub fn write_artifact(
    path: &Path,
    letter: AtisLetter,
    clock: &dyn Clock,
) -> AtisResult<StatusArtifact> {
    let artifact = StatusArtifact::new(letter, clock);
    let body = artifact.to_pretty_json()?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(body.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!(
        path = %path.display(),
        letter = %artifact.letter,
        updated_utc = %artifact.updated_utc_string(),
        "artifact written"
    );
    Ok(artifact)
}
