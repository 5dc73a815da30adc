//! Error taxonomy for a fetch run.

use std::path::PathBuf;

/// Characters of the failing fragment kept from the start.
pub const EXCERPT_HEAD_CHARS: usize = 2000;

/// Characters of the failing fragment kept from the end.
pub const EXCERPT_TAIL_CHARS: usize = 500;

/// Diagnostics attached to a failed extraction.
///
/// Only ever used for reporting; never substituted as a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentExcerpt {
    /// Length of the whole fragment, in characters.
    pub len: usize,
    /// First [`EXCERPT_HEAD_CHARS`] characters.
    pub head: String,
    /// Last [`EXCERPT_TAIL_CHARS`] characters. Overlaps `head` on short fragments.
    pub tail: String,
}

impl FragmentExcerpt {
    pub fn from_fragment(html: &str) -> Self {
        let len = html.chars().count();
        let head: String = html.chars().take(EXCERPT_HEAD_CHARS).collect();
        let tail: String = html
            .chars()
            .skip(len.saturating_sub(EXCERPT_TAIL_CHARS))
            .collect();
        Self { len, head, tail }
    }
}

impl std::fmt::Display for FragmentExcerpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-char fragment\n--- head ---\n{}\n--- tail ---\n{}",
            self.len, self.head, self.tail
        )
    }
}

/// All errors that can abort a fetch run.
#[derive(thiserror::Error, Debug)]
pub enum AtisError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("trust store {}: {reason}", .path.display())]
    TrustStore { path: PathBuf, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("zone {zone:?} not found in envelope; zones present: {present:?}")]
    ZoneNotFound { zone: String, present: Vec<String> },

    #[error("no ATIS letter could be extracted from {0}")]
    Extraction(Box<FragmentExcerpt>),

    #[error("failed to write artifact: {0}")]
    Artifact(#[from] std::io::Error),
}

impl AtisError {
    /// Stable name of the failure kind, for operator-facing reports.
    pub fn kind(&self) -> &'static str {
        match self {
            AtisError::Config(_) => "ConfigError",
            AtisError::TrustStore { .. } => "TrustStoreError",
            AtisError::Transport(_) => "TransportError",
            AtisError::ZoneNotFound { .. } => "ZoneNotFoundError",
            AtisError::Extraction(_) => "ExtractionError",
            AtisError::Artifact(_) => "ArtifactError",
        }
    }

    pub(crate) fn extraction(html: &str) -> Self {
        AtisError::Extraction(Box::new(FragmentExcerpt::from_fragment(html)))
    }
}

impl From<reqwest::Error> for AtisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AtisError::Transport(format!("request timed out: {e}"))
        } else {
            AtisError::Transport(e.to_string())
        }
    }
}

pub type AtisResult<T> = Result<T, AtisError>;
