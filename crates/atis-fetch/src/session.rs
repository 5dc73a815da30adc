//! Two-step session against the IDS zone-update backend.
//!
//! The backend has no documented API. A GET of the landing page hands out
//! session cookies; a POST to the zone-update endpoint, dressed as an
//! asynchronous partial-page request, then returns a JSON envelope of HTML
//! fragments keyed by zone id. Requests are bounded by a timeout and never
//! retried here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::{AtisError, AtisResult};
use crate::types::Envelope;

/// Certificates loaded from a PEM bundle; the only roots the session trusts.
#[derive(Clone)]
pub struct TrustStore {
    path: PathBuf,
    certificates: Vec<reqwest::Certificate>,
}

impl TrustStore {
    /// Read and parse a PEM bundle from disk.
    pub fn load(path: &Path) -> AtisResult<Self> {
        let pem = std::fs::read(path).map_err(|e| AtisError::TrustStore {
            path: path.to_path_buf(),
            reason: format!("cannot read bundle: {e}"),
        })?;
        Self::from_pem(path, &pem)
    }

    /// Parse PEM bytes; `path` is only kept for error reports.
    pub fn from_pem(path: impl Into<PathBuf>, pem: &[u8]) -> AtisResult<Self> {
        let path = path.into();
        let certificates =
            reqwest::Certificate::from_pem_bundle(pem).map_err(|e| AtisError::TrustStore {
                path: path.clone(),
                reason: format!("invalid PEM bundle: {e}"),
            })?;
        if certificates.is_empty() {
            return Err(AtisError::TrustStore {
                path,
                reason: "bundle contains no certificates".into(),
            });
        }
        Ok(Self { path, certificates })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("path", &self.path)
            .field("certificates", &self.certificates.len())
            .finish()
    }
}

/// HTTP session scoped to a single run: one cookie jar, one trust store.
pub struct IdsSession {
    client: reqwest::Client,
    timeout: Duration,
}

impl IdsSession {
    /// Build a client that trusts only `trust` and keeps cookies between calls.
    pub fn open(trust: &TrustStore, timeout: Duration, user_agent: &str) -> AtisResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .cookie_store(true)
            .tls_built_in_root_certs(false);

        for cert in &trust.certificates {
            builder = builder.add_root_certificate(cert.clone());
        }

        let client = builder.build().map_err(|e| AtisError::TrustStore {
            path: trust.path.clone(),
            reason: format!("unusable trust material: {e}"),
        })?;

        Ok(Self { client, timeout })
    }

    /// GET the landing page to pick up session cookies. The body is discarded.
    pub async fn prime(&self, landing_url: &str) -> AtisResult<()> {
        let resp = self
            .client
            .get(landing_url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AtisError::Transport(format!(
                "GET {landing_url} returned HTTP {status}"
            )));
        }

        info!(url = landing_url, status = status.as_u16(), "session primed");
        Ok(())
    }

    /// POST `{}` to the zone-update endpoint and decode the envelope.
    ///
    /// `headers` must mark the request as an asynchronous partial update
    /// (see [`zone_update_headers`]); the backend answers differently
    /// otherwise.
    pub async fn request_zone_update(
        &self,
        update_url: &str,
        headers: &[(String, String)],
    ) -> AtisResult<Envelope> {
        let mut builder = self.client.post(update_url).timeout(self.timeout);

        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.json(&json!({})).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AtisError::Transport(format!(
                "POST {update_url} returned HTTP {status}"
            )));
        }

        let body = resp.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            AtisError::Transport(format!("zone update response is not JSON: {e}"))
        })?;

        let envelope = Envelope::from_json(&value);
        debug!(zones = ?envelope.zone_ids(), "zone update decoded");
        info!(
            url = update_url,
            zones = envelope.content.len(),
            "zone update received"
        );
        Ok(envelope)
    }
}

/// Load the configured trust store and open a session with it.
///
/// Fails before any network traffic when the trust material is missing
/// or unusable.
pub fn open_session(config: &FetchConfig) -> AtisResult<IdsSession> {
    let trust = TrustStore::load(&config.trust_store_path)?;
    debug!(path = %trust.path().display(), certificates = trust.len(), "trust store loaded");
    IdsSession::open(&trust, config.timeout, &config.user_agent)
}

/// Headers that make the backend treat the POST as a zone update.
pub fn zone_update_headers(config: &FetchConfig) -> AtisResult<Vec<(String, String)>> {
    Ok(vec![
        ("X-Requested-With".into(), "XMLHttpRequest".into()),
        (
            "Content-Type".into(),
            "application/json; charset=UTF-8".into(),
        ),
        ("Origin".into(), config.origin()?),
        ("Referer".into(), config.landing_url.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &[u8] = include_bytes!("../tests/fixtures/ca_bundle.pem");

    #[test]
    fn test_trust_store_parses_bundle() {
        let trust = TrustStore::from_pem("fixture.pem", BUNDLE).unwrap();
        assert_eq!(trust.len(), 1);
        assert_eq!(trust.path(), Path::new("fixture.pem"));
    }

    #[test]
    fn test_trust_store_rejects_non_pem() {
        let err = TrustStore::from_pem("junk.pem", b"this is not a certificate").unwrap_err();
        assert_eq!(err.kind(), "TrustStoreError");
        assert!(err.to_string().contains("junk.pem"));
    }

    #[test]
    fn test_trust_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrustStore::load(&dir.path().join("absent.pem")).unwrap_err();
        assert!(matches!(err, AtisError::TrustStore { .. }));
    }

    #[test]
    fn test_open_session_missing_trust_store() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = FetchConfig {
            trust_store_path: dir.path().join("absent.pem"),
            ..FetchConfig::default()
        };
        assert!(matches!(open_session(&cfg), Err(AtisError::TrustStore { .. })));
    }

    #[tokio::test]
    async fn test_open_session_with_bundle() {
        let trust = TrustStore::from_pem("fixture.pem", BUNDLE).unwrap();
        assert!(IdsSession::open(&trust, Duration::from_secs(5), "Mozilla/5.0").is_ok());
    }

    #[test]
    fn test_zone_update_headers() {
        let cfg = FetchConfig::default();
        let headers = zone_update_headers(&cfg).unwrap();
        let get = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("X-Requested-With"), Some("XMLHttpRequest"));
        assert_eq!(get("Content-Type"), Some("application/json; charset=UTF-8"));
        assert_eq!(get("Origin"), Some("https://ids6.pitairport.com"));
        assert_eq!(get("Referer"), Some("https://ids6.pitairport.com/IDS5Status/"));
    }
}
