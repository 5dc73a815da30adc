//! Run configuration: endpoints, zone id, file locations, timeouts.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{AtisError, AtisResult};

/// Production IDS host.
pub const DEFAULT_BASE_URL: &str = "https://ids6.pitairport.com";

/// Landing page path, relative to the base URL.
pub const LANDING_PATH: &str = "/IDS5Status/";

/// Zone-update event path, relative to the base URL.
pub const UPDATE_PATH: &str = "/IDS5Status/index.maincontent.status.atis:update";

pub const DEFAULT_ZONE_ID: &str = "atisZone";
pub const DEFAULT_OUTPUT_PATH: &str = "atis.json";
pub const DEFAULT_TRUST_STORE_PATH: &str = "certs/ids6_chain.pem";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Everything one run needs to know, passed explicitly down the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Page fetched first to establish session cookies.
    pub landing_url: String,
    /// Endpoint answering the zone-update POST.
    pub update_url: String,
    /// Zone whose fragment holds the letter.
    pub zone_id: String,
    /// Where the status artifact is written.
    pub output_path: PathBuf,
    /// PEM bundle used as the only TLS trust anchors.
    pub trust_store_path: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::for_base_url(DEFAULT_BASE_URL)
    }
}

impl FetchConfig {
    /// Defaults with both endpoints rooted at `base`.
    pub fn for_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            landing_url: format!("{base}{LANDING_PATH}"),
            update_url: format!("{base}{UPDATE_PATH}"),
            zone_id: DEFAULT_ZONE_ID.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            trust_store_path: PathBuf::from(DEFAULT_TRUST_STORE_PATH),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Reject values that cannot possibly produce a successful run.
    pub fn validate(&self) -> AtisResult<()> {
        parse_http_url("landing URL", &self.landing_url)?;
        parse_http_url("update URL", &self.update_url)?;
        if self.zone_id.is_empty() {
            return Err(AtisError::Config("zone id must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(AtisError::Config("timeout must be greater than zero".into()));
        }
        Ok(())
    }

    /// Origin of the landing page, sent as the `Origin` header.
    pub fn origin(&self) -> AtisResult<String> {
        let url = parse_http_url("landing URL", &self.landing_url)?;
        Ok(url.origin().ascii_serialization())
    }
}

fn parse_http_url(what: &str, raw: &str) -> AtisResult<Url> {
    let url = Url::parse(raw).map_err(|e| AtisError::Config(format!("{what} {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AtisError::Config(format!(
            "{what} {raw:?}: unsupported scheme {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_production() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.landing_url, "https://ids6.pitairport.com/IDS5Status/");
        assert_eq!(
            cfg.update_url,
            "https://ids6.pitairport.com/IDS5Status/index.maincontent.status.atis:update"
        );
        assert_eq!(cfg.zone_id, "atisZone");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_for_base_url_trims_trailing_slash() {
        let cfg = FetchConfig::for_base_url("http://127.0.0.1:8080/");
        assert_eq!(cfg.landing_url, "http://127.0.0.1:8080/IDS5Status/");
    }

    #[test]
    fn test_origin() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.origin().unwrap(), "https://ids6.pitairport.com");
        let cfg = FetchConfig::for_base_url("http://localhost:9000");
        assert_eq!(cfg.origin().unwrap(), "http://localhost:9000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = FetchConfig {
            landing_url: "not a url".into(),
            ..FetchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AtisError::Config(_))));

        cfg = FetchConfig {
            update_url: "ftp://example.com/x".into(),
            ..FetchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AtisError::Config(_))));

        cfg = FetchConfig {
            zone_id: String::new(),
            ..FetchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AtisError::Config(_))));

        cfg = FetchConfig {
            timeout: Duration::ZERO,
            ..FetchConfig::default()
        };
        assert_eq!(cfg.validate().unwrap_err().kind(), "ConfigError");
    }
}
