//! Command-line surface.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use atis_fetch::config::{
    DEFAULT_BASE_URL, DEFAULT_OUTPUT_PATH, DEFAULT_TRUST_STORE_PATH, DEFAULT_ZONE_ID,
};
use atis_fetch::FetchConfig;

#[derive(Parser, Debug)]
#[command(
    name = "atis-fetch",
    about = "Fetch the current ATIS letter from the airport IDS and write it to a JSON artifact",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Print machine-readable JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the handshake, extract the letter and write the artifact (default).
    Fetch,

    /// Run only the letter extractor on a saved zone fragment.
    Extract {
        /// HTML fragment file, or "-" for stdin.
        file: PathBuf,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// IDS base URL; both endpoints are derived from it unless overridden.
    #[arg(long, env = "ATIS_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Landing page URL (overrides the one derived from --base-url).
    #[arg(long, env = "ATIS_LANDING_URL", global = true)]
    pub landing_url: Option<String>,

    /// Zone-update URL (overrides the one derived from --base-url).
    #[arg(long, env = "ATIS_UPDATE_URL", global = true)]
    pub update_url: Option<String>,

    /// Zone id holding the ATIS fragment.
    #[arg(long, env = "ATIS_ZONE", default_value = DEFAULT_ZONE_ID, global = true)]
    pub zone: String,

    /// Artifact path; replaced on every successful run.
    #[arg(short, long, env = "ATIS_OUTPUT", default_value = DEFAULT_OUTPUT_PATH, global = true)]
    pub output: PathBuf,

    /// PEM certificate bundle trusted for TLS.
    #[arg(long, env = "ATIS_TRUST_STORE", default_value = DEFAULT_TRUST_STORE_PATH, global = true)]
    pub trust_store: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, env = "ATIS_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,
}

impl ConfigArgs {
    pub fn to_config(&self) -> FetchConfig {
        let base = FetchConfig::for_base_url(&self.base_url);
        FetchConfig {
            landing_url: self
                .landing_url
                .clone()
                .unwrap_or_else(|| base.landing_url.clone()),
            update_url: self
                .update_url
                .clone()
                .unwrap_or_else(|| base.update_url.clone()),
            zone_id: self.zone.clone(),
            output_path: self.output.clone(),
            trust_store_path: self.trust_store.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..base
        }
    }
}
