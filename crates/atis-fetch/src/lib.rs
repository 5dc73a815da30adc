//! atis-fetch — pull the current ATIS letter out of an airport IDS
//! zone-update backend and persist it as a small timestamped artifact.
//!
//! The pipeline is: [`session`] handshake → [`locator`] picks the zone
//! fragment → [`extractor`] finds the letter → [`artifact`] writes it.
//! [`pipeline::run`] wires the stages together.

pub mod artifact;
pub mod config;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod pipeline;
pub mod session;
pub mod types;

pub use artifact::{write_artifact, Clock, FixedClock, StatusArtifact, SystemClock};
pub use config::FetchConfig;
pub use error::{AtisError, AtisResult};
pub use extractor::{extract, extract_detailed, Extraction, Strategy};
pub use locator::locate;
pub use pipeline::{run, RunReport};
pub use session::{open_session, zone_update_headers, IdsSession, TrustStore};
pub use types::{AtisLetter, Envelope, ZoneEntry};
