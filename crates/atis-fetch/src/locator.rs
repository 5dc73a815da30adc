//! Pick one zone's HTML out of a decoded envelope.

use crate::error::{AtisError, AtisResult};
use crate::types::Envelope;

/// Return the fragment of the first entry whose id equals `zone_id` exactly.
///
/// On a miss the error lists every zone id that was present, so upstream
/// renames show up in a single failure report.
pub fn locate<'a>(envelope: &'a Envelope, zone_id: &str) -> AtisResult<&'a str> {
    envelope
        .content
        .iter()
        .find(|entry| entry.id == zone_id)
        .map(|entry| entry.html.as_str())
        .ok_or_else(|| AtisError::ZoneNotFound {
            zone: zone_id.to_string(),
            present: envelope.zone_ids(),
        })
}
