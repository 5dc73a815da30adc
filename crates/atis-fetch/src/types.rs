//! Core data types: the ATIS letter and the decoded zone-update envelope.

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

/// A validated ATIS identifier: one uppercase ASCII letter, `A`..=`Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtisLetter(char);

impl AtisLetter {
    /// Accept an ASCII letter of either case, storing it uppercased.
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| AtisLetter(c.to_ascii_uppercase()))
    }

    /// Apply the candidate rule shared by every extraction strategy:
    /// trim, then keep only the first character if it is a letter.
    ///
    /// `"A — valid until 2100Z"` yields `A`; `"1A"` and `""` yield `None`.
    pub fn from_candidate(text: &str) -> Option<Self> {
        text.trim().chars().next().and_then(Self::new)
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl std::fmt::Display for AtisLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AtisLetter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One `(zone id, html fragment)` pair from a zone-update response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneEntry {
    pub id: String,
    pub html: String,
}

/// Decoded zone-update response. Entry order follows the wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    pub content: Vec<ZoneEntry>,
}

impl Envelope {
    /// Decode the `_tapestry.content` list of a zone-update response.
    ///
    /// A body without that key path decodes to an empty envelope. Entries
    /// that are not `[string, string, ...]` arrays are skipped.
    pub fn from_json(value: &Value) -> Self {
        let Some(items) = value
            .get("_tapestry")
            .and_then(|t| t.get("content"))
            .and_then(|c| c.as_array())
        else {
            return Envelope::default();
        };

        let mut content = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let pair = item.as_array().and_then(|arr| {
                let id = arr.first()?.as_str()?;
                let html = arr.get(1)?.as_str()?;
                Some(ZoneEntry {
                    id: id.to_string(),
                    html: html.to_string(),
                })
            });
            match pair {
                Some(entry) => content.push(entry),
                None => warn!(index, "skipping malformed zone entry"),
            }
        }

        Envelope { content }
    }

    /// Zone identifiers in wire order.
    pub fn zone_ids(&self) -> Vec<String> {
        self.content.iter().map(|e| e.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_letter_uppercases() {
        assert_eq!(AtisLetter::new('c').map(AtisLetter::as_char), Some('C'));
        assert_eq!(AtisLetter::new('Z').map(AtisLetter::as_char), Some('Z'));
    }

    #[test]
    fn test_letter_rejects_non_ascii_letters() {
        assert!(AtisLetter::new('1').is_none());
        assert!(AtisLetter::new('é').is_none());
        assert!(AtisLetter::new('-').is_none());
        assert!(AtisLetter::new(' ').is_none());
    }

    #[test]
    fn test_candidate_takes_first_character_only() {
        let l = AtisLetter::from_candidate("  A — valid until 2100Z ").unwrap();
        assert_eq!(l.as_char(), 'A');
        assert_eq!(AtisLetter::from_candidate("A1").unwrap().as_char(), 'A');
        assert_eq!(AtisLetter::from_candidate("b ").unwrap().as_char(), 'B');
    }

    #[test]
    fn test_candidate_rejects_leading_non_letter() {
        assert!(AtisLetter::from_candidate("1A").is_none());
        assert!(AtisLetter::from_candidate("   ").is_none());
        assert!(AtisLetter::from_candidate("").is_none());
    }

    #[test]
    fn test_letter_serializes_as_string() {
        let l = AtisLetter::new('q').unwrap();
        assert_eq!(serde_json::to_string(&l).unwrap(), "\"Q\"");
        assert_eq!(l.to_string(), "Q");
    }

    #[test]
    fn test_envelope_decodes_pairs_in_order() {
        let v = json!({
            "_tapestry": {
                "content": [["otherZone", "<div/>"], ["atisZone", "<td>A</td>"]]
            }
        });
        let env = Envelope::from_json(&v);
        assert_eq!(env.zone_ids(), vec!["otherZone", "atisZone"]);
        assert_eq!(env.content[1].html, "<td>A</td>");
    }

    #[test]
    fn test_envelope_missing_key_is_empty() {
        assert!(Envelope::from_json(&json!({})).is_empty());
        assert!(Envelope::from_json(&json!({"_tapestry": {}})).is_empty());
        assert!(Envelope::from_json(&json!({"_tapestry": {"content": null}})).is_empty());
        assert!(Envelope::from_json(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_envelope_skips_malformed_entries() {
        let v = json!({
            "_tapestry": {
                "content": [["short"], [1, "<p/>"], "flat", ["atisZone", "<b>D</b>", "extra"]]
            }
        });
        let env = Envelope::from_json(&v);
        assert_eq!(env.zone_ids(), vec!["atisZone"]);
    }
}
