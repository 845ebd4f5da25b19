//! Stop identifier types.

use std::fmt;

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop identifier: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// A normalized stop identifier.
///
/// The real-time feed and callers disagree about zero-padding (`"000108"`
/// in the feed, `"108"` from a caller), so stop identifiers are only ever
/// compared in this normalized form: surrounding whitespace trimmed and
/// leading zeros stripped. An identifier made only of zeros normalizes to
/// `"0"`.
///
/// # Examples
///
/// ```
/// use bus_server::domain::StopId;
///
/// let stop = StopId::parse("000108").unwrap();
/// assert_eq!(stop.as_str(), "108");
/// assert_eq!(stop, StopId::parse("108").unwrap());
///
/// assert!(StopId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct StopId(String);

impl StopId {
    /// Parse and normalize a stop identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        Ok(StopId(normalize(trimmed).to_string()))
    }

    /// Returns the normalized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a raw identifier, as found in the feed, refers to this stop.
    pub fn matches(&self, raw: &str) -> bool {
        normalize(raw.trim()) == self.0
    }
}

/// Strip leading zeros without allocating.
///
/// `"000"` maps to `"0"` so that an all-zero identifier never collapses
/// into the empty string.
pub fn normalize(raw: &str) -> &str {
    let stripped = raw.trim_start_matches('0');
    if stripped.is_empty() && !raw.is_empty() {
        &raw[raw.len() - 1..]
    } else {
        stripped
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
