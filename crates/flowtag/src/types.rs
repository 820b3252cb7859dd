//! Flowtag type definitions

use std::collections::HashMap;
use std::fmt;

/// Tag assigned to flow records with no lookup table entry.
///
/// A lookup row whose tag is literally `Untagged` lands in the same bucket;
/// the two are not distinguished.
pub const UNTAGGED: &str = "Untagged";

/// Normalized (destination port, protocol) pair.
///
/// Both parts are trimmed and lowercased on construction, so keys that differ
/// only in case or surrounding whitespace compare equal. Ports stay opaque
/// strings: `"025"` and `"25"` are different keys, and ordering is lexical,
/// port first then protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey {
    port: String,
    protocol: String,
}

impl LookupKey {
    /// Builds a key from raw CSV field values.
    pub fn new(port: &str, protocol: &str) -> Self {
        Self {
            port: normalize(port),
            protocol: normalize(protocol),
        }
    }

    /// Normalized destination port.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Normalized protocol.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Flow record count per tag
pub type TagCounts = HashMap<String, u64>;

/// Flow record count per (port, protocol) key
pub type PortProtocolCounts = HashMap<LookupKey, u64>;
