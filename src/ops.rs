//! Results of [`ConfigAction`](crate::ConfigAction)s, ready for display.

use std::fmt;

use crate::types::Scope;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResult {
    /// Every value of a key, in order.
    KeyValue { key: String, values: Vec<String> },
    /// Confirmation that a value was written.
    ValueSet {
        key: String,
        value: String,
        scope: Scope,
    },
    /// Confirmation that a key was removed.
    ValueUnset { key: String, scope: Scope },
    /// Key/value pairs, one per value, sorted by key.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::KeyValue { key, values } => write_pairs(f, values.iter().map(|v| (key, v))),
            ConfigResult::ValueSet { key, value, scope } => {
                write!(f, "Set {key} = {value} ({scope})")
            }
            ConfigResult::ValueUnset { key, scope } => write!(f, "Unset {key} ({scope})"),
            ConfigResult::Listing { entries } => write_pairs(f, entries.iter().map(|(k, v)| (k, v))),
        }
    }
}

fn write_pairs<'a>(
    f: &mut fmt::Formatter<'_>,
    pairs: impl Iterator<Item = (&'a String, &'a String)>,
) -> fmt::Result {
    for (i, (key, value)) in pairs.enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{key} = {value}")?;
    }
    Ok(())
}
