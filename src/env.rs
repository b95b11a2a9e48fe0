use std::collections::HashMap;

use crate::config::Config;
use crate::key::canonicalize_key;

/// Build the env scope from `{PREFIX}_COUNT`, `{PREFIX}_KEY_n` and `{PREFIX}_VALUE_n`.
///
/// `COUNT` must be a positive integer. Pairs are read for `n` in `0..COUNT`;
/// a missing or empty key, an invalid key, or a missing value discards the
/// whole set and yields an empty store.
///
/// The store has no path: `set` works in memory and is never written.
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_overlay(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Config {
    let vars: HashMap<String, String> = vars.into_iter().collect();
    let mut config = Config::default();

    let count = match vars.get(&format!("{prefix}_COUNT")).map(|c| c.trim().parse::<usize>()) {
        Some(Ok(count)) if count > 0 => count,
        Some(_) => {
            tracing::debug!("{prefix}_COUNT is not a positive number, ignoring env config");
            return config;
        }
        None => return config,
    };

    let mut pairs = Vec::with_capacity(count);
    for i in 0..count {
        let key = vars
            .get(&format!("{prefix}_KEY_{i}"))
            .and_then(|k| canonicalize_key(k));
        let value = vars.get(&format!("{prefix}_VALUE_{i}"));
        match (key, value) {
            (Some(key), Some(value)) => pairs.push((key, value.clone())),
            _ => {
                tracing::warn!("{prefix}_KEY_{i} or {prefix}_VALUE_{i} missing or invalid, ignoring env config");
                return config;
            }
        }
    }

    for (key, value) in pairs {
        config.push_overlay(key, value);
    }
    config
}

/// True when `{PREFIX}_NOSYSTEM` is set to anything but the empty string.
pub fn no_system<'a>(prefix: &str, mut vars: impl Iterator<Item = (&'a str, &'a str)>) -> bool {
    let name = format!("{prefix}_NOSYSTEM");
    vars.any(|(k, v)| k == name && !v.is_empty())
}
