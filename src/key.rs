//! Key handling: splitting dotted keys and folding them to canonical form.
//!
//! A fully qualified key is `section.key` or `section.subsection.key`. The
//! subsection is everything between the first and the last dot, so it may
//! itself contain dots (`url.git@github.com:.insteadof`). Section and key
//! names are case-insensitive and folded to lowercase; the subsection is
//! case-sensitive and kept as written.

/// The parts of a dotted key. `subsection` is empty when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParts<'a> {
    pub section: &'a str,
    pub subsection: &'a str,
    pub name: &'a str,
}

/// Split a dotted key into section, subsection and key name.
///
/// No case folding happens here. A key without any dot yields an empty
/// section and the whole input as the name.
pub fn split_key(key: &str) -> KeyParts<'_> {
    let Some(first) = key.find('.') else {
        return KeyParts {
            section: "",
            subsection: "",
            name: key,
        };
    };
    let last = key.rfind('.').unwrap_or(first);

    if last > first {
        KeyParts {
            section: &key[..first],
            subsection: &key[first + 1..last],
            name: &key[last + 1..],
        }
    } else {
        KeyParts {
            section: &key[..first],
            subsection: "",
            name: &key[first + 1..],
        }
    }
}

/// Compose a canonical key from its parts.
pub fn compose_key(section: &str, subsection: &str, name: &str) -> String {
    let mut out = String::with_capacity(section.len() + subsection.len() + name.len() + 2);
    out.push_str(&section.to_lowercase());
    out.push('.');
    if !subsection.is_empty() {
        out.push_str(subsection);
        out.push('.');
    }
    out.push_str(&name.to_lowercase());
    out
}

/// Fold a key to its canonical form, or `None` if it lacks a section or a
/// name, or has an empty subsection (`section..name`).
pub fn canonicalize_key(key: &str) -> Option<String> {
    let parts = split_key(key);
    if parts.section.is_empty() || parts.name.is_empty() {
        return None;
    }
    if parts.subsection.is_empty() && key.find('.') != key.rfind('.') {
        return None;
    }
    Some(compose_key(parts.section, parts.subsection, parts.name))
}

/// Variable names start with a letter and continue with letters, digits and `-`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Section names allow letters, digits and `-`.
pub fn is_valid_section(section: &str) -> bool {
    !section.is_empty() && section.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// A key is writable when every part can be serialized and parsed back.
pub fn is_writable_key(key: &str) -> bool {
    let parts = split_key(key);
    is_valid_section(parts.section)
        && is_valid_name(parts.name)
        && !parts.subsection.contains('\n')
}
