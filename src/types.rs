use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GitcfgError;

/// A configuration source, in precedence order: earlier variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Values injected through `<PREFIX>_COUNT` / `_KEY_n` / `_VALUE_n`.
    Env,
    /// `config.worktree` in the working directory.
    Worktree,
    /// The repository's own `config`.
    Local,
    /// The user's file (`~/.gitconfig` or the platform config dir).
    Global,
    /// Machine-wide file, always read-only.
    System,
    /// Compiled-in defaults, always read-only.
    Preset,
}

impl Scope {
    /// All scopes, highest priority first.
    pub const ALL: [Scope; 6] = [
        Scope::Env,
        Scope::Worktree,
        Scope::Local,
        Scope::Global,
        Scope::System,
        Scope::Preset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scope::Env => "env",
            Scope::Worktree => "worktree",
            Scope::Local => "local",
            Scope::Global => "global",
            Scope::System => "system",
            Scope::Preset => "preset",
        }
    }

    /// Whether writes to this scope can ever take effect.
    pub fn is_writable(self) -> bool {
        !matches!(self, Scope::System | Scope::Preset)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scope {
    type Err = GitcfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GitcfgError::UnknownScope {
                name: s.to_string(),
                available: Scope::ALL.iter().map(|s| s.name().to_string()).collect(),
            })
    }
}

/// What to do when an included file cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncludePolicy {
    /// Fail the whole load with the include's I/O error.
    #[default]
    FailFast,
    /// Log a warning and carry on without the include.
    Skip,
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
///
/// `scope` names a [`Scope`]. Reads without a scope use the merged view;
/// writes without a scope go to `local` when a working directory is known
/// and to `global` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    List {
        prefix: Option<String>,
        scope: Option<String>,
    },
    Get {
        key: String,
        scope: Option<String>,
    },
    Set {
        key: String,
        value: String,
        scope: Option<String>,
    },
    Unset {
        key: String,
        scope: Option<String>,
    },
}
