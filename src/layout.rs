//! Where each scope's file lives and how scopes are loaded.
//!
//! [`Layout`] holds names and switches, with git's conventions as defaults.
//! It derives [`confique::Config`], so an application can keep its own copy
//! in a TOML file. [`ScopePaths`] turns a layout into concrete paths for the
//! current user with [`directories`].

use std::path::{Path, PathBuf};

use confique::Config as _;

use crate::error::GitcfgError;
use crate::include::IncludeOptions;
use crate::parse::ParseOptions;
use crate::types::IncludePolicy;

#[derive(confique::Config, Debug, Clone, PartialEq)]
pub struct Layout {
    /// Application name. Selects the platform config directory
    /// (`~/.config/<name>` on Linux).
    #[config(default = "git")]
    pub name: String,

    /// Machine-wide config file. Always loaded read-only.
    #[config(default = "/etc/gitconfig")]
    pub system_config: PathBuf,

    /// Per-user config file name, relative to the home directory.
    /// Empty to only use the platform config directory.
    #[config(default = ".gitconfig")]
    pub global_config: String,

    /// Repository config file name, relative to the working directory.
    #[config(default = "config")]
    pub local_config: String,

    /// Worktree config file name, relative to the working directory.
    #[config(default = "config.worktree")]
    pub worktree_config: String,

    /// Prefix of the `_COUNT`, `_KEY_n`, `_VALUE_n` and `_NOSYSTEM` variables.
    #[config(default = "GIT_CONFIG")]
    pub env_prefix: String,

    /// Apply writes in memory only.
    #[config(default = false)]
    pub no_writes: bool,

    /// Fail on malformed lines instead of skipping them.
    #[config(default = false)]
    pub strict: bool,

    /// What to do with include files that cannot be read.
    #[config(default = "fail-fast")]
    pub include_policy: IncludePolicy,
}

impl Layout {
    /// Git's own layout.
    pub fn defaults() -> Result<Self, GitcfgError> {
        Ok(Self::builder().load()?)
    }

    /// Layout from a TOML file. Missing keys, or a missing file, fall back to
    /// the defaults.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, GitcfgError> {
        Ok(Self::builder().file(path.into()).load()?)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict: self.strict,
            ..ParseOptions::default()
        }
    }

    pub fn include_options(&self) -> IncludeOptions {
        IncludeOptions {
            policy: self.include_policy,
            parse: self.parse_options(),
            ..IncludeOptions::default()
        }
    }
}

/// Concrete locations of the system and global config files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePaths {
    pub system: PathBuf,
    /// Global files to try, in order. The first is also where a new global
    /// file is created.
    pub global: Vec<PathBuf>,
}

impl ScopePaths {
    /// Resolve `layout` for the current user.
    pub fn resolve(layout: &Layout) -> Self {
        let platform = directories::ProjectDirs::from("", "", &layout.name)
            .map(|dirs| dirs.config_dir().join("config"));
        let home = directories::UserDirs::new()
            .filter(|_| !layout.global_config.is_empty())
            .map(|dirs| dirs.home_dir().join(&layout.global_config));

        Self {
            system: layout.system_config.clone(),
            global: platform.into_iter().chain(home).collect(),
        }
    }

    /// The first global candidate that exists.
    pub fn existing_global(&self) -> Option<&Path> {
        self.global.iter().map(PathBuf::as_path).find(|p| p.is_file())
    }

    /// Where global writes go: the existing file, else the first candidate.
    pub fn global_target(&self) -> Option<&Path> {
        self.existing_global()
            .or_else(|| self.global.first().map(PathBuf::as_path))
    }
}
