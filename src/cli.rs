//! Clap adapter for gitcfg.
//!
//! Compiled only with the `clap` Cargo feature (on by default). [`ConfigArgs`]
//! can be embedded in an application's own clap derive to get
//! `config list|get|set|unset` subcommands. [`ConfigArgs::into_action()`]
//! converts the parsed arguments into a [`ConfigAction`], which
//! [`Scopes::handle()`](crate::Scopes::handle) executes without knowing
//! about clap.

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// The `config` subcommand group, ready to embed in an application's CLI.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Scope to read from or write to (env, worktree, local, global, system, preset).
    ///
    /// For `list`/`get`: reads that scope only instead of the merged view.
    /// For `set`/`unset`: defaults to `local` inside a repository, `global` outside.
    #[arg(long, global = true)]
    pub scope: Option<String>,

    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// `list`, `get`, `set` and `unset`.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show every key and value, optionally only keys starting with a prefix.
    List {
        /// Key prefix (e.g. "remote.origin").
        prefix: Option<String>,
    },
    /// Show every value of a key.
    Get {
        /// Dotted key (e.g. "core.editor" or "remote.origin.url").
        key: String,
    },
    /// Write a value to a config file.
    Set {
        /// Dotted key (e.g. "core.editor" or "remote.origin.url").
        key: String,
        /// Value to set.
        value: String,
    },
    /// Remove every value of a key from a config file.
    Unset {
        /// Dotted key (e.g. "core.editor" or "remote.origin.url").
        key: String,
    },
}

impl ConfigArgs {
    /// The [`ConfigAction`] these arguments describe.
    ///
    /// A bare `config` lists everything, like `config list`. `--scope` is
    /// carried into every variant.
    pub fn into_action(self) -> ConfigAction {
        let scope = self.scope;
        match self.action {
            None => ConfigAction::List {
                prefix: None,
                scope,
            },
            Some(ConfigSubcommand::List { prefix }) => ConfigAction::List { prefix, scope },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key, scope },
            Some(ConfigSubcommand::Set { key, value }) => ConfigAction::Set { key, value, scope },
            Some(ConfigSubcommand::Unset { key }) => ConfigAction::Unset { key, scope },
        }
    }
}
