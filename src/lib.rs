//! Read and write git-style configuration files without losing a byte of
//! what the user wrote.
//!
//! gitcfg parses the INI-like format used by git (`[section]`,
//! `[section "subsection"]`, `key = value`) into a key to values map, and
//! writes changes back by editing only the affected lines. Comments, blank
//! lines, ordering and quoting of untouched lines survive every `set` and
//! `unset`.
//!
//! ```ignore
//! let mut scopes = Scopes::new(Layout::defaults()?);
//! scopes.load_all(Some(Path::new(".")))?;
//!
//! let editor = scopes.get("core.editor");
//! scopes.set_global("user.name", "Jane")?;
//! ```
//!
//! # Keys
//!
//! A key is `section.name` or `section.subsection.name`. Section and name are
//! case-insensitive and stored lowercase; the subsection is case-sensitive and
//! is everything between the first and the last dot:
//!
//! | key                                | section | subsection             | name            |
//! |------------------------------------|---------|------------------------|-----------------|
//! | `core.autocrlf`                    | `core`  |                        | `autocrlf`      |
//! | `remote.Origin.url`                | `remote`| `Origin`               | `url`           |
//! | `url.git@github.com:.insteadof`    | `url`   | `git@github.com:`      | `insteadof`     |
//!
//! A key may carry several values. [`Config::get`] returns the first,
//! [`Config::get_all`] all of them in file order, and [`Config::set`] replaces
//! only the first.
//!
//! # One file: [`Config`]
//!
//! A [`Config`] holds the file's text and an index derived from it. `set`
//! rewrites the first line carrying the key, or inserts a line at the end of
//! the last matching section, or appends a new section. The index is then
//! rebuilt from the new text, so text and index never disagree. A config with
//! a path writes itself back after every change unless it was created with
//! [`no_writes`](Config::no_writes). Read-only configs (system, preset)
//! silently ignore writes.
//!
//! # Includes
//!
//! `include.path` and `includeIf "<condition>".path` pull in further files,
//! recursively, each file at most once. Supported conditions are `gitdir:`,
//! `gitdir/i:` and `onbranch:`; see the [`include`] module. Included values
//! are appended after the including file's values and are never written into
//! it.
//!
//! # Scopes
//!
//! [`Scopes`] layers every source, highest priority first:
//!
//! ```text
//! env        GIT_CONFIG_COUNT / GIT_CONFIG_KEY_n / GIT_CONFIG_VALUE_n
//! worktree   <workdir>/config.worktree
//! local      <workdir>/config
//! global     ~/.config/git/config, or ~/.gitconfig
//! system     /etc/gitconfig (read-only, skipped with GIT_CONFIG_NOSYSTEM)
//! preset     compiled-in defaults (read-only)
//! ```
//!
//! Reads stop at the first scope that has the key. Writes go to the scope
//! they name, creating its file on first use. Names and locations come from a
//! [`Layout`], whose defaults follow git; an application can load its own
//! from TOML with [`Layout::from_file`].
//!
//! # Presets from structs
//!
//! [`Config::from_serialize`] turns any `serde::Serialize` value into a
//! read-only preset: fields become sections and keys, map keys become
//! subsections and sequences become multi-valued keys.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`ConfigArgs`] gives an
//! application `config list|get|set|unset` subcommands with a `--scope` flag.
//! [`ConfigArgs::into_action()`] produces a [`ConfigAction`], executed by
//! [`Scopes::handle()`]. Without clap, construct [`ConfigAction`] values
//! directly.
//!
//! # Errors and logging
//!
//! All fallible operations return [`GitcfgError`]. With the `rich-errors`
//! feature every variant is also a `miette::Diagnostic`. Parsing is lenient
//! by default: malformed lines are skipped and reported through `tracing`
//! at trace level. [`ParseOptions::strict`] turns them into errors.

pub mod error;
pub mod include;
pub mod key;
pub mod parse;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod config;
mod env;
mod flatten;
mod layout;
pub(crate) mod merge;
mod ops;
mod persist;
mod scopes;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use config::Config;
pub use env::env_overlay;
pub use error::GitcfgError;
pub use flatten::FlattenError;
pub use include::{IncludeOptions, load_with_includes};
pub use layout::{Layout, ScopePaths};
pub use ops::ConfigResult;
pub use parse::ParseOptions;
pub use scopes::Scopes;
pub use types::{ConfigAction, IncludePolicy, Scope};
