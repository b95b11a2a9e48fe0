//! The layered view over every scope.
//!
//! [`Scopes`] owns one [`Config`] per loaded scope. Reads walk the scopes from
//! highest to lowest priority (env, worktree, local, global, system, preset)
//! and stop at the first one that has the key. Writes always name a scope and
//! touch only that scope's store, creating it on first use.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::env;
use crate::error::GitcfgError;
use crate::include::{self, IncludeOptions};
use crate::key::{canonicalize_key, split_key};
use crate::layout::{Layout, ScopePaths};
use crate::ops::ConfigResult;
use crate::types::{ConfigAction, Scope};

/// All configuration scopes of one application.
///
/// ```ignore
/// let mut scopes = Scopes::new(Layout::defaults()?);
/// scopes.load_all(Some(Path::new("/path/to/repo")))?;
/// let editor = scopes.get("core.editor");
/// scopes.set_global("user.name", "Jane")?;
/// ```
#[derive(Debug, Clone)]
pub struct Scopes {
    layout: Layout,
    paths: ScopePaths,
    include: IncludeOptions,
    workdir: Option<PathBuf>,
    env_vars: Vec<(String, String)>,
    stores: BTreeMap<Scope, Config>,
}

impl Scopes {
    /// Scopes for `layout`, with paths resolved for the current user.
    /// Nothing is loaded until [`load_all`](Self::load_all).
    pub fn new(layout: Layout) -> Self {
        let paths = ScopePaths::resolve(&layout);
        Self::with_paths(layout, paths)
    }

    /// Scopes with explicit system and global paths.
    pub fn with_paths(layout: Layout, paths: ScopePaths) -> Self {
        Self {
            include: layout.include_options(),
            layout,
            paths,
            workdir: None,
            env_vars: Vec::new(),
            stores: BTreeMap::new(),
        }
    }

    /// Install the lowest-priority defaults. The store is made read-only.
    pub fn with_preset(mut self, preset: Config) -> Self {
        self.stores.insert(Scope::Preset, preset.readonly(true));
        self
    }

    /// Replace the include options derived from the layout.
    pub fn with_include_options(mut self, options: IncludeOptions) -> Self {
        self.include = options;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn paths(&self) -> &ScopePaths {
        &self.paths
    }

    /// Working directory given to the last load.
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// The store of one scope, if it is loaded.
    pub fn store(&self, scope: Scope) -> Option<&Config> {
        self.stores.get(&scope)
    }

    /// True if one of the global candidates exists on disk.
    pub fn has_global_config(&self) -> bool {
        self.paths.existing_global().is_some()
    }

    /// Load every scope, reading the env scope from the process environment.
    ///
    /// Without a `workdir` the local and worktree scopes stay unloaded.
    pub fn load_all(&mut self, workdir: Option<&Path>) -> Result<(), GitcfgError> {
        self.load_all_with_env(workdir, std::env::vars())
    }

    /// Load every scope from an explicit set of environment variables.
    pub fn load_all_with_env(
        &mut self,
        workdir: Option<&Path>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), GitcfgError> {
        let previous = (
            std::mem::replace(&mut self.workdir, workdir.map(Path::to_path_buf)),
            std::mem::replace(&mut self.env_vars, vars.into_iter().collect()),
        );
        if let Err(e) = self.load() {
            (self.workdir, self.env_vars) = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Load again with the workdir and environment of the last load.
    ///
    /// On error the stores loaded before stay in place.
    pub fn reload(&mut self) -> Result<(), GitcfgError> {
        self.load()
    }

    fn load(&mut self) -> Result<(), GitcfgError> {
        tracing::debug!("loading {} configs", self.layout.name);
        let mut stores = BTreeMap::new();
        if let Some(preset) = self.stores.get(&Scope::Preset) {
            stores.insert(Scope::Preset, preset.clone());
        }
        let prefix = &self.layout.env_prefix;

        let env_pairs = self.env_vars.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        if env::no_system(prefix, env_pairs) {
            tracing::debug!("system config disabled by {prefix}_NOSYSTEM");
        } else if let Some(system) = self.load_file(&self.paths.system)? {
            stores.insert(Scope::System, system.readonly(true));
        }

        let mut files = Vec::new();
        if let Some(path) = self.paths.existing_global() {
            files.push((Scope::Global, path.to_path_buf()));
        }
        if let Some(workdir) = &self.workdir {
            files.push((Scope::Local, workdir.join(&self.layout.local_config)));
            files.push((Scope::Worktree, workdir.join(&self.layout.worktree_config)));
        }
        for (scope, path) in files {
            if let Some(store) = self.load_file(&path)? {
                stores.insert(scope, store.no_writes(self.layout.no_writes));
            }
        }

        let env = env::env_overlay(prefix, self.env_vars.iter().cloned());
        if !env.is_empty() {
            stores.insert(Scope::Env, env);
        }

        tracing::debug!(
            "loaded scopes: {:?}",
            stores.keys().map(|s| s.name()).collect::<Vec<_>>()
        );
        self.stores = stores;
        Ok(())
    }

    /// Load one scope file with its includes.
    ///
    /// A missing or unreadable file gives `None`. When only an include is
    /// broken, the file is loaded on its own.
    fn load_file(&self, path: &Path) -> Result<Option<Config>, GitcfgError> {
        match include::load_with_includes(path, self.workdir.as_deref(), &self.include) {
            Ok(config) => {
                tracing::debug!("loaded {}", path.display());
                Ok(Some(config))
            }
            Err(e) if failed_path(&e) == Some(path) => match e {
                GitcfgError::IoError { source, .. } => {
                    if source.kind() == io::ErrorKind::NotFound {
                        tracing::trace!("no config at {}", path.display());
                    } else {
                        tracing::warn!("skipping {}: {source}", path.display());
                    }
                    Ok(None)
                }
                other => Err(other),
            },
            Err(e) => {
                tracing::warn!("loading {} without its includes: {e}", path.display());
                Config::load_with(path, self.include.parse).map(Some)
            }
        }
    }

    /// First value of `key` in the highest-priority scope that has it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.stores.values().find_map(|store| store.get(key))
    }

    /// All values of `key` from the highest-priority scope that has it.
    /// Values from lower scopes are not mixed in.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.stores.values().find_map(|store| store.get_all(key))
    }

    /// First value of `key` in one scope, ignoring precedence.
    pub fn get_from(&self, key: &str, scope: Scope) -> Option<&str> {
        self.stores.get(&scope)?.get(key)
    }

    /// True if any scope has `key`.
    pub fn is_set(&self, key: &str) -> bool {
        self.stores.values().any(|store| store.is_set(key))
    }

    /// Set `key` in one scope. Writes to system and preset are ignored.
    pub fn set(&mut self, scope: Scope, key: &str, value: &str) -> Result<(), GitcfgError> {
        match self.store_mut(scope)? {
            Some(store) => store.set(key, value),
            None => Ok(()),
        }
    }

    pub fn set_local(&mut self, key: &str, value: &str) -> Result<(), GitcfgError> {
        self.set(Scope::Local, key, value)
    }

    pub fn set_global(&mut self, key: &str, value: &str) -> Result<(), GitcfgError> {
        self.set(Scope::Global, key, value)
    }

    /// Set `key` in the env scope. Kept in memory only.
    pub fn set_env(&mut self, key: &str, value: &str) -> Result<(), GitcfgError> {
        self.set(Scope::Env, key, value)
    }

    /// Remove `key` from one scope. Unloaded scopes are left alone.
    pub fn unset(&mut self, scope: Scope, key: &str) -> Result<(), GitcfgError> {
        match self.stores.get_mut(&scope) {
            Some(store) => store.unset(key),
            None => Ok(()),
        }
    }

    pub fn unset_local(&mut self, key: &str) -> Result<(), GitcfgError> {
        self.unset(Scope::Local, key)
    }

    pub fn unset_global(&mut self, key: &str) -> Result<(), GitcfgError> {
        self.unset(Scope::Global, key)
    }

    fn store_mut(&mut self, scope: Scope) -> Result<Option<&mut Config>, GitcfgError> {
        if !scope.is_writable() {
            tracing::debug!("{scope} config is read-only, ignoring write");
            return Ok(None);
        }
        if !self.stores.contains_key(&scope) {
            let store = self.open_store(scope)?;
            self.stores.insert(scope, store);
        }
        Ok(self.stores.get_mut(&scope))
    }

    /// A store for a scope that was not loaded: the file if it appeared since,
    /// else an empty store bound to where the file belongs.
    fn open_store(&self, scope: Scope) -> Result<Config, GitcfgError> {
        let Some(path) = self.write_path(scope)? else {
            return Ok(Config::default());
        };
        let store = match self.load_file(&path)? {
            Some(store) => store,
            None => {
                tracing::debug!("creating {scope} config at {}", path.display());
                Config::empty_at(path)
            }
        };
        Ok(store.no_writes(self.layout.no_writes))
    }

    fn write_path(&self, scope: Scope) -> Result<Option<PathBuf>, GitcfgError> {
        let in_workdir = |name: &str| {
            self.workdir
                .as_ref()
                .map(|w| Some(w.join(name)))
                .ok_or(GitcfgError::WorkdirNotSet)
        };
        match scope {
            Scope::Env | Scope::Preset => Ok(None),
            Scope::Worktree => in_workdir(&self.layout.worktree_config),
            Scope::Local => in_workdir(&self.layout.local_config),
            Scope::Global => self
                .paths
                .global_target()
                .map(|p| Some(p.to_path_buf()))
                .ok_or_else(|| {
                    GitcfgError::io(
                        &self.layout.global_config,
                        io::Error::new(io::ErrorKind::NotFound, "no home directory"),
                    )
                }),
            Scope::System => Ok(Some(self.paths.system.clone())),
        }
    }

    /// Every key of every scope, sorted and deduplicated.
    pub fn keys(&self) -> Vec<String> {
        self.stores
            .values()
            .flat_map(|store| store.keys())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keys starting with `prefix`. An empty prefix lists every key.
    pub fn list(&self, prefix: &str) -> Vec<String> {
        let mut keys = self.keys();
        keys.retain(|k| k.starts_with(prefix));
        keys
    }

    /// Every section name, sorted.
    pub fn list_sections(&self) -> Vec<String> {
        self.keys()
            .iter()
            .map(|k| split_key(k).section.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every subsection of `section`, sorted.
    pub fn list_subsections(&self, section: &str) -> Vec<String> {
        let section = section.to_lowercase();
        self.keys()
            .iter()
            .map(|k| split_key(k))
            .filter(|parts| parts.section == section && !parts.subsection.is_empty())
            .map(|parts| parts.subsection.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `key<sep>value` for every non-empty value of every key under `prefix`,
    /// sorted. An empty `sep` means `=`.
    pub fn kv_list(&self, prefix: &str, sep: &str) -> Vec<String> {
        let sep = if sep.is_empty() { "=" } else { sep };
        let mut out: Vec<String> = self
            .list(prefix)
            .iter()
            .flat_map(|key| {
                self.get_all(key)
                    .unwrap_or_default()
                    .iter()
                    .filter(|v| !v.is_empty())
                    .map(move |v| format!("{key}{sep}{v}"))
            })
            .collect();
        out.sort();
        out
    }

    /// Execute a [`ConfigAction`].
    ///
    /// Reads without a scope use the merged view. Writes without a scope go
    /// to `local` when a working directory is set, else to `global`.
    pub fn handle(&mut self, action: &ConfigAction) -> Result<ConfigResult, GitcfgError> {
        match action {
            ConfigAction::List { prefix, scope } => {
                let prefix = prefix.as_deref().unwrap_or("");
                let entries: Vec<(String, String)> = match scope {
                    None => self
                        .list(prefix)
                        .into_iter()
                        .flat_map(|key| {
                            let values = self.get_all(&key).unwrap_or_default().to_vec();
                            values.into_iter().map(move |v| (key.clone(), v))
                        })
                        .collect(),
                    Some(name) => {
                        let scope: Scope = name.parse()?;
                        self.store(scope).map_or_else(Vec::new, |store| {
                            store
                                .keys()
                                .filter(|k| k.starts_with(prefix))
                                .flat_map(|k| {
                                    store
                                        .get_all(k)
                                        .unwrap_or_default()
                                        .iter()
                                        .map(move |v| (k.to_string(), v.clone()))
                                })
                                .collect()
                        })
                    }
                };
                Ok(ConfigResult::Listing { entries })
            }
            ConfigAction::Get { key, scope } => {
                let values = match scope {
                    None => self.get_all(key),
                    Some(name) => {
                        let scope: Scope = name.parse()?;
                        self.store(scope).and_then(|store| store.get_all(key))
                    }
                };
                let values = values
                    .ok_or_else(|| GitcfgError::KeyNotFound(key.clone()))?
                    .to_vec();
                Ok(ConfigResult::KeyValue {
                    key: canonicalize_key(key).unwrap_or_else(|| key.clone()),
                    values,
                })
            }
            ConfigAction::Set { key, value, scope } => {
                let scope = self.write_scope(scope.as_deref())?;
                self.set(scope, key, value)?;
                Ok(ConfigResult::ValueSet {
                    key: key.clone(),
                    value: value.clone(),
                    scope,
                })
            }
            ConfigAction::Unset { key, scope } => {
                let scope = self.write_scope(scope.as_deref())?;
                self.unset(scope, key)?;
                Ok(ConfigResult::ValueUnset {
                    key: key.clone(),
                    scope,
                })
            }
        }
    }

    fn write_scope(&self, name: Option<&str>) -> Result<Scope, GitcfgError> {
        match name {
            Some(name) => name.parse(),
            None if self.workdir.is_some() => Ok(Scope::Local),
            None => Ok(Scope::Global),
        }
    }
}

fn failed_path(e: &GitcfgError) -> Option<&Path> {
    match e {
        GitcfgError::IoError { path, .. } | GitcfgError::InvalidLine { path, .. } => Some(path),
        _ => None,
    }
}
