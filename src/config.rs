//! A single configuration source: one text buffer and the index derived from it.
//!
//! [`Config`] keeps two representations of the same data. `raw` is the text
//! as it will be written back, and `vars` maps canonical keys to their values.
//! Every mutation edits `raw` first and then re-derives `vars` from it, so the
//! two can never drift apart. Values that have no line in `raw` (merged
//! includes, entries built from a map or the environment) live in `overlay`
//! and are appended to the derived index after each reparse.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::GitcfgError;
use crate::flatten;
use crate::key::{canonicalize_key, is_writable_key};
use crate::merge::append_values;
use crate::parse::{self, Index, LineEdit, ParseOptions};
use crate::persist;

/// One configuration file (or in-memory source) from a single scope.
///
/// Not synchronized: mutation takes `&mut self`, reads are `&self`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    path: Option<PathBuf>,
    readonly: bool,
    no_writes: bool,
    raw: String,
    vars: Index,
    overlay: Index,
    branch: Option<String>,
    options: ParseOptions,
    included: Vec<PathBuf>,
}

impl Config {
    /// Parse `text` leniently into an in-memory config.
    pub fn parse(text: &str) -> Self {
        // Lenient parsing cannot fail.
        Self::parse_with(text, ParseOptions::default()).unwrap_or_default()
    }

    /// Parse `text` with explicit options. Fails only in strict mode.
    pub fn parse_with(text: &str, options: ParseOptions) -> Result<Self, GitcfgError> {
        Self::parse_at(text, None, options)
    }

    fn parse_at(
        text: &str,
        path: Option<PathBuf>,
        options: ParseOptions,
    ) -> Result<Self, GitcfgError> {
        let vars = parse::build_index(text, options, path.as_deref())?;
        let raw = parse::rewrite(text, None, options, |_| LineEdit::Keep).into_text();
        tracing::trace!("parsed {} keys", vars.len());
        Ok(Self {
            path,
            raw,
            vars,
            options,
            ..Self::default()
        })
    }

    /// Read and parse a whole reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, GitcfgError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| GitcfgError::io(PathBuf::new(), e))?;
        Ok(Self::parse(&text))
    }

    /// Load a config file without following includes.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GitcfgError> {
        Self::load_with(path, ParseOptions::default())
    }

    /// Load a config file with explicit parse options.
    pub fn load_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self, GitcfgError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| GitcfgError::io(path, e))?;
        tracing::debug!("loaded config from {}", path.display());
        Self::parse_at(&text, Some(path.to_path_buf()), options)
    }

    /// An empty, writable config bound to `path`. Nothing is read.
    pub fn empty_at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A read-only preset built from a flat key/value map.
    pub fn from_map<K, V, I>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut overlay = Index::new();
        for (key, value) in data {
            let Some(key) = canonicalize_key(key.as_ref()) else {
                tracing::trace!("skipping invalid preset key {:?}", key.as_ref());
                continue;
            };
            overlay.entry(key).or_default().push(value.into());
        }
        Self {
            readonly: true,
            vars: overlay.clone(),
            overlay,
            ..Self::default()
        }
    }

    /// A read-only preset built from any serializable value.
    ///
    /// Struct fields become sections and keys, nested maps become
    /// subsections and sequences become multi-valued keys.
    pub fn from_serialize<S: Serialize>(source: &S) -> Result<Self, flatten::FlattenError> {
        Ok(Self::from_map(flatten::flatten(source)?))
    }

    /// Mark this config read-only. Writes become silent no-ops.
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Keep changes in memory only.
    pub fn no_writes(mut self, no_writes: bool) -> Self {
        self.no_writes = no_writes;
        self
    }

    pub(crate) fn set_branch(&mut self, branch: Option<String>) {
        self.branch = branch;
    }

    /// File this config is read from and written to, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The current text, exactly as it would be written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Branch checked out in the working tree this config was loaded for.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Include files merged into this config, in load order.
    pub fn included(&self) -> &[PathBuf] {
        &self.included
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.options
    }

    /// True if nothing has been loaded: no text and no values.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.vars.is_empty()
    }

    /// All canonical keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key)?.first().map(String::as_str)
    }

    /// All values of `key`, in order of appearance.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        let key = canonicalize_key(key)?;
        self.vars.get(&key).map(Vec::as_slice)
    }

    /// True if `key` is present, even with an empty value.
    pub fn is_set(&self, key: &str) -> bool {
        canonicalize_key(key).is_some_and(|k| self.vars.contains_key(&k))
    }

    /// Set the first value of `key`, updating or inserting its line.
    ///
    /// Read-only configs ignore the call. Setting the current first value is
    /// a no-op. The first line carrying the key is rewritten in place; if no
    /// line carries it, a new line is inserted into the last matching section
    /// or a new section is appended. The file is written unless this config
    /// has no path or `no_writes` is set.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), GitcfgError> {
        if self.readonly {
            tracing::debug!("not setting {key}: config is read-only");
            return Ok(());
        }
        let key = canonicalize_key(key)
            .filter(|k| is_writable_key(k))
            .ok_or_else(|| GitcfgError::InvalidKey(key.to_string()))?;

        if self.get(&key) == Some(value) {
            tracing::debug!("{key} already set to {value:?}, not rewriting");
            return Ok(());
        }

        let compat = self.options.compat;
        let mut updated = false;
        let rewritten = parse::rewrite(&self.raw, Some(&key), self.options, |entry| {
            if updated {
                return LineEdit::Keep;
            }
            updated = true;
            LineEdit::Replace(parse::format_entry(entry.raw_key, value, compat))
        });

        if rewritten.matched > 0 {
            tracing::debug!("updating {key}");
            self.raw = rewritten.into_text();
        } else {
            tracing::debug!("inserting {key}");
            self.raw = parse::insert_entry(&self.raw, &key, value, self.options);
            // The new line now carries this value.
            if let Some(values) = self.overlay.get_mut(&key) {
                values.retain(|v| v != value);
            }
        }

        self.reindex()?;
        self.flush()
    }

    /// Remove every value of `key`.
    ///
    /// Missing keys and read-only configs are a no-op. Empty sections are left
    /// in place.
    pub fn unset(&mut self, key: &str) -> Result<(), GitcfgError> {
        if self.readonly {
            return Ok(());
        }
        let Some(key) = canonicalize_key(key) else {
            return Ok(());
        };
        if !self.vars.contains_key(&key) {
            return Ok(());
        }

        self.overlay.remove(&key);
        self.raw = parse::rewrite(&self.raw, Some(&key), self.options, |_| LineEdit::Delete)
            .into_text();
        tracing::debug!("unset {key}");

        self.reindex()?;
        self.flush()
    }

    /// Append another config's values after this one's.
    ///
    /// Only the index changes; `raw` keeps this config's own text so writing
    /// never copies the other config's lines.
    pub(crate) fn merge(&mut self, other: &Config) {
        append_values(&mut self.vars, &other.vars);
        append_values(&mut self.overlay, &other.vars);
        if let Some(path) = &other.path {
            self.included.push(path.clone());
        }
        self.included.extend(other.included.iter().cloned());
    }

    /// Add in-memory values that have no line in the text.
    pub(crate) fn push_overlay(&mut self, key: String, value: String) {
        self.vars.entry(key.clone()).or_default().push(value.clone());
        self.overlay.entry(key).or_default().push(value);
    }

    fn reindex(&mut self) -> Result<(), GitcfgError> {
        let mut vars = parse::build_index(&self.raw, self.options, self.path.as_deref())?;
        append_values(&mut vars, &self.overlay);
        self.vars = vars;
        Ok(())
    }

    fn flush(&self) -> Result<(), GitcfgError> {
        match &self.path {
            Some(path) if !self.no_writes => persist::write_config(path, &self.raw),
            _ => {
                tracing::trace!("not writing changes to disk");
                Ok(())
            }
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}

/// Snapshot of every key with all of its values.
impl From<&Config> for BTreeMap<String, Vec<String>> {
    fn from(config: &Config) -> Self {
        config.vars.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Defaults, write_file};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn round_trip_is_identity() {
        for text in [
            "",
            "# only a comment\n",
            "[core]\n\tkey = value # note\n\n; semicolon\n[remote \"Origin\"]\n\turl = x\n",
            "[weird]\n   spaced    =    out   \n\tbare\n[]\n\tjunk line here\n",
            "[core]\n\tint = 7\n[include]\n\tpath = foo.config",
            "[core]",
        ] {
            assert_eq!(Config::parse(text).raw(), text);
        }
    }

    #[test]
    fn missing_final_newline_stays_missing() {
        let mut c = Config::parse("[core]\n\tint = 7");
        c.set("core.int", "8").unwrap();
        assert_eq!(c.raw(), "[core]\n\tint = 8");
        c.set("user.name", "me").unwrap();
        assert_eq!(c.raw(), "[core]\n\tint = 8\n[user]\n\tname = me");
    }

    #[test]
    fn insert_once() {
        let mut c = Config::default();
        c.set("foo.bar", "baz").unwrap();
        assert_eq!(c.raw(), "[foo]\n\tbar = baz\n");
    }

    #[test]
    fn insert_multiple_same_key() {
        let mut c = Config::default();
        c.set("foo.bar", "baz").unwrap();
        assert_eq!(c.raw(), "[foo]\n\tbar = baz\n");
        c.set("foo.bar", "zab").unwrap();
        assert_eq!(c.raw(), "[foo]\n\tbar = zab\n");
    }

    #[test]
    fn insert_multiple_sections() {
        let mut c = Config::default();
        c.set("core.noshow", "true").unwrap();
        c.set("core.show", "true").unwrap();
        c.set("foo.bar", "baz").unwrap();
        assert_eq!(
            c.raw(),
            "[core]\n\tnoshow = true\n\tshow = true\n[foo]\n\tbar = baz\n"
        );
    }

    #[test]
    fn get_all_and_set_first() {
        let mut c = Config::parse("[core]\n\tfoo = bar\n\tfoo = zab\n\tfoo = 123\n");
        assert_eq!(c.get_all("core.foo").unwrap(), ["bar", "zab", "123"]);

        c.set("core.foo", "456").unwrap();
        assert_eq!(c.get_all("core.foo").unwrap(), ["456", "zab", "123"]);
        assert_eq!(c.raw(), "[core]\n\tfoo = 456\n\tfoo = zab\n\tfoo = 123\n");
    }

    #[test]
    fn set_same_first_value_is_noop() {
        let text = "[core]\n\tfoo   =   bar ; keep me\n";
        let mut c = Config::parse(text);
        c.set("core.foo", "bar").unwrap();
        assert_eq!(c.raw(), text);
    }

    #[test]
    fn rewrite_existing_and_insert_new() {
        let mut c = Config::parse(
            "[core]\n\tautoimport = true\n\treadonly = true\n[mounts]\n\tpath = /tmp/foo\n",
        );
        c.set("core.autoimport", "false").unwrap();
        c.set("foo.bar", "baz").unwrap();
        c.set("mounts.readonly", "true").unwrap();
        c.set("show.safecontent", "false").unwrap();

        assert_eq!(
            c.raw(),
            "[core]\n\tautoimport = false\n\treadonly = true\n[mounts]\n\tpath = /tmp/foo\n\treadonly = true\n[foo]\n\tbar = baz\n[show]\n\tsafecontent = false\n"
        );
    }

    #[test]
    fn set_preserves_comments_and_drops_stale_inline_comment() {
        let mut c = Config::parse("# header\n[core]\n\tkey = value # note\n");
        c.set("core.key", "value2").unwrap();
        assert_eq!(c.raw(), "# header\n[core]\n\tkey = value2\n");
    }

    #[test]
    fn set_keeps_original_key_spelling() {
        let mut c = Config::parse("[Core]\n\tAutoCRLF = false\n");
        c.set("core.autocrlf", "true").unwrap();
        assert_eq!(c.raw(), "[Core]\n\tAutoCRLF = true\n");
    }

    #[test]
    fn read_after_write() {
        let mut c = Config::parse("[core]\n\teditor = vim\n");
        for (k, v) in [
            ("core.editor", "nano"),
            ("core.pager", "less -R"),
            ("user.name", " padded "),
            ("alias.lg", "log --graph # pretty"),
            ("remote.Origin.url", "git@example.com:repo.git"),
            ("core.flag", ""),
        ] {
            c.set(k, v).unwrap();
            assert_eq!(c.get(k), Some(v), "{k}");
        }
    }

    #[test]
    fn index_matches_reparse_after_mutations() {
        let mut c = Config::parse("[core]\n\ta = 1\n\ta = 2\n[x \"Y\"]\n\tz = q\n");
        c.set("core.a", "3").unwrap();
        c.set("x.Y.new", "n").unwrap();
        c.unset("x.Y.z").unwrap();
        c.set("brand.new", "section").unwrap();

        let reparsed = Config::parse(c.raw());
        assert_eq!(BTreeMap::from(&reparsed), BTreeMap::from(&c));
    }

    #[test]
    fn canonicalized_lookup() {
        let c = Config::parse("[core]\n\tautocrlf = input\n[remote \"Origin\"]\n\tURL = x\n");
        assert_eq!(c.get("Core.AutoCRLF"), c.get("core.autocrlf"));
        assert_eq!(c.get("Remote.Origin.URL"), Some("x"));
        assert_eq!(c.get("remote.origin.url"), None);
        assert!(c.keys().any(|k| k == "remote.Origin.url"));
    }

    #[test]
    fn is_set_with_empty_value() {
        let c = Config::parse("[core]\n\tbare\n\tempty =\n");
        assert!(c.is_set("core.bare"));
        assert!(c.is_set("core.empty"));
        assert_eq!(c.get("core.empty"), Some(""));
        assert!(!c.is_set("core.missing"));
        assert!(!c.is_set("nodot"));
    }

    #[test]
    fn invalid_keys_rejected() {
        let mut c = Config::default();
        for key in ["nodot", ".key", "core.", "a..b", "core.1bad", "bad section.x.y"] {
            assert!(
                matches!(c.set(key, "v"), Err(GitcfgError::InvalidKey(_))),
                "{key}"
            );
        }
    }

    #[test]
    fn unset_removes_line_only() {
        let mut c = Config::parse(
            "[core]\n\tshowsafecontent = true\n\treadonly = true\n[mounts]\n\tpath = /tmp/foo\n[foo]\n\tbar = baz\n",
        );
        c.unset("core.readonly").unwrap();
        assert_eq!(
            c.raw(),
            "[core]\n\tshowsafecontent = true\n[mounts]\n\tpath = /tmp/foo\n[foo]\n\tbar = baz\n"
        );
        assert!(!c.is_set("core.readonly"));

        // Missing key: no-op.
        c.unset("foo.bla").unwrap();

        // The emptied section header stays.
        c.unset("foo.bar").unwrap();
        assert!(c.raw().ends_with("[foo]\n"));
    }

    #[test]
    fn unset_removes_all_values() {
        let mut c = Config::parse("[core]\n\tk = 1\n\tk = 2\n");
        c.unset("core.k").unwrap();
        assert_eq!(c.raw(), "[core]\n");
        assert_eq!(c.get_all("core.k"), None);
    }

    #[test]
    fn from_map_is_readonly() {
        let mut cfg = Config::from_map([
            ("core.foo", "bar"),
            ("core.pager", "false"),
            ("Core.Timeout", "10"),
        ]);
        assert_eq!(cfg.get("core.timeout"), Some("10"));
        assert!(cfg.is_set("core.foo"));
        assert!(!cfg.is_set("core.bar"));

        cfg.unset("core.foo").unwrap();
        cfg.set("core.foo", "changed").unwrap();
        assert_eq!(cfg.get("core.foo"), Some("bar"));
    }

    #[test]
    fn from_serialize_builds_preset() {
        let cfg = Config::from_serialize(&Defaults::default()).unwrap();
        assert!(cfg.is_readonly());
        assert_eq!(cfg.get("core.editor"), Some("vi"));
        assert_eq!(cfg.get("core.autosync"), Some("true"));
        assert_eq!(cfg.get("core.timeout"), Some("45"));
        assert_eq!(
            cfg.get_all("mounts.path").unwrap(),
            ["/srv/a", "/srv/b"]
        );
        assert_eq!(cfg.get("remote.Origin.url"), Some("https://example.com"));
        assert!(!cfg.is_set("core.signkey"));
    }

    #[test]
    fn from_reader_parses() {
        let c = Config::from_reader("[core]\n\tint = 7\n".as_bytes()).unwrap();
        assert_eq!(c.get("core.int"), Some("7"));
        assert_eq!(c.path(), None);
    }

    #[test]
    fn strict_parse_fails_on_bad_line() {
        let options = ParseOptions {
            strict: true,
            ..Default::default()
        };
        assert!(Config::parse_with("[core]\n\tok = 1\n", options).is_ok());
        assert!(matches!(
            Config::parse_with("[core]\n\t-bad = 1\n", options),
            Err(GitcfgError::InvalidLine { line: 2, .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_invalid_data() {
        let bytes: &[u8] = b"[core]\n\tk = \xff\n";
        let is_invalid_data = |result: Result<Config, GitcfgError>| {
            matches!(
                result,
                Err(GitcfgError::IoError { ref source, .. })
                    if source.kind() == std::io::ErrorKind::InvalidData
            )
        };

        assert!(is_invalid_data(Config::from_reader(bytes)));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, bytes).unwrap();
        assert!(is_invalid_data(Config::load(&path)));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope"));
        assert!(matches!(result, Err(GitcfgError::IoError { .. })));
    }

    #[test]
    fn set_persists_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "config", "# mine\n[core]\n\teditor = vim\n");

        let mut c = Config::load(&path).unwrap();
        c.set("core.editor", "nano").unwrap();
        c.set("user.name", "Jane").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# mine\n[core]\n\teditor = nano\n[user]\n\tname = Jane\n"
        );
    }

    #[test]
    fn no_writes_keeps_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "config", "[core]\n\teditor = vim\n");

        let mut c = Config::load(&path).unwrap().no_writes(true);
        c.set("core.editor", "nano").unwrap();

        assert_eq!(c.get("core.editor"), Some("nano"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[core]\n\teditor = vim\n"
        );
    }

    #[test]
    fn empty_at_creates_file_on_first_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config");

        let mut c = Config::empty_at(&path);
        assert!(c.is_empty());
        c.set("core.editor", "vim").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[core]\n\teditor = vim\n"
        );
    }

    #[test]
    fn merged_values_stay_out_of_text() {
        let mut root = Config::parse("[core]\n\tint = 7\n");
        let other = Config::parse("[core]\n\tint = 8\n\tonly = there\n");
        root.merge(&other);

        assert_eq!(root.get_all("core.int").unwrap(), ["7", "8"]);
        root.set("core.int", "9").unwrap();
        assert_eq!(root.get_all("core.int").unwrap(), ["9", "8"]);
        assert_eq!(root.raw(), "[core]\n\tint = 9\n");

        // A key known only from the merge gets its own line.
        root.set("core.only", "here").unwrap();
        assert_eq!(root.get("core.only"), Some("here"));
        assert_eq!(root.raw(), "[core]\n\tint = 9\n\tonly = here\n");
    }
}
