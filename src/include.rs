//! `include.path` and `includeIf.<condition>.path` expansion.
//!
//! Includes are loaded breadth first: the root file's includes in order, then
//! theirs, and so on. Every file is loaded at most once, which is what makes
//! `a -> b -> a` terminate. Values of an included file are appended after the
//! values already present, so the root keeps priority for single-value reads
//! while multi-value reads see everything.
//!
//! Conditions are evaluated against the root's working directory and the
//! branch checked out there, for every level of nesting:
//!
//! | condition          | matches when                                          |
//! |--------------------|-------------------------------------------------------|
//! | `gitdir:<path>`    | the workdir is `<path>`, or is below it if it ends in `/` |
//! | `gitdir/i:<path>`  | same, ignoring case                                   |
//! | `onbranch:<glob>`  | the current branch matches the glob                   |
//!
//! Unknown conditions never match.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::GlobBuilder;

use crate::config::Config;
use crate::error::GitcfgError;
use crate::parse::ParseOptions;
use crate::types::IncludePolicy;

/// How include files are found and what happens when one cannot be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeOptions {
    pub policy: IncludePolicy,
    /// Home directory used for `~/` in include paths and `gitdir:` patterns.
    pub home: Option<PathBuf>,
    pub parse: ParseOptions,
}

impl Default for IncludeOptions {
    fn default() -> Self {
        Self {
            policy: IncludePolicy::default(),
            home: directories::UserDirs::new().map(|u| u.home_dir().to_path_buf()),
            parse: ParseOptions::default(),
        }
    }
}

/// Facts about the root file that conditions are evaluated against.
struct Context<'a> {
    workdir: Option<&'a Path>,
    branch: Option<&'a str>,
    home: Option<&'a Path>,
}

/// Load `path` and merge every file it includes, directly or transitively.
///
/// The returned config writes back to `path` only; included values are
/// readable through it but never copied into its text.
pub fn load_with_includes(
    path: &Path,
    workdir: Option<&Path>,
    options: &IncludeOptions,
) -> Result<Config, GitcfgError> {
    let mut root = Config::load_with(path, options.parse)?;
    let branch = workdir.and_then(read_git_branch);
    root.set_branch(branch.clone());

    let ctx = Context {
        workdir,
        branch: branch.as_deref(),
        home: options.home.as_deref(),
    };

    let mut visited = HashSet::from([clean_path(&absolute(path))]);
    let mut queue: VecDeque<PathBuf> = effective_includes(&root, path, &ctx).into();
    let mut repeats = 0usize;

    while let Some(next) = queue.pop_front() {
        if !visited.insert(next.clone()) {
            tracing::debug!("{} already loaded, skipping", next.display());
            repeats += 1;
            continue;
        }

        let included = match Config::load_with(&next, options.parse) {
            Ok(config) => config,
            Err(e) if options.policy == IncludePolicy::Skip => {
                tracing::warn!("skipping include: {e}");
                continue;
            }
            Err(e) => return Err(e),
        };

        tracing::debug!("including {}", next.display());
        queue.extend(effective_includes(&included, &next, &ctx));
        root.merge(&included);
    }

    if repeats > 0 {
        tracing::debug!(
            "{} include(s) of {} pointed at files already loaded",
            repeats,
            path.display()
        );
    }
    Ok(root)
}

/// The include paths `config` asks for, resolved against `origin`'s directory.
///
/// Unconditional includes come first, then conditional ones in sorted key order.
fn effective_includes(config: &Config, origin: &Path, ctx: &Context<'_>) -> Vec<PathBuf> {
    let base = origin.parent().unwrap_or(Path::new(""));

    let unconditional = config.get_all("include.path").unwrap_or_default();
    let conditional = config
        .keys()
        .filter_map(|key| {
            let condition = key.strip_prefix("includeif.")?.strip_suffix(".path")?;
            condition_matches(condition, ctx).then_some(key)
        })
        .flat_map(|key| config.get_all(key).unwrap_or_default());

    unconditional
        .iter()
        .chain(conditional)
        .filter(|raw| !raw.is_empty())
        .filter_map(|raw| resolve_include_path(raw, base, ctx.home))
        .collect()
}

fn condition_matches(condition: &str, ctx: &Context<'_>) -> bool {
    if let Some(pattern) = condition.strip_prefix("gitdir/i:") {
        gitdir_matches(pattern, ctx, true)
    } else if let Some(pattern) = condition.strip_prefix("gitdir:") {
        gitdir_matches(pattern, ctx, false)
    } else if let Some(pattern) = condition.strip_prefix("onbranch:") {
        ctx.branch.is_some_and(|b| branch_matches(pattern, b))
    } else {
        tracing::trace!("unsupported include condition {condition:?}");
        false
    }
}

fn gitdir_matches(pattern: &str, ctx: &Context<'_>, fold_case: bool) -> bool {
    let Some(workdir) = ctx.workdir else {
        return false;
    };

    let pattern = match pattern.strip_prefix("~/") {
        Some(rest) => match ctx.home {
            Some(home) => home.join(rest).to_string_lossy().into_owned(),
            None => return false,
        },
        None => pattern.to_string(),
    };
    let workdir = workdir.to_string_lossy();

    let (pattern, workdir) = if fold_case {
        (pattern.to_lowercase(), workdir.to_lowercase())
    } else {
        (pattern, workdir.into_owned())
    };

    let workdir = workdir.trim_end_matches('/');
    if workdir == pattern.trim_end_matches('/') {
        return true;
    }
    pattern.ends_with('/') && format!("{workdir}/").starts_with(&pattern)
}

/// Match a branch name against an `onbranch:` glob. `/` is never matched by
/// `*` or `?`; a trailing `/` matches everything below it.
pub fn branch_matches(pattern: &str, branch: &str) -> bool {
    let pattern = if pattern.ends_with('/') {
        format!("{pattern}**")
    } else {
        pattern.to_string()
    };
    match GlobBuilder::new(&pattern).literal_separator(true).build() {
        Ok(glob) => glob.compile_matcher().is_match(branch),
        Err(e) => {
            tracing::trace!("invalid onbranch pattern {pattern:?}: {e}");
            false
        }
    }
}

/// Resolve an include path relative to the directory of the including file.
///
/// Returns `None` for `~/` paths when no home directory is known.
pub fn resolve_include_path(raw: &str, base: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let path = if let Some(rest) = raw.strip_prefix("~/") {
        let Some(home) = home else {
            tracing::debug!("no home directory, ignoring include {raw:?}");
            return None;
        };
        home.join(rest)
    } else if Path::new(raw).is_absolute() {
        PathBuf::from(raw)
    } else {
        absolute(&base.join(raw))
    };
    Some(clean_path(&path))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Remove `.` and resolve `..` without touching the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Branch checked out in `workdir`, read from `.git/HEAD`.
///
/// `.git` may be a directory or a file holding `gitdir: <path>`, as in linked
/// worktrees and submodules. A detached HEAD or a missing repository gives
/// `None`.
pub fn read_git_branch(workdir: &Path) -> Option<String> {
    let dot_git = workdir.join(".git");
    let git_dir = if dot_git.is_dir() {
        dot_git
    } else {
        let content = fs::read_to_string(&dot_git).ok()?;
        let target = content
            .lines()
            .find_map(|line| line.trim().strip_prefix("gitdir:"))?
            .trim();
        let target = Path::new(target);
        if target.is_absolute() {
            target.to_path_buf()
        } else {
            workdir.join(target)
        }
    };

    let head = fs::read_to_string(git_dir.join("HEAD")).ok()?;
    head.trim()
        .strip_prefix("ref: refs/heads/")
        .filter(|branch| !branch.is_empty())
        .map(str::to_string)
}
