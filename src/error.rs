use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum GitcfgError {
    #[error("Invalid key '{0}': expected section.key or section.subsection.key")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(gitcfg::invalid_key),
            help("section and key names start with a letter and contain only letters, digits and '-'")
        )
    )]
    InvalidKey(String),

    #[error("Failed to access {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(gitcfg::io)))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid line {line} in {path}: {content}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(gitcfg::invalid_line),
            help("strict parsing is enabled; fix the line or parse leniently")
        )
    )]
    InvalidLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("No workdir set: call .load_all() with a workdir first")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(gitcfg::no_workdir)))]
    WorkdirNotSet,

    #[error("Unknown scope '{name}'. Available scopes: {}", .available.join(", "))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(gitcfg::unknown_scope)))]
    UnknownScope {
        name: String,
        available: Vec<String>,
    },

    #[error("Key not found: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(gitcfg::key_not_found)))]
    KeyNotFound(String),

    #[error("Configuration error: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(gitcfg::layout)))]
    ConfigError(#[from] confique::Error),
}

impl GitcfgError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GitcfgError::IoError {
            path: path.into(),
            source,
        }
    }
}
