use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the whole launcher.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Java ────────────────────────────────────────────
    #[error("Java runtime not found: {0}")]
    JavaNotFound(String),

    #[error("Java execution failed: {0}")]
    JavaExecution(String),

    #[error("Installer error: {0}")]
    Installer(String),

    // ── Saved configuration ─────────────────────────────
    #[error("Invalid saved configuration: {0}")]
    Config(#[from] ConfigParseError),

    #[error("No saved configuration at {0:?}")]
    ConfigNotFound(PathBuf),

    #[error("Version {mc_version} is not available for {kind}")]
    UnknownVersion { kind: String, mc_version: String },

    // ── Processes ───────────────────────────────────────
    #[error("Process error: {0}")]
    Process(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Interrupted by operator")]
    Interrupted,
}

/// Parse failures of the `key=value` configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value {value:?} for `{field}`")]
    InvalidValue { field: &'static str, value: String },
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl LauncherError {
    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}
