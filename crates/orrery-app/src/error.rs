//! Errors surfaced by the shell.

use std::path::PathBuf;

use orrery_config::ConfigError;
use orrery_sky::ParseError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Neither `--tle` nor `catalog.tle_path` named an element-set file.
    #[error("no element-set file configured (use --tle or catalog.tle_path)")]
    MissingCatalog,

    #[error("failed to read element sets from {path}: {source}")]
    ReadCatalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no element sets in {path}: {source}")]
    EmptyCatalog {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("invalid start epoch {value:?}: {source}")]
    StartEpoch {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
