//! Error types for palette and time parsing and progress persistence.
//!
//! Growth itself never fails: bad dimensions, empty leaf sets and
//! out-of-grid positions all degrade to less (or no) output instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while parsing a `-k/--color` list.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    /// The list did not contain exactly four entries.
    #[error("color list must contain exactly 4 values, got {0}")]
    WrongCount(usize),
    /// An entry was not an integer in 0..=255.
    #[error("invalid color index: '{0}'")]
    InvalidIndex(String),
}

/// Rejected `-t/--time` or `-w/--wait` values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid step time: '{0}'")]
    Step(String),
    #[error("invalid wait time: '{0}'")]
    Wait(String),
}

/// Errors produced while saving or loading growth progress.
#[derive(Error, Debug)]
pub enum PersistError {
    /// The progress file could not be read or written.
    #[error("progress file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The progress file did not hold `<seed> <branches>`.
    #[error("progress file {path:?} could not be parsed")]
    Malformed { path: PathBuf },
}

impl PersistError {
    /// Short stable label for log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            PersistError::Io { .. } => "persist_io",
            PersistError::Malformed { .. } => "persist_malformed",
        }
    }
}
